//! Provis command-line interface
//!
//! Builds structured provisioning commands (`show`/`add`/`update`/`delete`)
//! from positional tokens, prompting interactively for anything missing,
//! and drives schema-aware tab completion for the interactive shell. The
//! set of valid databases, tables and columns comes from the on-disk
//! schema via `provis-schema`; nothing is hard-coded here.

use anyhow::Result;

use provis_schema::Operation;

pub mod builder;
pub mod command;
pub mod complete;
pub mod prompt;
pub mod sink;

use prompt::Prompt;
use sink::CommandSink;

/// Build `operation` from `params` and hand the finished command to `sink`.
///
/// Returns `Ok(false)` when the build aborted (a required field stayed
/// empty after prompting); the sink is not invoked in that case, so no
/// partial command ever reaches the transport.
pub fn execute(
    operation: Operation,
    params: &[String],
    prompt: &mut dyn Prompt,
    sink: &mut dyn CommandSink,
) -> Result<bool> {
    match builder::build(operation, params, prompt)? {
        Some(command) => {
            sink.submit(&command)?;
            Ok(true)
        }
        None => Ok(false),
    }
}
