//! Transport seam: where finished commands leave this crate.
//!
//! Actually executing a command against a database or HTTP endpoint is the
//! transport's job, not ours. The shell hands every finished
//! [`CommandObject`] to a [`CommandSink`] and forgets about it.

use anyhow::Result;

use crate::command::CommandObject;

pub trait CommandSink {
    fn submit(&mut self, command: &CommandObject) -> Result<()>;
}

/// Prints each command as one JSON document on stdout, the wire shape the
/// provisioning framework consumes.
#[derive(Debug, Default)]
pub struct JsonSink;

impl CommandSink for JsonSink {
    fn submit(&mut self, command: &CommandObject) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(command)?);
        Ok(())
    }
}
