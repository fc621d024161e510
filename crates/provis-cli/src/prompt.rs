//! Interactive prompting for missing command fields.

use colored::Colorize;
use std::io::{self, BufRead, Write};

/// Capability the builder uses to ask for one missing value.
///
/// Injected so the core logic never touches a terminal directly; tests
/// supply deterministic implementations instead.
pub trait Prompt {
    /// Ask once. `None` means no answer could be read; callers also treat
    /// an empty answer as "the user declined".
    fn request_value(&mut self, prompt: &str) -> Option<String>;
}

/// Reads answers from stdin, one line per request.
#[derive(Debug, Default)]
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn request_value(&mut self, prompt: &str) -> Option<String> {
        print!("{} ", format!("{prompt}:").cyan());
        io::stdout().flush().ok()?;

        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }
}
