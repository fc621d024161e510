//! Interactive shell.
//!
//! Lines follow the module grammar `provision <method> <args...>`; the
//! completer walks the same positions the builder consumes, so every token
//! can be tab-completed from the schema. Completion state is rebuilt from
//! the line (and the schema root) on every keystroke, so schema edits show
//! up immediately.

use anyhow::{bail, Result};
use colored::Colorize;
use std::path::Path;

use provis_cli::prompt::StdinPrompt;
use provis_cli::sink::JsonSink;
use provis_schema::Operation;

/// The provisioning module's name in the shell grammar.
const MODULE: &str = "provision";

enum ReplControl {
    Continue,
    Exit,
}

#[cfg(feature = "repl-rustyline")]
pub fn run(schema_root: &Path) -> Result<()> {
    use anyhow::anyhow;
    use rustyline::error::ReadlineError;
    use rustyline::Editor;

    println!("{}", "provis shell".green().bold());
    println!("Tab-completion enabled. Type `help` for commands. Type `exit` to quit.\n");

    let helper = ReplLineHelper::new(schema_root.to_path_buf());
    let mut rl: Editor<ReplLineHelper, rustyline::history::DefaultHistory> =
        Editor::new().map_err(|e| anyhow!("failed to init rustyline: {e}"))?;
    rl.set_helper(Some(helper));

    loop {
        let line = match rl.readline("provis> ") {
            Ok(l) => l,
            Err(ReadlineError::Eof) => break,
            Err(ReadlineError::Interrupted) => continue,
            Err(e) => return Err(anyhow!("readline error: {e}")),
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        rl.add_history_entry(line)
            .map_err(|e| anyhow!("failed to record history: {e}"))?;

        let tokens = split_command_line(line);
        match dispatch_line(&tokens) {
            Ok(ReplControl::Continue) => {}
            Ok(ReplControl::Exit) => break,
            Err(e) => eprintln!("{} {e}", "error:".red().bold()),
        }
    }

    Ok(())
}

#[cfg(not(feature = "repl-rustyline"))]
pub fn run(_schema_root: &Path) -> Result<()> {
    use std::io::{self, BufRead, Write};

    println!("{}", "provis shell".green().bold());
    println!("Type `help` for commands. Type `exit` to quit.\n");

    let stdin = io::stdin();
    loop {
        print!("{}", "provis> ".cyan().bold());
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let tokens = split_command_line(line);
        match dispatch_line(&tokens) {
            Ok(ReplControl::Continue) => {}
            Ok(ReplControl::Exit) => break,
            Err(e) => eprintln!("{} {e}", "error:".red().bold()),
        }
    }

    Ok(())
}

fn dispatch_line(tokens: &[String]) -> Result<ReplControl> {
    if tokens.is_empty() {
        return Ok(ReplControl::Continue);
    }

    match tokens[0].as_str() {
        "help" | "?" => {
            print_help();
            Ok(ReplControl::Continue)
        }
        "exit" | "quit" => Ok(ReplControl::Exit),
        MODULE => {
            let Some(method) = tokens.get(1) else {
                bail!("usage: {MODULE} <show|add|update|delete> ...");
            };
            let Some(operation) = Operation::parse(method) else {
                bail!("unknown method `{method}`");
            };
            let params = tokens[2..].to_vec();
            let mut prompt = StdinPrompt;
            let mut sink = JsonSink;
            // An aborted build already logged its warning; the shell just
            // moves on to the next line.
            provis_cli::execute(operation, &params, &mut prompt, &mut sink)?;
            Ok(ReplControl::Continue)
        }
        other => bail!("unknown command `{other}`"),
    }
}

fn print_help() {
    println!(
        r#"Commands:
  help | ?                        Show this help
  exit | quit                     Exit the shell

  {MODULE} show   <db> <table> <col> [col ...]
  {MODULE} add    <db> <table> <col>=<value> [<col>=<value> ...]
  {MODULE} update <db> <table> update.id=<value> <col>=<value> [...]
  {MODULE} delete <db> <table> delete.id=<value>

Missing arguments are prompted for. Tab completes databases, tables and
columns at each position, straight from the schema on disk."#
    );
}

/// Whitespace tokenizer with double-quote grouping and backslash escapes,
/// so assignment values may contain spaces.
fn split_command_line(line: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => in_quotes = !in_quotes,
            '\\' => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    out.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }

    if !current.is_empty() {
        out.push(current);
    }

    out
}

/// First-level shell words offered before any module method is chosen.
#[cfg(feature = "repl-rustyline")]
fn toplevel_words() -> Vec<String> {
    vec![
        MODULE.to_string(),
        "help".to_string(),
        "exit".to_string(),
        "quit".to_string(),
    ]
}

#[cfg(any(feature = "repl-rustyline", test))]
fn method_words() -> Vec<String> {
    Operation::ALL.iter().map(|op| op.name().to_string()).collect()
}

#[cfg(feature = "repl-rustyline")]
struct ReplLineHelper {
    schema_root: std::path::PathBuf,
}

#[cfg(feature = "repl-rustyline")]
impl ReplLineHelper {
    fn new(schema_root: std::path::PathBuf) -> Self {
        Self { schema_root }
    }

    fn pairs_from_prefix(items: &[String], prefix: &str) -> Vec<rustyline::completion::Pair> {
        let mut pairs = Vec::new();
        for item in items {
            if item.starts_with(prefix) {
                pairs.push(rustyline::completion::Pair {
                    display: item.clone(),
                    replacement: item.clone(),
                });
            }
        }
        pairs
    }
}

#[cfg(feature = "repl-rustyline")]
impl rustyline::Helper for ReplLineHelper {}

#[cfg(feature = "repl-rustyline")]
impl rustyline::highlight::Highlighter for ReplLineHelper {}

#[cfg(feature = "repl-rustyline")]
impl rustyline::hint::Hinter for ReplLineHelper {
    type Hint = String;
    fn hint(&self, _line: &str, _pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        None
    }
}

#[cfg(feature = "repl-rustyline")]
impl rustyline::validate::Validator for ReplLineHelper {}

#[cfg(feature = "repl-rustyline")]
impl rustyline::completion::Completer for ReplLineHelper {
    type Candidate = rustyline::completion::Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Self::Candidate>)> {
        let start = line[..pos]
            .rfind(|c: char| c.is_whitespace())
            .map(|i| i + 1)
            .unwrap_or(0);
        let word = &line[start..pos];
        let committed: Vec<&str> = line[..start].split_whitespace().collect();

        // Completing the first token => shell words.
        if committed.is_empty() {
            return Ok((start, Self::pairs_from_prefix(&toplevel_words(), word)));
        }
        if committed[0] != MODULE {
            return Ok((start, Vec::new()));
        }

        // Completing the method name.
        if committed.len() == 1 {
            return Ok((start, Self::pairs_from_prefix(&method_words(), word)));
        }

        let Some(operation) = Operation::parse(committed[1]) else {
            return Ok((start, Vec::new()));
        };

        // Fresh catalog per keystroke: freshness over speed, and completion
        // must never error, so an unavailable schema means no candidates.
        let Ok(catalog) = provis_schema::SchemaCatalog::open(&self.schema_root) else {
            return Ok((start, Vec::new()));
        };

        let candidates = provis_cli::complete::complete(
            &catalog,
            operation,
            word,
            &line[..pos],
            start,
            pos,
        );

        // The core's single-empty-string "no completions" marker is a
        // host-shell convention rustyline has no use for.
        let pairs = candidates
            .into_iter()
            .filter(|c| !c.is_empty())
            .map(|c| rustyline::completion::Pair {
                display: c.trim_end().to_string(),
                replacement: c,
            })
            .collect();

        Ok((start, pairs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_command_line_groups_quoted_values() {
        let tokens = split_command_line(r#"provision add accounting subscriber name="Alice A""#);
        assert_eq!(
            tokens,
            vec![
                "provision",
                "add",
                "accounting",
                "subscriber",
                "name=Alice A"
            ]
        );
    }

    #[test]
    fn split_command_line_honors_escapes() {
        let tokens = split_command_line(r"provision add db t note=a\ b");
        assert_eq!(tokens.last().map(String::as_str), Some("note=a b"));
    }

    #[test]
    fn split_command_line_collapses_whitespace() {
        let tokens = split_command_line("  provision   show  db ");
        assert_eq!(tokens, vec!["provision", "show", "db"]);
    }

    #[test]
    fn method_words_cover_all_operations() {
        assert_eq!(method_words(), vec!["show", "add", "update", "delete"]);
    }
}
