//! provis: schema-driven database provisioning shell
//!
//! One-shot mode builds a single command from the argument list and prints
//! its JSON wire form; `provis repl` starts the interactive shell with
//! schema-aware tab completion. The schema root is always passed in
//! explicitly (flag or default install path), never baked into the core.

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;

use provis_cli::prompt::StdinPrompt;
use provis_cli::sink::JsonSink;
use provis_schema::Operation;

mod repl;

/// Where the provisioning framework installs its schema by default.
const DEFAULT_SCHEMA_ROOT: &str = "/usr/share/opensips/pi_http";

#[derive(Parser)]
#[command(name = "provis")]
#[command(author, version, about = "Schema-driven database provisioning shell")]
struct Cli {
    /// Schema root holding the descriptor and per-database files
    #[arg(long, global = true, default_value = DEFAULT_SCHEMA_ROOT)]
    schema_root: PathBuf,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display columns from a table: <db> <table> <col> [col ...]
    Show { args: Vec<String> },

    /// Insert a row: <db> <table> <col>=<value> [<col>=<value> ...]
    Add { args: Vec<String> },

    /// Update rows: <db> <table> update.id=<value> <col>=<value> [...]
    Update { args: Vec<String> },

    /// Delete rows: <db> <table> delete.id=<value>
    Delete { args: Vec<String> },

    /// Interactive shell with schema-aware tab completion
    Repl,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        // Build aborted: the shell's "nothing was submitted" signal.
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<bool> {
    match cli.command {
        Commands::Show { args } => one_shot(Operation::Show, &args),
        Commands::Add { args } => one_shot(Operation::Add, &args),
        Commands::Update { args } => one_shot(Operation::Update, &args),
        Commands::Delete { args } => one_shot(Operation::Delete, &args),
        Commands::Repl => {
            repl::run(&cli.schema_root)?;
            Ok(true)
        }
    }
}

fn one_shot(operation: Operation, args: &[String]) -> Result<bool> {
    let mut prompt = StdinPrompt;
    let mut sink = JsonSink;
    provis_cli::execute(operation, args, &mut prompt, &mut sink)
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();
}
