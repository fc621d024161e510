//! Context-sensitive completion over a partially typed provisioning line.
//!
//! Stateless: every call reconstructs its position purely from the line
//! text, walking Start -> DatabaseChosen -> TableChosen -> ColumnStream by
//! counting committed tokens. Line grammar is
//! `provision <method> <database> <table> <columns...>`, so the database is
//! token 2 and the table token 3.

use provis_schema::{Operation, SchemaCatalog};

/// Candidates for the token currently being typed.
///
/// `begidx`/`endidx` locate `text` inside `line` and are accepted for
/// host-shell compatibility; the position logic only needs the tokens.
/// Always returns a list: zero surviving candidates become the host-shell
/// "no completions" marker, a single empty string.
pub fn complete(
    catalog: &SchemaCatalog,
    operation: Operation,
    text: &str,
    line: &str,
    _begidx: usize,
    _endidx: usize,
) -> Vec<String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    finish(candidates_at(catalog, operation, &tokens), text)
}

/// The full candidate set for the current position, before prefix
/// filtering.
fn candidates_at(catalog: &SchemaCatalog, operation: Operation, tokens: &[&str]) -> Vec<String> {
    let databases = catalog.databases();

    // Naming the database: fewer than three tokens committed, or a third
    // token that is not (yet) a recognized database.
    if tokens.len() < 3 {
        return databases.to_vec();
    }
    let database = tokens[2];
    if tokens.len() == 3 && !databases.iter().any(|d| d == database) {
        return databases.to_vec();
    }

    // Naming the table. Completion must never error, so an unreadable
    // side-file just means no candidates here.
    let tables = catalog.tables(database).unwrap_or_default();
    if tokens.len() == 3 {
        return tables;
    }
    let table = tokens[3];
    if tokens.len() == 4 && !tables.iter().any(|t| t == table) {
        return tables;
    }

    // Column stream. Everything except `show` writes values, so candidates
    // get a trailing `=` to hint that one must follow.
    let mut columns = catalog.columns(table, operation);
    if operation != Operation::Show {
        for column in &mut columns {
            column.push('=');
        }
    }
    columns
}

/// Prefix filter plus the host-shell finishing rules: a lone candidate not
/// ending in `=` gets a trailing space ("token complete, move on"); an
/// empty result becomes `[""]`.
fn finish(candidates: Vec<String>, text: &str) -> Vec<String> {
    let mut out: Vec<String> = candidates
        .into_iter()
        .filter(|c| c.starts_with(text))
        .collect();

    if out.len() == 1 && !out[0].ends_with('=') {
        out[0].push(' ');
    }
    if out.is_empty() {
        out.push(String::new());
    }
    out
}
