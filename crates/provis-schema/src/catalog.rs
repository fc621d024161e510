//! The invocation-scoped schema catalog.
//!
//! Answers three questions: which databases exist, which tables a database
//! contains, and which columns an operation may reference on a table. All
//! answers are pure functions of the on-disk schema at construction time;
//! callers build a fresh catalog per invocation instead of caching one
//! process-wide, trading speed for freshness.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::descriptor::Descriptor;
use crate::error::SchemaError;
use crate::Operation;

/// Entries in the schema root whose derived name carries this prefix are
/// internal to the provisioning framework and never name a database.
pub const RESERVED_PREFIX: &str = "pi";

/// Filename of the descriptor document inside the schema root.
pub const DESCRIPTOR_FILE: &str = "pi_framework.xml";

/// Per-database side-file tested for table membership.
const SIDE_FILE_SUFFIX: &str = "-mod";

/// Read-only index over one snapshot of the schema root.
#[derive(Debug, Clone)]
pub struct SchemaCatalog {
    root: PathBuf,
    databases: Vec<String>,
    descriptor: Descriptor,
}

impl SchemaCatalog {
    /// Build a catalog from the schema root.
    ///
    /// The root path is always threaded in explicitly so tests and
    /// multi-root setups can point different catalogs at different fixture
    /// directories.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, SchemaError> {
        let root = root.into();
        let databases = list_databases(&root)?;
        let descriptor = Descriptor::load(&root.join(DESCRIPTOR_FILE))?;
        debug!(
            root = %root.display(),
            databases = databases.len(),
            tables = descriptor.tables.len(),
            "schema catalog loaded"
        );
        Ok(Self {
            root,
            databases,
            descriptor,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Known database names: deduplicated, lexicographically sorted, with
    /// reserved-prefix entries excluded.
    pub fn databases(&self) -> &[String] {
        &self.databases
    }

    /// Tables that belong to `database`.
    ///
    /// Membership is a substring test of the database's side-file, so a
    /// table whose name is contained in another declared table's name can
    /// show up in databases it was not declared for. Known approximation,
    /// preserved until the side-file format is formalized.
    pub fn tables(&self, database: &str) -> Result<Vec<String>, SchemaError> {
        let path = self.root.join(format!("{database}{SIDE_FILE_SUFFIX}"));
        let contents = fs::read_to_string(&path)
            .map_err(|e| SchemaError::unavailable(&path, e.to_string()))?;

        let mut tables = Vec::new();
        for decl in &self.descriptor.tables {
            if contents.contains(decl.name.as_str()) {
                tables.push(decl.name.clone());
            }
        }
        Ok(tables)
    }

    /// Columns `operation` may reference on `table`, in descriptor order.
    ///
    /// For `update`/`delete` the operation-qualified clause columns come
    /// first (`update.<col>` / `delete.<col>`), then the plain query
    /// columns. Every `mod` block whose name matches contributes.
    pub fn columns(&self, table: &str, operation: Operation) -> Vec<String> {
        let mut columns = Vec::new();
        for decl in self.descriptor.tables.iter().filter(|t| t.name == table) {
            for cmd in decl.commands.iter().filter(|c| c.name == operation.name()) {
                if let Some(prefix) = operation.clause_prefix() {
                    for col in &cmd.clause_cols {
                        columns.push(format!("{prefix}{col}"));
                    }
                }
                columns.extend(cmd.query_cols.iter().cloned());
            }
        }
        columns
    }
}

/// Derive database names from the schema root's directory entries: the
/// substring before the first `-` of each filename, reserved-prefix names
/// dropped, first occurrence kept, sorted.
fn list_databases(root: &Path) -> Result<Vec<String>, SchemaError> {
    let entries =
        fs::read_dir(root).map_err(|e| SchemaError::unavailable(root, e.to_string()))?;

    let mut names: Vec<String> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| SchemaError::unavailable(root, e.to_string()))?;
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            continue;
        };
        let db = match file_name.split_once('-') {
            Some((prefix, _)) => prefix,
            None => file_name,
        };
        if db.starts_with(RESERVED_PREFIX) {
            continue;
        }
        if !names.iter().any(|n| n == db) {
            names.push(db.to_string());
        }
    }

    if names.is_empty() {
        return Err(SchemaError::unavailable(
            root,
            "no provisioning databases found",
        ));
    }
    names.sort();
    Ok(names)
}
