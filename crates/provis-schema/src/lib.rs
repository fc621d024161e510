//! On-disk schema catalog for the provis provisioning shell
//!
//! Derives what can be provisioned from a schema root directory:
//! - directory entries -> database names
//! - the `pi_framework.xml` descriptor -> tables and per-operation columns
//! - per-database side-files -> table membership
//!
//! The catalog is rebuilt from disk for every invocation, so there is no
//! staleness protocol: what you see is what is on disk right now.

use serde::Serialize;
use std::fmt;

pub mod catalog;
pub mod descriptor;
mod error;

pub use catalog::SchemaCatalog;
pub use descriptor::{CommandSpec, Descriptor, TableSpec};
pub use error::SchemaError;

/// One provisioning method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Show,
    Add,
    Update,
    Delete,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Show,
        Operation::Add,
        Operation::Update,
        Operation::Delete,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operation::Show => "show",
            Operation::Add => "add",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }

    /// Prefix qualifying this operation's clause columns, if it has any.
    ///
    /// Clause columns identify which rows an `update`/`delete` targets and
    /// are exposed as `update.<col>` / `delete.<col>`, distinct from the
    /// plain query columns whose values get written or read.
    pub fn clause_prefix(self) -> Option<&'static str> {
        match self {
            Operation::Update => Some("update."),
            Operation::Delete => Some("delete."),
            Operation::Show | Operation::Add => None,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "show" => Some(Operation::Show),
            "add" => Some(Operation::Add),
            "update" => Some(Operation::Update),
            "delete" => Some(Operation::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
