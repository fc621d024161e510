//! Structured provisioning commands.
//!
//! A [`CommandObject`] is built fresh per invocation from user-supplied
//! tokens and handed whole to the transport. It serializes to the JSON
//! shape the provisioning framework expects, clause keys included
//! (`update.id` / `delete.id`).

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use provis_schema::Operation;

/// Ordered column/value assignments.
///
/// Later assignments to an already-present column overwrite the value but
/// keep the column's original position, so listings render in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueSet {
    entries: Vec<(String, String)>,
}

impl ValueSet {
    pub fn assign(&mut self, column: impl Into<String>, value: impl Into<String>) {
        let column = column.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(c, _)| *c == column) {
            Some((_, v)) => *v = value,
            None => self.entries.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(c, v)| (c.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ValueSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (column, value) in &self.entries {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

/// Operation-specific payload of a command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Show {
        columns: Vec<String>,
    },
    Add {
        values: ValueSet,
    },
    Update {
        #[serde(rename = "update.id")]
        clause_id: String,
        values: ValueSet,
    },
    Delete {
        #[serde(rename = "delete.id")]
        clause_id: String,
    },
}

/// One validated provisioning request, ready for the transport.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandObject {
    pub command: Operation,
    pub database: String,
    pub table: String,
    #[serde(flatten)]
    pub payload: Payload,
}
