//! The provisioning descriptor document (`pi_framework.xml`).
//!
//! The document's shape is a fixed external contract: repeating `mod`
//! nodes, each carrying one `mod_name` and repeating `cmd` nodes; each
//! `cmd` has one `cmd_name`, a `query_cols/col/field` list and, for
//! update/delete semantics, a `clause_cols/col/field` list.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs;
use std::path::Path;

use crate::error::SchemaError;

/// One `cmd` block: an operation a table exposes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandSpec {
    pub name: String,
    /// Columns the operation reads or writes, in document order.
    pub query_cols: Vec<String>,
    /// Columns identifying the targeted rows (update/delete only).
    pub clause_cols: Vec<String>,
}

/// One `mod` block: a provisionable table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableSpec {
    pub name: String,
    pub commands: Vec<CommandSpec>,
}

/// The parsed descriptor document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Descriptor {
    pub tables: Vec<TableSpec>,
}

impl Descriptor {
    /// Read and parse the descriptor at `path`.
    pub fn load(path: &Path) -> Result<Self, SchemaError> {
        let xml = fs::read_to_string(path)
            .map_err(|e| SchemaError::descriptor(path, e.to_string()))?;
        Self::parse(&xml).map_err(|reason| SchemaError::descriptor(path, reason))
    }

    /// Parse descriptor XML.
    ///
    /// Unknown elements are skipped, not rejected: the live documents carry
    /// presentation fields this catalog has no use for.
    pub fn parse(xml: &str) -> Result<Self, String> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut tables: Vec<TableSpec> = Vec::new();
        let mut table: Option<TableSpec> = None;
        let mut command: Option<CommandSpec> = None;
        let mut path: Vec<String> = Vec::new();

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    match name.as_str() {
                        "mod" => table = Some(TableSpec::default()),
                        "cmd" => command = Some(CommandSpec::default()),
                        _ => {}
                    }
                    path.push(name);
                }
                Ok(Event::End(_)) => {
                    match path.last().map(String::as_str) {
                        Some("cmd") => {
                            if let (Some(t), Some(c)) = (table.as_mut(), command.take()) {
                                t.commands.push(c);
                            }
                        }
                        Some("mod") => {
                            if let Some(t) = table.take() {
                                tables.push(t);
                            }
                        }
                        _ => {}
                    }
                    path.pop();
                }
                Ok(Event::Text(t)) => {
                    let text = t.unescape().map_err(|e| e.to_string())?;
                    let text = text.trim();
                    if text.is_empty() {
                        continue;
                    }
                    if path_ends(&path, &["mod_name"]) {
                        if let Some(t) = table.as_mut() {
                            t.name = text.to_string();
                        }
                    } else if path_ends(&path, &["cmd", "cmd_name"]) {
                        if let Some(c) = command.as_mut() {
                            c.name = text.to_string();
                        }
                    } else if path_ends(&path, &["query_cols", "col", "field"]) {
                        if let Some(c) = command.as_mut() {
                            c.query_cols.push(text.to_string());
                        }
                    } else if path_ends(&path, &["clause_cols", "col", "field"]) {
                        if let Some(c) = command.as_mut() {
                            c.clause_cols.push(text.to_string());
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(e.to_string()),
                Ok(_) => {}
            }
        }

        Ok(Descriptor { tables })
    }

    /// Declared table names, in document order.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.name.as_str())
    }
}

fn path_ends(path: &[String], suffix: &[&str]) -> bool {
    path.len() >= suffix.len()
        && path[path.len() - suffix.len()..]
            .iter()
            .zip(suffix)
            .all(|(a, b)| a == b)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_XML: &str = r#"
<framework>
  <mod>
    <mod_name>subscriber</mod_name>
    <cmd>
      <cmd_name>show</cmd_name>
      <query_cols>
        <col><field>username</field></col>
        <col><field>domain</field></col>
        <col><field>password</field></col>
      </query_cols>
    </cmd>
    <cmd>
      <cmd_name>update</cmd_name>
      <clause_cols>
        <col><field>id</field></col>
      </clause_cols>
      <query_cols>
        <col><field>password</field></col>
      </query_cols>
    </cmd>
  </mod>
  <mod>
    <mod_name>domain</mod_name>
    <cmd>
      <cmd_name>show</cmd_name>
      <query_cols>
        <col><field>domain</field></col>
      </query_cols>
    </cmd>
  </mod>
</framework>
"#;

    #[test]
    fn parses_tables_in_document_order() {
        let descriptor = Descriptor::parse(SAMPLE_XML).expect("should parse");
        let names: Vec<&str> = descriptor.table_names().collect();
        assert_eq!(names, vec!["subscriber", "domain"]);
    }

    #[test]
    fn parses_query_and_clause_columns() {
        let descriptor = Descriptor::parse(SAMPLE_XML).expect("should parse");
        let subscriber = &descriptor.tables[0];
        assert_eq!(subscriber.commands.len(), 2);

        let show = &subscriber.commands[0];
        assert_eq!(show.name, "show");
        assert_eq!(show.query_cols, vec!["username", "domain", "password"]);
        assert!(show.clause_cols.is_empty());

        let update = &subscriber.commands[1];
        assert_eq!(update.name, "update");
        assert_eq!(update.query_cols, vec!["password"]);
        assert_eq!(update.clause_cols, vec!["id"]);
    }

    #[test]
    fn skips_unknown_elements() {
        let xml = r#"
<framework>
  <version>1</version>
  <mod>
    <mod_name>endpoints</mod_name>
    <display>Endpoints</display>
    <cmd>
      <cmd_name>show</cmd_name>
      <query_cols><col><field>uri</field><link_cmd>show</link_cmd></col></query_cols>
    </cmd>
  </mod>
</framework>
"#;
        let descriptor = Descriptor::parse(xml).expect("should parse");
        assert_eq!(descriptor.tables.len(), 1);
        assert_eq!(descriptor.tables[0].commands[0].query_cols, vec!["uri"]);
    }

    #[test]
    fn rejects_malformed_xml() {
        assert!(Descriptor::parse("<framework><mod></framework>").is_err());
    }

    #[test]
    fn empty_document_yields_no_tables() {
        let descriptor = Descriptor::parse("<framework></framework>").expect("should parse");
        assert!(descriptor.tables.is_empty());
    }
}
