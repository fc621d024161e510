//! Builds structured provisioning commands from positional tokens.
//!
//! Tokens are consumed left-to-right; each missing field is requested once
//! through the injected [`Prompt`]. An empty answer aborts the whole build
//! with the `Ok(None)` sentinel (warning logged, nothing forwarded), so the
//! shell treats every operation uniformly. The builder trusts the database,
//! table and column names it is given; unknown names are surfaced by
//! completion and by the transport, not here.

use tracing::warn;

use provis_schema::Operation;

use crate::command::{CommandObject, Payload, ValueSet};
use crate::prompt::Prompt;

/// A column/value token was expected to carry `=` but did not.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed token `{token}`: expected <column>=<value>")]
pub struct MalformedToken {
    pub token: String,
}

/// `Ok(None)` is the abort sentinel: a required field stayed empty after
/// prompting.
pub type BuildResult = Result<Option<CommandObject>, MalformedToken>;

/// Build a command object for `operation` from positional `params`.
pub fn build(operation: Operation, params: &[String], prompt: &mut dyn Prompt) -> BuildResult {
    match operation {
        Operation::Show => build_show(params, prompt),
        Operation::Add => build_add(params, prompt),
        Operation::Update => build_update(params, prompt),
        Operation::Delete => build_delete(params, prompt),
    }
}

fn build_show(params: &[String], prompt: &mut dyn Prompt) -> BuildResult {
    let Some(database) = take_or_ask(
        params,
        0,
        prompt,
        "Please provide the database you want to display from",
        "database to show",
    ) else {
        return Ok(None);
    };
    let Some(table) = take_or_ask(
        params,
        1,
        prompt,
        "Please provide the table you want to display from",
        "table to show",
    ) else {
        return Ok(None);
    };
    let Some(columns) = rest_or_ask(
        params,
        2,
        prompt,
        "Please provide at least a column to display",
        "column to show",
    ) else {
        return Ok(None);
    };

    Ok(Some(CommandObject {
        command: Operation::Show,
        database,
        table,
        payload: Payload::Show { columns },
    }))
}

fn build_add(params: &[String], prompt: &mut dyn Prompt) -> BuildResult {
    let Some(database) = take_or_ask(
        params,
        0,
        prompt,
        "Please provide the database you want to add to",
        "database to add",
    ) else {
        return Ok(None);
    };
    let Some(table) = take_or_ask(
        params,
        1,
        prompt,
        "Please provide the table you want to add to",
        "table to add",
    ) else {
        return Ok(None);
    };
    let Some(assignments) = rest_or_ask(
        params,
        2,
        prompt,
        "Please provide at least a column to set (<column>=<value>)",
        "column to add",
    ) else {
        return Ok(None);
    };

    Ok(Some(CommandObject {
        command: Operation::Add,
        database,
        table,
        payload: Payload::Add {
            values: collect_values(&assignments)?,
        },
    }))
}

fn build_update(params: &[String], prompt: &mut dyn Prompt) -> BuildResult {
    let Some(database) = take_or_ask(
        params,
        0,
        prompt,
        "Please provide the database you want to update",
        "database to update",
    ) else {
        return Ok(None);
    };
    let Some(table) = take_or_ask(
        params,
        1,
        prompt,
        "Please provide the table you want to update",
        "table to update",
    ) else {
        return Ok(None);
    };
    let Some(clause) = take_or_ask(
        params,
        2,
        prompt,
        "Please provide the id you want to update (update.id=<value>)",
        "id to update",
    ) else {
        return Ok(None);
    };
    let (_, clause_id) = split_assignment(&clause)?;
    let clause_id = clause_id.to_string();
    let Some(assignments) = rest_or_ask(
        params,
        3,
        prompt,
        "Please provide at least a column to update (<column>=<value>)",
        "column to update",
    ) else {
        return Ok(None);
    };

    Ok(Some(CommandObject {
        command: Operation::Update,
        database,
        table,
        payload: Payload::Update {
            clause_id,
            values: collect_values(&assignments)?,
        },
    }))
}

fn build_delete(params: &[String], prompt: &mut dyn Prompt) -> BuildResult {
    let Some(database) = take_or_ask(
        params,
        0,
        prompt,
        "Please provide the database you want to delete from",
        "database to delete",
    ) else {
        return Ok(None);
    };
    let Some(table) = take_or_ask(
        params,
        1,
        prompt,
        "Please provide the table you want to delete from",
        "table to delete",
    ) else {
        return Ok(None);
    };
    let Some(clause) = take_or_ask(
        params,
        2,
        prompt,
        "Please provide the id you want to delete (delete.id=<value>)",
        "id to delete",
    ) else {
        return Ok(None);
    };
    let (_, clause_id) = split_assignment(&clause)?;

    Ok(Some(CommandObject {
        command: Operation::Delete,
        database,
        table,
        payload: Payload::Delete {
            clause_id: clause_id.to_string(),
        },
    }))
}

/// Consume the positional token at `index`, or ask for it. An empty answer
/// aborts the build.
fn take_or_ask(
    params: &[String],
    index: usize,
    prompt: &mut dyn Prompt,
    question: &str,
    missing: &str,
) -> Option<String> {
    if let Some(token) = params.get(index) {
        return Some(token.clone());
    }
    match prompt.request_value(question) {
        Some(answer) if !answer.trim().is_empty() => Some(answer.trim().to_string()),
        _ => {
            warn!("no {missing}");
            None
        }
    }
}

/// The trailing tokens from `from` on, or one prompted line split on
/// whitespace. An empty answer aborts the build.
fn rest_or_ask(
    params: &[String],
    from: usize,
    prompt: &mut dyn Prompt,
    question: &str,
    missing: &str,
) -> Option<Vec<String>> {
    if params.len() > from {
        return Some(params[from..].to_vec());
    }
    match prompt.request_value(question) {
        Some(answer) if !answer.trim().is_empty() => Some(
            answer
                .split_whitespace()
                .map(str::to_string)
                .collect(),
        ),
        _ => {
            warn!("no {missing}");
            None
        }
    }
}

/// Split on the first `=` only; the value may itself contain `=`.
fn split_assignment(token: &str) -> Result<(&str, &str), MalformedToken> {
    token.split_once('=').ok_or_else(|| MalformedToken {
        token: token.to_string(),
    })
}

fn collect_values(assignments: &[String]) -> Result<ValueSet, MalformedToken> {
    let mut values = ValueSet::default();
    for token in assignments {
        let (column, value) = split_assignment(token)?;
        values.assign(column, value);
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic prompt: pops pre-seeded answers front to back, then
    /// reports "no answer".
    struct ScriptedPrompt {
        answers: Vec<String>,
    }

    impl ScriptedPrompt {
        fn new(answers: &[&str]) -> Self {
            Self {
                answers: answers.iter().map(|s| s.to_string()).collect(),
            }
        }

        fn silent() -> Self {
            Self::new(&[])
        }
    }

    impl Prompt for ScriptedPrompt {
        fn request_value(&mut self, _prompt: &str) -> Option<String> {
            if self.answers.is_empty() {
                None
            } else {
                Some(self.answers.remove(0))
            }
        }
    }

    fn params(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn show_consumes_db_table_and_trailing_columns() {
        let cmd = build(
            Operation::Show,
            &params(&["accounting", "subscriber", "username", "domain"]),
            &mut ScriptedPrompt::silent(),
        )
        .expect("build")
        .expect("complete command");

        assert_eq!(cmd.database, "accounting");
        assert_eq!(cmd.table, "subscriber");
        assert_eq!(
            cmd.payload,
            Payload::Show {
                columns: vec!["username".into(), "domain".into()]
            }
        );
    }

    #[test]
    fn add_splits_each_assignment_once() {
        let cmd = build(
            Operation::Add,
            &params(&["accounting", "subscriber", "username=alice", "domain=example.com"]),
            &mut ScriptedPrompt::silent(),
        )
        .expect("build")
        .expect("complete command");

        let Payload::Add { values } = cmd.payload else {
            panic!("expected add payload");
        };
        let entries: Vec<(&str, &str)> = values.iter().collect();
        assert_eq!(
            entries,
            vec![("username", "alice"), ("domain", "example.com")]
        );
    }

    #[test]
    fn values_may_contain_equals_signs() {
        let cmd = build(
            Operation::Add,
            &params(&["accounting", "subscriber", "password=a=b=c"]),
            &mut ScriptedPrompt::silent(),
        )
        .expect("build")
        .expect("complete command");

        let Payload::Add { values } = cmd.payload else {
            panic!("expected add payload");
        };
        assert_eq!(values.get("password"), Some("a=b=c"));
    }

    #[test]
    fn update_extracts_clause_id_then_values() {
        let cmd = build(
            Operation::Update,
            &params(&["accounting", "subscriber", "update.id=42", "password=secret"]),
            &mut ScriptedPrompt::silent(),
        )
        .expect("build")
        .expect("complete command");

        let Payload::Update { clause_id, values } = cmd.payload else {
            panic!("expected update payload");
        };
        assert_eq!(clause_id, "42");
        assert_eq!(values.get("password"), Some("secret"));
    }

    #[test]
    fn delete_needs_only_the_clause_token() {
        let cmd = build(
            Operation::Delete,
            &params(&["accounting", "subscriber", "delete.id=7"]),
            &mut ScriptedPrompt::silent(),
        )
        .expect("build")
        .expect("complete command");

        assert_eq!(
            cmd.payload,
            Payload::Delete {
                clause_id: "7".into()
            }
        );
    }

    #[test]
    fn assignment_without_equals_is_malformed() {
        let err = build(
            Operation::Add,
            &params(&["accounting", "subscriber", "username"]),
            &mut ScriptedPrompt::silent(),
        )
        .unwrap_err();
        assert_eq!(err.token, "username");
    }

    #[test]
    fn malformed_clause_token_is_malformed() {
        let err = build(
            Operation::Delete,
            &params(&["accounting", "subscriber", "42"]),
            &mut ScriptedPrompt::silent(),
        )
        .unwrap_err();
        assert_eq!(err.token, "42");
    }

    #[test]
    fn missing_fields_are_prompted_in_order() {
        let mut prompt = ScriptedPrompt::new(&["accounting", "subscriber", "username domain"]);
        let cmd = build(Operation::Show, &[], &mut prompt)
            .expect("build")
            .expect("complete command");

        assert_eq!(cmd.database, "accounting");
        assert_eq!(cmd.table, "subscriber");
        assert_eq!(
            cmd.payload,
            Payload::Show {
                columns: vec!["username".into(), "domain".into()]
            }
        );
    }

    #[test]
    fn empty_answer_aborts_with_sentinel() {
        for op in Operation::ALL {
            let result = build(op, &[], &mut ScriptedPrompt::silent()).expect("build");
            assert!(result.is_none(), "{op} should abort");
        }
    }

    #[test]
    fn whitespace_answer_aborts_with_sentinel() {
        let mut prompt = ScriptedPrompt::new(&["   "]);
        let result = build(Operation::Show, &[], &mut prompt).expect("build");
        assert!(result.is_none());
    }

    #[test]
    fn abort_mid_build_yields_no_partial_command() {
        // Database answered, table declined.
        let mut prompt = ScriptedPrompt::new(&["accounting"]);
        let result = build(Operation::Delete, &[], &mut prompt).expect("build");
        assert!(result.is_none());
    }

    #[test]
    fn duplicate_columns_take_last_value() {
        let cmd = build(
            Operation::Add,
            &params(&["accounting", "subscriber", "username=alice", "username=bob"]),
            &mut ScriptedPrompt::silent(),
        )
        .expect("build")
        .expect("complete command");

        let Payload::Add { values } = cmd.payload else {
            panic!("expected add payload");
        };
        assert_eq!(values.len(), 1);
        assert_eq!(values.get("username"), Some("bob"));
    }
}
