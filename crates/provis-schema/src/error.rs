use std::path::PathBuf;

/// Errors raised while loading the on-disk schema.
///
/// Every schema-access failure propagates to the invocation boundary; the
/// catalog never falls back to a partial view.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The schema root or one of its files is missing or unreadable, or the
    /// root holds no qualifying database entries.
    #[error("schema unavailable at {path}: {reason}")]
    Unavailable { path: PathBuf, reason: String },

    /// The descriptor document is missing or malformed.
    #[error("descriptor {path}: {reason}")]
    Descriptor { path: PathBuf, reason: String },
}

impl SchemaError {
    pub(crate) fn unavailable(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        SchemaError::Unavailable {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn descriptor(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        SchemaError::Descriptor {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
