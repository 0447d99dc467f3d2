use std::path::PathBuf;

/// Errors raised while compiling or executing a naming template.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    /// A `{{` was never closed.
    #[error("unclosed action at offset {offset}")]
    Unclosed { offset: usize },

    /// An action with nothing inside it.
    #[error("missing value for action at offset {offset}")]
    EmptyAction { offset: usize },

    /// An action that is not a single field reference.
    #[error("unsupported action {action:?} at offset {offset} (expected .Id, .Ip or .Port)")]
    UnsupportedAction { offset: usize, action: String },

    /// A field the session binding does not have.
    #[error("can't evaluate field {field}")]
    UnknownField { field: String },
}

/// Errors raised while resolving a session's destination.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The naming template failed to execute.
    #[error("naming template error: {0}")]
    Template(#[from] TemplateError),

    /// The destination file could not be opened.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ResolveError>;
