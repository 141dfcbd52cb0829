use thiserror::Error;

/// Errors surfaced by the wrapper.
///
/// Driver errors pass through transparently; the wrapper introduces no
/// error kinds of its own beyond parameter conversion.
#[derive(Debug, Error)]
pub enum SlowLogError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error("Parameter conversion error: {0}")]
    Parameter(String),
}
