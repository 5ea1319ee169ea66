use std::path::PathBuf;

/// Everything that can go wrong inside the logger.
///
/// The inline logger and the trace decorator never let one of these escape;
/// they are surfaced only by configuration loading, `init` and the CLI.
#[derive(Debug, thiserror::Error)]
pub enum QtraceError {
    #[error("source for {file}:{line} is unavailable")]
    SourceUnavailable { file: String, line: u32 },

    #[error("expected {expected} argument expressions, found {found}")]
    SplitMismatch { expected: usize, found: usize },

    #[error("unbalanced delimiters in call expression")]
    Unbalanced,

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path:?}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot run {0:?}: empty or unbalanced quoting")]
    InvalidCommand(String),

    #[error("the process-wide logger is already initialized")]
    AlreadyInitialized,
}

pub type Result<T> = std::result::Result<T, QtraceError>;
