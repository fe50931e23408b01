use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type shared by the collision engine and its I/O boundary.
///
/// Every failure is fatal for the run: configuration and input errors abort
/// before any simulation state exists, output errors abort mid-run with no
/// rollback. The binary prints the message once on stderr and exits non-zero.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or malformed run configuration (config file, required keys).
    #[error("config error: {0}")]
    Config(String),

    /// Malformed static/dynamic input file (wrong line count, bad field).
    #[error("input error: {0}")]
    Format(String),

    /// Invalid user or API parameter.
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// Propagated I/O errors (snapshot appends, file reads).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
