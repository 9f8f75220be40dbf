use std::fmt;

/// Result type alias for txload core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for txload core operations
#[derive(Debug)]
pub enum Error {
    /// Invalid topology or ratio parameters, rejected at construction
    Config(String),

    /// I/O errors while writing the workload file
    Io(std::io::Error),

    /// CSV serialization errors
    Csv(csv::Error),

    /// Errors raised during transaction generation
    Generation(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(msg) => write!(f, "Configuration error: {msg}"),
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::Csv(e) => write!(f, "CSV error: {e}"),
            Error::Generation(msg) => write!(f, "Generation error: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Csv(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Csv(err)
    }
}
