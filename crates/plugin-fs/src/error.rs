/// Errors that can occur during pattern resolution.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An empty pattern was supplied. Callers must always pass a pattern.
    #[error("pattern must not be empty")]
    EmptyPattern,

    /// A pattern component could not be compiled as a glob.
    #[error("invalid pattern component '{component}': {source}")]
    InvalidPattern {
        component: String,
        source: glob::PatternError,
    },

    /// I/O error while walking the filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
