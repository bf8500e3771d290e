use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalyzerError>;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// The batch root is missing or not a directory; fatal for the batch.
    #[error("Invalid root directory: {0}")]
    InvalidRoot(String),

    /// A single file could not be read; the batch continues without it.
    #[error("Failed to read {path}: {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A single file's analysis failed unexpectedly; the batch continues.
    #[error("Analysis of {path} failed: {reason}")]
    Analysis { path: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
