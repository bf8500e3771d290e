use thiserror::Error;

/// Result type for detector operations
pub type Result<T> = std::result::Result<T, DetectorError>;

/// Errors that can occur while detecting SQL in source text
#[derive(Error, Debug)]
pub enum DetectorError {
    /// The source could not be parsed into a syntax tree
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Tree-sitter failed below the parse itself (grammar/load problems)
    #[error("Tree-sitter error: {0}")]
    TreeSitterError(String),
}

impl DetectorError {
    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a tree-sitter error
    pub fn tree_sitter(msg: impl Into<String>) -> Self {
        Self::TreeSitterError(msg.into())
    }
}
