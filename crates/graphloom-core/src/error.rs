//! Error types for Graphloom

use thiserror::Error;

/// Result type alias using Graphloom's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Graphloom error types with helpful messages and suggestions
#[derive(Error, Debug)]
pub enum Error {
    // Input errors (E001-E099)
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Graph syntax errors (E100-E199)
    #[error("Graph syntax error at offset {offset}: {reason}")]
    Parse { reason: String, offset: usize },

    #[error("Extraction produced an empty graph")]
    EmptyGraph,

    // Network errors (E200-E299)
    #[error("Network error: {0}. Check your internet connection.")]
    Network(#[from] reqwest::Error),

    #[error("LLM API error: {0}. Check your API key with `graphloom config get llm.api_key`.")]
    LlmError(String),

    #[error("Rate limited. Waiting {0} seconds before retry.")]
    RateLimited(u64),

    #[error("No suitable model found: {0}")]
    NoSuitableModel(String),

    // Knowledge base errors (E300-E399)
    #[error("Knowledge base error: {0}")]
    Store(String),

    // Config errors (E400-E499)
    #[error("Configuration error: {0}")]
    Config(String),

    // Generic errors
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a graph syntax error at the given byte offset
    pub fn parse(reason: impl Into<String>, offset: usize) -> Self {
        Self::Parse {
            reason: reason.into(),
            offset,
        }
    }

    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            Self::FileNotFound(_) => "E001",
            Self::InvalidInput(_) => "E002",
            Self::Parse { .. } => "E100",
            Self::EmptyGraph => "E101",
            Self::Network(_) => "E200",
            Self::LlmError(_) => "E201",
            Self::RateLimited(_) => "E202",
            Self::NoSuitableModel(_) => "E203",
            Self::Store(_) => "E300",
            Self::Config(_) => "E400",
            Self::Other(_) | Self::Io(_) => "E9999",
        }
    }

    /// Get suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::FileNotFound(_) => Some("Check the path and try again".to_string()),
            Self::Network(_) => Some("Check internet connection".to_string()),
            Self::LlmError(_) => Some("graphloom config get llm.api_key".to_string()),
            Self::EmptyGraph => {
                Some("Try a longer input document or raise pipeline.max_iterations".to_string())
            }
            Self::Config(_) => Some("graphloom config list".to_string()),
            _ => None,
        }
    }
}
