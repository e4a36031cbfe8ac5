use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Operation not found: {0}")]
    OperationNotFound(String),

    /// An argument had the wrong shape for the template that consumes it.
    #[error("Invalid arguments for {operation}: {message}")]
    InvalidArguments { operation: String, message: String },

    #[error("Invalid rule pattern: {0}")]
    Rule(#[from] regex::Error),
}

impl ToolError {
    pub fn invalid(operation: &str, message: impl Into<String>) -> Self {
        ToolError::InvalidArguments {
            operation: operation.to_string(),
            message: message.into(),
        }
    }
}
