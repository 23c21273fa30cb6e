use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashboardError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Server returned {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Not permitted: {0}")]
    Forbidden(String),

    #[error("Invalid input: {0}")]
    Invalid(String),
}

impl DashboardError {
    /// True for failures worth offering a retry button for.
    pub fn is_retryable(&self) -> bool {
        match self {
            DashboardError::Network(_) => true,
            DashboardError::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<DashboardError> for String {
    fn from(err: DashboardError) -> Self {
        err.to_string()
    }
}
