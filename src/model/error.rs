use thiserror::Error;

use super::Request;

/// The standard result type used throughout the application.
pub type StdResult<T> = Result<T, anyhow::Error>;

/// The result type returned by the fetchers and the analyzer.
pub type AnalyzerResult<T> = Result<T, AnalyzerError>;

/// Analyzer error
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// The submitted value was rejected before any network call
    #[error("Invalid value '{value}': {reason}")]
    Validation {
        /// The rejected value.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The upstream API answered with a non success HTTP status
    #[error("Failed to fetch {request}: {status}")]
    Fetch {
        /// The request that failed.
        request: Request,
        /// The HTTP status code.
        status: u16,
    },

    /// The upstream API answered successfully but without the expected data
    #[error("Incomplete commit activity data for {account}/{repository}")]
    DataIncomplete {
        /// The account that owns the repository.
        account: String,
        /// The repository name.
        repository: String,
    },

    /// The request could not be sent or its body could not be read
    #[error("Transport error while fetching {request}: {message}")]
    Transport {
        /// The request that failed.
        request: Request,
        /// The underlying error message.
        message: String,
    },

    /// Parsing error
    #[error("Parsing error: {0}")]
    Unknown(String),
}

impl AnalyzerError {
    /// Creates a validation error for the given value.
    pub fn validation(value: &str, reason: &str) -> Self {
        Self::Validation {
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Retrieves the HTTP status code, if the error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            AnalyzerError::Fetch { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Converts the error to the message displayed to the user.
    pub fn user_message(&self) -> String {
        match self {
            AnalyzerError::Fetch { .. } | AnalyzerError::Transport { .. } => format!(
                "Failed to fetch data. Please check the username and try again. {self}"
            ),
            AnalyzerError::Unknown(_) => "An unknown error occurred.".to_string(),
            AnalyzerError::Validation { .. } | AnalyzerError::DataIncomplete { .. } => {
                self.to_string()
            }
        }
    }
}
