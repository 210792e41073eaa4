//! Error types and handling for the weather page

use thiserror::Error;

/// Main error type for the weather page
#[derive(Error, Debug)]
pub enum WeatherPageError {
    /// A provider answered with a non-2xx status
    #[error("{label} ({status})")]
    HttpStatus { label: String, status: u16 },

    /// Network failure or an undecodable response body
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider returned an empty result set
    #[error("No results found for '{query}'")]
    NoResults { query: String },

    /// The provider response did not have the expected shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The platform refused or failed to provide a position
    #[error("Geolocation unavailable: {0}")]
    GeolocationDenied(String),

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

/// Whether a failed chain is worth retrying by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Retryable,
    Terminal,
}

impl WeatherPageError {
    /// Create a new status error
    pub fn http_status<S: Into<String>>(label: S, status: u16) -> Self {
        Self::HttpStatus {
            label: label.into(),
            status,
        }
    }

    /// Create a new no-results error
    pub fn no_results<S: Into<String>>(query: S) -> Self {
        Self::NoResults {
            query: query.into(),
        }
    }

    /// Create a new malformed-response error
    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::MalformedResponse(message.into())
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Classify the error for the notice shown to the user.
    ///
    /// Transport failures, rate limiting and server-side statuses may go away
    /// on their own; everything else needs different input or setup.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) | Self::Io { .. } => ErrorKind::Retryable,
            Self::HttpStatus { status, .. } if *status == 429 || *status >= 500 => {
                ErrorKind::Retryable
            }
            _ => ErrorKind::Terminal,
        }
    }

    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Retryable
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::HttpStatus { label, status } => match status {
                401 | 403 => format!("{label}: the provider rejected our credentials."),
                429 => format!("{label}: too many requests, please try again shortly."),
                500.. => format!("{label}: the provider is having trouble, please try again."),
                _ => format!("{label} ({status})."),
            },
            Self::Transport(_) => {
                "Unable to reach the weather services. Please check your connection and try again."
                    .to_string()
            }
            Self::NoResults { query } => format!("No place found for \"{query}\"."),
            Self::MalformedResponse(_) => {
                "The weather service sent data we could not understand.".to_string()
            }
            Self::GeolocationDenied(_) => {
                "Your location is not available. Search for a city instead.".to_string()
            }
            Self::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            Self::Validation { message } => format!("Invalid input: {message}"),
            Self::Io { .. } => "File operation failed. Please check file permissions.".to_string(),
        }
    }
}
