//! Error types and handling for `WeatherCast`

use thiserror::Error;

/// Main error type for the `WeatherCast` library
#[derive(Error, Debug)]
pub enum WeatherCastError {
    /// Geocoding matched nothing in either search pass
    #[error("No location found for '{query}'")]
    NotFound { query: String },

    /// Geocoding service answered with a non-success status or was unreachable
    #[error("Location lookup failed: {message}")]
    LookupFailed {
        /// HTTP status, absent for transport failures
        status: Option<u16>,
        message: String,
    },

    /// Weather service communication errors
    #[error("API error: {message}")]
    Api { message: String },

    /// Response body did not have the expected shape
    #[error("Malformed response: {message}")]
    Parse { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Favorites list errors
    #[error("Favorites error: {message}")]
    Favorites { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl WeatherCastError {
    /// Create a new not-found error for a geocoding query
    pub fn not_found<S: Into<String>>(query: S) -> Self {
        Self::NotFound {
            query: query.into(),
        }
    }

    /// Create a new lookup error carrying the HTTP status
    pub fn lookup_failed<S: Into<String>>(status: Option<u16>, message: S) -> Self {
        Self::LookupFailed {
            status,
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new parse error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse {
            message: message.into(),
        }
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

    /// Create a new favorites error
    pub fn favorites<S: Into<String>>(message: S) -> Self {
        Self::Favorites {
            message: message.into(),
        }
    }

    /// Whether this error came from talking to an external service.
    /// The dashboard substitutes simulated data for these.
    #[must_use]
    pub fn is_lookup_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::LookupFailed { .. } | Self::Api { .. } | Self::Parse { .. }
        )
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            WeatherCastError::NotFound { .. } => {
                "City not found. Please try another search.".to_string()
            }
            WeatherCastError::LookupFailed { .. } => {
                "City not found. Please check the spelling and try again.".to_string()
            }
            WeatherCastError::Api { .. } => {
                "Unable to fetch weather data. Please try again.".to_string()
            }
            WeatherCastError::Parse { .. } => {
                "The weather service returned unexpected data.".to_string()
            }
            WeatherCastError::Config { .. } => {
                "Configuration error. Please check your config file and API key.".to_string()
            }
            WeatherCastError::Validation { message } => format!("Invalid input: {message}"),
            WeatherCastError::Favorites { message } => message.clone(),
            WeatherCastError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}
