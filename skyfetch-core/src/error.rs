//! Error taxonomy shared by the controller, gateway and store.

use thiserror::Error;

/// Input rejected before it reaches the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a city name.")]
    Empty,

    #[error("City name must be at least 2 characters.")]
    TooShort,
}

/// Failure reported by a weather gateway call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The remote service does not recognise the city.
    #[error("city not found: {0}")]
    NotFound(String),

    /// Network, server or decoding failure.
    #[error("weather request failed: {0}")]
    Transient(String),
}

impl GatewayError {
    /// Message shown to the user in the error state.
    pub fn user_message(&self) -> &'static str {
        match self {
            GatewayError::NotFound(_) => "City not found. Please check spelling.",
            GatewayError::Transient(_) => "Something went wrong. Please try again.",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, GatewayError::NotFound(_))
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
