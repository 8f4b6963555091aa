use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PricingError {
    #[error("Invalid JSON body: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Request body must be a JSON array of parts")]
    NotAnArray,

    #[error("Invalid part at index {index}: {source}")]
    InvalidPart {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Not Found")]
    NotFound,

    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("Remote request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message}")]
    Remote {
        message: String,
        status: Option<u16>,
    },

    #[error("Malformed payload from remote service: {0}")]
    MalformedPayload(#[source] serde_json::Error),

    #[error("Static asset unavailable: {path}")]
    AssetMissing {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration value for {field} ({value:?}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    ClientInput,
    Routing,
    RemoteEvaluation,
    AssetMissing,
    Configuration,
}

impl PricingError {
    pub fn remote(message: impl Into<String>) -> Self {
        PricingError::Remote {
            message: message.into(),
            status: None,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            PricingError::InvalidJson(_)
            | PricingError::NotAnArray
            | PricingError::InvalidPart { .. } => ErrorCategory::ClientInput,
            PricingError::NotFound | PricingError::MethodNotAllowed => ErrorCategory::Routing,
            PricingError::Http(_)
            | PricingError::Remote { .. }
            | PricingError::MalformedPayload(_) => ErrorCategory::RemoteEvaluation,
            PricingError::AssetMissing { .. } => ErrorCategory::AssetMissing,
            PricingError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            PricingError::NotFound => StatusCode::NOT_FOUND,
            PricingError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            _ => match self.category() {
                ErrorCategory::ClientInput => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// HTTP status reported by the rules service, when it answered at all.
    pub fn remote_status(&self) -> Option<u16> {
        match self {
            PricingError::Remote { status, .. } => *status,
            PricingError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True for failures that belong to the service rather than the caller.
    pub fn is_system_fault(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Body text returned to the caller. Source chains stay in the logs.
    pub fn client_message(&self) -> String {
        match self.category() {
            ErrorCategory::AssetMissing | ErrorCategory::Configuration => {
                "Internal Server Error".to_string()
            }
            _ => {
                let message = self.to_string();
                if message.trim().is_empty() {
                    "Error".to_string()
                } else {
                    message
                }
            }
        }
    }
}

impl IntoResponse for PricingError {
    fn into_response(self) -> Response {
        (self.status_code(), self.client_message()).into_response()
    }
}

pub type Result<T> = std::result::Result<T, PricingError>;
