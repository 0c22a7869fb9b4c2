use http::StatusCode;

use crate::reports::ReportFormat;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error ({format}): {source}")]
    SerializationError {
        format: ReportFormat,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<validator::ValidationErrors> for ReportError {
    fn from(err: validator::ValidationErrors) -> Self {
        ReportError::MalformedInput(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for ReportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ReportError::SerializationError {
            format: ReportFormat::Excel,
            source: Box::new(err),
        }
    }
}

impl ReportError {
    /// Convenience constructor for failures raised by a document backend.
    pub fn serialization<E>(format: ReportFormat, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ReportError::SerializationError {
            format,
            source: Box::new(error),
        }
    }

    /// Returns the HTTP status code a caller should answer with.
    /// This is the single source of truth for error-to-status mapping.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MalformedInput(_) | Self::UnsupportedFormat(_) => StatusCode::BAD_REQUEST,
            Self::SerializationError { .. } | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns the error message suitable for HTTP responses.
    /// Backend failures return generic messages to avoid leaking implementation details.
    pub fn response_message(&self) -> String {
        match self {
            Self::SerializationError { format, .. } => {
                format!("Failed to generate {} report", format)
            }
            Self::Internal(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}
