use serde_json::Value;

/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A required identifier or parameter was missing; no request was sent.
    #[error("{0}")]
    Validation(String),
    /// Remote API rejected the request with a 4xx status.
    #[error("{message}")]
    Client {
        status: u16,
        message: String,
        /// Decoded response body, if the remote sent one.
        data: Option<Value>,
    },
    /// Remote API failed with a 5xx status.
    #[error("{message}")]
    Server {
        status: u16,
        message: String,
        data: Option<Value>,
    },
    /// No HTTP response was received (timeout, refused or aborted connection).
    #[error("network error ({code}): {message}")]
    Network {
        /// Errno-style code such as `ETIMEDOUT`.
        code: String,
        message: String,
    },
    /// The caller's cancellation token fired before the call finished.
    #[error("request cancelled")]
    Cancelled,
    /// Any failure that does not fit the categories above.
    #[error("{message}")]
    Unknown {
        message: String,
        status: Option<u16>,
        data: Option<Value>,
        code: Option<String>,
    },
}

/// Discriminant of [`ApiError`], handy for matching without fields.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    Validation,
    Client,
    Server,
    Network,
    Cancelled,
    Unknown,
}

impl ApiError {
    /// Builds the error for a non-2xx response.
    pub(crate) fn from_status(status: u16, data: Option<Value>) -> Self {
        let message = format!("Request failed with status code {status}");
        match status {
            400..=499 => Self::Client {
                status,
                message,
                data,
            },
            500..=599 => Self::Server {
                status,
                message,
                data,
            },
            _ => Self::Unknown {
                message,
                status: Some(status),
                data,
                code: None,
            },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Client { .. } => ErrorKind::Client,
            Self::Server { .. } => ErrorKind::Server,
            Self::Network { .. } => ErrorKind::Network,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Unknown { .. } => ErrorKind::Unknown,
        }
    }

    /// Human-readable message of the failure.
    pub fn message(&self) -> String {
        match self {
            Self::Validation(message)
            | Self::Client { message, .. }
            | Self::Server { message, .. }
            | Self::Network { message, .. }
            | Self::Unknown { message, .. } => message.clone(),
            Self::Cancelled => self.to_string(),
        }
    }

    /// HTTP status of the final attempt, when a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Client { status, .. } | Self::Server { status, .. } => Some(*status),
            Self::Unknown { status, .. } => *status,
            _ => None,
        }
    }

    /// Decoded response body of the final attempt, if any.
    pub fn data(&self) -> Option<&Value> {
        match self {
            Self::Client { data, .. } | Self::Server { data, .. } | Self::Unknown { data, .. } => {
                data.as_ref()
            }
            _ => None,
        }
    }

    /// Network error code, if the failure happened below HTTP.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Network { code, .. } => Some(code),
            Self::Unknown { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{ApiError, ErrorKind};

    #[test]
    fn status_ranges_map_to_kinds() {
        assert_eq!(ApiError::from_status(404, None).kind(), ErrorKind::Client);
        assert_eq!(ApiError::from_status(503, None).kind(), ErrorKind::Server);
        assert_eq!(ApiError::from_status(304, None).kind(), ErrorKind::Unknown);
    }

    #[test]
    fn accessors_expose_structured_fields() {
        let err = ApiError::from_status(404, Some(json!({"error": "not found"})));
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.data(), Some(&json!({"error": "not found"})));
        assert_eq!(err.code(), None);
        assert_eq!(err.message(), "Request failed with status code 404");

        let err = ApiError::Network {
            code: "ETIMEDOUT".to_owned(),
            message: "operation timed out".to_owned(),
        };
        assert_eq!(err.code(), Some("ETIMEDOUT"));
        assert_eq!(err.status(), None);
        assert!(err.data().is_none());
    }

    #[test]
    fn validation_message_is_displayed_verbatim() {
        let err = ApiError::Validation("Resource ID is required".to_owned());
        assert_eq!(err.to_string(), "Resource ID is required");
        assert_eq!(err.message(), "Resource ID is required");
    }
}
