//! DAV error types.

use std::fmt;

/// A `WebDAV` error condition handed to the DAV server for formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DavError {
    /// HTTP status code.
    pub status: u16,
    /// Error description.
    pub message: String,
    /// Optional precondition/postcondition element name.
    pub condition: Option<String>,
}

impl DavError {
    /// Creates a new DAV error.
    #[must_use]
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            condition: None,
        }
    }

    /// Creates a DAV error with a precondition.
    #[must_use]
    pub fn with_condition(
        status: u16,
        message: impl Into<String>,
        condition: impl Into<String>,
    ) -> Self {
        Self {
            status,
            message: message.into(),
            condition: Some(condition.into()),
        }
    }

    /// 400 Bad Request
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(400, message)
    }

    /// 403 Forbidden
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(403, message)
    }

    /// 404 Not Found
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(404, message)
    }

    /// 405 Method Not Allowed
    #[must_use]
    pub fn method_not_allowed(message: impl Into<String>) -> Self {
        Self::new(405, message)
    }

    /// 500 Internal Server Error
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(500, message)
    }

    /// 504 Gateway Timeout
    #[must_use]
    pub fn gateway_timeout(message: impl Into<String>) -> Self {
        Self::new(504, message)
    }

    /// Returns true if this is a client error (4xx).
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status >= 400 && self.status < 500
    }

    /// Returns true if this is a server error (5xx).
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status >= 500
    }
}

impl fmt::Display for DavError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status, self.message)?;
        if let Some(ref cond) = self.condition {
            write!(f, " ({cond})")?;
        }
        Ok(())
    }
}

impl std::error::Error for DavError {}
