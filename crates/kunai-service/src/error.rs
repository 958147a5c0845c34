use std::time::Duration;

use kunai_rfc::rfc::dav::core::DavError;
use thiserror::Error;

/// Service layer errors - combines all error types
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    RfcError(#[from] kunai_rfc::error::RfcError),

    #[error(transparent)]
    CoreError(#[from] kunai_core::error::CoreError),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid resource type: {0}")]
    InvalidResourceType(String),

    #[error("Invalid property: {0}")]
    InvalidProperty(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors raised by storage backends and mail transports, passed through unchanged.
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

impl ServiceError {
    /// ## Summary
    /// Returns the HTTP status the DAV server should answer with.
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::PermissionDenied(_) => 403,
            Self::MethodNotAllowed(_) => 405,
            Self::NotFound(_) => 404,
            Self::InvalidResourceType(_) | Self::InvalidProperty(_) | Self::RfcError(_) => 400,
            Self::Conflict(_) => 409,
            Self::Timeout(_) => 504,
            Self::CoreError(_) | Self::Io(_) | Self::Backend(_) => 500,
        }
    }

    /// ## Summary
    /// Converts the error into a [`DavError`] carrying the status and message.
    /// Wire formatting stays with the DAV server.
    #[must_use]
    pub fn to_dav_error(&self) -> DavError {
        match self {
            Self::InvalidResourceType(_) => {
                DavError::with_condition(self.status(), self.to_string(), "valid-resourcetype")
            }
            _ => DavError::new(self.status(), self.to_string()),
        }
    }
}

impl From<&ServiceError> for DavError {
    fn from(err: &ServiceError) -> Self {
        err.to_dav_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(ServiceError::PermissionDenied("acl".into()).status(), 403);
        assert_eq!(ServiceError::MethodNotAllowed("put".into()).status(), 405);
        assert_eq!(ServiceError::NotFound("x".into()).status(), 404);
        assert_eq!(ServiceError::InvalidProperty("x".into()).status(), 400);
        assert_eq!(ServiceError::Conflict("x".into()).status(), 409);
        assert_eq!(
            ServiceError::Timeout(Duration::from_secs(1)).status(),
            504
        );
        assert_eq!(
            ServiceError::Backend(anyhow::anyhow!("disk full")).status(),
            500
        );
    }

    #[test]
    fn backend_errors_pass_through_verbatim() {
        let err = ServiceError::from(anyhow::anyhow!("connection refused"));
        assert_eq!(err.to_string(), "connection refused");
        assert_eq!(err.to_dav_error().message, "connection refused");
    }

    #[test]
    fn invalid_resource_type_carries_condition() {
        let dav = ServiceError::InvalidResourceType("calendar".into()).to_dav_error();
        assert_eq!(dav.condition.as_deref(), Some("valid-resourcetype"));
    }
}
