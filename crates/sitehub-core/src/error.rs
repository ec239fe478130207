//! Unified application error types for SiteHub.
//!
//! Two error types live here with distinct jobs:
//!
//! - [`AppError`] is the infrastructure error every crate maps its
//!   internal failures into for propagation through the ? operator.
//! - [`Rejection`] is the closed taxonomy of request-path verdicts the
//!   authorization boundary returns. It is enumerable and stable so the
//!   HTTP layer can map each kind to a client-visible status.

use std::fmt;
use thiserror::Error;

/// Coarse category attached to every [`AppError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// A referenced row or resource does not exist.
    NotFound,
    /// Caller-supplied input failed validation.
    Validation,
    /// A uniqueness or concurrent-modification conflict.
    Conflict,
    /// Credentials did not check out.
    Authentication,
    /// A bug or unexpected state inside the application.
    Internal,
    /// The database failed or was unreachable.
    Database,
    /// Configuration could not be loaded or parsed.
    Configuration,
    /// Serialization or deserialization failed.
    Serialization,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::Authentication => write!(f, "AUTHENTICATION"),
            Self::Internal => write!(f, "INTERNAL"),
            Self::Database => write!(f, "DATABASE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
        }
    }
}

/// The unified infrastructure error for SiteHub.
///
/// Every crate maps its internal failures into this one type, so
/// fallible code composes with `?` across crate boundaries. The kind
/// stays machine-readable while the message carries context; the
/// original cause rides along for logging.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// Machine-readable category.
    pub kind: ErrorKind,
    /// Human-readable context.
    pub message: String,
    /// The underlying cause, when one exists.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// An error with no underlying cause.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// An error wrapping its underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Shorthand for a [`ErrorKind::NotFound`] error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Shorthand for a [`ErrorKind::Validation`] error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Shorthand for a [`ErrorKind::Conflict`] error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Shorthand for an [`ErrorKind::Authentication`] error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authentication, message)
    }

    /// Shorthand for an [`ErrorKind::Internal`] error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Shorthand for an [`ErrorKind::Database`] error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Shorthand for an [`ErrorKind::Configuration`] error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorKind::Serialization, format!("JSON error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration failed to load: {err}"),
            err,
        )
    }
}

/// A request-path authorization verdict.
///
/// Every kind is terminal for the current request except
/// [`Rejection::StoreUnavailable`], which a caller may retry after its
/// own backoff. Rejections are returned, never panicked, and the
/// success type at the boundary (`TenantContext`) is a different type
/// entirely, so a caller cannot proceed without checking.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
#[serde(tag = "code", content = "detail", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rejection {
    /// No bearer token was supplied, or no session claims are present.
    #[error("authentication required")]
    Unauthenticated,
    /// The token could not be parsed or its signature did not verify.
    #[error("token is malformed")]
    TokenMalformed,
    /// The token or its persisted session has expired.
    #[error("token has expired")]
    TokenExpired,
    /// No persisted session row matches the token (revoked or swept).
    #[error("token not found")]
    TokenNotFound,
    /// The hostname did not resolve to any organization.
    #[error("no tenant resolved for hostname")]
    TenantUnresolved,
    /// The session is bound to a different organization than the target.
    #[error("session is not bound to the target organization")]
    OrganizationMismatch,
    /// The session's role is below the required minimum.
    #[error("role '{actual}' is insufficient, minimum required: '{required}'")]
    InsufficientRole {
        /// The minimum role the operation requires.
        required: String,
        /// The role the session actually carries.
        actual: String,
    },
    /// The session's permission set does not contain the required permission.
    #[error("missing required permission '{0}'")]
    InsufficientPermission(String),
    /// The credential store could not be reached. Transient.
    #[error("credential store unavailable: {0}")]
    StoreUnavailable(String),
}

impl Rejection {
    /// Stable, enumerable reason code for the HTTP layer.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::TokenMalformed => "TOKEN_MALFORMED",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::TokenNotFound => "TOKEN_NOT_FOUND",
            Self::TenantUnresolved => "TENANT_UNRESOLVED",
            Self::OrganizationMismatch => "ORGANIZATION_MISMATCH",
            Self::InsufficientRole { .. } => "INSUFFICIENT_ROLE",
            Self::InsufficientPermission(_) => "INSUFFICIENT_PERMISSION",
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
        }
    }

    /// Whether a caller may legitimately retry after backoff.
    ///
    /// Only `StoreUnavailable` is transient; every other kind is
    /// terminal for the current request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }
}

impl From<AppError> for Rejection {
    /// Store and infrastructure failures surface on the request path as
    /// the single transient rejection kind.
    fn from(err: AppError) -> Self {
        Self::StoreUnavailable(err.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_codes_are_stable() {
        assert_eq!(Rejection::Unauthenticated.code(), "UNAUTHENTICATED");
        assert_eq!(Rejection::TokenExpired.code(), "TOKEN_EXPIRED");
        assert_eq!(
            Rejection::StoreUnavailable("down".into()).code(),
            "STORE_UNAVAILABLE"
        );
    }

    #[test]
    fn test_only_store_unavailable_is_retryable() {
        assert!(Rejection::StoreUnavailable("down".into()).is_retryable());
        assert!(!Rejection::TokenExpired.is_retryable());
        assert!(!Rejection::OrganizationMismatch.is_retryable());
    }

    #[test]
    fn test_database_error_maps_to_store_unavailable() {
        let err = AppError::database("connection refused");
        let rejection: Rejection = err.into();
        assert_eq!(rejection.code(), "STORE_UNAVAILABLE");
    }
}
