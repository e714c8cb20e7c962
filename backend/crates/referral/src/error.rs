//! Referral Error Types
//!
//! This module provides referral-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::pagination::CursorError;
use serde_json::{Value, json};
use thiserror::Error;

use crate::domain::repository::VendorError;

/// Referral-specific result type alias
pub type ReferralResult<T> = Result<T, ReferralError>;

/// Referral-specific error variants
#[derive(Debug, Error)]
pub enum ReferralError {
    /// Empty or malformed input, unknown or expired token, bad cursor
    #[error("{message}")]
    Validation {
        message: String,
        details: Option<Value>,
    },

    /// Deferred link vendor failed; only the failure category is kept
    #[error("Failed to create referral link due to vendor service error.")]
    VendorUnavailable { category: &'static str },

    /// Caller exceeded its request budget
    #[error("Too many requests. Please retry later.")]
    RateLimited { retry_after_secs: u64 },

    /// Lookup by identifier returned nothing
    #[error("{message}")]
    NotFound {
        message: String,
        details: Option<Value>,
    },

    /// Vendor token already belongs to another link
    #[error("Vendor token is already assigned to another referral link")]
    Conflict,

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ReferralError {
    pub fn validation(message: impl Into<String>) -> Self {
        ReferralError::Validation {
            message: message.into(),
            details: None,
        }
    }

    pub fn validation_with(message: impl Into<String>, details: Value) -> Self {
        ReferralError::Validation {
            message: message.into(),
            details: Some(details),
        }
    }

    /// `{ "parameterName": name }` validation failure
    pub fn missing_parameter(message: impl Into<String>, parameter_name: &str) -> Self {
        Self::validation_with(message, json!({ "parameterName": parameter_name }))
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        ReferralError::NotFound {
            message: message.into(),
            details: Some(details),
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReferralError::Validation { .. } => ErrorKind::Validation,
            ReferralError::VendorUnavailable { .. } => ErrorKind::VendorUnavailable,
            ReferralError::RateLimited { .. } => ErrorKind::RateLimited,
            ReferralError::NotFound { .. } => ErrorKind::NotFound,
            ReferralError::Conflict => ErrorKind::Conflict,
            ReferralError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Convert to AppError
    ///
    /// Internal failures are reported generically.
    pub fn to_app_error(&self) -> AppError {
        match self {
            ReferralError::Validation { message, details }
            | ReferralError::NotFound { message, details } => {
                let err = AppError::new(self.kind(), message.clone());
                match details {
                    Some(details) => err.with_details(details.clone()),
                    None => err,
                }
            }
            ReferralError::VendorUnavailable { category } => {
                AppError::vendor_unavailable(self.to_string())
                    .with_details(json!({ "vendorError": category }))
                    .with_action("Retry the request in a moment.")
            }
            ReferralError::RateLimited { retry_after_secs } => {
                AppError::rate_limited(self.to_string(), *retry_after_secs)
                    .with_details(json!({ "retryAfterSeconds": retry_after_secs }))
            }
            ReferralError::Conflict => AppError::conflict(self.to_string()),
            ReferralError::Internal(_) => AppError::internal("An unexpected error occurred."),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            ReferralError::Internal(msg) => {
                tracing::error!(message = %msg, "Referral internal error");
            }
            ReferralError::VendorUnavailable { category } => {
                tracing::error!(vendor_error = %category, "Deferred link vendor unavailable");
            }
            ReferralError::RateLimited { retry_after_secs } => {
                tracing::warn!(retry_after_secs, "Referral rate limit exceeded");
            }
            ReferralError::Conflict => {
                tracing::warn!("Duplicate vendor token");
            }
            _ => {
                tracing::debug!(error = %self, "Referral error");
            }
        }
    }
}

impl From<ReferralError> for AppError {
    fn from(err: ReferralError) -> Self {
        err.to_app_error()
    }
}

impl IntoResponse for ReferralError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<CursorError> for ReferralError {
    fn from(err: CursorError) -> Self {
        ReferralError::validation_with(
            "Invalid pagination cursor.",
            json!({ "cursorError": err.kind() }),
        )
    }
}

impl From<VendorError> for ReferralError {
    fn from(err: VendorError) -> Self {
        ReferralError::VendorUnavailable {
            category: err.category(),
        }
    }
}

impl From<QueryRejection> for ReferralError {
    fn from(rejection: QueryRejection) -> Self {
        ReferralError::validation(rejection.body_text())
    }
}

impl From<JsonRejection> for ReferralError {
    fn from(rejection: JsonRejection) -> Self {
        ReferralError::validation(rejection.body_text())
    }
}

impl From<PathRejection> for ReferralError {
    fn from(rejection: PathRejection) -> Self {
        ReferralError::validation(rejection.body_text())
    }
}
