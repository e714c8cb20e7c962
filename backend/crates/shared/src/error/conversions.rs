//! Error conversions - HTTP rendering of [`AppError`]
//!
//! Feature-gated so that crates without an HTTP surface don't pull in axum.

#[cfg(feature = "axum")]
use super::app_error::AppError;

// ============================================================================
// Axum conversions (feature-gated)
// ============================================================================

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::{HeaderValue, StatusCode, header};

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // RFC 7807 Problem Details for HTTP APIs
        let body = serde_json::json!({
            "type": format!("https://httpstatuses.io/{}", self.status_code()),
            "title": self.kind().as_str(),
            "status": self.status_code(),
            "code": self.code(),
            "detail": self.message(),
            "details": self.details(),
            "action": self.action(),
        });

        let mut response = (status, Json(body)).into_response();
        if let Some(secs) = self.retry_after_secs() {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}

#[cfg(all(test, feature = "axum"))]
mod tests {
    use super::*;
    use axum::http::{StatusCode, header};
    use axum::response::IntoResponse;

    #[test]
    fn test_status_mapping() {
        let response = AppError::validation("bad").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AppError::vendor_unavailable("down").into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_retry_after_header() {
        let response = AppError::rate_limited("slow down", 17).into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            response.headers().get(header::RETRY_AFTER).unwrap(),
            "17"
        );
    }

    #[test]
    fn test_no_retry_after_without_hint() {
        let response = AppError::not_found("missing").into_response();
        assert!(response.headers().get(header::RETRY_AFTER).is_none());
    }
}
