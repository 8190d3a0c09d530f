//! Error types for the state API.
//!
//! [`ObserverError`] unifies all failure modes into a single enum that
//! can be converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation. Every
//! error body is a JSON object with a single `error` string field.

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};

/// Errors that can occur in the state API layer.
#[derive(Debug, thiserror::Error)]
pub enum ObserverError {
    /// The request body or a required field was unusable.
    #[error("{0}")]
    BadRequest(String),

    /// No route matches the request path.
    #[error("not found: {0}")]
    NotFound(String),

    /// The route exists but only answers `allow`.
    #[error("Use {allow}")]
    MethodNotAllowed {
        /// The one accepted method.
        allow: &'static str,
    },

    /// A serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ObserverError {
    /// The HTTP status this error maps to.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::Serialization(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ObserverError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = serde_json::json!({ "error": self.to_string() });
        let mut response = (status, axum::Json(body)).into_response();

        if let Self::MethodNotAllowed { allow } = self {
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static(allow));
        }
        response
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn statuses() {
        assert_eq!(
            ObserverError::BadRequest(String::from("x")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ObserverError::MethodNotAllowed { allow: "POST" }.status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            ObserverError::Internal(String::from("x")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn method_not_allowed_carries_allow_header() {
        let response = ObserverError::MethodNotAllowed { allow: "POST" }.into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers().get(header::ALLOW).unwrap(), "POST");
    }

    #[test]
    fn bad_request_message_is_verbatim() {
        let err = ObserverError::BadRequest(String::from("Missing 'message' or 'tip' field"));
        assert_eq!(err.to_string(), "Missing 'message' or 'tip' field");
    }
}
