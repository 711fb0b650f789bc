use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Failures outside field validation. Field errors go through
/// [`crate::validation::ValidationRejection`] instead.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No route matched the request path
    #[error("Route not found: {path}")]
    RouteNotFound { path: String },

    /// A handler expected [`crate::validation::ValidatedData`] that the
    /// middleware never produced, or that does not fit the request model
    #[error("{0}")]
    MissingValidatedData(&'static str),
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
    code: u16,
    timestamp: String,
    correlation_id: String,
}

impl ApiError {
    pub fn route_not_found(path: impl Into<String>) -> Self {
        Self::RouteNotFound { path: path.into() }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            Self::MissingValidatedData(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::RouteNotFound { .. } => "NotFound",
            Self::MissingValidatedData(_) => "InternalServerError",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let correlation_id = Uuid::new_v4().to_string();
        let payload = ErrorResponse {
            error: self.error_code(),
            message: self.to_string(),
            code: status.as_u16(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            correlation_id: correlation_id.clone(),
        };

        let mut response = (status, Json(payload)).into_response();
        if let Ok(value) = HeaderValue::from_str(&correlation_id) {
            response
                .headers_mut()
                .insert(header::HeaderName::from_static("x-correlation-id"), value);
        }
        response
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    async fn body_of(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_route_not_found_names_the_path() {
        let response = ApiError::route_not_found("/api/nope").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let correlation = response
            .headers()
            .get("x-correlation-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .unwrap();

        let body = body_of(response).await;
        assert_eq!(body["code"], 404);
        assert_eq!(body["error"], "NotFound");
        assert_eq!(body["message"], "Route not found: /api/nope");
        assert_eq!(body["correlation_id"], correlation.as_str());
    }

    #[tokio::test]
    async fn test_missing_validated_data_is_a_server_error() {
        let response =
            ApiError::MissingValidatedData("Validation middleware is not configured for this route")
                .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_of(response).await;
        assert_eq!(body["code"], 500);
        assert_eq!(body["error"], "InternalServerError");
        assert_eq!(
            body["message"],
            "Validation middleware is not configured for this route"
        );
    }
}
