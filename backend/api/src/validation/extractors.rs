//! Types that carry validation outcomes across the Axum boundary
//!
//! [`ValidatedData`] is what the middleware hands to handlers on success,
//! [`ValidationRejection`] is the 400 response it sends on failure.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::ApiError;

/// Message sent with every validation rejection
pub const INVALID_DATA_MESSAGE: &str = "Dados inválidos";

/// Normalized values of every validated field, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidatedData(Map<String, Value>);

impl ValidatedData {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Value) {
        self.0.insert(field.into(), value);
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decode the validated fields into a typed request model
    pub fn into_model<T: DeserializeOwned>(self) -> Result<T, serde_json::Error> {
        serde_json::from_value(Value::Object(self.0))
    }
}

impl From<ValidatedData> for Value {
    fn from(data: ValidatedData) -> Self {
        Value::Object(data.0)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ValidatedData
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ValidatedData>()
            .cloned()
            .ok_or_else(|| {
                tracing::error!(path = %parts.uri.path(), "validated data requested but validation middleware is not installed");
                ApiError::MissingValidatedData("Validation middleware is not configured for this route")
            })
    }
}

/// Validation error response body
#[derive(Debug, Serialize)]
pub struct ValidationErrorResponse {
    pub success: bool,
    pub message: String,
    pub errors: Vec<String>,
}

/// Aggregated field errors that convert into a 400 response
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationRejection {
    pub errors: Vec<String>,
}

impl ValidationRejection {
    pub fn new(errors: Vec<String>) -> Self {
        Self { errors }
    }

    pub fn single(field: &str, message: &str) -> Self {
        Self {
            errors: vec![format!("{}: {}", field, message)],
        }
    }
}

impl IntoResponse for ValidationRejection {
    fn into_response(self) -> Response {
        let body = ValidationErrorResponse {
            success: false,
            message: INVALID_DATA_MESSAGE.to_string(),
            errors: self.errors,
        };

        let mut response = (StatusCode::BAD_REQUEST, Json(body)).into_response();
        if let Ok(value) = HeaderValue::from_str(&Uuid::new_v4().to_string()) {
            response
                .headers_mut()
                .insert(header::HeaderName::from_static("x-correlation-id"), value);
        }
        response
    }
}
