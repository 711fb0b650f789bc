//! Request validation middleware
//!
//! Runs a [`ValidatorMap`] against the combined input of a request (JSON
//! body, query string, route params). On success the normalized values are
//! inserted into the request extensions as [`ValidatedData`]; otherwise the
//! request is answered with a 400 and never reaches the handler.
//!
//! ```ignore
//! let validators = Arc::new(
//!     ValidatorMap::new()
//!         .field("email", server.validator(FieldRule::Email))
//!         .field("username", server.validator(FieldRule::Username)),
//! );
//!
//! Router::new().route(
//!     "/register",
//!     post(register).layer(middleware::from_fn_with_state(validators, validate_request)),
//! );
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use axum::{
    body::{self, Body},
    extract::{FromRequestParts, Query, RawPathParams, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value};

use super::extractors::{ValidatedData, ValidationRejection};
use super::validators::{ValidationResult, Validator};
use crate::metrics;

/// Default cap on the buffered request body
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Ordered field-name → validator pairs for one route
#[derive(Clone)]
pub struct ValidatorMap {
    fields: Vec<(String, Validator)>,
    body_limit: usize,
}

impl Default for ValidatorMap {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ValidatorMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorMap")
            .field("fields", &self.field_names().collect::<Vec<_>>())
            .field("body_limit", &self.body_limit)
            .finish()
    }
}

impl ValidatorMap {
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    /// Add (or replace) the validator for `name`
    pub fn field(mut self, name: impl Into<String>, validator: Validator) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = validator,
            None => self.fields.push((name, validator)),
        }
        self
    }

    /// Add a validator written as a plain closure
    pub fn field_fn<F>(self, name: impl Into<String>, validator: F) -> Self
    where
        F: Fn(Option<&Value>) -> ValidationResult + Send + Sync + 'static,
    {
        self.field(name, Arc::new(validator))
    }

    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }

    pub fn body_limit(&self) -> usize {
        self.body_limit
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}

/// Raw input of a request, looked up body first, then query, then params
#[derive(Debug, Clone, Default)]
pub struct RequestInput {
    pub body: Map<String, Value>,
    pub query: HashMap<String, String>,
    pub params: HashMap<String, String>,
}

impl RequestInput {
    /// Returns the first non-null value found for `field`
    pub fn lookup(&self, field: &str) -> Option<Value> {
        if let Some(value) = self.body.get(field).filter(|v| !v.is_null()) {
            return Some(value.clone());
        }
        self.query
            .get(field)
            .or_else(|| self.params.get(field))
            .map(|v| Value::String(v.clone()))
    }
}

/// Run every validator in `validators` over `input`.
///
/// All fields are checked; errors come back as `"<field>: <message>"` in the
/// order the validators were registered.
pub fn validate_fields(
    validators: &ValidatorMap,
    input: &RequestInput,
) -> Result<ValidatedData, Vec<String>> {
    let mut data = ValidatedData::new();
    let mut errors = Vec::new();

    for (field, validator) in &validators.fields {
        let raw = input.lookup(field);
        match validator(raw.as_ref()) {
            Ok(value) => data.insert(field.clone(), value),
            Err(message) => {
                metrics::VALIDATION_FIELD_FAILURES
                    .with_label_values(&[field.as_str()])
                    .inc();
                errors.push(format!("{}: {}", field, message));
            }
        }
    }

    if errors.is_empty() {
        Ok(data)
    } else {
        Err(errors)
    }
}

pub async fn validate_request(
    State(validators): State<Arc<ValidatorMap>>,
    request: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = request.into_parts();

    let bytes = match body::to_bytes(body, validators.body_limit()).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(error = %err, limit = validators.body_limit(), "request body rejected");
            return reject(ValidationRejection::single(
                "body",
                "corpo da requisição muito grande",
            ));
        }
    };

    let body_fields = match parse_body(&bytes) {
        Some(fields) => fields,
        None => {
            return reject(ValidationRejection::single(
                "body",
                "corpo da requisição deve ser um objeto JSON",
            ))
        }
    };

    let query = Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
        .map(|Query(q)| q)
        .unwrap_or_default();

    let params = match RawPathParams::from_request_parts(&mut parts, &()).await {
        Ok(raw) => raw
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        Err(_) => HashMap::new(),
    };

    let input = RequestInput {
        body: body_fields,
        query,
        params,
    };

    match validate_fields(&validators, &input) {
        Ok(data) => {
            metrics::VALIDATION_REQUESTS
                .with_label_values(&["accepted"])
                .inc();
            tracing::debug!(fields = data.len(), path = %parts.uri.path(), "request validated");

            let mut request = Request::from_parts(parts, Body::from(bytes));
            request.extensions_mut().insert(data);
            next.run(request).await
        }
        Err(errors) => {
            tracing::info!(
                path = %parts.uri.path(),
                error_count = errors.len(),
                "request rejected by validation"
            );
            reject(ValidationRejection::new(errors))
        }
    }
}

fn reject(rejection: ValidationRejection) -> Response {
    metrics::VALIDATION_REQUESTS
        .with_label_values(&["rejected"])
        .inc();
    rejection.into_response()
}

/// An empty body is an empty object; anything else must be a JSON object
fn parse_body(bytes: &[u8]) -> Option<Map<String, Value>> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Some(Map::new());
    }
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(fields)) => Some(fields),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{FieldRule, ServerValidation};
    use axum::{
        http::{Request as HttpRequest, StatusCode},
        middleware,
        routing::{delete, get, post},
        Extension, Json, Router,
    };
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::Service;

    fn account_validators() -> ValidatorMap {
        let v = ServerValidation::new();
        ValidatorMap::new()
            .field("email", v.validator(FieldRule::Email))
            .field("username", v.validator(FieldRule::Username))
    }

    fn input_with_body(body: Value) -> RequestInput {
        RequestInput {
            body: body.as_object().cloned().unwrap_or_default(),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_fields_all_valid() {
        let input = input_with_body(json!({
            "email": "user@example.com",
            "username": "mario_123"
        }));

        let data = validate_fields(&account_validators(), &input).unwrap();
        assert_eq!(
            Value::from(data),
            json!({"email": "user@example.com", "username": "mario_123"})
        );
    }

    #[test]
    fn test_validate_fields_collects_every_error_in_order() {
        let input = input_with_body(json!({ "email": "invalido@@", "username": "ab" }));

        let errors = validate_fields(&account_validators(), &input).unwrap_err();
        assert_eq!(
            errors,
            vec![
                "email: Formato de email inválido".to_string(),
                "username: Username deve ter pelo menos 3 caracteres".to_string(),
            ]
        );
    }

    #[test]
    fn test_lookup_precedence() {
        let mut input = input_with_body(json!({ "movieId": "1", "skip": null }));
        input.query.insert("movieId".into(), "2".into());
        input.query.insert("skip".into(), "3".into());
        input.params.insert("movieId".into(), "4".into());
        input.params.insert("only".into(), "5".into());

        assert_eq!(input.lookup("movieId"), Some(json!("1")));
        assert_eq!(input.lookup("skip"), Some(json!("3")));
        assert_eq!(input.lookup("only"), Some(json!("5")));
        assert_eq!(input.lookup("missing"), None);
    }

    #[test]
    fn test_field_replaces_existing_validator() {
        let map = ValidatorMap::new()
            .field_fn("a", |_| Err("first".into()))
            .field_fn("b", |_| Ok(Value::Null))
            .field_fn("a", |_| Ok(json!(1)));

        assert_eq!(map.field_names().collect::<Vec<_>>(), vec!["a", "b"]);
        let data = validate_fields(&map, &RequestInput::default()).unwrap();
        assert_eq!(data.get("a"), Some(&json!(1)));
    }

    #[test]
    fn test_parse_body() {
        assert_eq!(parse_body(b""), Some(Map::new()));
        assert_eq!(parse_body(b"  \n"), Some(Map::new()));
        assert!(parse_body(b"{\"a\":1}").is_some());
        assert!(parse_body(b"[1,2]").is_none());
        assert!(parse_body(b"{broken").is_none());
    }

    // ── Router level ─────────────────────────────────────────────────────────

    async fn echo(data: ValidatedData) -> Json<ValidatedData> {
        Json(data)
    }

    fn test_app(calls: Arc<AtomicUsize>) -> Router<()> {
        let v = ServerValidation::new();
        let account = Arc::new(account_validators());
        let by_id = Arc::new(ValidatorMap::new().field("movieId", v.validator(FieldRule::MovieId)));
        let search = Arc::new(
            ValidatorMap::new().field("query", v.validator(FieldRule::SearchQuery)),
        );
        let tiny = Arc::new(account_validators().with_body_limit(16));

        Router::new()
            .route(
                "/register",
                post(
                    |Extension(calls): Extension<Arc<AtomicUsize>>, data: ValidatedData| async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Json(data)
                    },
                )
                .layer(middleware::from_fn_with_state(account, validate_request)),
            )
            .route(
                "/movies/:movieId",
                delete(echo).layer(middleware::from_fn_with_state(by_id, validate_request)),
            )
            .route(
                "/search",
                get(echo).layer(middleware::from_fn_with_state(search, validate_request)),
            )
            .route(
                "/tiny",
                post(echo).layer(middleware::from_fn_with_state(tiny, validate_request)),
            )
            .route("/unguarded", get(echo))
            .layer(Extension(calls))
    }

    async fn call(app: &Router<()>, request: HttpRequest<Body>) -> (StatusCode, Value) {
        let mut svc = app.clone();
        let response = svc.call(request).await.unwrap();
        let status = response.status();
        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn json_post(uri: &str, body: Value) -> HttpRequest<Body> {
        HttpRequest::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn valid_request_reaches_handler_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let app = test_app(calls.clone());

        let (status, body) = call(
            &app,
            json_post(
                "/register",
                json!({ "email": "  USER@example.com ", "username": "mario_123" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            body,
            json!({ "email": "user@example.com", "username": "mario_123" })
        );
    }

    #[tokio::test]
    async fn invalid_request_never_reaches_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let app = test_app(calls.clone());

        let (status, body) = call(
            &app,
            json_post("/register", json!({ "email": "invalido@@", "username": "ab" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["message"], json!("Dados inválidos"));
        let errors = body["errors"].as_array().unwrap();
        assert!(errors.iter().any(|e| e.as_str().unwrap().contains("email")));
        assert!(errors.iter().any(|e| e.as_str().unwrap().contains("username")));
    }

    #[tokio::test]
    async fn malformed_json_is_rejected() {
        let calls = Arc::new(AtomicUsize::new(0));
        let app = test_app(calls.clone());

        let request = HttpRequest::builder()
            .method("POST")
            .uri("/register")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = call(&app, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            body["errors"],
            json!(["body: corpo da requisição deve ser um objeto JSON"])
        );
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let app = test_app(Arc::new(AtomicUsize::new(0)));

        let (status, body) = call(
            &app,
            json_post("/tiny", json!({ "email": "someone.with.a.long.name@example.com" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"], json!(["body: corpo da requisição muito grande"]));
    }

    #[tokio::test]
    async fn route_params_are_validated() {
        let app = test_app(Arc::new(AtomicUsize::new(0)));

        let ok = HttpRequest::builder()
            .method("DELETE")
            .uri("/movies/42")
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(&app, ok).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "movieId": 42 }));

        let bad = HttpRequest::builder()
            .method("DELETE")
            .uri("/movies/-10")
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(&app, bad).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["errors"],
            json!(["movieId: ID do filme deve ser um número positivo válido"])
        );
    }

    #[tokio::test]
    async fn query_string_is_validated_and_sanitized() {
        let app = test_app(Arc::new(AtomicUsize::new(0)));

        let request = HttpRequest::builder()
            .uri("/search?query=%20matrix%20%3Cscript%3E%20")
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(&app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "query": "matrix" }));
    }

    #[tokio::test]
    async fn missing_middleware_is_a_server_error() {
        let app = test_app(Arc::new(AtomicUsize::new(0)));

        let request = HttpRequest::builder()
            .uri("/unguarded")
            .body(Body::empty())
            .unwrap();
        let (status, _) = call(&app, request).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
