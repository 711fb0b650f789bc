use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::IntoResponse,
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use shared::{FavoriteMovieRequest, RegisterRequest, RemoveFavoriteRequest, SearchRequest};

use crate::{
    error::{ApiError, ApiResult},
    metrics,
    state::AppState,
    validation::ValidatedData,
};

/// Decode validated fields into the route's request model
fn decode<T: DeserializeOwned>(data: ValidatedData, model: &str) -> ApiResult<T> {
    data.into_model().map_err(|err| {
        tracing::error!(model = model, error = %err, "validated data does not match request model");
        ApiError::MissingValidatedData("Validated data could not be decoded")
    })
}

fn accepted<T: serde::Serialize>(status: StatusCode, data: T) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "success": true, "data": data })))
}

pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let uptime = state.started_at.elapsed().as_secs();
    let now = chrono::Utc::now().to_rfc3339();

    tracing::debug!(uptime_secs = uptime, "health check passed");
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": now,
            "uptime_secs": uptime
        })),
    )
}

pub async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let body = metrics::gather_metrics(&state.registry);
    (
        StatusCode::OK,
        [(
            header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        body,
    )
}

pub async fn register(data: ValidatedData) -> ApiResult<(StatusCode, Json<Value>)> {
    let req: RegisterRequest = decode(data, "RegisterRequest")?;
    tracing::info!(username = %req.username, "registration accepted");
    Ok(accepted(StatusCode::CREATED, req))
}

pub async fn add_favorite(data: ValidatedData) -> ApiResult<(StatusCode, Json<Value>)> {
    let req: FavoriteMovieRequest = decode(data, "FavoriteMovieRequest")?;
    tracing::info!(movie_id = req.movie_id, "favorite accepted");
    Ok(accepted(StatusCode::CREATED, req))
}

pub async fn remove_favorite(data: ValidatedData) -> ApiResult<(StatusCode, Json<Value>)> {
    let req: RemoveFavoriteRequest = decode(data, "RemoveFavoriteRequest")?;
    tracing::info!(movie_id = req.movie_id, "favorite removal accepted");
    Ok(accepted(StatusCode::OK, req))
}

pub async fn search_movies(data: ValidatedData) -> ApiResult<(StatusCode, Json<Value>)> {
    let req: SearchRequest = decode(data, "SearchRequest")?;
    tracing::debug!(query = %req.query, "search accepted");
    Ok(accepted(StatusCode::OK, req))
}

pub async fn route_not_found(uri: Uri) -> ApiError {
    tracing::debug!(path = %uri.path(), "no route matched");
    ApiError::route_not_found(uri.path())
}
