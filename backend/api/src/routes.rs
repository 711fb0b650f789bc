use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use crate::{
    handlers,
    state::AppState,
    validation::{requests, validate_request},
};

pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_endpoint))
}

pub fn auth_routes(state: &AppState) -> Router<AppState> {
    let limit = state.config.max_body_bytes;
    let register = requests::register_validators(&state.validation, limit);

    Router::new().route(
        "/api/auth/register",
        post(handlers::register).layer(middleware::from_fn_with_state(register, validate_request)),
    )
}

pub fn movie_routes(state: &AppState) -> Router<AppState> {
    let limit = state.config.max_body_bytes;
    let favorite = requests::favorite_validators(&state.validation, limit);
    let by_id = requests::movie_id_validators(&state.validation, limit);
    let search = requests::search_validators(&state.validation, limit);

    Router::new()
        .route(
            "/api/movies/favorites",
            post(handlers::add_favorite)
                .layer(middleware::from_fn_with_state(favorite, validate_request)),
        )
        .route(
            "/api/movies/favorites/:movieId",
            delete(handlers::remove_favorite)
                .layer(middleware::from_fn_with_state(by_id, validate_request)),
        )
        .route(
            "/api/movies/search",
            get(handlers::search_movies)
                .layer(middleware::from_fn_with_state(search, validate_request)),
        )
}

/// Every API route, with state applied
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(auth_routes(&state))
        .merge(movie_routes(&state))
        .fallback(handlers::route_not_found)
        .with_state(state)
}
