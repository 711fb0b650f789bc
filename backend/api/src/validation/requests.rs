//! Validator sets for the API's request types
//!
//! Each function returns the [`ValidatorMap`] a route installs in front of
//! its handler. Field names are the JSON / query / path names clients send.

use std::sync::Arc;

use super::middleware::ValidatorMap;
use super::validators::{FieldRule, ServerValidation};

// ─────────────────────────────────────────────────────────────────────────────
// Accounts
// ─────────────────────────────────────────────────────────────────────────────

/// `POST /api/auth/register`
pub fn register_validators(server: &ServerValidation, body_limit: usize) -> Arc<ValidatorMap> {
    Arc::new(
        ValidatorMap::new()
            .field("email", server.validator(FieldRule::Email))
            .field("username", server.validator(FieldRule::Username))
            .field("password", server.validator(FieldRule::Password))
            .with_body_limit(body_limit),
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Movies
// ─────────────────────────────────────────────────────────────────────────────

/// `POST /api/movies/favorites`
pub fn favorite_validators(server: &ServerValidation, body_limit: usize) -> Arc<ValidatorMap> {
    Arc::new(
        ValidatorMap::new()
            .field("movieId", server.validator(FieldRule::MovieId))
            .field("title", server.validator(FieldRule::MovieTitle))
            .field("posterUrl", server.validator(FieldRule::PosterUrl))
            .with_body_limit(body_limit),
    )
}

/// `DELETE /api/movies/favorites/:movieId`
pub fn movie_id_validators(server: &ServerValidation, body_limit: usize) -> Arc<ValidatorMap> {
    Arc::new(
        ValidatorMap::new()
            .field("movieId", server.validator(FieldRule::MovieId))
            .with_body_limit(body_limit),
    )
}

/// `GET /api/movies/search?query=`
pub fn search_validators(server: &ServerValidation, body_limit: usize) -> Arc<ValidatorMap> {
    Arc::new(
        ValidatorMap::new()
            .field("query", server.validator(FieldRule::SearchQuery))
            .with_body_limit(body_limit),
    )
}
