use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════
// ACCOUNT REQUESTS
// ═══════════════════════════════════════════════════════════════════════════

/// Sign-up payload, decoded from already validated fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
}

// ═══════════════════════════════════════════════════════════════════════════
// MOVIE REQUESTS
// ═══════════════════════════════════════════════════════════════════════════

/// A movie the user wants to keep in their favorites list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteMovieRequest {
    pub movie_id: i64,
    pub title: String,
    /// Absent posters are carried as `None`
    #[serde(default)]
    pub poster_url: Option<String>,
}

/// Removal of a favorite, keyed by the route parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFavoriteRequest {
    pub movie_id: i64,
}

/// Free-text movie search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}
