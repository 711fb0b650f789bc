//! Input Validation Module
//!
//! Server-side validation and sanitization of the movie API's request
//! fields.
//!
//! # Overview
//!
//! 1. **Validators** - one function per field (email, username, password,
//!    movie id, title, poster URL, search query) returning the normalized
//!    value or an error message
//! 2. **Sanitizers** - the [`Sanitizer`] capability applied to free text
//! 3. **Middleware** - [`validate_request`], which runs a [`ValidatorMap`]
//!    over body, query and path params
//! 4. **Extractors** - [`ValidatedData`] for handlers, [`ValidationRejection`]
//!    for the 400 response
//!
//! ## Validation Error Response
//!
//! ```json
//! {
//!   "success": false,
//!   "message": "Dados inválidos",
//!   "errors": [
//!     "email: Formato de email inválido",
//!     "username: Username deve ter pelo menos 3 caracteres"
//!   ]
//! }
//! ```

pub mod extractors;
pub mod middleware;
pub mod requests;
pub mod sanitizers;
pub mod validators;

// Re-export commonly used items
pub use extractors::{ValidatedData, ValidationErrorResponse, ValidationRejection};
pub use middleware::{
    validate_fields, validate_request, RequestInput, ValidatorMap, DEFAULT_BODY_LIMIT,
};
pub use sanitizers::{HtmlSanitizer, Sanitizer};
pub use validators::{
    validate_email, validate_movie_id, validate_movie_title, validate_password,
    validate_poster_url, validate_search_query, validate_username, FieldRule, ServerValidation,
    ValidationResult, Validator, MAX_MOVIE_ID,
};
