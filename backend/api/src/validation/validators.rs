//! Field validators for input validation
//!
//! Each validator takes the raw, untyped value of one request field
//! (`None` when the field is absent) and returns either the normalized value
//! or a user-facing error message.

use std::fmt;
use std::num::IntErrorKind;
use std::str::FromStr;
use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use url::Url;

use super::sanitizers::{HtmlSanitizer, Sanitizer};

/// Outcome of a single field check: the normalized value, or the error message
pub type ValidationResult = Result<Value, String>;

/// A field validator as stored in a [`super::ValidatorMap`]
pub type Validator = Arc<dyn Fn(Option<&Value>) -> ValidationResult + Send + Sync>;

// ─────────────────────────────────────────────────────────────────────────────
// Constants for validation rules
// ─────────────────────────────────────────────────────────────────────────────

/// Maximum length for an email address
pub const MAX_EMAIL_LENGTH: usize = 254;
/// Minimum length for username
pub const MIN_USERNAME_LENGTH: usize = 3;
/// Maximum length for username
pub const MAX_USERNAME_LENGTH: usize = 20;
/// Minimum length for password
pub const MIN_PASSWORD_LENGTH: usize = 6;
/// Maximum length for password
pub const MAX_PASSWORD_LENGTH: usize = 128;
/// Movie ids at or above this value are rejected
pub const MAX_MOVIE_ID: i64 = 1_000_000_000;
/// Maximum length for movie title
pub const MAX_TITLE_LENGTH: usize = 200;
/// Maximum length for search query
pub const MAX_SEARCH_QUERY_LENGTH: usize = 100;

/// Usernames nobody may register, compared case-insensitively
const FORBIDDEN_USERNAMES: &[&str] = &[
    "admin",
    "administrator",
    "root",
    "system",
    "moderator",
    "support",
    "api",
    "null",
    "undefined",
];

/// Passwords rejected for being too easy to guess, compared case-insensitively
const COMMON_PASSWORDS: &[&str] = &[
    "123456",
    "1234567",
    "12345678",
    "123456789",
    "1234567890",
    "111111",
    "000000",
    "123123",
    "654321",
    "abc123",
    "password",
    "password1",
    "password123",
    "qwerty",
    "qwerty123",
    "senha123",
    "iloveyou",
];

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();

    static ref USERNAME_REGEX: Regex = Regex::new(r"^[A-Za-z0-9_]+$").unwrap();
}

/// Names of the built-in field validators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldRule {
    Email,
    Username,
    Password,
    MovieId,
    MovieTitle,
    PosterUrl,
    SearchQuery,
}

impl FieldRule {
    pub const ALL: [FieldRule; 7] = [
        FieldRule::Email,
        FieldRule::Username,
        FieldRule::Password,
        FieldRule::MovieId,
        FieldRule::MovieTitle,
        FieldRule::PosterUrl,
        FieldRule::SearchQuery,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldRule::Email => "email",
            FieldRule::Username => "username",
            FieldRule::Password => "password",
            FieldRule::MovieId => "movieId",
            FieldRule::MovieTitle => "movieTitle",
            FieldRule::PosterUrl => "posterUrl",
            FieldRule::SearchQuery => "searchQuery",
        }
    }
}

impl fmt::Display for FieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldRule::ALL
            .into_iter()
            .find(|rule| rule.as_str() == s)
            .ok_or_else(|| format!("unknown field rule: {}", s))
    }
}

/// The set of server-side field validators.
///
/// Holds the sanitizer used by the free-text fields (movie title and search
/// query). Every other validator is also available as a free function.
#[derive(Clone)]
pub struct ServerValidation {
    sanitizer: Arc<dyn Sanitizer>,
}

impl Default for ServerValidation {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ServerValidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerValidation").finish_non_exhaustive()
    }
}

impl ServerValidation {
    /// Validators backed by the default [`HtmlSanitizer`]
    pub fn new() -> Self {
        Self::with_sanitizer(HtmlSanitizer)
    }

    pub fn with_sanitizer(sanitizer: impl Sanitizer + 'static) -> Self {
        Self {
            sanitizer: Arc::new(sanitizer),
        }
    }

    pub fn email(&self, raw: Option<&Value>) -> ValidationResult {
        validate_email(raw)
    }

    pub fn username(&self, raw: Option<&Value>) -> ValidationResult {
        validate_username(raw)
    }

    pub fn password(&self, raw: Option<&Value>) -> ValidationResult {
        validate_password(raw)
    }

    pub fn movie_id(&self, raw: Option<&Value>) -> ValidationResult {
        validate_movie_id(raw)
    }

    pub fn movie_title(&self, raw: Option<&Value>) -> ValidationResult {
        validate_movie_title(raw, self.sanitizer.as_ref())
    }

    pub fn poster_url(&self, raw: Option<&Value>) -> ValidationResult {
        validate_poster_url(raw)
    }

    pub fn search_query(&self, raw: Option<&Value>) -> ValidationResult {
        validate_search_query(raw, self.sanitizer.as_ref())
    }

    /// Run the validator named by `rule`
    pub fn check(&self, rule: FieldRule, raw: Option<&Value>) -> ValidationResult {
        match rule {
            FieldRule::Email => self.email(raw),
            FieldRule::Username => self.username(raw),
            FieldRule::Password => self.password(raw),
            FieldRule::MovieId => self.movie_id(raw),
            FieldRule::MovieTitle => self.movie_title(raw),
            FieldRule::PosterUrl => self.poster_url(raw),
            FieldRule::SearchQuery => self.search_query(raw),
        }
    }

    /// Package the validator named by `rule` for a [`super::ValidatorMap`]
    pub fn validator(&self, rule: FieldRule) -> Validator {
        let this = self.clone();
        Arc::new(move |raw: Option<&Value>| this.check(rule, raw))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Individual validators
// ─────────────────────────────────────────────────────────────────────────────

pub fn validate_email(raw: Option<&Value>) -> ValidationResult {
    let email = required_str(raw, "Email é obrigatório", "Email deve ser uma string")?;
    // Lowercasing can grow a string, so the limits apply to the lowered form.
    let normalized = email.trim().to_lowercase();

    if normalized.is_empty() {
        return Err("Email é obrigatório".to_string());
    }
    if char_len(&normalized) > MAX_EMAIL_LENGTH {
        return Err("Email muito longo".to_string());
    }
    if !EMAIL_REGEX.is_match(&normalized) {
        return Err("Formato de email inválido".to_string());
    }

    Ok(Value::String(normalized))
}

pub fn validate_username(raw: Option<&Value>) -> ValidationResult {
    let username = required_str(raw, "Username é obrigatório", "Username deve ser uma string")?;
    let trimmed = username.trim();
    let len = char_len(trimmed);

    if len < MIN_USERNAME_LENGTH {
        return Err(format!(
            "Username deve ter pelo menos {} caracteres",
            MIN_USERNAME_LENGTH
        ));
    }
    if len > MAX_USERNAME_LENGTH {
        return Err(format!(
            "Username deve ter no máximo {} caracteres",
            MAX_USERNAME_LENGTH
        ));
    }
    if !USERNAME_REGEX.is_match(trimmed) {
        return Err("Username deve conter apenas letras, números e underscore".to_string());
    }

    let lowered = trimmed.to_lowercase();
    if FORBIDDEN_USERNAMES.contains(&lowered.as_str()) {
        return Err("Username não permitido".to_string());
    }

    Ok(Value::String(trimmed.to_string()))
}

/// Passwords are never trimmed or otherwise transformed
pub fn validate_password(raw: Option<&Value>) -> ValidationResult {
    let password = required_str(raw, "Senha é obrigatória", "Senha deve ser uma string")?;
    let len = char_len(password);

    if len < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Senha deve ter pelo menos {} caracteres",
            MIN_PASSWORD_LENGTH
        ));
    }
    if len > MAX_PASSWORD_LENGTH {
        return Err(format!(
            "Senha deve ter no máximo {} caracteres",
            MAX_PASSWORD_LENGTH
        ));
    }

    let lowered = password.to_lowercase();
    if COMMON_PASSWORDS.contains(&lowered.as_str()) {
        return Err("Senha muito comum, escolha uma senha mais segura".to_string());
    }

    Ok(Value::String(password.to_string()))
}

/// Accepts a JSON integer, a JSON float with no fractional part such as
/// `42.0`, or a decimal string such as `"42"`
pub fn validate_movie_id(raw: Option<&Value>) -> ValidationResult {
    const NOT_POSITIVE: &str = "ID do filme deve ser um número positivo válido";
    const OUT_OF_RANGE: &str = "ID do filme inválido";

    let id = match present(raw) {
        None => return Err("ID do filme é obrigatório".to_string()),
        Some(Value::Number(n)) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(id), _, _) => id,
            (None, Some(_), _) => return Err(OUT_OF_RANGE.to_string()),
            (None, None, Some(f)) if f.is_finite() && f.fract() == 0.0 => {
                if f >= MAX_MOVIE_ID as f64 {
                    return Err(OUT_OF_RANGE.to_string());
                }
                // In range, so the cast is exact
                f as i64
            }
            _ => return Err(NOT_POSITIVE.to_string()),
        },
        Some(Value::String(s)) => match s.trim().parse::<i64>() {
            Ok(id) => id,
            Err(e) if *e.kind() == IntErrorKind::PosOverflow => {
                return Err(OUT_OF_RANGE.to_string())
            }
            Err(_) => return Err(NOT_POSITIVE.to_string()),
        },
        Some(_) => return Err(NOT_POSITIVE.to_string()),
    };

    if id <= 0 {
        return Err(NOT_POSITIVE.to_string());
    }
    if id >= MAX_MOVIE_ID {
        return Err(OUT_OF_RANGE.to_string());
    }

    Ok(Value::from(id))
}

pub fn validate_movie_title(raw: Option<&Value>, sanitizer: &dyn Sanitizer) -> ValidationResult {
    let title = required_str(
        raw,
        "Título do filme é obrigatório",
        "Título do filme deve ser uma string",
    )?;
    let trimmed = title.trim();

    if trimmed.is_empty() {
        return Err("Título não pode estar vazio".to_string());
    }
    if char_len(trimmed) > MAX_TITLE_LENGTH {
        return Err("Título muito longo".to_string());
    }

    Ok(Value::String(sanitizer.sanitize(trimmed).trim().to_string()))
}

/// Optional field: absent, null or blank input yields `null`
pub fn validate_poster_url(raw: Option<&Value>) -> ValidationResult {
    let url = match present(raw) {
        None => return Ok(Value::Null),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(Value::Null),
        Some(Value::String(s)) => s,
        Some(_) => return Err("URL do poster deve ser uma string".to_string()),
    };

    match Url::parse(url) {
        Ok(parsed)
            if matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some() =>
        {
            Ok(Value::String(url.clone()))
        }
        _ => Err("URL do poster inválida".to_string()),
    }
}

pub fn validate_search_query(raw: Option<&Value>, sanitizer: &dyn Sanitizer) -> ValidationResult {
    let query = required_str(
        raw,
        "Termo de busca é obrigatório",
        "Termo de busca deve ser uma string",
    )?;
    let trimmed = query.trim();

    if trimmed.is_empty() {
        return Err("Termo de busca não pode estar vazio".to_string());
    }
    if char_len(trimmed) > MAX_SEARCH_QUERY_LENGTH {
        return Err("Termo de busca muito longo".to_string());
    }

    Ok(Value::String(sanitizer.sanitize(trimmed).trim().to_string()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// JSON `null` is treated the same as a missing field
fn present(raw: Option<&Value>) -> Option<&Value> {
    raw.filter(|v| !v.is_null())
}

fn required_str<'a>(
    raw: Option<&'a Value>,
    missing: &str,
    not_a_string: &str,
) -> Result<&'a str, String> {
    match present(raw) {
        None => Err(missing.to_string()),
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(_) => Err(not_a_string.to_string()),
    }
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}
