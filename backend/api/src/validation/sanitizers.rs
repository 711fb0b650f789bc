//! Input sanitization functions
//!
//! This module provides the [`Sanitizer`] capability used by the text
//! validators, plus the regex helpers the default implementation is built on.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Elements dropped together with everything they enclose
    static ref DANGEROUS_BLOCK_PATTERN: Regex = Regex::new(
        r"(?is)<(script|style|iframe|object|embed)\b[^>]*>.*?</(script|style|iframe|object|embed)\s*>"
    ).unwrap();

    /// Pattern to match HTML tags
    static ref HTML_TAG_PATTERN: Regex = Regex::new(r"<[^>]*>").unwrap();

    /// Pattern to match control characters (except newline and tab)
    static ref CONTROL_CHARS: Regex = Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F\x7F]").unwrap();
}

/// Strips unsafe markup from user supplied text.
///
/// Validators treat the sanitizer as a total function: it never fails and
/// always returns the text that should be stored. Any `Fn(&str) -> String`
/// closure is a sanitizer, which keeps it easy to swap in tests.
pub trait Sanitizer: Send + Sync {
    fn sanitize(&self, input: &str) -> String;
}

impl<F> Sanitizer for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn sanitize(&self, input: &str) -> String {
        self(input)
    }
}

/// Default sanitizer: drops script-like elements with their content, then
/// strips every remaining tag and control character.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlSanitizer;

impl Sanitizer for HtmlSanitizer {
    fn sanitize(&self, input: &str) -> String {
        let no_blocks = DANGEROUS_BLOCK_PATTERN.replace_all(input, "");
        let no_tags = strip_html(&no_blocks);
        remove_control_chars(&no_tags)
    }
}

/// Strip all HTML tags from a string
pub fn strip_html(value: &str) -> String {
    HTML_TAG_PATTERN.replace_all(value, "").to_string()
}

/// Remove control characters from a string
pub fn remove_control_chars(value: &str) -> String {
    CONTROL_CHARS.replace_all(value, "").to_string()
}
