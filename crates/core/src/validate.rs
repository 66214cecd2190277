//! Pure validation rules gating link and image mutations.
//!
//! Mirrors the checks the backend applies on its own side, so bad input is
//! rejected before a request is ever issued. All functions are synchronous,
//! side-effect free, and never panic.

use std::sync::LazyLock;

use regex::Regex;

/// Minimum length for link and image names.
pub const NAME_MIN_LEN: usize = 3;

/// Minimum content length for a newly created link definition. Updates are
/// not length-checked; an existing definition may shrink below this.
pub const CREATE_CONTENT_MIN_LEN: usize = 10;

/// Allowed name characters, case-insensitive: digits, letters, dash,
/// underscore, space.
static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[0-9a-z\-_ ]*$").expect("valid regex"));

/// Same set plus the dot, for names that carry a file extension.
static NAME_DOT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[0-9a-z\-_. ]*$").expect("valid regex"));

/// Which input field a verdict applies to. Callers use this to mark
/// exactly the offending field invalid without touching the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Content,
}

/// A failed validation verdict, scoped to a single field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The name is shorter than the required minimum.
    #[error("name too short ({len} < {min})")]
    NameTooShort { len: usize, min: usize },

    /// The name contains a character outside the allowed set.
    #[error("name contains an illegal character")]
    NameCharset,

    /// The content is shorter than the required minimum.
    #[error("content too short ({len} < {min})")]
    ContentTooShort { len: usize, min: usize },
}

impl ValidationError {
    /// The input field this verdict applies to.
    pub fn field(&self) -> Field {
        match self {
            Self::NameTooShort { .. } | Self::NameCharset => Field::Name,
            Self::ContentTooShort { .. } => Field::Content,
        }
    }
}

/// Check a candidate name against the length and charset rules.
///
/// `allow_dot` widens the charset for names that carry a file extension
/// (link filenames end in `.toml`); uploaded image names do not get it.
pub fn validate_name(
    candidate: &str,
    min_len: usize,
    allow_dot: bool,
) -> Result<(), ValidationError> {
    let len = candidate.chars().count();
    if len < min_len {
        return Err(ValidationError::NameTooShort { len, min: min_len });
    }

    let pattern = if allow_dot { &NAME_DOT_RE } else { &NAME_RE };
    if !pattern.is_match(candidate) {
        return Err(ValidationError::NameCharset);
    }

    Ok(())
}

/// Check candidate definition content against a minimum length.
pub fn validate_content(candidate: &str, min_len: usize) -> Result<(), ValidationError> {
    let len = candidate.chars().count();
    if len < min_len {
        return Err(ValidationError::ContentTooShort { len, min: min_len });
    }
    Ok(())
}
