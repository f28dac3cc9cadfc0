//! Validation helpers shared by every entry type, and surname extraction.
//!
//! Entry construction fails fast with a [`ValidationError`] naming the entry
//! type and the offending field, so nothing downstream ever sees an entry
//! without authors or with a missing required field.

use thiserror::Error;

/// Validation error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{entry_type} requires at least one author")]
    EmptyAuthors { entry_type: &'static str },

    #[error("{entry_type} requires '{field}'; received None")]
    MissingField {
        entry_type: &'static str,
        field: &'static str,
    },

    #[error("{entry_type} does not accept '{field}'")]
    UnexpectedField {
        entry_type: &'static str,
        field: &'static str,
    },

    #[error("Article requires exactly one of 'pages' or 'article_number'")]
    ArticleLocator,

    #[error("thesis_type must be 'phd' or 'masters'; received '{0}'")]
    InvalidThesisType(String),
}

/// Require that an optional value is present.
///
/// Returns the unwrapped value, or [`ValidationError::MissingField`] naming
/// `field` and `entry_type`.
pub fn require_field<T>(
    value: Option<T>,
    field: &'static str,
    entry_type: &'static str,
) -> Result<T, ValidationError> {
    value.ok_or(ValidationError::MissingField { entry_type, field })
}

/// Require a non-empty author list.
pub fn require_non_empty_authors<S>(
    authors: &[S],
    entry_type: &'static str,
) -> Result<(), ValidationError> {
    if authors.is_empty() {
        return Err(ValidationError::EmptyAuthors { entry_type });
    }
    Ok(())
}

/// Extract the surname from an author name.
///
/// Handles both `"Last, First"` and `"First Last"` forms. Everything outside
/// `A-Z`/`a-z` is dropped (not transliterated) and the result is title-cased,
/// so `"Müller, Hans"` gives `"Mller"` and `"van der berg, Jan"` gives
/// `"Vanderberg"`. Empty or malformed input yields an empty string.
pub fn extract_surname(name: &str) -> String {
    let surname = match name.split_once(',') {
        Some((last, _)) => last.trim(),
        None => name.split_whitespace().last().unwrap_or(""),
    };

    let mut letters = surname.chars().filter(|c| c.is_ascii_alphabetic());
    match letters.next() {
        Some(first) => std::iter::once(first.to_ascii_uppercase())
            .chain(letters.map(|c| c.to_ascii_lowercase()))
            .collect(),
        None => String::new(),
    }
}
