//! Normalization and required-field checks applied before any mutation.

use folio_http::error::AppError;
use serde_json::json;
use thiserror::Error;

use super::models::{BookDraft, BookPayload};

/// A payload was missing a required field or carried only whitespace in it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Title and author are required")]
pub struct ValidationError {
    missing: Vec<&'static str>,
}

impl ValidationError {
    /// Names of the fields that failed, in declaration order
    pub fn missing_fields(&self) -> &[&'static str] {
        &self.missing
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        let details = err
            .missing
            .iter()
            .map(|field| json!({"field": field, "error": "required"}))
            .collect();
        AppError::validation(details, err.to_string())
    }
}

/// Turn a raw payload into a draft with trimmed title and author.
pub fn validate(payload: BookPayload) -> Result<BookDraft, ValidationError> {
    let title = required(payload.title);
    let author = required(payload.author);

    match (title, author) {
        (Some(title), Some(author)) => Ok(BookDraft {
            title,
            author,
            published_year: payload.published_year,
        }),
        (title, author) => {
            let mut missing = Vec::with_capacity(2);
            if title.is_none() {
                missing.push("title");
            }
            if author.is_none() {
                missing.push("author");
            }
            Err(ValidationError { missing })
        }
    }
}

fn required(value: Option<String>) -> Option<String> {
    let value = value?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(title: Option<&str>, author: Option<&str>) -> BookPayload {
        BookPayload {
            title: title.map(str::to_string),
            author: author.map(str::to_string),
            published_year: None,
        }
    }

    #[test]
    fn valid_payload_is_trimmed() {
        let draft = validate(BookPayload {
            title: Some("  Dune ".to_string()),
            author: Some("Herbert\n".to_string()),
            published_year: Some(1965),
        })
        .unwrap();

        assert_eq!(draft.title, "Dune");
        assert_eq!(draft.author, "Herbert");
        assert_eq!(draft.published_year, Some(1965));
    }

    #[test]
    fn year_defaults_to_none() {
        let draft = validate(payload(Some("Dune"), Some("Herbert"))).unwrap();
        assert_eq!(draft.published_year, None);
    }

    #[test]
    fn blank_title_is_rejected() {
        let err = validate(payload(Some("   "), Some("Herbert"))).unwrap_err();
        assert_eq!(err.missing_fields(), ["title"]);
        assert_eq!(err.to_string(), "Title and author are required");
    }

    #[test]
    fn missing_author_is_rejected() {
        let err = validate(payload(Some("Dune"), None)).unwrap_err();
        assert_eq!(err.missing_fields(), ["author"]);
    }

    #[test]
    fn both_fields_reported() {
        let err = validate(BookPayload::default()).unwrap_err();
        assert_eq!(err.missing_fields(), ["title", "author"]);
    }

    #[test]
    fn converts_to_bad_request_with_details() {
        let err: AppError = validate(payload(None, Some(""))).unwrap_err().into();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);

        match err {
            AppError::Validation { details, .. } => {
                assert_eq!(details.len(), 2);
                assert_eq!(details[0]["field"], "title");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
