use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Server-assigned book identifier.
pub type BookId = u64;

/// A book held by the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Unique identifier, assigned on creation and never reused
    #[schema(example = 1)]
    pub id: BookId,
    /// Title of the book
    #[schema(example = "Dune")]
    pub title: String,
    /// Author of the book
    #[schema(example = "Frank Herbert")]
    pub author: String,
    /// Year of first publication, `null` when unknown
    #[schema(example = 1965)]
    pub published_year: Option<i32>,
}

/// Request body for creating or replacing a book.
///
/// Every field is optional at the wire level so that missing values reach
/// validation and produce a 400 rather than a deserialization failure.
/// Unknown fields, including a client-supplied `id`, are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    /// Title of the book, required and non-blank
    #[serde(default)]
    #[schema(example = "Dune")]
    pub title: Option<String>,
    /// Author of the book, required and non-blank
    #[serde(default)]
    #[schema(example = "Frank Herbert")]
    pub author: Option<String>,
    #[serde(default)]
    #[schema(example = 1965)]
    pub published_year: Option<i32>,
}

/// A validated book that has not been given an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub published_year: Option<i32>,
}

impl BookDraft {
    pub fn into_book(self, id: BookId) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            published_year: self.published_year,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_year_serializes_as_null() {
        let book = Book {
            id: 1,
            title: "Dune".to_string(),
            author: "Herbert".to_string(),
            published_year: None,
        };

        assert_eq!(
            serde_json::to_value(&book).unwrap(),
            json!({"id": 1, "title": "Dune", "author": "Herbert", "publishedYear": null})
        );
    }

    #[test]
    fn payload_ignores_unknown_fields_and_client_ids() {
        let payload: BookPayload = serde_json::from_value(json!({
            "id": 99,
            "title": "Dune",
            "isbn": "9780441013593",
            "publishedYear": 1965
        }))
        .unwrap();

        assert_eq!(payload.title.as_deref(), Some("Dune"));
        assert_eq!(payload.author, None);
        assert_eq!(payload.published_year, Some(1965));
    }
}
