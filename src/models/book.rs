//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Book row as stored in the database
#[derive(Debug, Clone, FromRow)]
pub struct BookRecord {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub published_year: Option<i32>,
    pub author_id: i32,
    pub category_id: i32,
    pub cover_image: Option<String>,
}

/// API-facing book representation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub published_year: Option<i32>,
    pub author_id: i32,
    pub category_id: i32,
    /// Relative path to the uploaded cover, null until an upload succeeds
    pub cover_image: Option<String>,
}

impl From<BookRecord> for Book {
    fn from(record: BookRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            published_year: record.published_year,
            author_id: record.author_id,
            category_id: record.category_id,
            cover_image: record.cover_image,
        }
    }
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 512, message = "Book title must be 1-512 characters"))]
    pub title: String,
    pub description: Option<String>,
    #[validate(range(min = 0, max = 9999, message = "Published year out of range"))]
    pub published_year: Option<i32>,
    pub author_id: i32,
    pub category_id: i32,
}

/// Update book request; absent fields keep their stored value
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, max = 512, message = "Book title must be 1-512 characters"))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0, max = 9999, message = "Published year out of range"))]
    pub published_year: Option<i32>,
    pub author_id: Option<i32>,
    pub category_id: Option<i32>,
}

/// Query parameters for listing books; filters combine with logical AND
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct BookQuery {
    /// Number of rows to skip (default: 0)
    pub skip: Option<i64>,
    /// Maximum number of rows to return (default: 10)
    pub limit: Option<i64>,
    /// Filter by author id
    pub author_id: Option<i32>,
    /// Filter by category id
    pub category_id: Option<i32>,
    /// Filter by published year
    pub year: Option<i32>,
    /// Case-insensitive substring match against title or description
    pub keyword: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_maps_to_api_book_field_for_field() {
        let record = BookRecord {
            id: 3,
            title: "The Hobbit".to_string(),
            description: None,
            published_year: Some(1937),
            author_id: 1,
            category_id: 2,
            cover_image: Some("static/covers/book_3_abc.png".to_string()),
        };

        let book = Book::from(record);
        assert_eq!(book.id, 3);
        assert_eq!(book.title, "The Hobbit");
        assert_eq!(book.description, None);
        assert_eq!(book.published_year, Some(1937));
        assert_eq!(book.author_id, 1);
        assert_eq!(book.category_id, 2);
        assert_eq!(
            book.cover_image.as_deref(),
            Some("static/covers/book_3_abc.png")
        );
    }
}
