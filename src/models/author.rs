//! Author model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Author row as stored in the database
#[derive(Debug, Clone, FromRow)]
pub struct AuthorRecord {
    pub id: i32,
    pub name: String,
    pub bio: Option<String>,
}

/// API-facing author representation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Author {
    pub id: i32,
    pub name: String,
    pub bio: Option<String>,
}

impl From<AuthorRecord> for Author {
    fn from(record: AuthorRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            bio: record.bio,
        }
    }
}

/// Create author request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAuthor {
    #[validate(length(min = 1, max = 255, message = "Author name must be 1-255 characters"))]
    pub name: String,
    pub bio: Option<String>,
}

/// Update author request; absent fields keep their stored value
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateAuthor {
    #[validate(length(min = 1, max = 255, message = "Author name must be 1-255 characters"))]
    pub name: Option<String>,
    pub bio: Option<String>,
}
