//! Category model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Category row as stored in the database
#[derive(Debug, Clone, FromRow)]
pub struct CategoryRecord {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

/// API-facing category representation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

impl From<CategoryRecord> for Category {
    fn from(record: CategoryRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            description: record.description,
        }
    }
}

/// Create category request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCategory {
    #[validate(length(min = 1, max = 255, message = "Category name must be 1-255 characters"))]
    pub name: String,
    pub description: Option<String>,
}

/// Update category request; absent fields keep their stored value
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCategory {
    #[validate(length(min = 1, max = 255, message = "Category name must be 1-255 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
}
