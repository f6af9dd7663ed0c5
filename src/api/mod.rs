//! API handlers for the Libris REST endpoints

pub mod authors;
pub mod books;
pub mod categories;
pub mod health;
pub mod openapi;

use serde::Deserialize;
use utoipa::IntoParams;

/// Pagination query parameters shared by the collection listings
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListQuery {
    /// Number of rows to skip (default: 0)
    pub skip: Option<i64>,
    /// Maximum number of rows to return (default: 100)
    pub limit: Option<i64>,
}
