//! Authors repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::author::AuthorRecord,
};

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: Pool<Postgres>,
}

impl AuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List authors in store order
    pub async fn list(&self, skip: i64, limit: i64) -> AppResult<Vec<AuthorRecord>> {
        let rows = sqlx::query_as::<_, AuthorRecord>(
            "SELECT * FROM authors ORDER BY id LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Get author by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<AuthorRecord> {
        sqlx::query_as::<_, AuthorRecord>("SELECT * FROM authors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author with id {} not found", id)))
    }

    /// Check whether an author id exists
    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM authors WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    /// Check if the name is already taken, optionally excluding one author
    pub async fn name_exists(&self, name: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM authors WHERE name = $1 AND id != $2)",
            )
            .bind(name)
            .bind(id)
            .fetch_one(&self.pool)
            .await?
        } else {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM authors WHERE name = $1)")
                .bind(name)
                .fetch_one(&self.pool)
                .await?
        };
        Ok(exists)
    }

    /// Create a new author
    pub async fn create(&self, name: &str, bio: Option<&str>) -> AppResult<AuthorRecord> {
        let row = sqlx::query_as::<_, AuthorRecord>(
            "INSERT INTO authors (name, bio) VALUES ($1, $2) RETURNING *",
        )
        .bind(name)
        .bind(bio)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update an author; NULL arguments keep the stored value
    pub async fn update(
        &self,
        id: i32,
        name: Option<&str>,
        bio: Option<&str>,
    ) -> AppResult<AuthorRecord> {
        sqlx::query_as::<_, AuthorRecord>(
            r#"
            UPDATE authors
            SET name = COALESCE($1, name), bio = COALESCE($2, bio)
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(bio)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Author with id {} not found", id)))
    }

    /// Delete an author by ID
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Author with id {} not found", id)));
        }
        Ok(())
    }

    /// Count books referencing this author
    pub async fn count_books(&self, author_id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE author_id = $1")
            .bind(author_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
