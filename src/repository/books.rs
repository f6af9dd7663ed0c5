//! Books repository

use sqlx::{Pool, Postgres, QueryBuilder};

use crate::{
    error::{AppError, AppResult},
    models::book::{BookQuery, BookRecord, CreateBook, UpdateBook},
};

/// Default page size for book listings
const DEFAULT_LIMIT: i64 = 10;

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List books, applying each filter only when present (logical AND).
    /// The keyword matches case-insensitively against title or description.
    pub async fn list(&self, query: &BookQuery) -> AppResult<Vec<BookRecord>> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM books WHERE 1=1");

        if let Some(author_id) = query.author_id {
            builder.push(" AND author_id = ").push_bind(author_id);
        }
        if let Some(category_id) = query.category_id {
            builder.push(" AND category_id = ").push_bind(category_id);
        }
        if let Some(year) = query.year {
            builder.push(" AND published_year = ").push_bind(year);
        }
        if let Some(ref keyword) = query.keyword {
            let pattern = format!("%{}%", keyword.to_lowercase());
            builder
                .push(" AND (LOWER(title) LIKE ")
                .push_bind(pattern.clone())
                .push(" OR LOWER(description) LIKE ")
                .push_bind(pattern)
                .push(")");
        }

        builder
            .push(" ORDER BY id LIMIT ")
            .push_bind(query.limit.unwrap_or(DEFAULT_LIMIT))
            .push(" OFFSET ")
            .push_bind(query.skip.unwrap_or(0));

        let rows = builder
            .build_query_as::<BookRecord>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<BookRecord> {
        sqlx::query_as::<_, BookRecord>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Create a new book
    pub async fn create(&self, data: &CreateBook) -> AppResult<BookRecord> {
        let row = sqlx::query_as::<_, BookRecord>(
            r#"
            INSERT INTO books (title, description, published_year, author_id, category_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&data.title)
        .bind(data.description.as_deref())
        .bind(data.published_year)
        .bind(data.author_id)
        .bind(data.category_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update a book; NULL arguments keep the stored value
    pub async fn update(&self, id: i32, data: &UpdateBook) -> AppResult<BookRecord> {
        sqlx::query_as::<_, BookRecord>(
            r#"
            UPDATE books
            SET title = COALESCE($1, title),
                description = COALESCE($2, description),
                published_year = COALESCE($3, published_year),
                author_id = COALESCE($4, author_id),
                category_id = COALESCE($5, category_id)
            WHERE id = $6
            RETURNING *
            "#,
        )
        .bind(data.title.as_deref())
        .bind(data.description.as_deref())
        .bind(data.published_year)
        .bind(data.author_id)
        .bind(data.category_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Delete a book by ID
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }
        Ok(())
    }

    /// Record the relative path of an uploaded cover image
    pub async fn set_cover(&self, id: i32, path: &str) -> AppResult<BookRecord> {
        sqlx::query_as::<_, BookRecord>(
            "UPDATE books SET cover_image = $1 WHERE id = $2 RETURNING *",
        )
        .bind(path)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }
}
