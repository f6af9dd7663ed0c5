//! Books service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookQuery, CreateBook, UpdateBook},
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List books matching the given filters
    pub async fn list(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        let rows = self.repository.books.list(query).await?;
        Ok(rows.into_iter().map(Book::from).collect())
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        Ok(self.repository.books.get_by_id(id).await?.into())
    }

    /// Create a book; both foreign keys must reference existing rows
    pub async fn create(&self, data: &CreateBook) -> AppResult<Book> {
        data.validate()?;
        if !self.repository.authors.exists(data.author_id).await? {
            return Err(AppError::InvalidReference(format!(
                "Author with id {} does not exist",
                data.author_id
            )));
        }
        if !self.repository.categories.exists(data.category_id).await? {
            return Err(AppError::InvalidReference(format!(
                "Category with id {} does not exist",
                data.category_id
            )));
        }
        Ok(self.repository.books.create(data).await?.into())
    }

    /// Update a book; a supplied foreign key is re-validated only when it
    /// differs from the current value
    pub async fn update(&self, id: i32, data: &UpdateBook) -> AppResult<Book> {
        data.validate()?;
        let current = self.repository.books.get_by_id(id).await?;

        if let Some(author_id) = data.author_id {
            if author_id != current.author_id
                && !self.repository.authors.exists(author_id).await?
            {
                return Err(AppError::InvalidReference(format!(
                    "Author with id {} does not exist",
                    author_id
                )));
            }
        }
        if let Some(category_id) = data.category_id {
            if category_id != current.category_id
                && !self.repository.categories.exists(category_id).await?
            {
                return Err(AppError::InvalidReference(format!(
                    "Category with id {} does not exist",
                    category_id
                )));
            }
        }

        Ok(self.repository.books.update(id, data).await?.into())
    }

    /// Delete a book by ID
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await
    }
}
