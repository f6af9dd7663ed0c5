//! Authors service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::author::{Author, CreateAuthor, UpdateAuthor},
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List authors
    pub async fn list(&self, skip: i64, limit: i64) -> AppResult<Vec<Author>> {
        let rows = self.repository.authors.list(skip, limit).await?;
        Ok(rows.into_iter().map(Author::from).collect())
    }

    /// Get author by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Author> {
        Ok(self.repository.authors.get_by_id(id).await?.into())
    }

    /// Create an author, enforcing name uniqueness
    pub async fn create(&self, data: &CreateAuthor) -> AppResult<Author> {
        data.validate()?;
        if self.repository.authors.name_exists(&data.name, None).await? {
            return Err(AppError::Conflict(format!(
                "Author with name '{}' already exists",
                data.name
            )));
        }
        let row = self
            .repository
            .authors
            .create(&data.name, data.bio.as_deref())
            .await?;
        Ok(row.into())
    }

    /// Update an author; only supplied fields change. A supplied name that
    /// collides with a different author is a conflict.
    pub async fn update(&self, id: i32, data: &UpdateAuthor) -> AppResult<Author> {
        data.validate()?;
        let current = self.repository.authors.get_by_id(id).await?;

        if let Some(ref name) = data.name {
            if *name != current.name
                && self.repository.authors.name_exists(name, Some(id)).await?
            {
                return Err(AppError::Conflict(format!(
                    "Author with name '{}' already exists",
                    name
                )));
            }
        }

        let row = self
            .repository
            .authors
            .update(id, data.name.as_deref(), data.bio.as_deref())
            .await?;
        Ok(row.into())
    }

    /// Delete an author, refusing while books still reference it
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.authors.get_by_id(id).await?;

        let referencing = self.repository.authors.count_books(id).await?;
        if referencing > 0 {
            return Err(AppError::Conflict(format!(
                "Cannot delete author {}: {} book(s) still reference it",
                id, referencing
            )));
        }

        self.repository.authors.delete(id).await
    }
}
