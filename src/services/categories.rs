//! Categories service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::category::{Category, CreateCategory, UpdateCategory},
    repository::Repository,
};

#[derive(Clone)]
pub struct CategoriesService {
    repository: Repository,
}

impl CategoriesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List categories
    pub async fn list(&self, skip: i64, limit: i64) -> AppResult<Vec<Category>> {
        let rows = self.repository.categories.list(skip, limit).await?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    /// Get category by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Category> {
        Ok(self.repository.categories.get_by_id(id).await?.into())
    }

    /// Create a category, enforcing name uniqueness
    pub async fn create(&self, data: &CreateCategory) -> AppResult<Category> {
        data.validate()?;
        if self
            .repository
            .categories
            .name_exists(&data.name, None)
            .await?
        {
            return Err(AppError::Conflict(format!(
                "Category with name '{}' already exists",
                data.name
            )));
        }
        let row = self
            .repository
            .categories
            .create(&data.name, data.description.as_deref())
            .await?;
        Ok(row.into())
    }

    /// Update a category; only supplied fields change. A supplied name that
    /// collides with a different category is a conflict.
    pub async fn update(&self, id: i32, data: &UpdateCategory) -> AppResult<Category> {
        data.validate()?;
        let current = self.repository.categories.get_by_id(id).await?;

        if let Some(ref name) = data.name {
            if *name != current.name
                && self
                    .repository
                    .categories
                    .name_exists(name, Some(id))
                    .await?
            {
                return Err(AppError::Conflict(format!(
                    "Category with name '{}' already exists",
                    name
                )));
            }
        }

        let row = self
            .repository
            .categories
            .update(id, data.name.as_deref(), data.description.as_deref())
            .await?;
        Ok(row.into())
    }

    /// Delete a category, refusing while books still reference it
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.categories.get_by_id(id).await?;

        let referencing = self.repository.categories.count_books(id).await?;
        if referencing > 0 {
            return Err(AppError::Conflict(format!(
                "Cannot delete category {}: {} book(s) still reference it",
                id, referencing
            )));
        }

        self.repository.categories.delete(id).await
    }
}
