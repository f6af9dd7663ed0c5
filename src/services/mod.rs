//! Business logic services

pub mod authors;
pub mod books;
pub mod categories;
pub mod covers;

use crate::{config::StorageConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub authors: authors::AuthorsService,
    pub categories: categories::CategoriesService,
    pub books: books::BooksService,
    pub covers: covers::CoversService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, storage: StorageConfig) -> Self {
        Self {
            authors: authors::AuthorsService::new(repository.clone()),
            categories: categories::CategoriesService::new(repository.clone()),
            books: books::BooksService::new(repository.clone()),
            covers: covers::CoversService::new(repository, storage),
        }
    }
}
