//! Cover image upload service

use std::path::PathBuf;

use uuid::Uuid;

use crate::{
    config::StorageConfig,
    error::{AppError, AppResult},
    models::book::Book,
    repository::Repository,
};

/// Declared content types accepted for cover uploads
const ALLOWED_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png"];

/// File extensions accepted for cover uploads
const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Maximum accepted cover size in bytes (2 MiB)
pub const MAX_COVER_BYTES: usize = 2 * 1024 * 1024;

#[derive(Clone)]
pub struct CoversService {
    repository: Repository,
    storage: StorageConfig,
}

impl CoversService {
    pub fn new(repository: Repository, storage: StorageConfig) -> Self {
        Self { repository, storage }
    }

    /// Validate and persist an uploaded cover image, then record its
    /// relative path on the book. The book is untouched when validation
    /// fails; if recording the path fails after the file was written, the
    /// orphaned file is removed best-effort.
    pub async fn upload(
        &self,
        book_id: i32,
        filename: &str,
        content_type: &str,
        data: &[u8],
    ) -> AppResult<Book> {
        self.repository.books.get_by_id(book_id).await?;

        let ext = validate_upload(filename, content_type, data.len())?;

        let cover_name = cover_filename(book_id, ext);
        let file_path = PathBuf::from(&self.storage.covers_dir).join(&cover_name);

        tokio::fs::write(&file_path, data)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to write cover file: {}", e)))?;

        let relative = format!(
            "{}/{}",
            self.storage.covers_dir.trim_end_matches('/'),
            cover_name
        );

        match self.repository.books.set_cover(book_id, &relative).await {
            Ok(record) => {
                tracing::info!("Stored cover {} for book {}", relative, book_id);
                Ok(record.into())
            }
            Err(e) => {
                if let Err(cleanup) = tokio::fs::remove_file(&file_path).await {
                    tracing::warn!(
                        "Failed to remove orphaned cover {}: {}",
                        file_path.display(),
                        cleanup
                    );
                }
                Err(e)
            }
        }
    }
}

/// Check declared content type, filename extension and payload size.
/// Returns the normalized extension on success.
fn validate_upload(filename: &str, content_type: &str, len: usize) -> AppResult<&'static str> {
    if !ALLOWED_CONTENT_TYPES.contains(&content_type) {
        return Err(AppError::InvalidUpload(
            "Invalid file type. Only jpg and png are allowed.".to_string(),
        ));
    }

    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    let ext = ALLOWED_EXTENSIONS
        .iter()
        .find(|allowed| **allowed == ext)
        .copied()
        .ok_or_else(|| {
            AppError::InvalidUpload(
                "Invalid file extension. Only .jpg and .png are allowed.".to_string(),
            )
        })?;

    if len > MAX_COVER_BYTES {
        return Err(AppError::InvalidUpload(
            "File size exceeds maximum limit of 2MB.".to_string(),
        ));
    }

    Ok(ext)
}

/// Collision-resistant cover filename: book id + random token + extension
fn cover_filename(book_id: i32, ext: &str) -> String {
    format!("book_{}_{}.{}", book_id, Uuid::new_v4().simple(), ext)
}
