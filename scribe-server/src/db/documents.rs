//! Document and image database operations
//!
//! Tracks ingested documents and the images extracted from them. The
//! description columns feed the LLM prompt context: document descriptions
//! are rendered as a numbered block whose exact shape the prompt
//! templates depend on, so the formatting here must not drift.

use std::path::Path;

use chrono::Utc;
use sqlx::SqlitePool;

use super::error::{self, DbError};
use super::sql;

/// Derive the extension (with its leading dot) from a file name
///
/// A name with no dot, or only a leading dot (`.env`), has no extension.
fn split_extension(name: &str) -> String {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name[idx..].to_string(),
        _ => String::new(),
    }
}

/// Database interface for documents and their images
#[derive(Clone)]
pub struct DocumentDb {
    pool: SqlitePool,
}

impl DocumentDb {
    /// Create a new DocumentDb instance
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Record an ingested document
    ///
    /// Name and extension are derived from the storage path's basename.
    /// Returns the new document's ID.
    pub async fn insert_document(
        &self,
        path: &str,
        description: &str,
        vectorized: bool,
    ) -> Result<i64, DbError> {
        const OP: &str = "insert_document";

        let name = Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = split_extension(&name);
        let uploaded_at = Utc::now().to_rfc3339();

        let result = sqlx::query(sql::SQL_INSERT_DOCUMENT)
            .bind(&name)
            .bind(&extension)
            .bind(path)
            .bind(description)
            .bind(vectorized)
            .bind(&uploaded_at)
            .execute(&self.pool)
            .await
            .map_err(|e| error::fault(OP, e))?;

        let document_id = result.last_insert_rowid();
        tracing::debug!(op = OP, document_id, name = %name, "document inserted");
        Ok(document_id)
    }

    /// Get a document's storage path
    ///
    /// # Errors
    ///
    /// `NotFound` if the document does not exist.
    pub async fn get_document_path(&self, document_id: i64) -> Result<String, DbError> {
        const OP: &str = "get_document_path";

        let path: Option<String> = sqlx::query_scalar(sql::SQL_SELECT_DOCUMENT_PATH)
            .bind(document_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| error::fault(OP, e))?;

        path.ok_or_else(|| {
            tracing::debug!(op = OP, document_id, "document does not exist");
            DbError::NotFound
        })
    }

    /// Mark a document's embeddings as upserted
    ///
    /// # Errors
    ///
    /// `NotFound` if the document does not exist.
    pub async fn mark_vectorized(&self, document_id: i64) -> Result<(), DbError> {
        const OP: &str = "mark_vectorized";

        let result = sqlx::query(sql::SQL_MARK_DOCUMENT_VECTORIZED)
            .bind(document_id)
            .execute(&self.pool)
            .await
            .map_err(|e| error::fault(OP, e))?;

        if result.rows_affected() == 0 {
            tracing::debug!(op = OP, document_id, "document does not exist");
            return Err(DbError::NotFound);
        }
        tracing::debug!(op = OP, document_id, "document marked vectorized");
        Ok(())
    }

    /// Render all document descriptions as the numbered context block
    ///
    /// Each entry is `"Document N: <description>\n"`, joined with a
    /// newline. The consuming prompt template expects exactly this shape;
    /// an empty catalogue renders as an empty string.
    pub async fn get_all_doc_descriptions(&self) -> Result<String, DbError> {
        const OP: &str = "get_all_doc_descriptions";

        let descriptions: Vec<String> = sqlx::query_scalar(sql::SQL_SELECT_DOC_DESCRIPTIONS)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| error::fault(OP, e))?;

        Ok(descriptions
            .iter()
            .enumerate()
            .map(|(i, description)| format!("Document {}: {}\n", i + 1, description))
            .collect::<Vec<_>>()
            .join("\n"))
    }

    /// Record an image extracted from a document
    ///
    /// The insert's foreign key doubles as the existence check: an
    /// unknown document reads back as `NotFound` and no row is persisted.
    pub async fn insert_image(
        &self,
        document_id: i64,
        name: &str,
        extension: &str,
        path: &str,
        description: &str,
        page_no: i64,
    ) -> Result<i64, DbError> {
        const OP: &str = "insert_image";

        let timestamp = Utc::now().to_rfc3339();

        let result = sqlx::query(sql::SQL_INSERT_IMAGE)
            .bind(document_id)
            .bind(name)
            .bind(extension)
            .bind(path)
            .bind(description)
            .bind(page_no)
            .bind(&timestamp)
            .execute(&self.pool)
            .await
            .map_err(|e| error::fault_missing_ref(OP, e))?;

        let image_id = result.last_insert_rowid();
        tracing::debug!(op = OP, image_id, document_id, "image inserted");
        Ok(image_id)
    }

    /// Get an image's storage path
    ///
    /// # Errors
    ///
    /// `NotFound` if the image does not exist.
    pub async fn get_image_path(&self, image_id: i64) -> Result<String, DbError> {
        const OP: &str = "get_image_path";

        let path: Option<String> = sqlx::query_scalar(sql::SQL_SELECT_IMAGE_PATH)
            .bind(image_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| error::fault(OP, e))?;

        path.ok_or_else(|| {
            tracing::debug!(op = OP, image_id, "image does not exist");
            DbError::NotFound
        })
    }

    /// Get every image description keyed by image ID
    pub async fn get_all_image_descriptions(&self) -> Result<Vec<(i64, String)>, DbError> {
        sqlx::query_as(sql::SQL_SELECT_IMAGE_DESCRIPTIONS)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| error::fault("get_all_image_descriptions", e))
    }

    /// Delete a document and its images
    ///
    /// Images first, then the document row, one transaction.
    pub async fn delete_document(&self, document_id: i64) -> Result<(), DbError> {
        const OP: &str = "delete_document";

        let mut tx = self.pool.begin().await.map_err(|e| error::fault(OP, e))?;

        sqlx::query(sql::SQL_DELETE_IMAGES_FOR_DOCUMENT)
            .bind(document_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| error::fault(OP, e))?;

        let result = sqlx::query(sql::SQL_DELETE_DOCUMENT)
            .bind(document_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| error::fault(OP, e))?;

        if result.rows_affected() == 0 {
            tracing::debug!(op = OP, document_id, "document does not exist");
            return Err(DbError::NotFound);
        }

        tx.commit().await.map_err(|e| error::fault(OP, e))?;

        tracing::debug!(op = OP, document_id, "document deleted");
        Ok(())
    }

    /// Count images belonging to a document
    #[cfg(test)]
    pub async fn count_images(&self, document_id: i64) -> i64 {
        sqlx::query_scalar(sql::SQL_COUNT_IMAGES_FOR_DOCUMENT)
            .bind(document_id)
            .fetch_one(&self.pool)
            .await
            .expect("count query failed")
    }
}
