use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::error;
use crate::modules::file_upload::{
    model::{NewFile, UploadConfig},
    repository::FileRepository,
    schema::{FileEntity, FileUploadResponse},
};

#[derive(Clone)]
pub struct FileUploadService<R>
where
    R: FileRepository + Send + Sync,
{
    file_repo: Arc<R>,
    config: UploadConfig,
}

impl<R> FileUploadService<R>
where
    R: FileRepository + Send + Sync,
{
    pub fn new(file_repo: Arc<R>, config: UploadConfig) -> Self {
        Self { file_repo, config }
    }

    pub fn with_defaults(file_repo: Arc<R>) -> Self {
        Self::new(file_repo, UploadConfig::default())
    }

    fn validate_file(&self, file_size: usize, mime_type: &str) -> Result<(), error::SystemError> {
        if file_size > self.config.max_file_size {
            return Err(error::SystemError::bad_request(format!(
                "File size exceeds maximum allowed size of {} bytes",
                self.config.max_file_size
            )));
        }

        if !self.config.allowed_mime_types.iter().any(|m| m == mime_type) {
            return Err(error::SystemError::bad_request(format!(
                "File type '{}' is not allowed",
                mime_type
            )));
        }

        Ok(())
    }

    /// Unique filename keeping the original extension.
    fn generate_filename(&self, original_filename: &str) -> String {
        let extension =
            Path::new(original_filename).extension().and_then(|ext| ext.to_str()).unwrap_or("");
        let uuid = Uuid::now_v7();
        if extension.is_empty() {
            uuid.to_string()
        } else {
            format!("{}.{}", uuid, extension)
        }
    }

    async fn save_file(&self, filename: &str, bytes: &[u8]) -> Result<String, error::SystemError> {
        tokio::fs::create_dir_all(&self.config.upload_dir).await?;

        let file_path = format!("{}/{}", self.config.upload_dir, filename);
        tokio::fs::write(&file_path, bytes).await?;

        Ok(file_path)
    }

    pub async fn upload_file(
        &self,
        original_filename: String,
        bytes: Vec<u8>,
        mime_type: String,
        uploaded_by: Uuid,
    ) -> Result<FileUploadResponse, error::SystemError> {
        let file_size = bytes.len();

        self.validate_file(file_size, &mime_type)?;

        let filename = self.generate_filename(&original_filename);
        let storage_path = self.save_file(&filename, &bytes).await?;

        let new_file = NewFile {
            filename,
            original_filename,
            mime_type,
            file_size: file_size as i64,
            storage_path,
            uploaded_by,
        };

        let file_entity = self.file_repo.create(&new_file).await?;

        let url = format!("{}/{}", self.config.base_url, file_entity.filename);
        Ok(FileUploadResponse {
            id: file_entity.id,
            filename: file_entity.filename,
            original_filename: file_entity.original_filename,
            mime_type: file_entity.mime_type,
            file_size: file_entity.file_size,
            url,
            created_at: file_entity.created_at,
        })
    }

    pub async fn get_file(&self, file_id: &Uuid) -> Result<Option<FileEntity>, error::SystemError> {
        self.file_repo.find_by_id(file_id).await
    }

    pub async fn delete_file(&self, file_id: &Uuid) -> Result<(), error::SystemError> {
        let file = self
            .file_repo
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("File not found"))?;

        // A missing file on disk is not fatal; the metadata row still goes.
        tokio::fs::remove_file(&file.storage_path).await.ok();

        self.file_repo.delete(file_id).await?;

        Ok(())
    }
}
