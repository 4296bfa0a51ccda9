//! Image store client

use async_trait::async_trait;
use serde::Deserialize;
use shared::error::AppError;

/// A stored image: the serving URL plus the store's handle for deletion
#[derive(Debug, Clone, Deserialize)]
pub struct StoredImage {
    pub url: String,
    pub public_id: String,
}

/// Remote image storage
///
/// Upload failures abort the surrounding operation; deletes are best effort
/// and callers may ignore the result.
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn upload(&self, local_path: &str) -> Result<StoredImage, AppError>;
    async fn delete(&self, public_id: &str) -> Result<(), AppError>;
}

/// HTTP-backed image store
#[derive(Clone)]
pub struct HttpImageStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpImageStore {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }
}

#[async_trait]
impl ImageStore for HttpImageStore {
    async fn upload(&self, local_path: &str) -> Result<StoredImage, AppError> {
        let bytes = tokio::fs::read(local_path)
            .await
            .map_err(|e| AppError::upload(format!("Cannot read image {local_path}: {e}")))?;

        let response = self
            .client
            .post(format!("{}/upload", self.base_url))
            .body(bytes)
            .send()
            .await
            .map_err(|e| AppError::upload(format!("Image upload failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::upload(format!(
                "Image upload rejected: {}",
                response.status()
            )));
        }

        response
            .json::<StoredImage>()
            .await
            .map_err(|e| AppError::upload(format!("Invalid image store response: {e}")))
    }

    async fn delete(&self, public_id: &str) -> Result<(), AppError> {
        let response = self
            .client
            .delete(format!("{}/images/{public_id}", self.base_url))
            .send()
            .await
            .map_err(|e| AppError::upload(format!("Image delete failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::upload(format!(
                "Image delete rejected: {}",
                response.status()
            )));
        }
        Ok(())
    }
}
