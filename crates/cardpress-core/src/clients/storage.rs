//! HTTP client for the intermediate artifact store

use crate::config::ArtifactStoreConfig;
use crate::error::{CardpressError, Result};
use crate::pipeline::traits::ArtifactStorage;
use crate::types::ArtifactPointer;
use async_trait::async_trait;
use reqwest::Client as HttpClient;

pub struct ArtifactStoreClient {
    config: ArtifactStoreConfig,
    http_client: HttpClient,
}

impl ArtifactStoreClient {
    pub fn new(config: ArtifactStoreConfig) -> Self {
        let http_client = HttpClient::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            http_client,
        }
    }

    fn object_url(&self, store: &str, key: &str) -> String {
        format!("{}/{}/{}", self.config.base_url, store, key)
    }
}

#[async_trait]
impl ArtifactStorage for ArtifactStoreClient {
    async fn download(&self, pointer: &ArtifactPointer) -> Result<Vec<u8>> {
        let url = self.object_url(&pointer.store, &pointer.key);
        log::debug!("Downloading artifact {}", url);

        let response = self.http_client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(CardpressError::Storage(format!(
                "download of '{}' returned {}",
                pointer.key,
                response.status()
            )));
        }

        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }

    async fn upload(&self, key: &str, bytes: Vec<u8>) -> Result<ArtifactPointer> {
        let url = self.object_url(&self.config.store, key);
        let size = bytes.len() as u64;
        log::debug!("Uploading {} bytes to {}", size, url);

        let response = self
            .http_client
            .put(&url)
            .header("Content-Type", "application/pdf")
            .body(bytes)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CardpressError::Storage(format!(
                "upload of '{}' returned {}",
                key,
                response.status()
            )));
        }

        Ok(ArtifactPointer {
            store: self.config.store.clone(),
            key: key.to_string(),
            size,
        })
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let url = self.object_url(&self.config.store, key);
        log::debug!("Deleting artifact {}", url);

        let response = self.http_client.delete(&url).send().await?;
        let status = response.status();

        // Deleting an already-deleted key is not an error
        if !status.is_success() && status != reqwest::StatusCode::NOT_FOUND {
            return Err(CardpressError::Storage(format!(
                "delete of '{}' returned {}",
                key, status
            )));
        }

        Ok(())
    }
}
