//! Seams between the pipeline and its remote collaborators.
//!
//! The concrete reqwest clients implement these; tests substitute
//! in-memory fakes. Construction-time injection replaces the lazy
//! module loading the original system used to break dependency cycles.

use crate::error::Result;
use crate::types::{ArtifactPointer, MergeOutcome, MergeRequest, RenderRequest, RenderResult};
use async_trait::async_trait;
use cardpress_types::{FinalArtifact, GenerationJob};

/// Remote rendering function: renders one chunk, merges artifact sets
#[async_trait]
pub trait RenderBackend: Send + Sync {
    /// Render one chunk. Exactly one invocation attempt; the caller
    /// owns the retry budget.
    async fn render_chunk(&self, request: &RenderRequest) -> Result<RenderResult>;

    /// Concatenate the ordered artifacts into one document
    async fn merge(&self, request: &MergeRequest) -> Result<MergeOutcome>;
}

/// Durable store holding intermediate chunk artifacts
#[async_trait]
pub trait ArtifactStorage: Send + Sync {
    async fn download(&self, pointer: &ArtifactPointer) -> Result<Vec<u8>>;

    async fn upload(&self, key: &str, bytes: Vec<u8>) -> Result<ArtifactPointer>;

    async fn delete(&self, key: &str) -> Result<()>;

    /// Delete every listed key, logging failures as warnings.
    ///
    /// Best-effort by contract: never returns an error, never aborts
    /// the loop, so callers can invoke it on any exit path.
    async fn cleanup_keys_best_effort(&self, keys: &[String]) {
        for key in keys {
            if let Err(err) = self.delete(key).await {
                log::warn!("Failed to delete intermediate artifact '{}': {}", key, err);
            }
        }
    }
}

/// Completion callback invoked once the final artifact is written
#[async_trait]
pub trait CompletionHandler: Send + Sync {
    async fn job_completed(&self, job: &GenerationJob, artifact: &FinalArtifact) -> Result<()>;
}
