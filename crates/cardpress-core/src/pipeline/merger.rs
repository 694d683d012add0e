//! Assembly of ordered chunk results into one document

use crate::error::{CardpressError, Result};
use crate::paths;
use crate::pipeline::cleanup::ArtifactTracker;
use crate::pipeline::traits::{ArtifactStorage, RenderBackend};
use crate::types::{ArtifactPointer, ChunkPlan, MergeRequest, RenderResult};
use std::sync::Arc;

/// Assembled document plus the page count the merge function reported
/// (single-chunk jobs skip the merge and report no count)
pub struct AssembledDocument {
    pub bytes: Vec<u8>,
    pub page_count: Option<u32>,
}

pub struct Merger {
    backend: Arc<dyn RenderBackend>,
    storage: Arc<dyn ArtifactStorage>,
}

impl Merger {
    pub fn new(backend: Arc<dyn RenderBackend>, storage: Arc<dyn ArtifactStorage>) -> Self {
        Self { backend, storage }
    }

    /// Combine the ordered chunk results into one document.
    ///
    /// A single result passes through directly (downloaded when
    /// pointer-backed). Multiple results are normalized to storage
    /// pointers, merged remotely in chunk order, and the combined
    /// document is downloaded. Every pointer this produces is recorded
    /// in `tracker`; the merge request additionally asks the remote
    /// side to delete its sources.
    pub async fn assemble(
        &self,
        chunks: &[ChunkPlan],
        results: Vec<RenderResult>,
        final_file_name: &str,
        tracker: &ArtifactTracker,
    ) -> Result<AssembledDocument> {
        if chunks.len() != results.len() {
            return Err(CardpressError::Merge(format!(
                "chunk/result count mismatch: {} chunks, {} results",
                chunks.len(),
                results.len()
            )));
        }

        if results.len() == 1 {
            let bytes = match results.into_iter().next().expect("length checked") {
                RenderResult::Inline(bytes) => bytes,
                RenderResult::Pointer(pointer) => self.storage.download(&pointer).await?,
            };
            return Ok(AssembledDocument {
                bytes,
                page_count: None,
            });
        }

        // Normalize every result into a pointer, uploading inline
        // payloads under job-scoped temp keys
        let mut pointers: Vec<ArtifactPointer> = Vec::with_capacity(results.len());
        for (chunk, result) in chunks.iter().zip(results) {
            let pointer = match result {
                RenderResult::Pointer(pointer) => pointer,
                RenderResult::Inline(bytes) => {
                    let key = paths::chunk_temp_key(chunk.item_start, final_file_name);
                    let pointer = self.storage.upload(&key, bytes).await?;
                    tracker.record(pointer.key.clone());
                    pointer
                }
            };
            pointers.push(pointer);
        }

        let store = pointers[0].store.clone();
        let keys: Vec<String> = pointers.iter().map(|p| p.key.clone()).collect();

        log::info!("Merging {} chunk artifacts", keys.len());
        let outcome = self
            .backend
            .merge(&MergeRequest::new(keys, true))
            .await
            .map_err(|err| CardpressError::Merge(err.to_string()))?;

        tracker.record(outcome.pointer_key.clone());

        let merged = self
            .storage
            .download(&ArtifactPointer {
                store,
                key: outcome.pointer_key.clone(),
                size: outcome.size,
            })
            .await?;

        log::info!(
            "Merged document: {} pages, {} bytes",
            outcome.page_count,
            merged.len()
        );

        Ok(AssembledDocument {
            bytes: merged,
            page_count: Some(outcome.page_count),
        })
    }
}
