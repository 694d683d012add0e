//! Render invocation for a single chunk, with bounded retry

use crate::constants::{RENDER_BACKOFF_STEP_MS, RENDER_MAX_ATTEMPTS};
use crate::error::Result;
use crate::pipeline::traits::RenderBackend;
use crate::retry::RetryPolicy;
use crate::types::{ChunkPlan, PageDimensions, RenderOptions, RenderRequest, RenderResult};
use cardpress_types::GenerationJob;
use std::sync::Arc;
use std::time::Duration;

pub struct RenderInvoker {
    backend: Arc<dyn RenderBackend>,
    source_base_url: String,
    retry: RetryPolicy,
}

impl RenderInvoker {
    pub fn new(backend: Arc<dyn RenderBackend>, source_base_url: impl Into<String>) -> Self {
        Self {
            backend,
            source_base_url: source_base_url.into(),
            retry: RetryPolicy::linear(
                RENDER_MAX_ATTEMPTS,
                Duration::from_millis(RENDER_BACKOFF_STEP_MS),
            ),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Source page URL for one chunk, parameterized by item range and
    /// the job's template, variant and region flags
    pub fn source_url(&self, job: &GenerationJob, chunk: &ChunkPlan) -> String {
        format!(
            "{}/{}?from={}&to={}&variant={}&region={}",
            self.source_base_url,
            job.template_kind.as_str(),
            chunk.item_start,
            chunk.item_end,
            job.variant.as_str(),
            job.region.as_str(),
        )
    }

    /// Render one chunk, retrying transient failures.
    ///
    /// Throttling responses get the same linear backoff as every other
    /// transient failure; only definitive bad-input rejections bypass
    /// the retry budget.
    pub async fn render_chunk(
        &self,
        job: &GenerationJob,
        chunk: &ChunkPlan,
        dimensions: PageDimensions,
    ) -> Result<RenderResult> {
        let request = RenderRequest {
            url: self.source_url(job, chunk),
            options: RenderOptions {
                dimensions,
                page_ranges: None,
            },
        };

        let label = format!("render chunk {}", chunk.chunk_index);
        self.retry
            .run(&label, |attempt| {
                let request = &request;
                async move {
                    log::debug!(
                        "Rendering chunk {} (items {}..={}, attempt {})",
                        chunk.chunk_index,
                        chunk.item_start,
                        chunk.item_end,
                        attempt
                    );
                    self.backend.render_chunk(request).await
                }
            })
            .await
    }
}
