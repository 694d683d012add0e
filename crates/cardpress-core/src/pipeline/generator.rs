//! Job orchestration: plan, fan out, merge, post-process, persist,
//! clean up, signal completion.

use crate::clients::{ArtifactStoreClient, RenderFunctionClient};
use crate::config::CardpressConfig;
use crate::constants::{PRINT_BLEED_MM, RENDER_BACKOFF_STEP_MS};
use crate::dimensions;
use crate::error::{CardpressError, Result};
use crate::paths;
use crate::pipeline::cleanup::ArtifactTracker;
use crate::pipeline::coordinator::FanOutCoordinator;
use crate::pipeline::invoker::RenderInvoker;
use crate::pipeline::merger::Merger;
use crate::pipeline::planner;
use crate::pipeline::postprocess;
use crate::pipeline::traits::{ArtifactStorage, CompletionHandler, RenderBackend};
use crate::retry::RetryPolicy;
use cardpress_types::{FinalArtifact, GenerationJob};
use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub struct DocumentGenerator {
    config: CardpressConfig,
    backend: Arc<dyn RenderBackend>,
    storage: Arc<dyn ArtifactStorage>,
    completion: Option<Arc<dyn CompletionHandler>>,
}

impl DocumentGenerator {
    /// Build a generator over injected backends; tests use this with fakes
    pub fn new(
        config: CardpressConfig,
        backend: Arc<dyn RenderBackend>,
        storage: Arc<dyn ArtifactStorage>,
    ) -> Self {
        Self {
            config,
            backend,
            storage,
            completion: None,
        }
    }

    /// Build a generator with the production HTTP clients
    pub fn from_config(config: CardpressConfig) -> Self {
        let backend = Arc::new(RenderFunctionClient::new(config.render.clone()));
        let storage = Arc::new(ArtifactStoreClient::new(config.storage.clone()));
        Self::new(config, backend, storage)
    }

    pub fn with_completion_handler(mut self, handler: Arc<dyn CompletionHandler>) -> Self {
        self.completion = Some(handler);
        self
    }

    /// Run one job to completion. All-or-nothing: either the final
    /// artifact is on disk, or nothing was written. Every intermediate
    /// artifact produced along the way is deleted on both paths.
    pub async fn generate(&self, job: &GenerationJob) -> Result<FinalArtifact> {
        log::info!(
            "Starting generation job '{}': {} items, template {}",
            job.label,
            job.total_items,
            job.template_kind.as_str()
        );

        let tracker = ArtifactTracker::new();
        let budget = Duration::from_secs(self.config.limits.job_timeout_secs);

        let outcome = match tokio::time::timeout(budget, self.run(job, &tracker)).await {
            Ok(result) => result,
            Err(_) => Err(CardpressError::Timeout(format!(
                "job '{}' exceeded {}s budget",
                job.label, self.config.limits.job_timeout_secs
            ))),
        };

        // Intermediates are deleted whether the job succeeded or not
        tracker.cleanup(self.storage.as_ref()).await;

        let artifact = outcome?;

        log::info!(
            "Job '{}' complete: {} pages, {} bytes at {}",
            job.label,
            artifact.page_count,
            artifact.size_bytes,
            artifact.path.display()
        );

        if let Some(handler) = &self.completion {
            if let Err(err) = handler.job_completed(job, &artifact).await {
                log::error!("Completion handler failed for job '{}': {}", job.label, err);
            }
        }

        Ok(artifact)
    }

    async fn run(&self, job: &GenerationJob, tracker: &ArtifactTracker) -> Result<FinalArtifact> {
        let layout = job.template_kind.layout();
        let page_dims = dimensions::page_dimensions(job.template_kind, job.region);
        let chunks = planner::plan_chunks(
            job.total_items,
            layout,
            self.config.limits.max_pages_per_chunk,
        )?;

        log::info!(
            "Planned {} chunks ({} total pages)",
            chunks.len(),
            planner::total_pages(job.total_items, layout)
        );

        let generated_at = Utc::now();
        let final_path = paths::final_artifact_path(
            Path::new(&self.config.output.dir),
            &self.config.output.prefix,
            job,
            generated_at,
        );
        let final_file_name = final_path
            .file_name()
            .and_then(|n| n.to_str())
            .expect("final path always has a UTF-8 file name")
            .to_string();

        let invoker = RenderInvoker::new(
            self.backend.clone(),
            self.config.render.source_base_url.clone(),
        )
        .with_retry(RetryPolicy::linear(
            self.config.limits.render_attempts,
            Duration::from_millis(RENDER_BACKOFF_STEP_MS),
        ));

        let coordinator = FanOutCoordinator::new(
            Arc::new(invoker),
            self.config.limits.max_concurrent_renders as usize,
        );

        let results = coordinator.run(job, &chunks, page_dims, tracker).await?;

        let merger = Merger::new(self.backend.clone(), self.storage.clone());
        let assembled = merger
            .assemble(&chunks, results, &final_file_name, tracker)
            .await?;

        let mut document =
            postprocess::resize_pages(&assembled.bytes, page_dims.width_mm, page_dims.height_mm)?;

        if job.template_kind.is_print() {
            document = postprocess::add_bleed(&document, PRINT_BLEED_MM)?;
        }

        let page_count = match assembled.page_count {
            Some(count) => count,
            None => postprocess::page_count(&document)?,
        };

        if let Some(parent) = final_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&final_path, &document)?;

        Ok(FinalArtifact {
            size_bytes: document.len() as u64,
            path: final_path,
            page_count,
            generated_at,
        })
    }
}
