//! Fan-out coordination: warm-up render, bounded concurrent fan-out,
//! order-restoring collection.

use crate::error::{CardpressError, Result};
use crate::pipeline::cleanup::ArtifactTracker;
use crate::pipeline::invoker::RenderInvoker;
use crate::types::{ChunkPlan, PageDimensions, RenderResult};
use cardpress_types::GenerationJob;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Coordinator phases, in order of traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    WarmingUp,
    FanningOut,
    Collecting,
    Done,
    Failed,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::WarmingUp => "warming-up",
            Phase::FanningOut => "fanning-out",
            Phase::Collecting => "collecting",
            Phase::Done => "done",
            Phase::Failed => "failed",
        }
    }
}

pub struct FanOutCoordinator {
    invoker: Arc<RenderInvoker>,
    max_concurrent: usize,
}

impl FanOutCoordinator {
    pub fn new(invoker: Arc<RenderInvoker>, max_concurrent: usize) -> Self {
        Self {
            invoker,
            max_concurrent: max_concurrent.max(1),
        }
    }

    fn transition(&self, from: Phase, to: Phase) -> Phase {
        log::info!("Fan-out phase: {} -> {}", from.as_str(), to.as_str());
        to
    }

    /// Render every chunk and return results ordered by chunk index.
    ///
    /// Chunk 0 is rendered alone first: the render function is a
    /// cold-start-sensitive serverless unit, and one request both
    /// absorbs the cold start and fails fast before parallel spend.
    /// The rest run concurrently under the semaphore; the first
    /// permanent chunk failure fails the job and drops the in-flight
    /// siblings. Pointer-backed results are recorded in `tracker` as
    /// soon as they exist.
    pub async fn run(
        &self,
        job: &GenerationJob,
        chunks: &[ChunkPlan],
        dimensions: PageDimensions,
        tracker: &ArtifactTracker,
    ) -> Result<Vec<RenderResult>> {
        if chunks.is_empty() {
            return Err(CardpressError::InvalidJob(
                "cannot coordinate an empty chunk list".to_string(),
            ));
        }

        let mut phase = self.transition(Phase::Idle, Phase::WarmingUp);

        let warm_up = match self.render_one(job, &chunks[0], dimensions, tracker).await {
            Ok(result) => result,
            Err(err) => {
                self.transition(phase, Phase::Failed);
                return Err(err);
            }
        };

        phase = self.transition(phase, Phase::FanningOut);

        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let rest = futures::future::try_join_all(chunks[1..].iter().map(|chunk| {
            let semaphore = semaphore.clone();
            async move {
                let _permit = semaphore
                    .acquire()
                    .await
                    .expect("render semaphore closed");
                let result = self.render_one(job, chunk, dimensions, tracker).await?;
                Ok::<(u32, RenderResult), CardpressError>((chunk.chunk_index, result))
            }
        }))
        .await;

        phase = self.transition(phase, Phase::Collecting);

        let mut tagged = match rest {
            Ok(tagged) => tagged,
            Err(err) => {
                self.transition(phase, Phase::Failed);
                return Err(err);
            }
        };

        // Completion order is not document order
        tagged.sort_by_key(|(index, _)| *index);

        let mut ordered = Vec::with_capacity(chunks.len());
        ordered.push(warm_up);
        ordered.extend(tagged.into_iter().map(|(_, result)| result));

        self.transition(phase, Phase::Done);
        Ok(ordered)
    }

    async fn render_one(
        &self,
        job: &GenerationJob,
        chunk: &ChunkPlan,
        dimensions: PageDimensions,
        tracker: &ArtifactTracker,
    ) -> Result<RenderResult> {
        let result = self
            .invoker
            .render_chunk(job, chunk, dimensions)
            .await
            .map_err(|err| match err {
                fatal @ (CardpressError::BadInput(_)
                | CardpressError::InvalidJob(_)
                | CardpressError::UnsupportedTemplate(_)) => fatal,
                other => CardpressError::Render {
                    chunk: chunk.chunk_index,
                    message: other.to_string(),
                },
            })?;

        if let RenderResult::Pointer(pointer) = &result {
            tracker.record(pointer.key.clone());
        }

        Ok(result)
    }
}
