//! Cardpress Core Library
//!
//! Chunked document-generation pipeline: turns a large templated card
//! collection into a single print-ready PDF by fanning chunks out to a
//! remote rendering function, merging the partial results, and applying
//! physical post-processing.

pub mod clients;
pub mod config;
pub mod constants;
pub mod dimensions;
pub mod error;
pub mod paths;
pub mod pipeline;
pub mod retry;
pub mod types;

// Re-export main types for easy access
pub use config::CardpressConfig;
pub use error::{CardpressError, Result};

// Re-export client types
pub use clients::{ArtifactStoreClient, RenderFunctionClient};

// Re-export pipeline types
pub use pipeline::{
    ArtifactStorage, ArtifactTracker, CompletionHandler, DocumentGenerator, FanOutCoordinator,
    Merger, RenderBackend, RenderInvoker,
};
pub use types::{
    ArtifactPointer, ChunkPlan, MergeOutcome, MergeRequest, PageDimensions, RenderRequest,
    RenderResult,
};
