//! The chunked generation pipeline

pub mod cleanup;
pub mod coordinator;
pub mod generator;
pub mod invoker;
pub mod merger;
pub mod planner;
pub mod postprocess;
pub mod traits;

pub use cleanup::ArtifactTracker;
pub use coordinator::FanOutCoordinator;
pub use generator::DocumentGenerator;
pub use invoker::RenderInvoker;
pub use merger::{AssembledDocument, Merger};
pub use traits::{ArtifactStorage, CompletionHandler, RenderBackend};
