//! Client modules for remote services

pub mod render;
pub mod storage;

// Re-export all client types
pub use render::RenderFunctionClient;
pub use storage::ArtifactStoreClient;
