//! Internal pipeline types

use serde::{Deserialize, Serialize};

/// One contiguous item range rendered by a single remote invocation.
///
/// `chunk_index` defines the final document order; `item_end` is inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlan {
    pub chunk_index: u32,
    pub item_start: u32,
    pub item_end: u32,
}

impl ChunkPlan {
    pub fn item_count(&self) -> u32 {
        self.item_end - self.item_start + 1
    }
}

/// Physical page geometry handed to the render function
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDimensions {
    pub width_mm: f64,
    pub height_mm: f64,
    pub margins_mm: f64,
}

/// Reference to an artifact the render function wrote to durable storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactPointer {
    pub store: String,
    pub key: String,
    pub size: u64,
}

/// Outcome of one chunk render.
///
/// Exactly one of the two shapes per chunk: small payloads come back
/// inline, larger ones are written to the store by the render function
/// itself and referenced by pointer.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderResult {
    Inline(Vec<u8>),
    Pointer(ArtifactPointer),
}

impl RenderResult {
    pub fn pointer(&self) -> Option<&ArtifactPointer> {
        match self {
            RenderResult::Pointer(p) => Some(p),
            RenderResult::Inline(_) => None,
        }
    }
}

/// Request body for one chunk render invocation
#[derive(Debug, Clone, Serialize)]
pub struct RenderRequest {
    /// Source page URL, parameterized by item range and job flags
    pub url: String,
    pub options: RenderOptions,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOptions {
    #[serde(flatten)]
    pub dimensions: PageDimensions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_ranges: Option<String>,
}

/// Request body for the remote merge operation.
///
/// `keys` must preserve chunk order. `delete_sources_after` asks the
/// merge function to delete its inputs; the pipeline deletes them
/// independently as well.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeRequest {
    pub operation: &'static str,
    pub keys: Vec<String>,
    pub delete_sources_after: bool,
}

impl MergeRequest {
    pub fn new(keys: Vec<String>, delete_sources_after: bool) -> Self {
        Self {
            operation: "merge",
            keys,
            delete_sources_after,
        }
    }
}

/// Response of the remote merge operation
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeOutcome {
    pub pointer_key: String,
    pub size: u64,
    pub page_count: u32,
}
