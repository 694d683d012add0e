//! Configuration management for the generation pipeline

use crate::constants;
use crate::error::{CardpressError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardpressConfig {
    pub render: RenderFunctionConfig,
    pub storage: ArtifactStoreConfig,
    pub output: OutputConfig,

    #[serde(default)]
    pub limits: PipelineLimits,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderFunctionConfig {
    #[serde(alias = "url")]
    pub base_url: String,

    /// Base URL of the card source pages the render function loads
    pub source_base_url: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactStoreConfig {
    #[serde(alias = "url")]
    pub base_url: String,

    /// Store (bucket) name intermediate artifacts live in
    pub store: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub dir: String,

    #[serde(default = "default_output_prefix")]
    pub prefix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineLimits {
    #[serde(default = "default_max_pages_per_chunk")]
    pub max_pages_per_chunk: u32,

    #[serde(default = "default_max_concurrent_renders")]
    pub max_concurrent_renders: u32,

    #[serde(default = "default_render_attempts")]
    pub render_attempts: u32,

    #[serde(default = "default_job_timeout_secs")]
    pub job_timeout_secs: u64,
}

impl Default for PipelineLimits {
    fn default() -> Self {
        Self {
            max_pages_per_chunk: default_max_pages_per_chunk(),
            max_concurrent_renders: default_max_concurrent_renders(),
            render_attempts: default_render_attempts(),
            job_timeout_secs: default_job_timeout_secs(),
        }
    }
}

// Default functions
fn default_request_timeout_secs() -> u64 {
    60
}

fn default_output_prefix() -> String {
    "cards".to_string()
}

fn default_max_pages_per_chunk() -> u32 {
    constants::DEFAULT_MAX_PAGES_PER_CHUNK
}

fn default_max_concurrent_renders() -> u32 {
    constants::DEFAULT_MAX_CONCURRENT_RENDERS
}

fn default_render_attempts() -> u32 {
    constants::RENDER_MAX_ATTEMPTS
}

fn default_job_timeout_secs() -> u64 {
    constants::DEFAULT_JOB_TIMEOUT_SECS
}

impl CardpressConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CardpressError::Config(format!("Failed to read config file: {}", e)))?;

        Self::from_json_str(&content)
    }

    /// Load configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: CardpressConfig = serde_json::from_str(json)
            .map_err(|e| CardpressError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.render.base_url.is_empty() {
            return Err(CardpressError::Config(
                "Render function URL is required".to_string(),
            ));
        }

        if self.render.source_base_url.is_empty() {
            return Err(CardpressError::Config(
                "Card source base URL is required".to_string(),
            ));
        }

        if self.storage.base_url.is_empty() || self.storage.store.is_empty() {
            return Err(CardpressError::Config(
                "Artifact store URL and store name are required".to_string(),
            ));
        }

        if self.output.dir.is_empty() {
            return Err(CardpressError::Config(
                "Output directory is required".to_string(),
            ));
        }

        if self.limits.max_pages_per_chunk == 0 {
            return Err(CardpressError::Config(
                "max_pages_per_chunk must be positive".to_string(),
            ));
        }

        if self.limits.max_concurrent_renders == 0 || self.limits.render_attempts == 0 {
            return Err(CardpressError::Config(
                "Concurrency and retry limits must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
