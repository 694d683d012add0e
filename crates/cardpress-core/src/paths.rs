//! Output file naming for final and temporary artifacts

use crate::constants::TEMP_KEY_PREFIX;
use cardpress_types::GenerationJob;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// Final artifact path: `{output_dir}/{subdir}/{prefix}_{timestamp}_{label}.pdf`.
///
/// The timestamp keeps re-runs of the same job from colliding.
pub fn final_artifact_path(
    output_dir: &Path,
    prefix: &str,
    job: &GenerationJob,
    generated_at: DateTime<Utc>,
) -> PathBuf {
    let file_name = format!(
        "{}_{}_{}.pdf",
        prefix,
        generated_at.format("%Y%m%d%H%M%S"),
        sanitize_label(&job.label),
    );
    output_dir.join(&job.output_subdir).join(file_name)
}

/// Store key for one chunk's intermediate artifact:
/// `temp_{chunkStartOffset}_{finalFilename}` plus a random suffix so
/// parallel re-runs never overwrite each other.
pub fn chunk_temp_key(item_start: u32, final_file_name: &str) -> String {
    format!(
        "{}_{}_{}-{}",
        TEMP_KEY_PREFIX,
        item_start,
        final_file_name,
        uuid::Uuid::new_v4().simple(),
    )
}

fn sanitize_label(label: &str) -> String {
    label
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect()
}
