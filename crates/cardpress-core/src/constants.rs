/// Pipeline configuration constants

/// Millimetre to PDF point conversion factor
pub const MM_TO_PT: f64 = 2.83465;

/// Hard ceiling on pages rendered by one remote invocation.
/// Bounds both the response payload size and the invocation duration.
pub const DEFAULT_MAX_PAGES_PER_CHUNK: u32 = 100;

/// Render attempts per chunk before the chunk (and the job) fails
pub const RENDER_MAX_ATTEMPTS: u32 = 3;

/// Linear backoff step between render attempts, in milliseconds
pub const RENDER_BACKOFF_STEP_MS: u64 = 1000;

/// Concurrent render invocations after the warm-up chunk
pub const DEFAULT_MAX_CONCURRENT_RENDERS: u32 = 8;

/// Overall wall-clock budget for one job, in seconds
pub const DEFAULT_JOB_TIMEOUT_SECS: u64 = 900;

/// Bleed margin applied to printed card sheets, in millimetres
pub const PRINT_BLEED_MM: f64 = 3.0;

/// Prefix for temporary chunk artifacts in the store
pub const TEMP_KEY_PREFIX: &str = "temp";
