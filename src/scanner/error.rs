use thiserror::Error;

pub type ScanResult<T> = std::result::Result<T, ScanError>;

/// Failures surfaced by the scanning pipeline.
#[derive(Debug, Error)]
pub enum ScanError {
    /// No usable structural matcher binary on PATH.
    #[error("no structural matcher found in PATH (tried: {tried})")]
    MatcherUnavailable { tried: String },

    /// The matcher emitted something that is not a JSON match array.
    #[error("matcher output is not valid JSON: {0}")]
    MatcherOutputInvalid(#[from] serde_json::Error),

    /// The matcher subprocess failed outright.
    #[error("matcher exited with {status}: {stderr}")]
    MatcherFailed { status: String, stderr: String },

    /// Embedded rule documents could not be materialized.
    #[error("rule bundle corrupt: {0}")]
    RuleBundleCorrupt(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
