use thiserror::Error;

/// Recoverable failures surfaced by the core. None of them is fatal; callers
/// log and fall back to a safe default.
#[derive(Debug, Error)]
pub enum SnapError {
    /// A required-setup accessor was used without its provider (wiring bug).
    #[error("{0} used without an active provider")]
    MissingContext(&'static str),
    /// Persisted settings could not be encoded or decoded.
    #[error("persisted settings: {0}")]
    Persist(#[from] serde_json::Error),
    /// The audio engine did not reach the running state.
    #[error("audio engine failed to start: {0}")]
    AudioStart(String),
}

pub type SnapResult<T> = Result<T, SnapError>;
