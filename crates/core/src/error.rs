/// Domain error taxonomy shared across the threadlock crates.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("No active lock for thread {0}")]
    NotLocked(String),

    #[error("Malformed lock state: {0}")]
    MalformedState(String),
}
