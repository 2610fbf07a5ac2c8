use thiserror::Error;

/// Failure taxonomy shared by every crate in the workspace.
///
/// Backend timeouts and refused connections are absent on purpose: the
/// generation client turns those into a degraded answer instead of an error.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid query: {0}")]
    Validation(String),

    #[error("Corpus fetch failed: {0}")]
    UpstreamFetch(String),

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
