use thiserror::Error;

/// Errors surfaced by the fallible edges of the engine: config and save files,
/// and lookups driven by external input.
///
/// Programmer errors (declaring war under a peace treaty, touching an edge that
/// was never created) are not represented here; those panic.
#[derive(Debug, Error)]
pub enum DiplomacyError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("save version {found} is newer than the supported version {supported}")]
    UnsupportedSaveVersion { found: u32, supported: u32 },
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("unknown civilization: {0}")]
    UnknownCivilization(String),
}

pub type Result<T> = std::result::Result<T, DiplomacyError>;
