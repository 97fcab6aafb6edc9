use thiserror::Error;

use settings::SettingsError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read spawn data: {0}")]
    Read(#[source] std::io::Error),
    #[error("failed to write spawn data: {0}")]
    Write(#[from] std::io::Error),
    #[error("failed to serialize spawn data: {0}")]
    Serialization(#[from] ron::Error),
    #[error("failed to parse spawn data: {0}")]
    Deserialization(#[from] ron::error::SpannedError),
    #[error("unsupported spawn data version {0}")]
    UnsupportedVersion(u32),
    #[error("malformed coordinate: {0}")]
    MalformedCoordinate(String),
}

/// Failures of an admin command. The message is what the sender sees.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("you do not have permission to use this command ({0})")]
    NoPermission(&'static str),
    #[error("this command can only be used by players")]
    PlayerOnly,
    #[error("usage: {0}")]
    InvalidSyntax(&'static str),
    #[error("invalid coordinates: '{0}'")]
    MalformedCoordinate(String),
    #[error("player '{0}' not found")]
    PlayerNotFound(String),
    #[error("world '{0}' not found")]
    WorldNotFound(String),
    #[error("a world must be named when no position is available")]
    WorldRequired,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// Failures while wiring up the engine from its files.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
