use thiserror::Error;

#[derive(Error, Debug)]
pub enum PenError {
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Unknown handle: {0:?}")]
    UnknownHandle(crate::entity::registry::Handle),

    #[error("Registry links corrupted: {0}")]
    CorruptLinks(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PenError>;
