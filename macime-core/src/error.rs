//! Error types for the macime engine

use thiserror::Error;

use crate::engine::TimerToken;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Unknown key identifier: {0}")]
    UnknownKey(String),

    #[error("Malformed event: {0}")]
    MalformedEvent(String),

    #[error("Timer {token:?} no longer matches the armed deadline")]
    TimerRaceDetected { token: TimerToken },

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for errors raised while building a session from config
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidConfig(_) | Error::UnknownKey(_) | Error::ConfigParse(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
