//! Error types for CueTone

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CueToneError {
    #[error("Audio device error: {0}")]
    AudioDevice(String),

    #[error("Audio format error: {0}")]
    AudioFormat(String),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid tone: {0}")]
    InvalidTone(String),
}

pub type Result<T> = std::result::Result<T, CueToneError>;
