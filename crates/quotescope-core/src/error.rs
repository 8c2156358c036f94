use thiserror::Error;

/// All the ways things can go wrong in Quotescope
#[derive(Error, Debug)]
pub enum Error {
    #[error("API request failed: {0}")]
    ApiError(#[from] quotescope_api::ApiError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Controller is gone")]
    ControllerClosed,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
