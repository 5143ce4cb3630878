use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid host: {0:?}")]
    InvalidHost(String),

    #[error("Scheduler error: {0}")]
    Scheduler(String),

    #[error("Monitor registry has been shut down")]
    ShutDown,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}
