use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("speed multiplier must be a finite number greater than zero, got {0}")]
    InvalidSpeed(f64),

    #[error("{body} angle must be a finite number, got {value}")]
    InvalidAngle { body: &'static str, value: f64 },

    #[error("frame rate must be at least 1 frame per second")]
    InvalidFrameRate,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    #[error("cannot open log file: {0}")]
    LogFile(std::io::Error),

    #[error("failed to initialize logging: {0}")]
    Logger(#[from] log::SetLoggerError),
}

pub type Result<T> = std::result::Result<T, AppError>;
