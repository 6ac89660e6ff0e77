use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid trigger position: {0}")]
    InvalidTrigger(String),

    #[error("Invalid toggle action: {0}")]
    InvalidToggleAction(String),

    #[error("Unknown ease: {0}")]
    InvalidEase(String),

    #[error("Page error: {0}")]
    Page(String),
}

pub type Result<T> = std::result::Result<T, Error>;
