use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse config: {0}")]
    ConfigParse(#[from] ron::error::SpannedError),

    #[error("could not serialize: {0}")]
    Serialize(#[from] ron::Error),

    #[error("could not decode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, GameError>;
