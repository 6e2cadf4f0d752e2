use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpriteError {
    #[error("Cannot {0} an animation with no frames")]
    EmptySequence(&'static str),

    #[error("Invalid frame duration: {0}ms (must be greater than zero)")]
    InvalidDuration(u32),

    #[error("Loop index {index} out of range for {len} frame(s)")]
    InvalidLoopIndex { index: usize, len: usize },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid sprite sheet: {0}")]
    InvalidSheet(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Encoding error: {0}")]
    EncodingError(String),

    #[error("Decoding error: {0}")]
    DecodingError(String),
}

pub type SpriteResult<T> = Result<T, SpriteError>;
