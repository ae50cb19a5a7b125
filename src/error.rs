use thiserror::Error;

#[derive(Error, Debug)]
pub enum WashError {
    #[error("Image decoding error: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Image encoding error: {0}")]
    Encode(#[source] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Metadata error: {0}")]
    Metadata(String),

    #[error("Animation contains no frames")]
    EmptyAnimation,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, WashError>;
