use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FontError {
    #[error("gfd file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("unsupported gfd version: {0}")]
    UnsupportedVersion(String),
    #[error("unexpected end of data at offset {offset}")]
    UnexpectedEof { offset: u64 },
    #[error("malformed data: {0}")]
    MalformedData(String),
    #[error("invalid font size {0}, expected a positive finite value")]
    InvalidFontSize(f32),
    #[error("texture {index} not found: {path}")]
    MissingTexture { index: usize, path: PathBuf },
    #[error("failed to decode texture {path}: {source}")]
    TextureDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FontError {
    /// True for every decoding failure caused by truncated or inconsistent input.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            FontError::UnexpectedEof { .. } | FontError::MalformedData(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, FontError>;
