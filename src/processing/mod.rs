pub mod animation;
pub mod noise;
pub mod still;

use std::path::Path;

use crate::error::{Result, WashError};

pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

/// Container format, decided by the input file's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WashFormat {
    Jpeg,
    Png,
    Gif,
}

impl WashFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("jpg" | "jpeg") => Ok(WashFormat::Jpeg),
            Some("png") => Ok(WashFormat::Png),
            Some("gif") => Ok(WashFormat::Gif),
            Some(other) => Err(WashError::UnsupportedFormat(format!(".{other}"))),
            None => Err(WashError::UnsupportedFormat("missing file extension".into())),
        }
    }

    pub fn is_supported(path: &Path) -> bool {
        Self::from_path(path).is_ok()
    }

    /// Whether washed output carries a synthesized EXIF block.
    pub fn embeds_metadata(self) -> bool {
        matches!(self, WashFormat::Jpeg)
    }
}
