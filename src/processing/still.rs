use std::{io::Cursor, path::Path};

use image::{
    DynamicImage, ImageEncoder, ImageError, ImageReader,
    codecs::{jpeg::JpegEncoder, png::PngEncoder},
};
use log::debug;

use crate::{
    error::{Result, WashError},
    image_utils::Frame,
    metadata::{MetadataRecord, exif::ExifWriter},
};

/// Decodes a single-frame image, sniffing the content rather than trusting
/// the extension.
pub fn decode(path: &Path) -> Result<Frame> {
    let image = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| WashError::Decode(ImageError::IoError(e)))?
        .decode()
        .map_err(WashError::Decode)?;

    debug!(
        "Decoded {} ({}x{}, {:?})",
        path.display(),
        image.width(),
        image.height(),
        image.color()
    );

    Ok(Frame::from_dynamic(image))
}

/// JPEG has no alpha channel, so RGBA frames are flattened first.
pub fn encode_jpeg(frame: Frame, quality: u8, metadata: &MetadataRecord) -> Result<Vec<u8>> {
    let image = match frame {
        Frame::Rgb(rgb) => DynamicImage::ImageRgb8(rgb),
        Frame::Rgba(rgba) => DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(rgba).to_rgb8()),
    };

    let mut buffer = Cursor::new(Vec::new());
    let mut encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder
        .set_exif_metadata(ExifWriter::to_tiff(metadata)?)
        .map_err(|e| WashError::Encode(ImageError::Unsupported(e)))?;
    image.write_with_encoder(encoder).map_err(WashError::Encode)?;

    Ok(buffer.into_inner())
}

pub fn encode_png(frame: Frame) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    let encoder = PngEncoder::new(&mut buffer);
    frame
        .into_dynamic()
        .write_with_encoder(encoder)
        .map_err(WashError::Encode)?;

    Ok(buffer.into_inner())
}
