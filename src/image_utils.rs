use std::path::Path;

use image::{DynamicImage, RgbImage, RgbaImage};

/// A decoded raster frame in one of the two layouts the perturber accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Rgb(RgbImage),
    Rgba(RgbaImage),
}

impl Frame {
    /// Normalises any decoded image to RGB or RGBA, keeping alpha when the
    /// source has it. Grayscale, 16-bit and float layouts are converted.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        match image {
            DynamicImage::ImageRgb8(rgb) => Frame::Rgb(rgb),
            DynamicImage::ImageRgba8(rgba) => Frame::Rgba(rgba),
            other if other.color().has_alpha() => Frame::Rgba(other.to_rgba8()),
            other => Frame::Rgb(other.to_rgb8()),
        }
    }

    pub fn into_dynamic(self) -> DynamicImage {
        match self {
            Frame::Rgb(rgb) => DynamicImage::ImageRgb8(rgb),
            Frame::Rgba(rgba) => DynamicImage::ImageRgba8(rgba),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Frame::Rgb(rgb) => rgb.dimensions(),
            Frame::Rgba(rgba) => rgba.dimensions(),
        }
    }

    pub fn channel_count(&self) -> u8 {
        match self {
            Frame::Rgb(_) => 3,
            Frame::Rgba(_) => 4,
        }
    }

    /// Red, green and blue of the pixel at `(x, y)`. Alpha is never exposed.
    pub fn color_channels_mut(&mut self, x: u32, y: u32) -> &mut [u8] {
        match self {
            Frame::Rgb(rgb) => &mut rgb.get_pixel_mut(x, y).0[..3],
            Frame::Rgba(rgba) => &mut rgba.get_pixel_mut(x, y).0[..3],
        }
    }

    pub fn as_raw(&self) -> &[u8] {
        match self {
            Frame::Rgb(rgb) => rgb.as_raw(),
            Frame::Rgba(rgba) => rgba.as_raw(),
        }
    }
}

/// Per-pixel comparison of two frames with identical shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelDifference {
    pub changed_pixels: usize,
    pub max_channel_delta: u8,
    /// Sum over pixels of each pixel's largest channel delta.
    pub total_delta: usize,
}

pub fn pixel_difference(before: &Frame, after: &Frame) -> Option<PixelDifference> {
    if before.dimensions() != after.dimensions()
        || before.channel_count() != after.channel_count()
    {
        return None;
    }

    let channels = before.channel_count() as usize;
    let mut difference = PixelDifference::default();

    for (a, b) in before
        .as_raw()
        .chunks_exact(channels)
        .zip(after.as_raw().chunks_exact(channels))
    {
        let delta = a
            .iter()
            .zip(b)
            .map(|(&x, &y)| x.abs_diff(y))
            .max()
            .unwrap_or(0);

        if delta > 0 {
            difference.changed_pixels += 1;
            difference.max_channel_delta = difference.max_channel_delta.max(delta);
            difference.total_delta += delta as usize;
        }
    }

    Some(difference)
}

pub fn rgb_to_rgba(image: &RgbImage) -> RgbaImage {
    let (width, height) = image.dimensions();
    let mut rgba = RgbaImage::new(width, height);

    for (x, y, pixel) in image.enumerate_pixels() {
        rgba.put_pixel(x, y, image::Rgba([pixel[0], pixel[1], pixel[2], 255]));
    }

    rgba
}

/// File name used in outcome messages, falling back to the full path.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
