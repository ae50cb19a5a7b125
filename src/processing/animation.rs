use std::{fs::File, io::BufReader, path::Path};

use image::{
    AnimationDecoder, Delay, DynamicImage, ImageError,
    codecs::gif::{GifDecoder, GifEncoder, Repeat},
};
use log::debug;

use crate::{
    error::{Result, WashError},
    image_utils::{Frame, rgb_to_rgba},
};

/// One frame of an animation together with its display time.
#[derive(Debug, Clone)]
pub struct TimedFrame {
    pub frame: Frame,
    pub delay: Delay,
}

impl TimedFrame {
    pub fn map_frame(self, f: impl FnOnce(Frame) -> Frame) -> Self {
        Self {
            frame: f(self.frame),
            delay: self.delay,
        }
    }
}

/// Decodes every frame of a GIF as composited RGB. Alpha and palette
/// information are dropped. Frames without a delay get `default_delay_ms`.
pub fn decode(path: &Path, default_delay_ms: u32) -> Result<Vec<TimedFrame>> {
    let file = File::open(path).map_err(|e| WashError::Decode(ImageError::IoError(e)))?;
    let decoder = GifDecoder::new(BufReader::new(file)).map_err(WashError::Decode)?;
    let frames = decoder
        .into_frames()
        .collect_frames()
        .map_err(WashError::Decode)?;

    if frames.is_empty() {
        return Err(WashError::EmptyAnimation);
    }

    debug!("Decoded {} frames from {}", frames.len(), path.display());

    Ok(frames
        .into_iter()
        .map(|frame| {
            let delay = with_default_delay(frame.delay(), default_delay_ms);
            let rgb = DynamicImage::ImageRgba8(frame.into_buffer()).to_rgb8();
            TimedFrame {
                frame: Frame::Rgb(rgb),
                delay,
            }
        })
        .collect())
}

/// Encodes frames in order as an infinitely looping GIF.
pub fn encode(frames: Vec<TimedFrame>) -> Result<Vec<u8>> {
    if frames.is_empty() {
        return Err(WashError::EmptyAnimation);
    }

    let mut buffer = Vec::new();
    {
        let mut encoder = GifEncoder::new(&mut buffer);
        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(WashError::Encode)?;

        let frames = frames.into_iter().map(|timed| {
            let rgba = match timed.frame {
                Frame::Rgb(rgb) => rgb_to_rgba(&rgb),
                Frame::Rgba(rgba) => rgba,
            };
            image::Frame::from_parts(rgba, 0, 0, timed.delay)
        });

        encoder.encode_frames(frames).map_err(WashError::Encode)?;
    }

    Ok(buffer)
}

fn with_default_delay(delay: Delay, default_delay_ms: u32) -> Delay {
    let (numer, _) = delay.numer_denom_ms();
    if numer == 0 {
        Delay::from_numer_denom_ms(default_delay_ms, 1)
    } else {
        delay
    }
}
