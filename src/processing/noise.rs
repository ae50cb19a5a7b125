use log::debug;
use rand::Rng;

use crate::{
    error::{Result, WashError},
    image_utils::Frame,
};

/// Nudges a random sample of pixels by a small bounded amount.
///
/// Pixels are drawn with replacement, so the number of distinct pixels
/// changed can be lower than the budget. Alpha is never modified.
#[derive(Debug, Clone)]
pub struct PixelPerturber {
    ratio: f64,
    amplitude: u8,
}

impl PixelPerturber {
    pub fn new() -> Self {
        Self {
            ratio: 0.01,
            amplitude: 1,
        }
    }

    pub fn with_ratio(mut self, ratio: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&ratio) {
            return Err(WashError::InvalidParameter(format!(
                "perturbation ratio must be within [0, 1], got {ratio}"
            )));
        }
        self.ratio = ratio;
        Ok(self)
    }

    pub fn with_amplitude(mut self, amplitude: u8) -> Self {
        self.amplitude = amplitude;
        self
    }

    /// Number of pixel draws for a frame of the given size.
    pub fn budget(&self, width: u32, height: u32) -> usize {
        (width as f64 * height as f64 * self.ratio).floor() as usize
    }

    pub fn perturb<R: Rng + ?Sized>(&self, mut frame: Frame, rng: &mut R) -> Frame {
        self.perturb_in_place(&mut frame, rng);
        frame
    }

    /// Returns the number of draws made.
    pub fn perturb_in_place<R: Rng + ?Sized>(&self, frame: &mut Frame, rng: &mut R) -> usize {
        let (width, height) = frame.dimensions();
        let budget = self.budget(width, height);
        let amplitude = self.amplitude as i16;

        for _ in 0..budget {
            let x = rng.gen_range(0..width);
            let y = rng.gen_range(0..height);
            let noise = rng.gen_range(-amplitude..=amplitude);

            for channel in frame.color_channels_mut(x, y) {
                *channel = (*channel as i16 + noise).clamp(0, 255) as u8;
            }
        }

        debug!(
            "Perturbed {}x{} frame ({} channels) with {} draws",
            width,
            height,
            frame.channel_count(),
            budget
        );

        budget
    }
}

impl Default for PixelPerturber {
    fn default() -> Self {
        Self::new()
    }
}
