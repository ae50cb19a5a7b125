use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use log::{debug, info, warn};
use rand::Rng;

use crate::{
    error::{Result, WashError},
    image_utils::display_name,
    metadata::synthesizer::{DEFAULT_SOFTWARE, MetadataSynthesizer},
    processing::{WashFormat, animation, noise::PixelPerturber, still},
};

pub mod batch;
pub mod error;
pub mod image_utils;
pub mod metadata;
pub mod processing;
pub mod report;

pub use image_utils::Frame;
pub use metadata::{MetadataField, MetadataRecord, synthesizer::generate_metadata};

#[derive(Debug, Clone)]
pub struct WashConfig {
    pub perturb_ratio: f64,
    pub noise_amplitude: u8,
    pub jpeg_quality: u8,
    pub default_frame_delay_ms: u32,
    pub software: String,
    pub parallel: bool,
}

impl Default for WashConfig {
    fn default() -> Self {
        Self {
            perturb_ratio: 0.01,
            noise_amplitude: 1,
            jpeg_quality: 95,
            default_frame_delay_ms: 100,
            software: DEFAULT_SOFTWARE.into(),
            parallel: true,
        }
    }
}

impl WashConfig {
    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(WashError::InvalidParameter(format!(
                "JPEG quality must be between 1 and 100, got {}",
                self.jpeg_quality
            )));
        }
        self.perturber().map(|_| ())
    }

    fn perturber(&self) -> Result<PixelPerturber> {
        Ok(PixelPerturber::new()
            .with_ratio(self.perturb_ratio)?
            .with_amplitude(self.noise_amplitude))
    }

    fn synthesizer(&self) -> MetadataSynthesizer {
        MetadataSynthesizer::new().with_software(self.software.as_str())
    }
}

/// Outcome of washing one file. Failures carry the input they belong to.
#[derive(Debug)]
pub enum WashResult {
    Washed { output: PathBuf },
    Failed { input: PathBuf, error: WashError },
}

impl WashResult {
    pub fn is_success(&self) -> bool {
        matches!(self, WashResult::Washed { .. })
    }

    pub fn error(&self) -> Option<&WashError> {
        match self {
            WashResult::Washed { .. } => None,
            WashResult::Failed { error, .. } => Some(error),
        }
    }
}

impl fmt::Display for WashResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WashResult::Washed { output } => write!(f, "Washed: {}", display_name(output)),
            WashResult::Failed { input, error } => {
                write!(f, "Failed ({}): {}", display_name(input), error)
            }
        }
    }
}

pub struct Washer {
    config: WashConfig,
}

impl Washer {
    pub fn new() -> Self {
        Self {
            config: WashConfig::default(),
        }
    }

    pub fn with_config(mut self, config: WashConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &WashConfig {
        &self.config
    }

    pub fn wash<P: AsRef<Path>, Q: AsRef<Path>>(&self, input: P, output: Q) -> WashResult {
        self.wash_with_rng(input, output, &mut rand::thread_rng())
    }

    /// Washes `input` into `output` drawing all randomness from `rng`.
    /// Never panics on bad input; every failure becomes [`WashResult::Failed`].
    pub fn wash_with_rng<P, Q, R>(&self, input: P, output: Q, rng: &mut R) -> WashResult
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
        R: Rng + ?Sized,
    {
        let input = input.as_ref();
        let output = output.as_ref();

        match self.try_wash(input, output, rng) {
            Ok(()) => {
                info!("Washed {} -> {}", input.display(), output.display());
                WashResult::Washed {
                    output: output.to_path_buf(),
                }
            }
            Err(error) => {
                warn!("Failed to wash {}: {}", input.display(), error);
                WashResult::Failed {
                    input: input.to_path_buf(),
                    error,
                }
            }
        }
    }

    fn try_wash<R: Rng + ?Sized>(&self, input: &Path, output: &Path, rng: &mut R) -> Result<()> {
        let format = WashFormat::from_path(input)?;
        self.config.validate()?;
        let perturber = self.config.perturber()?;

        debug!("Washing {} as {:?}", input.display(), format);

        let encoded = match format {
            WashFormat::Gif => {
                let frames = animation::decode(input, self.config.default_frame_delay_ms)?
                    .into_iter()
                    .map(|timed| timed.map_frame(|frame| perturber.perturb(frame, rng)))
                    .collect();
                animation::encode(frames)?
            }
            still_format => {
                let frame = perturber.perturb(still::decode(input)?, rng);
                if still_format.embeds_metadata() {
                    let metadata = self.config.synthesizer().generate(rng);
                    debug!(
                        "Synthesized metadata for {} {}",
                        metadata.make().unwrap_or_default(),
                        metadata.model().unwrap_or_default()
                    );
                    still::encode_jpeg(frame, self.config.jpeg_quality, &metadata)?
                } else {
                    still::encode_png(frame)?
                }
            }
        };

        fs::write(output, encoded)?;
        Ok(())
    }
}

impl Default for Washer {
    fn default() -> Self {
        Self::new()
    }
}

/// Washes one file with default settings and the thread-local random source.
pub fn wash<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> WashResult {
    Washer::new().wash(input, output)
}
