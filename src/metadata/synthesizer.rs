use chrono::{Local, NaiveDateTime, TimeDelta};
use rand::Rng;

use crate::metadata::{MetadataField, MetadataRecord};

pub const DEFAULT_SOFTWARE: &str = "PhotoWasher v1.0";
pub const DEFAULT_LENS_MODEL: &str = "Custom Lens";

/// `YYYY:MM:DD HH:MM:SS`, the textual timestamp layout EXIF expects.
pub const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

const MAX_AGE_DAYS: i64 = 365 * 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraDevice {
    pub make: &'static str,
    pub models: [&'static str; 3],
}

pub static CAMERA_DEVICES: [CameraDevice; 5] = [
    CameraDevice {
        make: "Canon",
        models: ["Canon EOS 5D Mark IV", "Canon EOS R5", "Canon EOS Rebel T7"],
    },
    CameraDevice {
        make: "NIKON CORPORATION",
        models: ["NIKON D850", "NIKON Z 7", "NIKON D3500"],
    },
    CameraDevice {
        make: "SONY",
        models: ["ILCE-7M3", "ILCE-9", "ILCE-6400"],
    },
    CameraDevice {
        make: "FUJIFILM",
        models: ["X-T4", "X-S10", "GFX 100S"],
    },
    CameraDevice {
        make: "Apple",
        models: ["iPhone 14 Pro", "iPhone 13", "iPhone SE"],
    },
];

pub fn find_device(make: &str) -> Option<&'static CameraDevice> {
    CAMERA_DEVICES.iter().find(|device| device.make == make)
}

/// Builds a plausible single-capture EXIF record for a random known camera.
#[derive(Debug, Clone)]
pub struct MetadataSynthesizer {
    software: String,
    lens_model: String,
}

impl MetadataSynthesizer {
    pub fn new() -> Self {
        Self {
            software: DEFAULT_SOFTWARE.into(),
            lens_model: DEFAULT_LENS_MODEL.into(),
        }
    }

    pub fn with_software(mut self, software: impl Into<String>) -> Self {
        self.software = software.into();
        self
    }

    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> MetadataRecord {
        self.generate_at(Local::now().naive_local(), rng)
    }

    /// Same as [`generate`](Self::generate) with capture times counted back
    /// from `now`.
    pub fn generate_at<R: Rng + ?Sized>(&self, now: NaiveDateTime, rng: &mut R) -> MetadataRecord {
        let device = &CAMERA_DEVICES[rng.gen_range(0..CAMERA_DEVICES.len())];
        let model = device.models[rng.gen_range(0..device.models.len())];

        let captured_at = random_capture_time(now, rng);
        let timestamp = captured_at.format(EXIF_DATETIME_FORMAT).to_string();

        let mut record = MetadataRecord::new();
        record.insert(MetadataField::Make, device.make);
        record.insert(MetadataField::Model, model);
        record.insert(MetadataField::Software, self.software.as_str());
        record.insert(MetadataField::DateTime, timestamp.as_str());
        record.insert(MetadataField::DateTimeOriginal, timestamp.as_str());
        record.insert(MetadataField::DateTimeDigitized, timestamp);
        record.insert(MetadataField::LensMake, device.make);
        record.insert(MetadataField::LensModel, self.lens_model.as_str());

        record
    }
}

impl Default for MetadataSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

fn random_capture_time<R: Rng + ?Sized>(now: NaiveDateTime, rng: &mut R) -> NaiveDateTime {
    let offset = TimeDelta::days(rng.gen_range(0..=MAX_AGE_DAYS))
        + TimeDelta::hours(rng.gen_range(0..=24))
        + TimeDelta::minutes(rng.gen_range(0..=60));

    now - offset
}

/// Fresh record drawn from the thread-local random source.
pub fn generate_metadata() -> MetadataRecord {
    MetadataSynthesizer::new().generate(&mut rand::thread_rng())
}
