pub mod exif;
pub mod synthesizer;

use std::collections::BTreeMap;

/// IFD a metadata field is stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataGroup {
    /// 0th IFD: attributes of the primary image.
    Primary,
    /// Exif IFD: capture-specific attributes.
    Capture,
    /// GPS IFD.
    Positioning,
    /// 1st IFD: thumbnail attributes.
    Thumbnail,
}

impl MetadataGroup {
    /// Image the group's IFD belongs to. Exif and GPS sub-IFDs hang off the
    /// primary image; placement within it follows the tag.
    pub fn ifd(self) -> ::exif::In {
        match self {
            MetadataGroup::Thumbnail => ::exif::In::THUMBNAIL,
            _ => ::exif::In::PRIMARY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetadataField {
    Make,
    Model,
    Software,
    DateTime,
    DateTimeOriginal,
    DateTimeDigitized,
    LensMake,
    LensModel,
}

impl MetadataField {
    pub const ALL: [MetadataField; 8] = [
        MetadataField::Make,
        MetadataField::Model,
        MetadataField::Software,
        MetadataField::DateTime,
        MetadataField::DateTimeOriginal,
        MetadataField::DateTimeDigitized,
        MetadataField::LensMake,
        MetadataField::LensModel,
    ];

    pub fn tag(self) -> ::exif::Tag {
        use ::exif::Tag;

        match self {
            MetadataField::Make => Tag::Make,
            MetadataField::Model => Tag::Model,
            MetadataField::Software => Tag::Software,
            MetadataField::DateTime => Tag::DateTime,
            MetadataField::DateTimeOriginal => Tag::DateTimeOriginal,
            MetadataField::DateTimeDigitized => Tag::DateTimeDigitized,
            MetadataField::LensMake => Tag::LensMake,
            MetadataField::LensModel => Tag::LensModel,
        }
    }

    pub fn group(self) -> MetadataGroup {
        match self {
            MetadataField::Make
            | MetadataField::Model
            | MetadataField::Software
            | MetadataField::DateTime => MetadataGroup::Primary,
            MetadataField::DateTimeOriginal
            | MetadataField::DateTimeDigitized
            | MetadataField::LensMake
            | MetadataField::LensModel => MetadataGroup::Capture,
        }
    }
}

/// Camera and capture attributes destined for an EXIF container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataRecord {
    values: BTreeMap<MetadataField, String>,
}

impl MetadataRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: MetadataField, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    pub fn get(&self, field: MetadataField) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    pub fn make(&self) -> Option<&str> {
        self.get(MetadataField::Make)
    }

    pub fn model(&self) -> Option<&str> {
        self.get(MetadataField::Model)
    }

    pub fn iter(&self) -> impl Iterator<Item = (MetadataField, &str)> {
        self.values.iter().map(|(field, value)| (*field, value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
