use std::{fs::File, io::{BufReader, Cursor}, path::Path};

use exif::{Field, Value, experimental::Writer};

use crate::{
    error::{Result, WashError},
    metadata::{MetadataField, MetadataRecord},
};

pub struct ExifWriter;

impl ExifWriter {
    /// Serializes the record as a big-endian TIFF structure: 0th IFD plus an
    /// Exif sub-IFD for capture fields, without the `Exif\0\0` prefix the
    /// JPEG encoder adds to its APP1 segment.
    pub fn to_tiff(record: &MetadataRecord) -> Result<Vec<u8>> {
        let fields = record
            .iter()
            .map(|(field, value)| Field {
                tag: field.tag(),
                ifd_num: field.group().ifd(),
                value: Value::Ascii(vec![value.as_bytes().to_vec()]),
            })
            .collect::<Vec<_>>();

        let mut writer = Writer::new();
        for field in &fields {
            writer.push_field(field);
        }

        let mut buffer = Cursor::new(Vec::new());
        writer
            .write(&mut buffer, false)
            .map_err(|e| WashError::Metadata(e.to_string()))?;

        Ok(buffer.into_inner())
    }
}

pub struct ExifExtractor;

impl ExifExtractor {
    /// Reads the known fields back from any container `kamadak-exif`
    /// understands. Files without an EXIF block yield `None`.
    pub fn extract<P: AsRef<Path>>(path: P) -> Result<Option<MetadataRecord>> {
        let file = File::open(&path)?;
        let mut reader = BufReader::new(file);

        match exif::Reader::new().read_from_container(&mut reader) {
            Ok(exif_data) => Ok(Some(Self::parse_exif(&exif_data))),
            Err(_) => Ok(None),
        }
    }

    fn parse_exif(exif: &exif::Exif) -> MetadataRecord {
        let mut record = MetadataRecord::new();

        for field in MetadataField::ALL {
            let value = exif
                .get_field(field.tag(), field.group().ifd())
                .and_then(|f| match f.value {
                    Value::Ascii(ref parts) => parts
                        .first()
                        .map(|bytes| String::from_utf8_lossy(bytes).into_owned()),
                    _ => None,
                });

            if let Some(value) = value {
                record.insert(field, value);
            }
        }

        record
    }
}
