use std::{fs, io::Cursor, path::Path};

use image::{
    AnimationDecoder, Delay, DynamicImage, Rgb, RgbImage, Rgba, RgbaImage,
    codecs::gif::{GifDecoder, GifEncoder, Repeat},
};
use photo_washer::{
    Frame, MetadataField, WashResult, Washer, wash,
    error::WashError,
    image_utils::pixel_difference,
    metadata::{exif::ExifExtractor, synthesizer::find_device},
    processing::{noise::PixelPerturber, still::encode_jpeg},
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tempfile::TempDir;

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| Rgb([(x * 2) as u8, (y * 2) as u8, 128]))
}

fn write_gif_frames(path: &Path, buffers: Vec<RgbaImage>, delay_ms: u32) {
    let mut bytes = Vec::new();
    {
        let mut encoder = GifEncoder::new(&mut bytes);
        encoder.set_repeat(Repeat::Infinite).unwrap();
        let frames = buffers
            .into_iter()
            .map(|buffer| image::Frame::from_parts(buffer, 0, 0, Delay::from_numer_denom_ms(delay_ms, 1)));
        encoder.encode_frames(frames).unwrap();
    }
    fs::write(path, bytes).unwrap();
}

fn write_gif(path: &Path, frame_count: u8, delay_ms: u32) {
    let buffers = (0..frame_count)
        .map(|i| RgbaImage::from_pixel(40, 30, Rgba([i * 80, 60, 200 - i * 50, 255])))
        .collect();
    write_gif_frames(path, buffers, delay_ms);
}

fn rgb_frame(buffer: RgbaImage) -> Frame {
    Frame::Rgb(DynamicImage::ImageRgba8(buffer).to_rgb8())
}

fn read_gif(path: &Path) -> Vec<image::Frame> {
    let bytes = fs::read(path).unwrap();
    GifDecoder::new(Cursor::new(bytes))
        .unwrap()
        .into_frames()
        .collect_frames()
        .unwrap()
}

#[test]
fn png_wash_changes_at_most_one_percent_and_embeds_no_exif() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("source.png");
    let output = dir.path().join("washed.png");
    gradient(100, 100).save(&input).unwrap();

    let result = Washer::new().wash_with_rng(&input, &output, &mut ChaCha8Rng::seed_from_u64(7));
    assert!(result.is_success(), "{result}");

    let before = Frame::Rgb(gradient(100, 100));
    let after = Frame::from_dynamic(image::open(&output).unwrap());
    let diff = pixel_difference(&before, &after).unwrap();
    assert!(diff.changed_pixels <= 100);
    assert!(diff.total_delta <= 100);

    assert!(ExifExtractor::extract(&output).unwrap().is_none());
}

#[test]
fn png_wash_keeps_alpha() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("overlay.png");
    let output = dir.path().join("overlay-washed.png");
    let source = RgbaImage::from_fn(60, 60, |x, y| Rgba([100, 150, 200, ((x + y) * 2) as u8]));
    source.save(&input).unwrap();

    let result = Washer::new().wash_with_rng(&input, &output, &mut ChaCha8Rng::seed_from_u64(3));
    assert!(result.is_success(), "{result}");

    let washed = image::open(&output).unwrap().to_rgba8();
    for (before, after) in source.pixels().zip(washed.pixels()) {
        assert_eq!(before[3], after[3]);
    }
}

#[test]
fn same_seed_gives_identical_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("source.png");
    gradient(80, 50).save(&input).unwrap();

    let first = dir.path().join("first.png");
    let second = dir.path().join("second.png");
    let washer = Washer::new();
    washer.wash_with_rng(&input, &first, &mut ChaCha8Rng::seed_from_u64(99));
    washer.wash_with_rng(&input, &second, &mut ChaCha8Rng::seed_from_u64(99));

    assert_eq!(fs::read(first).unwrap(), fs::read(second).unwrap());
}

#[test]
fn jpeg_wash_embeds_consistent_metadata() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("IMG_0001.JPG");
    let output = dir.path().join("washed.jpg");
    gradient(100, 100).save_with_format(&input, image::ImageFormat::Jpeg).unwrap();
    assert!(ExifExtractor::extract(&input).unwrap().is_none());

    let result = Washer::new().wash_with_rng(&input, &output, &mut ChaCha8Rng::seed_from_u64(2024));
    assert!(result.is_success(), "{result}");

    let record = ExifExtractor::extract(&output).unwrap().expect("EXIF block");
    let make = record.make().unwrap();
    let device = find_device(make).expect("known manufacturer");
    let model = record.model().unwrap();
    assert!(device.models.iter().any(|m| *m == model));
    assert_eq!(record.get(MetadataField::Software), Some("PhotoWasher v1.0"));
    assert_eq!(record.get(MetadataField::LensMake), Some(make));
    assert_eq!(record.get(MetadataField::LensModel), Some("Custom Lens"));

    let timestamp = record.get(MetadataField::DateTime).unwrap();
    assert_eq!(record.get(MetadataField::DateTimeOriginal), Some(timestamp));
    assert_eq!(record.get(MetadataField::DateTimeDigitized), Some(timestamp));

    // Same seed, same draw order: the perturbation happens before metadata
    // synthesis, so the pre-encoding frame can be rebuilt exactly.
    let source = Frame::from_dynamic(image::open(&input).unwrap());
    let expected = PixelPerturber::new().perturb(source.clone(), &mut ChaCha8Rng::seed_from_u64(2024));
    let diff = pixel_difference(&source, &expected).unwrap();
    assert!(diff.changed_pixels > 0);
    assert!(diff.changed_pixels <= 100);
    assert!(diff.total_delta <= 100);

    let washed = image::open(&output).unwrap().to_rgb8();
    assert_eq!(washed.dimensions(), (100, 100));
    let rebuilt = encode_jpeg(expected, 95, &record).unwrap();
    assert_eq!(image::load_from_memory(&rebuilt).unwrap().to_rgb8(), washed);
}

#[test]
fn gif_wash_keeps_frame_count_and_delay() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("loop.gif");
    let output = dir.path().join("loop-washed.gif");
    write_gif(&input, 3, 50);

    let result = wash(&input, &output);
    assert!(result.is_success(), "{result}");

    let frames = read_gif(&output);
    assert_eq!(frames.len(), 3);
    for frame in &frames {
        assert_eq!(frame.delay().numer_denom_ms(), (50, 1));
        assert_eq!(frame.buffer().dimensions(), (40, 30));
    }
}

#[test]
fn gif_wash_perturbs_each_frame_within_budget() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("banner.gif");
    let output = dir.path().join("banner-washed.gif");
    // Few colours per frame, so the GIF palette round trip is lossless.
    let buffers = [40u8, 120, 200]
        .into_iter()
        .map(|shade| RgbaImage::from_fn(100, 100, |x, _| Rgba([shade, shade / 2 + (x % 4) as u8 * 10, 90, 255])))
        .collect();
    write_gif_frames(&input, buffers, 80);

    let result = Washer::new().wash_with_rng(&input, &output, &mut ChaCha8Rng::seed_from_u64(5));
    assert!(result.is_success(), "{result}");

    let perturber = PixelPerturber::new();
    let budget = perturber.budget(100, 100);
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    let sources = read_gif(&input);
    let washed = read_gif(&output);
    assert_eq!(washed.len(), 3);

    for (source, washed) in sources.into_iter().zip(washed) {
        assert_eq!(washed.delay().numer_denom_ms(), (80, 1));

        let before = rgb_frame(source.into_buffer());
        let after = rgb_frame(washed.into_buffer());
        assert_eq!(after, perturber.perturb(before.clone(), &mut rng));

        let diff = pixel_difference(&before, &after).unwrap();
        assert!(diff.changed_pixels > 0);
        assert!(diff.changed_pixels <= budget);
        assert!(diff.total_delta <= budget);
    }
}

#[test]
fn gif_without_delay_gets_default() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("still.gif");
    let output = dir.path().join("still-washed.gif");
    write_gif(&input, 2, 0);

    let result = wash(&input, &output);
    assert!(result.is_success(), "{result}");

    let frames = read_gif(&output);
    assert_eq!(frames.len(), 2);
    assert!(frames.iter().all(|f| f.delay().numer_denom_ms() == (100, 1)));
}

#[test]
fn unsupported_extension_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("scan.bmp");
    let output = dir.path().join("scan-washed.bmp");
    fs::write(&input, b"BM").unwrap();

    let result = wash(&input, &output);

    assert!(matches!(
        result,
        WashResult::Failed { error: WashError::UnsupportedFormat(_), .. }
    ));
    assert!(result.to_string().contains("scan.bmp"));
    assert!(!output.exists());
}

#[test]
fn missing_input_is_a_decode_failure() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.jpg");

    let result = wash(dir.path().join("missing.jpg"), &output);

    assert!(matches!(
        result,
        WashResult::Failed { error: WashError::Decode(_), .. }
    ));
    assert!(result.to_string().contains("missing.jpg"));
    assert!(!output.exists());
}

#[test]
fn corrupt_input_leaves_no_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("broken.gif");
    let output = dir.path().join("broken-washed.gif");
    fs::write(&input, b"GIF89a truncated").unwrap();

    let result = wash(&input, &output);

    assert!(!result.is_success());
    assert!(!output.exists());
}

#[test]
fn unwritable_output_is_reported() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("source.png");
    gradient(20, 20).save(&input).unwrap();

    let result = wash(&input, dir.path().join("no-such-dir").join("out.png"));

    assert!(matches!(
        result,
        WashResult::Failed { error: WashError::Io(_), .. }
    ));
}
