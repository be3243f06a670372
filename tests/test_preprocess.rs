use image::{DynamicImage, Rgba, RgbaImage};
use sight_detect::common::{CropRegion, Normalization};
use sight_detect::{preprocess, preprocess_image, CropError, CropRect, CropResult, DetectError, SourceImage};


use fixtures::{png_bytes, scene_png, split_png};

#[test]
fn preprocessing_is_deterministic() {
    let bytes = scene_png(300, 200);
    let crop = CropRect::new(50., 0., 200., 200.);
    let a = preprocess(&bytes, 64, 64, true, Some(&crop)).unwrap();
    let b = preprocess(&bytes, 64, 64, true, Some(&crop)).unwrap();
    assert_eq!(a.tensor.to_vec(), b.tensor.to_vec());
    assert_eq!(a.crop, b.crop);
}

#[test]
fn tensor_length_and_bounds() {
    fixtures::init_logger();
    let bytes = scene_png(123, 77);
    for (w, h) in [(1, 1), (32, 32), (64, 48), (416, 416)] {
        let normalized = preprocess(&bytes, w, h, true, None).unwrap();
        let values = normalized.tensor.to_vec();
        assert_eq!(values.len(), (w * h * 3) as usize);
        assert!(values.iter().all(|v| v.is_finite() && (0.0..=1.0).contains(v)));
        assert_eq!(normalized.tensor.shape(), &[h as usize, w as usize, 3]);

        let raw = preprocess(&bytes, w, h, false, None).unwrap();
        assert!(raw.tensor.iter().all(|v| v.is_finite() && (0.0..=255.0).contains(v)));
    }
}

#[test]
fn normalized_is_raw_divided_by_255() {
    let bytes = scene_png(100, 100);
    let raw = preprocess(&bytes, 40, 40, Normalization::Raw, None).unwrap().tensor.to_vec();
    let unit = preprocess(&bytes, 40, 40, Normalization::UnitRange, None).unwrap().tensor.to_vec();
    for (r, u) in raw.iter().zip(&unit) {
        assert_eq!(r.fract(), 0.);
        assert_eq!(*u, r / 255.);
    }
}

#[test]
fn crop_outside_source_falls_back_to_full_image() {
    let bytes = scene_png(120, 80);
    let crop = CropRect::new(500., 500., 50., 50.);
    let fallback = preprocess(&bytes, 32, 32, true, Some(&crop)).unwrap();
    let full = preprocess(&bytes, 32, 32, true, None).unwrap();

    assert_eq!(
        fallback.crop,
        CropResult::FallbackFullImage { reason: CropError::OutOfBounds { src_width: 120, src_height: 80 } }
    );
    assert!(fallback.crop.is_fallback());
    assert_eq!(full.crop, CropResult::NotRequested);
    assert_eq!(fallback.tensor, full.tensor);
}

#[test]
fn degenerate_crops_fall_back_too() {
    let bytes = scene_png(60, 60);
    for crop in [CropRect::new(0., 0., 0., 10.), CropRect::new(f32::INFINITY, 0., 10., 10.)] {
        let out = preprocess(&bytes, 16, 16, false, Some(&crop)).unwrap();
        assert!(out.crop.is_fallback(), "{crop:?}");
    }
}

#[test]
fn crop_selects_the_region() {
    // Left half is pure red; cropping it must give a red tensor.
    let bytes = split_png(200, 100);
    let out = preprocess(&bytes, 16, 16, true, Some(&CropRect::new(0., 0., 100., 100.))).unwrap();
    assert_eq!(out.crop, CropResult::Cropped(CropRegion { x: 0, y: 0, width: 100, height: 100 }));
    assert_eq!((out.source_width, out.source_height), (200, 100));
    for px in out.tensor.to_vec().chunks(3) {
        assert_eq!(px, [1., 0., 0.]);
    }
}

#[test]
fn partial_crop_is_clamped_not_rejected() {
    let bytes = split_png(200, 100);
    let out = preprocess(&bytes, 8, 8, false, Some(&CropRect::new(150., -20., 100., 200.))).unwrap();
    assert_eq!(out.crop, CropResult::Cropped(CropRegion { x: 150, y: 0, width: 50, height: 100 }));
    for px in out.tensor.to_vec().chunks(3) {
        assert_eq!(px, [0., 0., 255.]);
    }
}

#[test]
fn alpha_channel_is_dropped() {
    let rgba = RgbaImage::from_pixel(10, 10, Rgba([10, 20, 30, 0]));
    let bytes = png_bytes(DynamicImage::ImageRgba8(rgba));
    let out = preprocess(&bytes, 4, 4, false, None).unwrap();
    assert_eq!(out.tensor.len(), 4 * 4 * 3);
    for px in out.tensor.to_vec().chunks(3) {
        assert_eq!(px, [10., 20., 30.]);
    }
}

#[test]
fn decoded_frames_share_the_path() {
    let bytes = scene_png(90, 70);
    let image = SourceImage::from_bytes(&bytes).unwrap();
    let from_bytes = preprocess(&bytes, 24, 24, true, None).unwrap();
    let from_image = preprocess_image(&image, 24, 24, true, None).unwrap();
    assert_eq!(from_bytes.tensor, from_image.tensor);
}

#[test]
fn invalid_target_is_a_dimension_error() {
    let bytes = scene_png(10, 10);
    assert!(matches!(
        preprocess(&bytes, 0, 16, true, None),
        Err(DetectError::Dimension { width: 0, height: 16 })
    ));
    // Reported before the bytes are even looked at.
    assert!(matches!(
        preprocess(b"garbage", 16, 0, true, None),
        Err(DetectError::Dimension { .. })
    ));
}

#[test]
fn unreadable_bytes_are_a_decode_error() {
    let err = preprocess(b"\x89PNG but not really", 16, 16, true, None).unwrap_err();
    assert!(matches!(err, DetectError::Decode(_)));
}
