use image::{DynamicImage, Rgb, RgbImage};
use sight_detect::colour::{colour_name, identify_colour, to_hex};
use sight_detect::common::{DetBox, Detection};
use sight_detect::currency::total_amount;
use sight_detect::data::LabelTable;
use sight_detect::detection_processing::{describe_best, map_box_to_preview, Direction, PreviewRect, Proximity, SceneCue};
use sight_detect::embedding::{nearest_face, FaceEntry, DEFAULT_MAX_DISTANCE};
use sight_detect::{CropRect, DetectError};


use fixtures::{png_bytes, split_png};

fn square_at(cx: f32, cy: f32, side: f32) -> DetBox {
    DetBox::from_cxcy_wh(cx, cy, side, side)
}

#[test]
fn direction_follows_thirds_of_the_frame() {
    assert_eq!(Direction::of(&square_at(100., 320., 50.), 640), Direction::Left);
    assert_eq!(Direction::of(&square_at(320., 320., 50.), 640), Direction::Center);
    assert_eq!(Direction::of(&square_at(500., 320., 50.), 640), Direction::Right);
}

#[test]
fn proximity_follows_covered_area() {
    assert_eq!(Proximity::of(&square_at(320., 320., 400.), 640), Proximity::VeryClose);
    assert_eq!(Proximity::of(&square_at(320., 320., 250.), 640), Proximity::Near);
    assert_eq!(Proximity::of(&square_at(320., 320., 160.), 640), Proximity::Medium);
    assert_eq!(Proximity::of(&square_at(320., 320., 50.), 640), Proximity::Far);
}

#[test]
fn best_detection_becomes_a_cue() {
    let dets = vec![
        Detection::new(square_at(100., 300., 200.), 0.6, 2).with_label("car"),
        Detection::new(square_at(320., 320., 400.), 0.9, 0).with_label("person"),
    ];
    let cue = describe_best(&dets, 640).unwrap();
    assert_eq!(
        cue,
        SceneCue { label: "person".to_string(), direction: Direction::Center, proximity: Proximity::VeryClose }
    );
    assert_eq!(cue.to_string(), "person center, very close");
}

#[test]
fn far_objects_are_not_announced() {
    let dets = vec![Detection::new(square_at(600., 40., 20.), 0.95, 0).with_label("person")];
    assert!(describe_best(&dets, 640).is_none());
    assert!(describe_best(&[], 640).is_none());
}

#[test]
fn preview_mapping_on_portrait_screens() {
    // 600x1000 preview shows a 600x600 square starting at y=200.
    let rect = map_box_to_preview(&DetBox::new(64., 0., 640., 320.), 600., 1000., 640);
    assert_eq!(rect, PreviewRect { left: 60., top: 200., width: 540., height: 300. });
}

#[test]
fn notes_add_up() {
    let labels = LabelTable::currency();
    let dets = vec![
        Detection::new(square_at(100., 100., 50.), 0.9, 5),
        Detection::new(square_at(300., 100., 50.), 0.8, 1),
        Detection::new(square_at(300., 300., 50.), 0.7, 0).with_label("10 Rupees"),
        Detection::new(square_at(500., 300., 50.), 0.7, 99),
    ];
    assert_eq!(total_amount(&dets, &labels), 610);
    assert_eq!(total_amount(&[], &labels), 0);
}

#[test]
fn solid_frames_are_named() {
    let cases = [([220, 20, 20], "Red"), ([20, 20, 200], "Blue"), ([60, 60, 60], "Dark Gray"), ([250, 250, 250], "White")];
    for (rgb, name) in cases {
        let bytes = png_bytes(DynamicImage::ImageRgb8(RgbImage::from_pixel(50, 40, Rgb(rgb))));
        let result = identify_colour(&bytes, None).unwrap();
        assert_eq!(result.name, name, "{rgb:?}");
        assert_eq!(result.hex, to_hex(result.rgb));
    }
}

#[test]
fn crop_picks_the_colour_region() {
    let bytes = split_png(200, 100);
    let right = identify_colour(&bytes, Some(&CropRect::new(100., 0., 100., 100.))).unwrap();
    assert_eq!(right.name, "Blue");
    let left = identify_colour(&bytes, Some(&CropRect::new(0., 0., 100., 100.))).unwrap();
    assert_eq!(left.name, "Red");
}

#[test]
fn colour_names_by_lightness() {
    assert_eq!(colour_name([128, 0, 0]), "Dark Red");
    assert_eq!(colour_name([255, 170, 170]), "Light Red");
    assert_eq!(colour_name([139, 69, 19]), "Dark Brown");
    assert_eq!(colour_name([205, 133, 63]), "Orange");
    assert_eq!(to_hex([255, 0, 128]), "#ff0080");
}

#[test]
fn bad_bytes_fail_colour_identification() {
    assert!(matches!(identify_colour(b"nope", None), Err(DetectError::Decode(_))));
}

#[test]
fn nearest_face_within_distance() {
    let gallery = vec![
        FaceEntry { id: "a".into(), name: "Asha".into(), embedding: vec![0., 0., 1.] },
        FaceEntry { id: "b".into(), name: "Ben".into(), embedding: vec![1., 0., 0.] },
        FaceEntry { id: "c".into(), name: "Short".into(), embedding: vec![1., 0.] },
    ];
    let (entry, dist) = nearest_face(&[0.9, 0.1, 0.], &gallery, DEFAULT_MAX_DISTANCE).unwrap();
    assert_eq!(entry.id, "b");
    assert!(dist < 0.2);

    assert!(nearest_face(&[5., 5., 5.], &gallery, DEFAULT_MAX_DISTANCE).is_none());
    assert!(nearest_face(&[0.5, 0., 0.5], &gallery, 0.5).is_none());
}
