use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sight_detect::common::DetBox;
use sight_detect::detection_runners::{decode_with, Layout, LayoutHints};
use sight_detect::{decode, DetectError};


use fixtures::{packed_output, row};

#[test]
fn single_box_at_index_42() {
    let data = packed_output(8400, 6, Layout::PredFirst, &[(42, row([320., 240., 100., 50.], 2, 1, 0.92))]);
    assert_eq!(data.len(), 8400 * 6);

    let dets = decode(&data, 640, 0.5).unwrap();
    assert_eq!(dets.len(), 1);
    let d = &dets[0];
    assert_eq!(d.class_id, 1);
    assert_eq!(d.score, 0.92);
    assert_eq!(d.bbox, DetBox::new(270., 215., 370., 265.));
}

#[test]
fn feat_first_export_decodes_the_same() {
    let rows = vec![
        (7, row([100., 100., 40., 40.], 80, 0, 0.8)),
        (4000, row([500., 300., 60., 120.], 80, 56, 0.65)),
    ];
    let pred_first = decode(&packed_output(8400, 84, Layout::PredFirst, &rows), 640, 0.5).unwrap();
    let feat_first = decode(&packed_output(8400, 84, Layout::FeatFirst, &rows), 640, 0.5).unwrap();
    assert_eq!(pred_first, feat_first);
    assert_eq!(pred_first.len(), 2);
    assert_eq!(pred_first[0].class_id, 0);
    assert_eq!(pred_first[1].class_id, 56);
    assert_eq!(pred_first[1].bbox, DetBox::new(470., 240., 530., 360.));
}

#[test]
fn output_keeps_prediction_order() {
    let rows: Vec<_> = [10usize, 500, 3000, 8000]
        .iter()
        .enumerate()
        .map(|(i, &p)| (p, row([50. + i as f32 * 100., 300., 30., 30.], 2, 0, 0.6 + i as f32 * 0.1)))
        .collect();
    let dets = decode(&packed_output(8400, 6, Layout::PredFirst, &rows), 640, 0.5).unwrap();
    let centres: Vec<f32> = dets.iter().map(|d| d.bbox.cx()).collect();
    assert_eq!(centres, vec![50., 150., 250., 350.]);
}

#[test]
fn threshold_law_and_monotonicity() {
    let mut rng = StdRng::seed_from_u64(42);
    let (pred, feat) = (2100, 8);
    let mut data = vec![0f32; pred * feat];
    for p in 0..pred {
        let base = p * feat;
        data[base] = rng.gen_range(0.0..640.);
        data[base + 1] = rng.gen_range(0.0..640.);
        data[base + 2] = rng.gen_range(4.0..200.);
        data[base + 3] = rng.gen_range(4.0..200.);
        for f in 4..feat {
            data[base + f] = rng.gen_range(0.0..1.0);
        }
    }

    let hints = LayoutHints::default();
    let thresholds = [0.0, 0.1, 0.3, 0.5, 0.7, 0.9, 0.99];
    let mut previous: Option<Vec<_>> = None;
    for t in thresholds {
        let dets = decode_with(&data, 640, t, &hints).unwrap();
        assert!(dets.iter().all(|d| d.score >= t));
        assert!(dets.iter().all(|d| d.bbox.x1 >= 0. && d.bbox.x1 < d.bbox.x2 && d.bbox.x2 <= 640.));
        assert!(dets.iter().all(|d| d.bbox.y1 >= 0. && d.bbox.y1 < d.bbox.y2 && d.bbox.y2 <= 640.));
        if let Some(prev) = &previous {
            // Higher threshold: a subset of the lower one.
            assert!(dets.iter().all(|d| prev.contains(d)));
            assert!(dets.len() <= prev.len());
        }
        previous = Some(dets);
    }
}

#[test]
fn normalized_boxes_scale_to_input() {
    let data = packed_output(8400, 6, Layout::PredFirst, &[(0, row([0.5, 0.5, 0.5, 0.25], 2, 0, 0.9))]);
    let dets = decode(&data, 416, 0.5).unwrap();
    assert_eq!(dets[0].bbox, DetBox::new(104., 156., 312., 260.));
}

#[test]
fn unsupported_length_is_an_error() {
    assert!(matches!(
        decode(&[0.1; 1000], 640, 0.5),
        Err(DetectError::UnsupportedOutputShape { len: 1000 })
    ));
}
