use std::time::Duration;
use sight_detect::common::DetectorKind;
use sight_detect::data::{DetectorOptions, FrameRequest};
use sight_detect::detection_runners::{InferenceEngine, Layout, RawOutput, Tensor};
use sight_detect::{DetectError, DetectionWorker, Detector};


use fixtures::{packed_output, row, scene_png, Script, ScriptedEngine};

fn one_box() -> Vec<RawOutput> {
    let data = packed_output(8400, 6, Layout::PredFirst, &[(3, row([16., 16., 8., 8.], 2, 0, 0.9))]);
    vec![RawOutput::new(data)]
}

fn options() -> DetectorOptions {
    DetectorOptions::for_kind(DetectorKind::Object).with_input_size(32)
}

/// Engine that takes a while per frame.
struct SlowEngine(Duration);

impl InferenceEngine for SlowEngine {
    fn run(&mut self, _inputs: &[Tensor]) -> anyhow::Result<Vec<RawOutput>> {
        std::thread::sleep(self.0);
        Ok(one_box())
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn frames_are_answered_in_order() {
    fixtures::init_logger();
    let replies = tokio::task::spawn_blocking(|| {
        let worker = DetectionWorker::spawn(Detector::with_engine(ScriptedEngine::returning(one_box()), options())).unwrap();
        (1..=3)
            .map(|id| {
                worker.submit(FrameRequest::encoded(id, scene_png(40, 40))).unwrap();
                worker.recv().unwrap()
            })
            .collect::<Vec<_>>()
    })
    .await
    .unwrap();

    let ids: Vec<u64> = replies.iter().map(|(id, _)| *id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    for (id, reply) in replies {
        let outcome = reply.unwrap();
        assert_eq!(outcome.id, id);
        assert_eq!(outcome.detections.len(), 1);
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn a_failed_frame_does_not_stop_the_worker() {
    let (first, second) = tokio::task::spawn_blocking(|| {
        let engine = ScriptedEngine::scripted(vec![Script::Fail("device lost"), Script::Outputs(one_box())]);
        let worker = DetectionWorker::spawn(Detector::with_engine(engine, options())).unwrap();
        worker.submit(FrameRequest::encoded(10, scene_png(40, 40))).unwrap();
        let first = worker.recv().unwrap();
        worker.submit(FrameRequest::encoded(11, b"not an image".to_vec())).unwrap();
        let second = worker.recv().unwrap();
        (first, second)
    })
    .await
    .unwrap();

    assert_eq!(first.0, 10);
    assert!(matches!(first.1, Err(DetectError::Inference(_))));
    assert_eq!(second.0, 11);
    assert!(matches!(second.1, Err(DetectError::Decode(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn busy_worker_hands_the_frame_back() {
    let (skipped, reply) = tokio::task::spawn_blocking(|| {
        let detector = Detector::with_engine(SlowEngine(Duration::from_millis(300)), options());
        let worker = DetectionWorker::spawn(detector).unwrap();
        worker.submit(FrameRequest::encoded(1, scene_png(40, 40))).unwrap();
        let skipped = worker.try_submit(FrameRequest::encoded(2, scene_png(40, 40)));
        let reply = worker.recv_timeout(Duration::from_secs(5));
        (skipped, reply)
    })
    .await
    .unwrap();

    assert_eq!(skipped.unwrap_err().id, 2);
    let (id, outcome) = reply.unwrap();
    assert_eq!(id, 1);
    assert_eq!(outcome.unwrap().detections.len(), 1);
}

#[test]
fn dropping_the_worker_stops_it() {
    let worker = DetectionWorker::spawn(Detector::with_engine(ScriptedEngine::returning(one_box()), options())).unwrap();
    assert!(worker.try_recv().is_none());
    drop(worker);
}
