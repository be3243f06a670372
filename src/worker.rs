use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use crossbeam_channel::{RecvTimeoutError, TrySendError};
use crate::data::send_channels::{frame_channels, DetectionState, SendState};
use crate::data::{FrameOutcome, FrameReply, FrameRequest};
use crate::detection_runners::engine::InferenceEngine;
use crate::detectors::Detector;

/// Runs one detector on its own thread, one frame at a time.
///
/// The frame channel has no buffer: a frame is accepted only while the worker is idle, so
/// there is never more than one frame in flight and stale frames are not queued.
pub struct DetectionWorker {
    send: Option<SendState>,
    handle: Option<JoinHandle<()>>,
}

impl DetectionWorker {
    pub fn spawn<E>(detector: Detector<E>) -> std::io::Result<Self>
    where
        E: InferenceEngine + 'static,
    {
        let (send, state) = frame_channels();
        let name = format!("{}-detector", detector.kind().str_lowercase());
        let handle = std::thread::Builder::new()
            .name(name)
            .spawn(move || detection_loop(detector, state))?;

        Ok(Self {
            send: Some(send),
            handle: Some(handle),
        })
    }

    /// Hands the frame to the worker if it is idle, otherwise gives it back.
    pub fn try_submit(&self, frame: FrameRequest) -> Result<(), FrameRequest> {
        let Some(send) = &self.send else {
            return Err(frame);
        };
        match send.frame_tx.try_send(frame) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(frame)) | Err(TrySendError::Disconnected(frame)) => Err(frame),
        }
    }

    /// Waits until the worker is idle, then hands over the frame. Fails only if the worker stopped.
    pub fn submit(&self, frame: FrameRequest) -> Result<(), FrameRequest> {
        let Some(send) = &self.send else {
            return Err(frame);
        };
        send.frame_tx.send(frame).map_err(|e| e.into_inner())
    }

    /// Blocks for the next reply. `None` once the worker has stopped.
    pub fn recv(&self) -> Option<FrameReply> {
        self.send.as_ref()?.reply_rx.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<FrameReply> {
        match self.send.as_ref()?.reply_rx.recv_timeout(timeout) {
            Ok(reply) => Some(reply),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    pub fn try_recv(&self) -> Option<FrameReply> {
        self.send.as_ref()?.reply_rx.try_recv().ok()
    }
}

impl Drop for DetectionWorker {
    fn drop(&mut self) {
        // Closing the frame channel ends the loop.
        self.send.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("Detection worker panicked");
            }
        }
    }
}

fn detection_loop<E: InferenceEngine>(mut detector: Detector<E>, state: DetectionState) {
    log::debug!("{} detection worker started", detector.kind());
    loop {
        // MESSAGE LOOP STARTS HERE
        let frame = match state.frame_rx.recv() {
            Ok(frame) => frame,
            Err(_) => break,
        };
        let detect_time = Instant::now();
        let id = frame.id;

        let reply = detector.detect_frame(&frame).map(|(detections, crop)| FrameOutcome {
            id,
            detections,
            crop,
            elapsed: detect_time.elapsed(),
        });
        if let Err(err) = &reply {
            log::warn!("Frame {id} failed: {err}");
        }

        if state.reply_tx.send((id, reply)).is_err() {
            break;
        }
    }
    log::debug!("{} detection worker stopped", detector.kind());
}
