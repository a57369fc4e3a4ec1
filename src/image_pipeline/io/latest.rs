//! Keep-only-latest hand-off between a capture thread and the frame worker.
//!
//! The producer never waits. A frame that arrives while an older one is still
//! pending replaces it, so the worker always picks up the newest capture.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use tracing::trace;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::frame::CapturedFrame;
use crate::image_pipeline::io::source::FrameSource;

#[derive(Default)]
struct SlotState {
    pending: Option<CapturedFrame>,
    closed: bool,
    superseded: u64,
}

#[derive(Default)]
struct Slot {
    state: Mutex<SlotState>,
    ready: Condvar,
}

impl Slot {
    fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn close(&self) {
        self.lock().closed = true;
        self.ready.notify_all();
    }
}

/// Creates a connected producer/consumer pair.
pub fn latest_frame_slot() -> (LatestFrameSender, LatestFrameReceiver) {
    let slot = Arc::new(Slot::default());
    (
        LatestFrameSender { slot: slot.clone() },
        LatestFrameReceiver { slot },
    )
}

/// Capture side of the slot. Dropping it closes the slot.
pub struct LatestFrameSender {
    slot: Arc<Slot>,
}

impl LatestFrameSender {
    /// Publishes `frame`, returning `true` if it replaced a frame the worker
    /// had not picked up yet. Frames offered after `close` are discarded.
    pub fn offer(&self, frame: CapturedFrame) -> bool {
        let mut state = self.slot.lock();
        if state.closed {
            return false;
        }
        let replaced = state.pending.replace(frame).is_some();
        if replaced {
            state.superseded += 1;
            trace!(superseded = state.superseded, "Pending frame superseded");
        }
        drop(state);
        self.slot.ready.notify_one();
        replaced
    }

    /// Ends the stream. A pending frame is still handed out.
    pub fn close(&self) {
        self.slot.close();
    }

    /// True once either side closed the slot. A producer should stop reading.
    pub fn is_closed(&self) -> bool {
        self.slot.lock().closed
    }
}

impl Drop for LatestFrameSender {
    fn drop(&mut self) {
        self.close();
    }
}

/// Worker side of the slot. Dropping it closes the slot.
pub struct LatestFrameReceiver {
    slot: Arc<Slot>,
}

impl LatestFrameReceiver {
    /// Takes the pending frame without waiting.
    pub fn try_take(&self) -> Option<CapturedFrame> {
        self.slot.lock().pending.take()
    }

    /// Number of frames replaced before the worker got to them.
    pub fn superseded(&self) -> u64 {
        self.slot.lock().superseded
    }
}

impl Drop for LatestFrameReceiver {
    fn drop(&mut self) {
        self.slot.close();
    }
}

impl FrameSource for LatestFrameReceiver {
    /// Blocks until a frame is pending or the sender closed the slot.
    fn next_frame(&mut self) -> Result<Option<CapturedFrame>> {
        let mut state = self.slot.lock();
        loop {
            if let Some(frame) = state.pending.take() {
                return Ok(Some(frame));
            }
            if state.closed {
                return Ok(None);
            }
            state = self
                .slot
                .ready
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
}
