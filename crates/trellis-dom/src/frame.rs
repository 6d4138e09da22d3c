//! Animation-frame queue.
//!
//! The host drives frames by calling [`Document::run_frame`] after layout has
//! settled. Callbacks scheduled while a frame runs wait for the next one, and
//! scheduled callbacks cannot be cancelled.

use crate::document::Document;

/// Deferred callback.
pub type FrameCallback = Box<dyn FnOnce(&mut Document)>;

/// Handle identifying a scheduled callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

#[derive(Default)]
pub(crate) struct FrameQueue {
    pending: Vec<(FrameHandle, FrameCallback)>,
    next: u64,
    elapsed: u64,
}

impl FrameQueue {
    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Document {
    /// Schedule a callback for the next animation frame.
    pub fn request_animation_frame(
        &mut self,
        callback: impl FnOnce(&mut Self) + 'static,
    ) -> FrameHandle {
        self.frames.next += 1;
        let handle = FrameHandle(self.frames.next);
        self.frames.pending.push((handle, Box::new(callback)));
        handle
    }

    /// Run every callback scheduled before this call, in scheduling order.
    /// Returns the number of callbacks that ran.
    pub fn run_frame(&mut self) -> usize {
        let batch = std::mem::take(&mut self.frames.pending);
        self.frames.elapsed += 1;
        let count = batch.len();
        for (_, callback) in batch {
            callback(self);
        }
        count
    }

    /// Run frames until the queue is empty or `limit` frames have run.
    /// Returns the number of frames that ran.
    pub fn run_frames(&mut self, limit: usize) -> usize {
        let mut ran = 0;
        while ran < limit && !self.frames.is_empty() {
            self.run_frame();
            ran += 1;
        }
        ran
    }

    /// Number of callbacks waiting for a frame.
    #[must_use]
    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    /// Frames run since the document was created.
    #[must_use]
    pub const fn frames_elapsed(&self) -> u64 {
        self.frames.elapsed
    }
}
