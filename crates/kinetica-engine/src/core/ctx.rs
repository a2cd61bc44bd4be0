use crate::time::{FrameHost, FrameTime};

/// Per-frame context passed to `core::App` callbacks.
pub struct FrameCtx<'a> {
    /// Queue that frame callbacks register with.
    pub host: &'a FrameHost,
    /// Timing of the frame being delivered. For `on_start` this is the
    /// clock's first reading.
    pub time: FrameTime,
}

impl FrameCtx<'_> {
    /// Frame timestamp in milliseconds since the runtime started.
    pub fn timestamp_ms(&self) -> f64 {
        self.time.timestamp_ms
    }

    pub fn frame_index(&self) -> u64 {
        self.time.frame_index
    }
}
