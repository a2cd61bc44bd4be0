//! Time subsystem.
//!
//! Provides frame timing utilities that stay testable without a real loop:
//! - `FrameClock` turns `Instant`s into frame timestamps and clamped deltas
//! - `FrameHost` is the "run on next frame" queue that samplers and players
//!   register with; whoever owns the loop calls `run_frame` once per frame

mod frame_clock;
mod frame_host;

pub use frame_clock::{FrameClock, FrameTime};
pub use frame_host::{FrameHost, FrameRequestId};
