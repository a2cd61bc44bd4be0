//! Headless frame loop.
//!
//! Owns the `FrameClock` and the `FrameHost` and paces frames to a target
//! rate with `std::thread::sleep`; stands in for a display's vsync.

mod frame_loop;

pub use frame_loop::{RunSummary, Runtime, RuntimeConfig};
