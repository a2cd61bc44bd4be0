//! Frame-rate measurement.
//!
//! - `FpsSampler`: pure state machine fed one timestamp per frame
//! - `FpsHistory`: bounded FIFO of recent samples for charting
//! - `FpsMonitor`: keeps a sampler registered on a `FrameHost` between
//!   `start` and `stop`, notifying listeners on every sample

mod history;
mod monitor;
mod sampler;

pub use history::{FpsHistory, FrameSample};
pub use monitor::FpsMonitor;
pub use sampler::{FpsHealth, FpsSampler, SamplerConfig, SamplerSnapshot, SamplingMode};
