//! Keyframe timeline model for **Kinetica**.
//!
//! This crate holds no clocks and no callbacks: it is plain data plus
//! operations, so any host loop (or a test) can drive it. Change
//! notification and playback live in `kinetica-engine`.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`property`] | `Property`, `PropertySet` |
//! | [`step`] | `StepId`, `KeyframeStep` |
//! | [`timeline`] | `KeyframeTimeline` |
//! | [`easing`] | `Easing` |
//! | [`error`] | `TimelineError`, `PermutationError` |
//!
//! # Quick start
//!
//! ```rust
//! use kinetica_timeline::{KeyframeTimeline, Property};
//!
//! let mut timeline = KeyframeTimeline::new();
//! let second = timeline.add_step();
//! timeline.update_property(&second, Property::X, 100.0).unwrap();
//!
//! assert_eq!(timeline.sample_at(0.5)[Property::X], 50.0);
//! ```

pub mod easing;
pub mod error;
pub mod property;
pub mod step;
pub mod timeline;

pub use easing::{Easing, ParseEasingError};
pub use error::{PermutationError, Result, TimelineError};
pub use property::{Property, PropertySet};
pub use step::{KeyframeStep, StepId};
pub use timeline::KeyframeTimeline;
