//! Kinetica engine crate.
//!
//! This crate owns the runtime pieces used by higher layers: the frame loop,
//! frame-rate measurement, and timeline editing/playback on top of
//! `kinetica-timeline`.

pub mod core;
pub mod editor;
pub mod fps;
pub mod player;
pub mod runtime;
pub mod signal;
pub mod time;

pub mod logging;

pub use kinetica_timeline as timeline;
