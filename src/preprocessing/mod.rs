//! Event stream preprocessing
//!
//! This module turns a normalized event stream into analysis-ready data:
//! - Salami slicing into constant pitch-set intervals
//! - Tick to beat/second conversion

pub mod slicer;
pub mod time;

pub use slicer::{slice_events, slices_to_events, Slice, Slicer};
pub use time::TimeUnit;
