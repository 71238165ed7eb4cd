//! Core data structures for motion channel data.

mod dataset;

pub use dataset::{Axis, MotionDataset};
