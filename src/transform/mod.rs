//! Scaling transforms for motion channel data.

mod scaler;

pub use scaler::StandardScaler;
