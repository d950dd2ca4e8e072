//! Platform abstraction layer
//!
//! Frame-loop helpers shared by every frontend.

pub mod time;

pub use time::FixedStep;
