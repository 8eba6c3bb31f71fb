//! Platform layer
//!
//! Device-facing pieces kept out of the simulation:
//! - Raw key to command mapping
//! - A scripted input source for headless runs
//! - Fixed-rate frame pacing

pub mod autopilot;
pub mod input;
pub mod time;

pub use autopilot::Autopilot;
pub use input::{Command, Key, map_key};
pub use time::FrameClock;
