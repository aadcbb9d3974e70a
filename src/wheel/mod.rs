// Wheel module
// Spin physics, slice geometry and winner selection

pub mod driver;
pub mod engine;
pub mod geometry;

pub use driver::{frame_period, run_spin};
pub use engine::{Physics, SpinEngine, SpinError, SpinEvent, SpinResult, WheelState};
