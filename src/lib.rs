// spinwheel: a spinning wheel of choices for the terminal
// Expose public modules for use in integration tests

pub mod app;
pub mod audio;
pub mod ui;
pub mod wheel;

// Re-export commonly used types for convenience
pub use app::config::{Config, ConfigError};
pub use app::items::{Item, ItemError, ItemStore};
pub use app::{App, AppError};
pub use audio::{AudioFeedback, SoundPlayer};
pub use wheel::{run_spin, SpinEngine, SpinError, SpinEvent, SpinResult};
