// Audio module
// Synthesizes and plays the wheel's sound effects

pub mod output;
pub mod synth;

pub use output::{AudioError, AudioFeedback};
pub use synth::{fanfare_length, Voice};

/// Sound effects triggered by the wheel.
///
/// Every call is fire-and-forget: implementations must return immediately and
/// must never fail the caller.
pub trait SoundPlayer {
    /// Short descending blip for a slice passing the pointer
    fn play_tick(&mut self);
    /// Rising four-note arpeggio for a winner
    fn play_fanfare(&mut self);
    fn set_muted(&mut self, muted: bool);
    fn is_muted(&self) -> bool;
}
