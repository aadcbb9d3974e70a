// Headless spin driver
// Runs a spin on a fixed-tick timer instead of terminal frames

use std::time::Duration;
use tokio::time::{self, MissedTickBehavior};

use crate::app::items::Item;
use crate::audio::SoundPlayer;
use crate::wheel::{SpinEngine, SpinError, SpinEvent, SpinResult};

/// Time between animation frames at `fps` frames per second
pub fn frame_period(fps: u32) -> Duration {
    Duration::from_secs_f64(1.0 / f64::from(fps.max(1)))
}

/// Spins `items` to completion, one engine step per timer tick, playing a
/// tick per slice crossing and the fanfare on the result.
pub async fn run_spin<S>(
    engine: &mut SpinEngine,
    items: &[Item],
    sound: &mut S,
    fps: u32,
) -> Result<SpinResult, SpinError>
where
    S: SoundPlayer + ?Sized,
{
    let result_rx = engine.start_spin(items)?;

    let mut interval = time::interval(frame_period(fps));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    while engine.is_spinning() {
        interval.tick().await;
        for event in engine.step() {
            match event {
                SpinEvent::Tick => sound.play_tick(),
                SpinEvent::Finished(_) => sound.play_fanfare(),
            }
        }
    }

    result_rx.await.map_err(|_| SpinError::Cancelled)
}
