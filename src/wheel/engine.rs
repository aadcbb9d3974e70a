use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::oneshot;

use crate::app::items::Item;
use crate::wheel::geometry;

/// Error types for spin requests
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpinError {
    #[error("Add at least 2 items to spin!")]
    NotEnoughItems { count: usize },

    #[error("The wheel is already spinning")]
    AlreadySpinning,

    #[error("The spin was cancelled")]
    Cancelled,
}

/// Outcome of a finished spin
#[derive(Debug, Clone, PartialEq)]
pub struct SpinResult {
    /// The item under the pointer
    pub item: Item,
    /// Resting rotation of the wheel, in `[0, 2π)`
    pub angle: f64,
}

/// Events produced by a single animation frame
#[derive(Debug, Clone, PartialEq)]
pub enum SpinEvent {
    /// A slice boundary passed the pointer
    Tick,
    /// The wheel came to rest
    Finished(SpinResult),
}

/// Friction model for the wheel, in per-frame units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Physics {
    /// Velocity multiplier applied after every frame
    pub friction: f64,
    /// The spin ends once velocity drops to this value or below
    pub stop_threshold: f64,
    /// Lower bound of the initial velocity (inclusive)
    pub min_velocity: f64,
    /// Upper bound of the initial velocity (exclusive)
    pub max_velocity: f64,
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            friction: 0.985,
            stop_threshold: 0.001,
            min_velocity: 0.3,
            max_velocity: 0.7,
        }
    }
}

/// Rotation and angular velocity of the wheel
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelState {
    /// Radians, kept in `[0, 2π)`
    pub rotation: f64,
    /// Radians per frame
    pub velocity: f64,
}

struct ActiveSpin {
    items: Vec<Item>,
    result_tx: Option<oneshot::Sender<SpinResult>>,
}

/// Drives the wheel animation one frame at a time
pub struct SpinEngine {
    state: WheelState,
    physics: Physics,
    active: Option<ActiveSpin>,
    rng: StdRng,
}

impl SpinEngine {
    /// Creates an engine seeded from system entropy
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Creates an engine with a fixed seed, for reproducible spins
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            state: WheelState::default(),
            physics: Physics::default(),
            active: None,
            rng,
        }
    }

    pub fn with_physics(mut self, physics: Physics) -> Self {
        self.physics = physics;
        self
    }

    pub fn state(&self) -> WheelState {
        self.state
    }

    pub fn physics(&self) -> Physics {
        self.physics
    }

    pub fn is_spinning(&self) -> bool {
        self.active.is_some()
    }

    /// Starts a spin over a snapshot of `items`.
    ///
    /// The returned receiver resolves once the wheel comes to rest. The
    /// request is rejected without touching the wheel when fewer than two
    /// items are given or a spin is already running.
    pub fn start_spin(
        &mut self,
        items: &[Item],
    ) -> Result<oneshot::Receiver<SpinResult>, SpinError> {
        if self.active.is_some() {
            return Err(SpinError::AlreadySpinning);
        }
        if items.len() < 2 {
            return Err(SpinError::NotEnoughItems { count: items.len() });
        }

        self.state.velocity = self
            .rng
            .gen_range(self.physics.min_velocity..self.physics.max_velocity);

        let (result_tx, result_rx) = oneshot::channel();
        self.active = Some(ActiveSpin {
            items: items.to_vec(),
            result_tx: Some(result_tx),
        });

        info!(
            "Spin started with {} items at {:.3} rad/frame",
            items.len(),
            self.state.velocity
        );
        Ok(result_rx)
    }

    /// Advances the wheel by one frame.
    ///
    /// Returns one `Tick` per slice boundary passed during the frame, followed
    /// by `Finished` on the frame the wheel comes to rest. Idle engines return
    /// no events.
    pub fn step(&mut self) -> Vec<SpinEvent> {
        let Some(active) = self.active.as_mut() else {
            return Vec::new();
        };

        let count = active.items.len();
        let delta = self.state.velocity;
        let crossings = geometry::boundaries_crossed(self.state.rotation, delta, count);

        self.state.rotation = geometry::normalize(self.state.rotation + delta);
        self.state.velocity *= self.physics.friction;

        let mut events = vec![SpinEvent::Tick; crossings as usize];

        if self.state.velocity <= self.physics.stop_threshold {
            let index = geometry::winner_index(self.state.rotation, count);
            let result = SpinResult {
                item: active.items[index].clone(),
                angle: self.state.rotation,
            };
            self.state.velocity = 0.0;

            if let Some(tx) = active.result_tx.take() {
                // The caller may have dropped the receiver; the event still fires
                let _ = tx.send(result.clone());
            }
            self.active = None;

            info!("Spin finished on '{}' (slice {})", result.item.label, index);
            events.push(SpinEvent::Finished(result));
        }

        events
    }

    /// Stops the current spin without producing a result.
    ///
    /// The wheel keeps its rotation and the pending receiver sees a closed
    /// channel. Does nothing when idle.
    pub fn cancel(&mut self) {
        if self.active.take().is_some() {
            self.state.velocity = 0.0;
            debug!("Spin cancelled at rotation {:.3}", self.state.rotation);
        }
    }
}

impl Default for SpinEngine {
    fn default() -> Self {
        Self::new()
    }
}
