pub mod config;
pub mod items;

use log::{debug, info};

use crate::audio::SoundPlayer;
use crate::ui::commands::CommandHandler;
use crate::wheel::{SpinEngine, SpinError, SpinEvent, SpinResult, WheelState};
use config::Config;
use items::{Item, ItemError, ItemStore};

/// Error types for user actions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Spin(#[from] SpinError),

    #[error(transparent)]
    Item(#[from] ItemError),

    #[error("Items cannot be changed while the wheel is spinning")]
    Busy,

    #[error("No item at position {0}")]
    NoSuchPosition(usize),
}

/// Main application struct that coordinates all components
pub struct App {
    items: ItemStore,
    engine: SpinEngine,
    sound: Box<dyn SoundPlayer>,
    result: Option<SpinResult>,
    selected: Option<usize>,
    should_quit: bool,
}

impl App {
    /// Creates the application from a configuration and a sound player
    pub fn new(config: &Config, mut sound: Box<dyn SoundPlayer>) -> Self {
        sound.set_muted(config.muted);
        let engine = config
            .seed
            .map(SpinEngine::with_seed)
            .unwrap_or_default();
        let items = ItemStore::with_labels(&config.items);
        let selected = if items.is_empty() { None } else { Some(0) };

        Self {
            items,
            engine,
            sound,
            result: None,
            selected,
            should_quit: false,
        }
    }

    pub fn items(&self) -> &[Item] {
        self.items.items()
    }

    pub fn wheel_state(&self) -> WheelState {
        self.engine.state()
    }

    pub fn is_spinning(&self) -> bool {
        self.engine.is_spinning()
    }

    /// The most recent winner, until dismissed
    pub fn result(&self) -> Option<&SpinResult> {
        self.result.as_ref()
    }

    /// Index of the winning slice while a result is shown
    pub fn winner_index(&self) -> Option<usize> {
        let result = self.result.as_ref()?;
        self.items().iter().position(|item| item.id == result.item.id)
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_muted(&self) -> bool {
        self.sound.is_muted()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn select_next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let next = self.selected.map_or(0, |i| (i + 1).min(self.items.len() - 1));
        self.selected = Some(next);
    }

    pub fn select_previous(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.selected = Some(self.selected.map_or(0, |i| i.saturating_sub(1)));
    }

    /// Adds an item from user text
    pub fn add_item(&mut self, label: &str) -> Result<(), AppError> {
        if self.is_spinning() {
            return Err(AppError::Busy);
        }
        self.items.add(label)?;
        if self.selected.is_none() {
            self.selected = Some(0);
        }
        Ok(())
    }

    /// Removes the item with `id`; unknown ids change nothing
    pub fn remove_item(&mut self, id: &str) -> Result<Option<Item>, AppError> {
        if self.is_spinning() {
            return Err(AppError::Busy);
        }
        let removed = self.items.remove(id);
        if removed.is_some() {
            self.clamp_selection();
            // A shown result may refer to the removed item
            if self.result.as_ref().map(|r| r.item.id.as_str()) == Some(id) {
                self.result = None;
            }
        }
        Ok(removed)
    }

    /// Removes the item at `index` (0-based)
    pub fn remove_at(&mut self, index: usize) -> Result<Item, AppError> {
        let id = self
            .items
            .get(index)
            .map(|item| item.id.clone())
            .ok_or(AppError::NoSuchPosition(index + 1))?;
        self.remove_item(&id)?.ok_or(AppError::NoSuchPosition(index + 1))
    }

    pub fn remove_selected(&mut self) -> Result<Option<Item>, AppError> {
        match self.selected {
            Some(index) => self.remove_at(index).map(Some),
            None => Ok(None),
        }
    }

    fn clamp_selection(&mut self) {
        self.selected = match self.items.len() {
            0 => None,
            len => Some(self.selected.unwrap_or(0).min(len - 1)),
        };
    }

    /// Starts spinning the wheel over the current items
    pub fn start_spin(&mut self) -> Result<(), AppError> {
        // The result receiver is not needed: the finish arrives as a frame event
        self.engine.start_spin(self.items.items())?;
        self.result = None;
        Ok(())
    }

    pub fn cancel_spin(&mut self) {
        self.engine.cancel();
    }

    pub fn dismiss_result(&mut self) {
        self.result = None;
    }

    /// Flips sound on or off, returning whether it is now muted
    pub fn toggle_mute(&mut self) -> bool {
        let muted = !self.sound.is_muted();
        self.sound.set_muted(muted);
        info!("Sound {}", if muted { "off" } else { "on" });
        muted
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Advances the animation by one frame. Returns the result when the wheel
    /// comes to rest on this frame.
    pub fn on_frame(&mut self) -> Option<SpinResult> {
        let mut finished = None;
        for event in self.engine.step() {
            match event {
                SpinEvent::Tick => self.sound.play_tick(),
                SpinEvent::Finished(result) => {
                    debug!("Winner: {}", result.item.label);
                    self.sound.play_fanfare();
                    self.result = Some(result.clone());
                    finished = Some(result);
                }
            }
        }
        finished
    }
}

impl CommandHandler for App {
    fn add_item(&mut self, label: &str) -> Result<(), String> {
        App::add_item(self, label).map_err(|e| e.to_string())
    }

    fn remove_item(&mut self, position: usize) -> Result<String, String> {
        if position == 0 {
            return Err(AppError::NoSuchPosition(0).to_string());
        }
        self.remove_at(position - 1)
            .map(|item| item.label)
            .map_err(|e| e.to_string())
    }

    fn spin(&mut self) -> Result<(), String> {
        self.start_spin().map_err(|e| e.to_string())
    }

    fn toggle_mute(&mut self) -> bool {
        App::toggle_mute(self)
    }

    fn list_items(&self) -> Vec<String> {
        self.items().iter().map(|item| item.label.clone()).collect()
    }

    fn quit(&mut self) {
        App::quit(self)
    }
}
