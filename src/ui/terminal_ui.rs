use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{debug, info};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use std::{
    io,
    time::{Duration, Instant},
};

use crate::app::App;
use crate::ui::commands::CommandProcessor;
use crate::ui::widgets::{ItemList, ResultPopup, WheelWidget};

/// How long a toast stays on screen
pub const NOTIFICATION_DURATION: Duration = Duration::from_secs(2);

/// Structure representing the layout of the UI
#[derive(Debug, Clone, Copy)]
pub struct AppLayout {
    pub title_bar: Rect,
    pub wheel_area: Rect,
    pub items_area: Rect,
    pub status_bar: Rect,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Title
                Constraint::Min(5),    // Wheel and items
                Constraint::Length(3), // Status bar
            ])
            .split(area);

        let main = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(vertical[1]);

        Self {
            title_bar: vertical[0],
            wheel_area: main[0],
            items_area: main[1],
            status_bar: vertical[2],
        }
    }
}

/// What the text input popup is collecting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    AddItem,
    Command,
}

/// Actions produced by key presses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    /// Spin, or close the result if one is shown
    Spin,
    /// Close the result
    Confirm,
    /// Close the result, or cancel a running spin
    Back,
    OpenInput(InputMode),
    RemoveSelected,
    SelectNext,
    SelectPrevious,
    ToggleMute,
    Submit { mode: InputMode, text: String },
    Quit,
}

/// Represents UI notification state
#[derive(Debug, Clone)]
pub struct Notification {
    message: String,
    start_time: Instant,
    duration: Duration,
}

impl Notification {
    pub fn new(message: String, duration: Duration) -> Self {
        Self {
            message,
            start_time: Instant::now(),
            duration,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_expired(&self) -> bool {
        self.start_time.elapsed() >= self.duration
    }
}

/// Represents a text input popup
#[derive(Debug, Clone)]
pub struct TextInput {
    mode: InputMode,
    input: String,
    /// Cursor position in chars, not bytes
    cursor_position: usize,
}

impl TextInput {
    pub fn new(mode: InputMode) -> Self {
        let input = match mode {
            InputMode::AddItem => String::new(),
            InputMode::Command => "/".to_string(),
        };
        let cursor_position = input.chars().count();
        Self {
            mode,
            input,
            cursor_position,
        }
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn text(&self) -> &str {
        &self.input
    }

    fn title(&self) -> &'static str {
        match self.mode {
            InputMode::AddItem => "Add Item",
            InputMode::Command => "Command",
        }
    }

    fn prompt(&self) -> &'static str {
        match self.mode {
            InputMode::AddItem => "Item text:",
            InputMode::Command => "Type /help for a list of commands",
        }
    }

    fn byte_index(&self, position: usize) -> usize {
        self.input
            .char_indices()
            .nth(position)
            .map_or(self.input.len(), |(i, _)| i)
    }

    fn len(&self) -> usize {
        self.input.chars().count()
    }

    fn insert(&mut self, c: char) {
        let index = self.byte_index(self.cursor_position);
        self.input.insert(index, c);
        self.cursor_position += 1;
    }

    fn backspace(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            let index = self.byte_index(self.cursor_position);
            self.input.remove(index);
        }
    }

    fn delete(&mut self) {
        if self.cursor_position < self.len() {
            let index = self.byte_index(self.cursor_position);
            self.input.remove(index);
        }
    }
}

/// Main UI controller that manages terminal rendering
pub struct TerminalUI {
    terminal: Option<Terminal<CrosstermBackend<io::Stdout>>>,
    notification: Option<Notification>,
    text_input: Option<TextInput>,
    commands: CommandProcessor,
}

impl TerminalUI {
    pub fn new() -> Self {
        Self {
            terminal: None,
            notification: None,
            text_input: None,
            commands: CommandProcessor::new(),
        }
    }

    /// Checks if the terminal UI is initialized
    pub fn is_initialized(&self) -> bool {
        self.terminal.is_some()
    }

    /// Initializes the terminal UI
    pub fn initialize(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.hide_cursor()?;
        self.terminal = Some(terminal);

        Ok(())
    }

    /// Restores the terminal. Does nothing if it was never initialized.
    pub fn shutdown(&mut self) -> io::Result<()> {
        if let Some(mut terminal) = self.terminal.take() {
            disable_raw_mode()?;
            execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
            terminal.show_cursor()?;
        }
        Ok(())
    }

    /// Show a notification message
    pub fn show_notification(&mut self, message: String, duration: Duration) {
        debug!("Notification: {}", message);
        self.notification = Some(Notification::new(message, duration));
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    /// Update notification state (remove if expired)
    fn update_notification(&mut self) {
        if self.notification.as_ref().is_some_and(Notification::is_expired) {
            self.notification = None;
        }
    }

    pub fn text_input(&self) -> Option<&TextInput> {
        self.text_input.as_ref()
    }

    /// Handles key events while the text input popup is open
    fn handle_text_input_key(&mut self, key: KeyCode) -> Option<UiAction> {
        let text_input = self.text_input.as_mut()?;
        match key {
            KeyCode::Char(c) => text_input.insert(c),
            KeyCode::Backspace => text_input.backspace(),
            KeyCode::Delete => text_input.delete(),
            KeyCode::Left => {
                text_input.cursor_position = text_input.cursor_position.saturating_sub(1);
            }
            KeyCode::Right => {
                if text_input.cursor_position < text_input.len() {
                    text_input.cursor_position += 1;
                }
            }
            KeyCode::Home => text_input.cursor_position = 0,
            KeyCode::End => text_input.cursor_position = text_input.len(),
            KeyCode::Enter => {
                let input = self.text_input.take()?;
                return Some(UiAction::Submit {
                    mode: input.mode,
                    text: input.input,
                });
            }
            KeyCode::Esc => self.text_input = None,
            _ => {}
        }
        None
    }

    /// Maps a key press to an action
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<UiAction> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(UiAction::Quit);
        }

        // The input popup swallows every other key
        if self.text_input.is_some() {
            return self.handle_text_input_key(key.code);
        }

        match key.code {
            KeyCode::Char(' ') => Some(UiAction::Spin),
            KeyCode::Enter => Some(UiAction::Confirm),
            KeyCode::Esc => Some(UiAction::Back),
            KeyCode::Char('a') => Some(UiAction::OpenInput(InputMode::AddItem)),
            KeyCode::Char('/') => Some(UiAction::OpenInput(InputMode::Command)),
            KeyCode::Char('d') | KeyCode::Delete => Some(UiAction::RemoveSelected),
            KeyCode::Down | KeyCode::Char('j') => Some(UiAction::SelectNext),
            KeyCode::Up | KeyCode::Char('k') => Some(UiAction::SelectPrevious),
            KeyCode::Char('m') => Some(UiAction::ToggleMute),
            KeyCode::Char('q') => Some(UiAction::Quit),
            _ => None,
        }
    }

    /// Applies an action to the application, reporting failures as toasts
    pub fn apply_action(&mut self, action: UiAction, app: &mut App) {
        let outcome = match action {
            UiAction::Spin => {
                if app.result().is_some() {
                    app.dismiss_result();
                    Ok(None)
                } else {
                    app.start_spin().map(|_| None).map_err(|e| e.to_string())
                }
            }
            UiAction::Confirm => {
                app.dismiss_result();
                Ok(None)
            }
            UiAction::Back => {
                if app.result().is_some() {
                    app.dismiss_result();
                } else if app.is_spinning() {
                    app.cancel_spin();
                }
                Ok(None)
            }
            UiAction::OpenInput(mode) => {
                self.text_input = Some(TextInput::new(mode));
                Ok(None)
            }
            UiAction::RemoveSelected => match app.remove_selected() {
                Ok(Some(item)) => Ok(Some(format!("Removed '{}'", item.label))),
                Ok(None) => Ok(None),
                Err(e) => Err(e.to_string()),
            },
            UiAction::SelectNext => {
                app.select_next();
                Ok(None)
            }
            UiAction::SelectPrevious => {
                app.select_previous();
                Ok(None)
            }
            UiAction::ToggleMute => {
                let muted = app.toggle_mute();
                Ok(Some(if muted { "Sound off" } else { "Sound on" }.to_string()))
            }
            UiAction::Submit {
                mode: InputMode::AddItem,
                text,
            } => match app.add_item(&text) {
                Ok(()) => Ok(Some(format!("Added '{}'", text.trim()))),
                Err(e) => Err(e.to_string()),
            },
            UiAction::Submit {
                mode: InputMode::Command,
                text,
            } => self
                .commands
                .execute(&text, app)
                .map(|message| Some(message).filter(|m| !m.is_empty())),
            UiAction::Quit => {
                app.quit();
                Ok(None)
            }
        };

        match outcome {
            Ok(Some(message)) | Err(message) => {
                self.show_notification(message, NOTIFICATION_DURATION)
            }
            Ok(None) => {}
        }
    }

    /// Polls for terminal events
    pub fn poll_events(&self, timeout: Duration) -> io::Result<Option<Event>> {
        if event::poll(timeout)? {
            return Ok(Some(event::read()?));
        }
        Ok(None)
    }

    /// Renders the UI
    pub fn render(&mut self, app: &App) -> io::Result<()> {
        self.update_notification();

        if let Some(terminal) = self.terminal.as_mut() {
            let notification = self.notification.as_ref();
            let text_input = self.text_input.as_ref();
            terminal.draw(|frame| draw_ui(frame, app, notification, text_input))?;
        }
        Ok(())
    }
}

impl Default for TerminalUI {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TerminalUI {
    fn drop(&mut self) {
        // Leave the user with a usable terminal even on early returns
        let _ = self.shutdown();
    }
}

/// A `width` x `height` rect centered in `area`, clamped to fit
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Draws the whole screen for the current application state
pub fn draw_ui(
    frame: &mut Frame,
    app: &App,
    notification: Option<&Notification>,
    text_input: Option<&TextInput>,
) {
    let area = frame.size();
    let layout = AppLayout::new(area);

    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            " Spin the Wheel ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" {} items", app.items().len())),
    ]));
    frame.render_widget(title, layout.title_bar);

    let highlight = if app.is_spinning() {
        None
    } else {
        app.winner_index()
    };
    let wheel = WheelWidget::new(app.items(), app.wheel_state().rotation)
        .highlight(highlight)
        .block(Block::default().title("Wheel").borders(Borders::ALL));
    frame.render_widget(wheel, layout.wheel_area);

    let item_list = ItemList::new(app.items())
        .selected(app.selected())
        .block(Block::default().title("Items").borders(Borders::ALL));
    frame.render_widget(item_list, layout.items_area);

    let state = if app.is_spinning() {
        "Spinning..."
    } else {
        "Ready"
    };
    let sound = if app.is_muted() { "🔇 off" } else { "🔊 on" };
    let status_text = format!(
        "{}  |  Sound {}  |  Space spin  a add  d remove  m mute  / command  q quit",
        state, sound
    );
    let status_bar = Paragraph::new(status_text)
        .block(Block::default().borders(Borders::ALL).title("Status"));
    frame.render_widget(status_bar, layout.status_bar);

    if let Some(result) = app.result() {
        frame.render_widget(ResultPopup::new(&result.item), layout.wheel_area);
    }

    if let Some(notif) = notification {
        let width = Span::raw(notif.message()).width() as u16 + 4;
        let mut notif_area = centered_rect(width, 3, area);
        // Sit just above the status bar
        notif_area.y = layout.status_bar.y.saturating_sub(notif_area.height);

        let notification_widget = Paragraph::new(notif.message())
            .style(Style::default().fg(Color::White))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .style(Style::default().bg(Color::DarkGray)),
            );
        frame.render_widget(Clear, notif_area);
        frame.render_widget(notification_widget, notif_area);
    }

    if let Some(input) = text_input {
        let input_area = centered_rect(50, 5, area);
        let input_widget = Paragraph::new(vec![
            Line::from(input.prompt()),
            Line::from(input.text()),
        ])
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(input.title())
                .style(Style::default().bg(Color::Black)),
        );
        frame.render_widget(Clear, input_area);
        frame.render_widget(input_widget, input_area);

        let before_cursor: String = input.input.chars().take(input.cursor_position).collect();
        let cursor_x = input_area.x + 1 + Span::raw(before_cursor).width() as u16;
        let cursor_y = input_area.y + 2; // border + prompt
        if cursor_x < input_area.right() && cursor_y < input_area.bottom() {
            frame.set_cursor(cursor_x, cursor_y);
        }
    }
}

/// Runs the interactive wheel until the user quits
pub fn run_tui(app: &mut App, frame_period: Duration) -> io::Result<()> {
    let mut terminal_ui = TerminalUI::new();
    terminal_ui.initialize()?;
    terminal_ui.render(app)?;

    let mut last_frame = Instant::now();

    while !app.should_quit() {
        let timeout = frame_period
            .checked_sub(last_frame.elapsed())
            .unwrap_or(Duration::ZERO);

        if let Some(Event::Key(key_event)) = terminal_ui.poll_events(timeout)? {
            if key_event.kind == KeyEventKind::Press {
                if let Some(action) = terminal_ui.handle_key_event(key_event) {
                    terminal_ui.apply_action(action, app);
                }
            }
        }

        if last_frame.elapsed() >= frame_period {
            if let Some(result) = app.on_frame() {
                info!("The wheel landed on '{}'", result.item.label);
            }
            terminal_ui.render(app)?;
            last_frame = Instant::now();
        }
    }

    terminal_ui.shutdown()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::config::Config;
    use crate::audio::SoundPlayer;
    use ratatui::backend::TestBackend;

    #[derive(Default)]
    struct SilentPlayer {
        muted: bool,
    }

    impl SoundPlayer for SilentPlayer {
        fn play_tick(&mut self) {}
        fn play_fanfare(&mut self) {}
        fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }
        fn is_muted(&self) -> bool {
            self.muted
        }
    }

    fn test_app(items: &[&str]) -> App {
        let config = Config {
            items: items.iter().map(|s| s.to_string()).collect(),
            seed: Some(3),
            ..Config::default()
        };
        App::new(&config, Box::<SilentPlayer>::default())
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(ui: &mut TerminalUI, text: &str) {
        for c in text.chars() {
            assert_eq!(ui.handle_key_event(press(KeyCode::Char(c))), None);
        }
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(&buffer.get(x, y).symbol);
            }
            text.push('\n');
        }
        text
    }

    fn spin_to_rest(app: &mut App) {
        for _ in 0..10_000 {
            if app.on_frame().is_some() {
                return;
            }
        }
        panic!("spin did not finish");
    }

    #[test]
    fn test_key_bindings() {
        let mut ui = TerminalUI::new();
        assert_eq!(ui.handle_key_event(press(KeyCode::Char(' '))), Some(UiAction::Spin));
        assert_eq!(ui.handle_key_event(press(KeyCode::Esc)), Some(UiAction::Back));
        assert_eq!(
            ui.handle_key_event(press(KeyCode::Delete)),
            Some(UiAction::RemoveSelected)
        );
        assert_eq!(ui.handle_key_event(press(KeyCode::Up)), Some(UiAction::SelectPrevious));
        assert_eq!(ui.handle_key_event(press(KeyCode::Char('m'))), Some(UiAction::ToggleMute));
        assert_eq!(ui.handle_key_event(press(KeyCode::Char('q'))), Some(UiAction::Quit));
        assert_eq!(
            ui.handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(UiAction::Quit)
        );
        assert_eq!(ui.handle_key_event(press(KeyCode::Char('z'))), None);
    }

    #[test]
    fn test_add_item_through_input_popup() {
        let mut app = test_app(&["A"]);
        let mut ui = TerminalUI::new();

        let action = ui.handle_key_event(press(KeyCode::Char('a'))).unwrap();
        ui.apply_action(action, &mut app);
        assert_eq!(ui.text_input().map(TextInput::mode), Some(InputMode::AddItem));

        // 'q' is text while the popup is open
        type_text(&mut ui, "Aquí");
        ui.handle_key_event(press(KeyCode::Left));
        ui.handle_key_event(press(KeyCode::Backspace));
        assert_eq!(ui.text_input().map(TextInput::text), Some("Aqí"));

        let action = ui.handle_key_event(press(KeyCode::Enter)).unwrap();
        assert!(ui.text_input().is_none());
        ui.apply_action(action, &mut app);

        assert_eq!(app.items().len(), 2);
        assert_eq!(app.items()[1].label, "Aqí");
        assert_eq!(ui.notification().map(Notification::message), Some("Added 'Aqí'"));
    }

    #[test]
    fn test_blank_item_is_rejected_with_toast() {
        let mut app = test_app(&["A"]);
        let mut ui = TerminalUI::new();

        ui.apply_action(
            UiAction::Submit {
                mode: InputMode::AddItem,
                text: "   ".to_string(),
            },
            &mut app,
        );
        assert_eq!(app.items().len(), 1);
        assert_eq!(
            ui.notification().map(Notification::message),
            Some("Item text cannot be empty")
        );
    }

    #[test]
    fn test_escape_closes_input_without_submitting() {
        let mut app = test_app(&["A", "B"]);
        let mut ui = TerminalUI::new();
        ui.apply_action(UiAction::OpenInput(InputMode::Command), &mut app);
        type_text(&mut ui, "quit");
        assert_eq!(ui.handle_key_event(press(KeyCode::Esc)), None);
        assert!(ui.text_input().is_none());
        assert!(!app.should_quit());
    }

    #[test]
    fn test_command_popup_runs_commands() {
        let mut app = test_app(&["A", "B"]);
        let mut ui = TerminalUI::new();

        ui.apply_action(UiAction::OpenInput(InputMode::Command), &mut app);
        assert_eq!(ui.text_input().map(TextInput::text), Some("/"));
        type_text(&mut ui, "add C");
        let action = ui.handle_key_event(press(KeyCode::Enter)).unwrap();
        ui.apply_action(action, &mut app);
        assert_eq!(app.items().len(), 3);

        ui.apply_action(
            UiAction::Submit {
                mode: InputMode::Command,
                text: "/bogus".to_string(),
            },
            &mut app,
        );
        assert_eq!(
            ui.notification().map(Notification::message),
            Some("Unknown command: /bogus")
        );
    }

    #[test]
    fn test_spin_with_one_item_shows_message() {
        let mut app = test_app(&["Only"]);
        let mut ui = TerminalUI::new();
        ui.apply_action(UiAction::Spin, &mut app);
        assert!(!app.is_spinning());
        assert_eq!(
            ui.notification().map(Notification::message),
            Some("Add at least 2 items to spin!")
        );
    }

    #[test]
    fn test_back_cancels_spin_then_dismisses_result() {
        let mut app = test_app(&["A", "B", "C"]);
        let mut ui = TerminalUI::new();

        ui.apply_action(UiAction::Spin, &mut app);
        assert!(app.is_spinning());
        ui.apply_action(UiAction::Back, &mut app);
        assert!(!app.is_spinning());
        assert!(app.result().is_none());

        ui.apply_action(UiAction::Spin, &mut app);
        spin_to_rest(&mut app);
        assert!(app.result().is_some());

        // Space closes the result instead of spinning again
        ui.apply_action(UiAction::Spin, &mut app);
        assert!(app.result().is_none());
        assert!(!app.is_spinning());
    }

    #[test]
    fn test_draw_shows_items_and_status() {
        let app = test_app(&["Ramen", "Pizza"]);
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal
            .draw(|frame| draw_ui(frame, &app, None, None))
            .unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Spin the Wheel"));
        assert!(text.contains("1. Ramen"));
        assert!(text.contains("2. Pizza"));
        assert!(text.contains("Ready"));
        assert!(text.contains("▼"));
    }

    #[test]
    fn test_draw_shows_result_and_toast() {
        let mut app = test_app(&["Ramen", "Pizza"]);
        app.start_spin().unwrap();
        spin_to_rest(&mut app);
        let winner = app.result().unwrap().item.label.clone();

        let notification = Notification::new("Sound off".to_string(), NOTIFICATION_DURATION);
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal
            .draw(|frame| draw_ui(frame, &app, Some(&notification), None))
            .unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Result"));
        assert!(text.contains(&winner));
        assert!(text.contains("Sound off"));
    }

    #[test]
    fn test_draw_survives_tiny_terminal() {
        let app = test_app(&["Ramen", "Pizza"]);
        let input = TextInput::new(InputMode::AddItem);
        let notification = Notification::new("A long message".to_string(), NOTIFICATION_DURATION);
        let mut terminal = Terminal::new(TestBackend::new(8, 4)).unwrap();
        terminal
            .draw(|frame| draw_ui(frame, &app, Some(&notification), Some(&input)))
            .unwrap();
    }
}
