//! Interactive timer application.
//!
//! The app owns the engine, the preference store and both collaborators, and
//! turns terminal input into engine transitions. Everything runs on one
//! cooperative loop: ticks, key presses and redraws never overlap.

use std::io::{self, Write};
use std::sync::Arc;
use std::thread;

use anyhow::Result;
use crossterm::event::{
    self, DisableFocusChange, EnableFocusChange, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::cursor::Show;
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::Terminal;
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::notification::NotificationScheduler;
use crate::preferences::PreferenceStore;
use crate::sound::AlertPlayer;
use crate::timer::{self, AlertProfile, TimerEngine, TimerError, TimerEvent};
use crate::types::{DurationField, PickedDuration};
use crate::ui::{self, PulseAnimation, RingtoneScreen, FRAME_INTERVAL};

/// Which screen is shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Timer,
    Ringtones(RingtoneScreen),
}

/// Application state.
pub struct App {
    engine: TimerEngine,
    events: mpsc::UnboundedReceiver<TimerEvent>,
    preferences: PreferenceStore,
    player: Arc<dyn AlertPlayer>,
    notifier: Arc<dyn NotificationScheduler>,
    screen: Screen,
    focused_field: DurationField,
    animation: PulseAnimation,
    /// Disables vibration for this run regardless of preferences
    no_vibration: bool,
    notice: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(
        picked: PickedDuration,
        preferences: PreferenceStore,
        player: Arc<dyn AlertPlayer>,
        notifier: Arc<dyn NotificationScheduler>,
        no_vibration: bool,
    ) -> Self {
        let (event_tx, events) = mpsc::unbounded_channel();
        let engine = TimerEngine::new(
            picked,
            Arc::clone(&notifier),
            Arc::clone(&player),
            event_tx,
        );

        Self {
            engine,
            events,
            preferences,
            player,
            notifier,
            screen: Screen::Timer,
            focused_field: DurationField::Minutes,
            animation: PulseAnimation::new(),
            no_vibration,
            notice: None,
            should_quit: false,
        }
    }

    // ── Accessors used by rendering ──────────────────────────────────

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn preferences(&self) -> &PreferenceStore {
        &self.preferences
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn focused_field(&self) -> DurationField {
        self.focused_field
    }

    pub fn animation(&self) -> &PulseAnimation {
        &self.animation
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Effective vibration setting for the next alert.
    pub fn vibration_enabled(&self) -> bool {
        self.preferences.get().vibration_enabled && !self.no_vibration
    }

    /// Preferences are read at the moment of each transition.
    fn alert_profile(&self) -> AlertProfile {
        AlertProfile {
            vibrate: self.vibration_enabled(),
            ..AlertProfile::from_preferences(self.preferences.get())
        }
    }

    // ── Input ────────────────────────────────────────────────────────

    /// Handles one terminal event.
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::FocusGained => self.notifier.set_foreground(true),
            Event::FocusLost => self.notifier.set_foreground(false),
            _ => {}
        }
    }

    /// Handles one key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit();
            return;
        }

        self.notice = None;
        if matches!(self.screen, Screen::Timer) {
            self.handle_timer_key(key.code);
        } else {
            self.handle_ringtone_key(key.code);
        }
    }

    fn handle_timer_key(&mut self, code: KeyCode) {
        let alert = self.alert_profile();
        let result = match code {
            KeyCode::Char(' ') => {
                if self.engine.can_pause() {
                    self.engine.pause()
                } else if self.engine.can_resume() {
                    self.engine.resume(&alert)
                } else {
                    self.engine.start(&alert)
                }
            }
            KeyCode::Enter => self.engine.toggle(&alert),
            KeyCode::Char('s') => self.engine.stop(),
            KeyCode::Char('x') => self.engine.dismiss(),
            KeyCode::Left => {
                self.focused_field = self.focused_field.previous();
                Ok(())
            }
            KeyCode::Right => {
                self.focused_field = self.focused_field.next();
                Ok(())
            }
            KeyCode::Up => self.engine.adjust_picked(self.focused_field, 1),
            KeyCode::Down => self.engine.adjust_picked(self.focused_field, -1),
            KeyCode::Char('r') => {
                self.open_ringtones();
                Ok(())
            }
            KeyCode::Char('q') => {
                self.quit();
                Ok(())
            }
            _ => Ok(()),
        };

        self.report(result);
    }

    fn handle_ringtone_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up => self.move_ringtone_cursor(-1),
            KeyCode::Down => self.move_ringtone_cursor(1),
            KeyCode::Enter | KeyCode::Char(' ') => self.select_highlighted(),
            KeyCode::Char('v') => self.toggle_vibration(),
            KeyCode::Esc | KeyCode::Char('r') => self.close_ringtones(),
            KeyCode::Char('q') => self.quit(),
            _ => {}
        }
    }

    fn report(&mut self, result: Result<(), TimerError>) {
        match result {
            Ok(()) => {}
            Err(e) if e.is_inert() => debug!("Ignored: {}", e),
            Err(e) => {
                warn!("⚠️  {}", e);
                self.should_quit = true;
            }
        }
    }

    // ── Ringtone screen ──────────────────────────────────────────────

    fn open_ringtones(&mut self) {
        // Previews would silence the ringing alert.
        if self.engine.get_state().ringing {
            return;
        }
        let selected = self.preferences.get().selected_ringtone();
        self.screen = Screen::Ringtones(RingtoneScreen::open(selected));
    }

    fn close_ringtones(&mut self) {
        self.player.stop_all();
        self.screen = Screen::Timer;
    }

    fn move_ringtone_cursor(&mut self, delta: i32) {
        if let Screen::Ringtones(screen) = &mut self.screen {
            screen.move_by(delta);
        }
    }

    fn select_highlighted(&mut self) {
        let Screen::Ringtones(screen) = &self.screen else {
            return;
        };
        let ringtone = screen.highlighted();

        if let Err(e) = self.preferences.select_ringtone(ringtone.title) {
            warn!("⚠️  {} ({})", e, e.suggestion());
            self.notice = Some(e.to_string());
        }
        if let Err(e) = self.player.preview(ringtone) {
            warn!("⚠️  {} ({})", e, e.suggestion());
        }
    }

    fn toggle_vibration(&mut self) {
        let enabled = !self.preferences.get().vibration_enabled;
        if let Err(e) = self.preferences.set_vibration_enabled(enabled) {
            warn!("⚠️  {} ({})", e, e.suggestion());
            self.notice = Some(e.to_string());
        }
    }

    // ── Timer ────────────────────────────────────────────────────────

    /// Advances the countdown by one tick.
    pub fn on_tick(&mut self) {
        let alert = self.alert_profile();
        if let Err(e) = self.engine.tick(&alert) {
            warn!("⚠️  {}", e);
            self.should_quit = true;
        }
    }

    /// Applies pending engine events to presentation state.
    ///
    /// Returns true if a countdown (re)started, so the ticker can be aligned.
    pub fn drain_events(&mut self) -> bool {
        let mut restarted = false;
        while let Ok(event) = self.events.try_recv() {
            debug!("{:?}", event);
            match event {
                TimerEvent::Started { .. } | TimerEvent::Resumed { .. } => restarted = true,
                TimerEvent::Finished => {
                    self.animation.start();
                    self.screen = Screen::Timer;
                }
                TimerEvent::Reset => self.animation.cancel(),
                TimerEvent::Paused { .. } | TimerEvent::Tick { .. } => {}
            }
        }
        restarted
    }

    /// Hard reset and exit.
    pub fn quit(&mut self) {
        if let Err(e) = self.engine.hard_reset() {
            debug!("Reset on quit: {}", e);
        }
        self.drain_events();
        self.should_quit = true;
    }

    /// Main loop: tick, input and redraw until quit.
    pub async fn run<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        mut input: mpsc::UnboundedReceiver<Event>,
    ) -> Result<()> {
        let mut ticker = timer::tick_interval();
        let mut frames = interval(FRAME_INTERVAL);
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            if self.drain_events() {
                ticker.reset();
            }
            terminal.draw(|f| ui::draw(f, self))?;

            if self.should_quit {
                break;
            }

            tokio::select! {
                _ = ticker.tick() => self.on_tick(),
                _ = frames.tick(), if self.animation.is_active() => {}
                event = input.recv() => match event {
                    Some(event) => self.handle_event(event),
                    None => self.quit(),
                },
            }
        }

        Ok(())
    }
}

/// Reads terminal events on a dedicated thread.
///
/// The thread ends when the receiver is dropped or reading fails.
fn spawn_input_reader() -> mpsc::UnboundedReceiver<Event> {
    let (tx, rx) = mpsc::unbounded_channel();
    thread::spawn(move || loop {
        match event::read() {
            Ok(event) => {
                if tx.send(event).is_err() {
                    break;
                }
            }
            Err(e) => {
                warn!("Terminal input failed: {}", e);
                break;
            }
        }
    });
    rx
}

/// Raw mode and the alternate screen, undone on drop.
///
/// Dropping restores the terminal on every exit path, including a setup
/// step failing halfway and a panic inside the app.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let guard = Self;
        execute!(io::stdout(), EnterAlternateScreen, EnableFocusChange)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = restore_screen(&mut io::stdout()) {
            warn!("Failed to restore screen: {}", e);
        }
        if let Err(e) = disable_raw_mode() {
            warn!("Failed to leave raw mode: {}", e);
        }
    }
}

fn restore_screen<W: Write>(out: &mut W) -> io::Result<()> {
    execute!(out, DisableFocusChange, LeaveAlternateScreen, Show)
}

/// Sets up the terminal, runs the app and restores the terminal.
pub async fn run_tui(mut app: App) -> Result<()> {
    let _guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    info!("Terminal UI started");
    app.run(&mut terminal, spawn_input_reader()).await
}

// ============================================================================
// Tests
// ============================================================================
