//=========================================================================
// Beacon Engine
//
// Game driver: owns the settings, the event broadcaster and the frame
// sequencing. The platform layer feeds it events and frames.
//
// Architecture:
// ```text
//     GameBuilder  ──build()──>  Game  ──run()──>  [Platform event loop]
//         │                        │
//         ├─ with_name()           ├─ events()  → EventBroadcaster
//         ├─ with_window_size()    └─ handle()  → GameHandle (Clone + Send)
//         └─ with_config_name()                     │
//                                                   └─ GameCommand queue,
//                                                      drained by Game
// ```
//
// Per frame (driven by the platform):
//   process_event() for every window event
//     → broadcast → built-in quit keys → drain commands
//   frame(target)
//     → measure delta → update signal → draw signal → drain commands
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, info, warn};
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::config::{ConfigError, GameConfig, GameSettings, WindowSize};
use crate::core::event::{Event, KeyCode};
use crate::core::paths;
use crate::core::render_target::RenderTarget;
use crate::core::EventBroadcaster;
use crate::platform::{Platform, PlatformError};

//=== TickControl =========================================================

/// Tells the platform loop whether to keep running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Exit,
}

//=== GameError ===========================================================

/// Fatal errors that abort [`Game::run`].
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Platform(#[from] PlatformError),
}

//=== GameCommand =========================================================

/// Requests queued through a [`GameHandle`] and applied by the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameCommand {
    Quit,
    SetName(String),
    SetFullScreen(bool),
    SetWindowSize(WindowSize),
    SetEditorVisible(bool),
}

//=== GameHandle ==========================================================

/// Cheap, cloneable reference to a running game.
///
/// Subsystems receive a handle at construction instead of looking the
/// game up globally. Commands are queued and take effect the next time
/// the game drains its queue (after each event and each frame); window
/// changes are pushed to the platform at the end of the frame.
///
/// The handle is `Send`, so worker threads may queue commands too.
#[derive(Debug, Clone)]
pub struct GameHandle {
    commands: Sender<GameCommand>,
    frame_delta_nanos: Arc<AtomicU64>,
}

impl GameHandle {
    /// Queues an arbitrary command.
    ///
    /// If the game has already been dropped the command is logged and
    /// discarded.
    pub fn send(&self, command: GameCommand) {
        if let Err(err) = self.commands.send(command) {
            warn!(target: "game", "Game is gone, dropping command {:?}", err.into_inner());
        }
    }

    /// Requests the game loop to end.
    pub fn quit(&self) {
        self.send(GameCommand::Quit);
    }

    /// Renames the game (also the window title).
    pub fn set_name(&self, name: impl Into<String>) {
        self.send(GameCommand::SetName(name.into()));
    }

    pub fn set_full_screen(&self, full_screen: bool) {
        self.send(GameCommand::SetFullScreen(full_screen));
    }

    /// Resizes the window. A size with a zero dimension is ignored.
    pub fn set_window_size(&self, size: WindowSize) {
        self.send(GameCommand::SetWindowSize(size));
    }

    pub fn set_editor_visible(&self, visible: bool) {
        self.send(GameCommand::SetEditorVisible(visible));
    }

    /// Duration of the last completed frame.
    pub fn frame_delta(&self) -> Duration {
        Duration::from_nanos(self.frame_delta_nanos.load(Ordering::Relaxed))
    }
}

//=== GameBuilder =========================================================

/// Builder for configuring and constructing a [`Game`].
///
/// # Default Values
///
/// - **Settings**: [`GameSettings::default`] (640×480, windowed)
/// - **Config**: `config.json` in [`paths::resource_dir`]
/// - **Escape quits**: enabled
///
/// # Examples
///
/// ```no_run
/// use beacon_engine::GameBuilder;
///
/// let game = GameBuilder::new()
///     .with_name("Sandbox")
///     .without_config()
///     .build();
///
/// let quit = game.handle();
/// game.events().key_down_event().connect(move |key| {
///     if key.modifiers.ctrl {
///         quit.quit();
///     }
/// });
///
/// game.run().expect("game failed");
/// ```
#[derive(Debug, Clone)]
pub struct GameBuilder {
    settings: GameSettings,
    resource_dir: Option<PathBuf>,
    config_name: Option<String>,
    escape_quits: bool,
}

impl GameBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            settings: GameSettings::default(),
            resource_dir: None,
            config_name: Some("config".to_string()),
            escape_quits: true,
        }
    }

    /// Sets the game name. The config file may override it.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.settings.name = name.into();
        self
    }

    /// Sets the initial window size. The config file may override it.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "Window size must be positive, got {}x{}", width, height);
        self.settings.window_size = WindowSize::new(width, height);
        self
    }

    pub fn with_full_screen(mut self, full_screen: bool) -> Self {
        self.settings.full_screen = full_screen;
        self
    }

    /// Overrides the resource directory the config is read from.
    pub fn with_resource_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.resource_dir = Some(dir.into());
        self
    }

    /// Reads `<resource dir>/<name>.json` at startup instead of `config.json`.
    pub fn with_config_name(mut self, name: impl Into<String>) -> Self {
        self.config_name = Some(name.into());
        self
    }

    /// Skips config loading entirely.
    pub fn without_config(mut self) -> Self {
        self.config_name = None;
        self
    }

    /// Whether pressing Escape ends the game. Default: true.
    pub fn with_escape_quits(mut self, escape_quits: bool) -> Self {
        self.escape_quits = escape_quits;
        self
    }

    /// Builds the game. Nothing is loaded or opened until [`Game::run`].
    pub fn build(self) -> Game {
        let (sender, receiver) = unbounded();
        let handle = GameHandle {
            commands: sender,
            frame_delta_nanos: Arc::new(AtomicU64::new(0)),
        };

        let events = EventBroadcaster::new();
        let quit = handle.clone();
        events.quit_event().connect(move |_| quit.quit());

        info!(target: "game", "Building game '{}'", self.settings.name);

        Game {
            events,
            settings: self.settings,
            resource_dir: self.resource_dir,
            config_name: self.config_name,
            escape_quits: self.escape_quits,
            handle,
            commands: receiver,
            frame_delta: Duration::ZERO,
            last_frame: None,
            quit_requested: false,
        }
    }
}

impl Default for GameBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Game ================================================================

/// A game: settings, event signals and the frame sequence.
///
/// The quit signal is wired to end the loop, so closing the window or
/// emitting quit from any subscriber stops the game after the current
/// event.
pub struct Game {
    events: EventBroadcaster,
    settings: GameSettings,
    resource_dir: Option<PathBuf>,
    config_name: Option<String>,
    escape_quits: bool,

    handle: GameHandle,
    commands: Receiver<GameCommand>,

    frame_delta: Duration,
    last_frame: Option<Instant>,
    quit_requested: bool,
}

impl Game {
    //--- Accessors --------------------------------------------------------

    /// Signals for lifecycle and input events.
    pub fn events(&self) -> &EventBroadcaster {
        &self.events
    }

    /// A new handle for queuing commands.
    pub fn handle(&self) -> GameHandle {
        self.handle.clone()
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn name(&self) -> &str {
        &self.settings.name
    }

    pub fn is_full_screen(&self) -> bool {
        self.settings.full_screen
    }

    pub fn window_size(&self) -> WindowSize {
        self.settings.window_size
    }

    pub fn is_editor_visible(&self) -> bool {
        self.settings.editor_visible
    }

    /// Duration of the last completed frame (zero before the second frame).
    pub fn frame_delta(&self) -> Duration {
        self.frame_delta
    }

    pub fn is_quit_requested(&self) -> bool {
        self.quit_requested
    }

    //--- Execution --------------------------------------------------------

    /// Loads the config, opens the window and runs until quit.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Config`] if the config cannot be read or
    /// parsed, and [`GameError::Platform`] if the event loop fails.
    pub fn run(mut self) -> Result<(), GameError> {
        self.initialize()?;

        info!(target: "game", "Starting '{}'", self.settings.name);
        Platform::new(self).run()?;
        info!(target: "game", "Game loop exited");

        Ok(())
    }

    /// Applies the config file, if one is configured.
    pub fn initialize(&mut self) -> Result<(), ConfigError> {
        let Some(config_name) = &self.config_name else {
            debug!(target: "game", "Config loading disabled");
            return Ok(());
        };

        let dir = self.resource_dir.clone().unwrap_or_else(paths::resource_dir);
        let config = GameConfig::load(&dir, config_name)?;
        config.apply(&mut self.settings);

        Ok(())
    }

    //--- Frame Sequencing -------------------------------------------------

    /// Broadcasts one platform event and applies the built-in handling.
    pub fn process_event(&mut self, event: &Event) -> TickControl {
        self.events.broadcast_event(event);

        if let Event::KeyPressed(key) = event {
            if self.escape_quits && key.code == KeyCode::Escape {
                debug!(target: "game", "Escape pressed, quitting");
                self.quit_requested = true;
            }
        }

        self.drain_commands()
    }

    /// Runs one frame: update subscribers, then draw subscribers.
    pub fn frame(&mut self, target: &(dyn RenderTarget + 'static)) -> TickControl {
        let now = Instant::now();
        self.frame_delta = self
            .last_frame
            .map(|last| now.duration_since(last))
            .unwrap_or(Duration::ZERO);
        self.last_frame = Some(now);
        self.handle
            .frame_delta_nanos
            .store(saturating_nanos(self.frame_delta), Ordering::Relaxed);

        self.events.emit_update();
        self.events.emit_draw(target);

        self.drain_commands()
    }

    /// Applies every queued command.
    fn drain_commands(&mut self) -> TickControl {
        while let Ok(command) = self.commands.try_recv() {
            self.apply_command(command);
        }

        if self.quit_requested {
            TickControl::Exit
        } else {
            TickControl::Continue
        }
    }

    fn apply_command(&mut self, command: GameCommand) {
        debug!(target: "game", "Applying {:?}", command);
        match command {
            GameCommand::Quit => self.quit_requested = true,
            GameCommand::SetName(name) => self.settings.name = name,
            GameCommand::SetFullScreen(full_screen) => self.settings.full_screen = full_screen,
            GameCommand::SetWindowSize(size) if size.is_positive() => self.settings.window_size = size,
            GameCommand::SetWindowSize(size) => {
                warn!(
                    target: "game",
                    "Ignoring window size {}x{}, both dimensions must be positive",
                    size.width,
                    size.height
                );
            }
            GameCommand::SetEditorVisible(visible) => self.settings.editor_visible = visible,
        }
    }
}

/// Nanoseconds in `duration`, clamped to `u64::MAX`.
fn saturating_nanos(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}

//=========================================================================
// Unit Tests
//=========================================================================
