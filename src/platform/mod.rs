//=========================================================================
// Platform Subsystem
//
// Bridges Winit (OS-level events) with the game driver.
//
// Architecture:
// ```text
//  Main Thread
//  ┌──────────────────────────────────────────────┐
//  │  Winit Event Loop                            │
//  │   ↓                                          │
//  │  EventMapper (WindowEvent → Event)           │
//  │   ↓                                          │
//  │  Game::process_event ─► EventBroadcaster     │
//  │   ↓                                          │
//  │  RedrawRequested (frame boundary)            │
//  │   ├─ Game::frame(&window) ─► update, draw    │
//  │   ├─ sync window with changed settings       │
//  │   └─ request next redraw                     │
//  └──────────────────────────────────────────────┘
// ```
//
// Key Design Decisions:
// - **Single thread**: events, update and draw all run in-line on the
//   Winit thread, one at a time
// - **End-of-frame window sync**: title, size and fullscreen changes
//   requested during a frame are applied only after draw
// - **Main thread requirement**: Winit mandates main thread on macOS/iOS,
//   so this runs on the thread that called `Game::run()`
//
//=========================================================================

//=== Submodules ==========================================================

mod event_mapper;

//=== External Crates =====================================================

use log::*;
use thiserror::Error;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Fullscreen, Window, WindowAttributes},
};

//=== Internal Imports ====================================================

use crate::core::config::{GameSettings, WindowSize};
use crate::core::event::Event;
use crate::core::render_target::RenderTarget;
use crate::engine::{Game, TickControl};
use event_mapper::EventMapper;

//=== PlatformError =======================================================

/// Platform initialization and runtime errors.
///
/// These are fatal: without an event loop the game cannot run.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Failed to create event loop (rare, indicates OS-level issue).
    #[error("event loop creation failed: {0}")]
    EventLoopCreation(#[source] winit::error::EventLoopError),

    /// Event loop execution error.
    #[error("event loop error: {0}")]
    EventLoopExecution(#[source] winit::error::EventLoopError),
}

//=== Window as RenderTarget ==============================================

impl RenderTarget for Window {
    fn size(&self) -> (u32, u32) {
        let size = self.inner_size();
        (size.width, size.height)
    }

    fn scale_factor(&self) -> f64 {
        Window::scale_factor(self)
    }

    fn request_redraw(&self) {
        Window::request_redraw(self)
    }
}

//=== WindowChanges =======================================================

/// Window properties that differ between two settings snapshots.
#[derive(Debug, Default, PartialEq, Eq)]
struct WindowChanges {
    title: Option<String>,
    full_screen: Option<bool>,
    size: Option<WindowSize>,
}

impl WindowChanges {
    fn between(applied: &GameSettings, wanted: &GameSettings) -> Self {
        Self {
            title: (wanted.name != applied.name).then(|| wanted.name.clone()),
            full_screen: (wanted.full_screen != applied.full_screen).then_some(wanted.full_screen),
            size: (wanted.window_size != applied.window_size).then_some(wanted.window_size),
        }
    }
}

//=== Platform ============================================================

/// Window owner and event pump for a [`Game`].
///
/// # Lifecycle
///
/// 1. **Construction**: `Platform::new(game)`
/// 2. **Execution**: `platform.run()` - blocks in the Winit event loop
/// 3. **Event processing**: Winit calls `ApplicationHandler` methods
/// 4. **Shutdown**: the game returns `TickControl::Exit` → loop exits
pub(crate) struct Platform {
    game: Game,

    /// OS window handle (None until `resumed()` called).
    window: Option<Window>,

    /// Settings last pushed to the window.
    applied: GameSettings,

    mapper: EventMapper,
}

impl Platform {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new(game: Game) -> Self {
        let applied = game.settings().clone();
        Self {
            game,
            window: None,
            applied,
            mapper: EventMapper::new(),
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the Winit event loop until the game asks to exit.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop cannot be created or
    /// fails while running.
    ///
    /// # Panics
    ///
    /// Panics if called off the main thread (macOS/iOS Winit requirement).
    pub(crate) fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting Winit event loop");

        let event_loop = EventLoop::new().map_err(PlatformError::EventLoopCreation)?;

        event_loop
            .run_app(&mut self)
            .map_err(PlatformError::EventLoopExecution)
    }

    //--- Internal Helpers -------------------------------------------------

    fn window_attributes(settings: &GameSettings) -> WindowAttributes {
        WindowAttributes::default()
            .with_title(settings.name.clone())
            .with_inner_size(LogicalSize::new(
                settings.window_size.width,
                settings.window_size.height,
            ))
            .with_fullscreen(Self::fullscreen_mode(settings.full_screen))
    }

    fn fullscreen_mode(full_screen: bool) -> Option<Fullscreen> {
        full_screen.then_some(Fullscreen::Borderless(None))
    }

    /// Pushes settings changed since the last sync to the window.
    fn sync_window(&mut self) {
        let Some(window) = &self.window else {
            return;
        };
        let wanted = self.game.settings();
        let changes = WindowChanges::between(&self.applied, wanted);

        if let Some(title) = &changes.title {
            debug!(target: "platform", "Retitling window to '{}'", title);
            window.set_title(title);
        }

        if let Some(full_screen) = changes.full_screen {
            info!(target: "platform", "Switching full screen: {}", full_screen);
            window.set_fullscreen(Self::fullscreen_mode(full_screen));
        }

        if let Some(size) = changes.size {
            info!(target: "platform", "Resizing window to {}x{}", size.width, size.height);
            let _ = window.request_inner_size(LogicalSize::new(size.width, size.height));
        }

        self.applied = wanted.clone();
    }

    fn apply_control(&mut self, control: TickControl, event_loop: &ActiveEventLoop) {
        if control == TickControl::Exit {
            info!(target: "platform", "Game requested exit");
            event_loop.exit();
        }
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for Platform {
    /// Called when app becomes active (startup or mobile resume).
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        match event_loop.create_window(Self::window_attributes(self.game.settings())) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                window.request_redraw();
                self.applied = self.game.settings().clone();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                event_loop.exit();
            }
        }
    }

    /// Handles per-window events.
    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        if let WindowEvent::RedrawRequested = event {
            let Some(window) = &self.window else {
                return;
            };

            // Frame boundary
            let control = self.game.frame(window);
            self.sync_window();
            self.apply_control(control, event_loop);

            if let Some(window) = &self.window {
                window.request_redraw();
            }
            return;
        }

        let control = dispatch(&mut self.game, self.mapper.map(&event));
        self.apply_control(control, event_loop);
    }
}

/// Feeds mapped events to the game, stopping at the first that ends it.
fn dispatch(game: &mut Game, events: impl IntoIterator<Item = Event>) -> TickControl {
    for event in events {
        trace!(target: "platform::input", "{:?}", event);
        if game.process_event(&event) == TickControl::Exit {
            return TickControl::Exit;
        }
    }
    TickControl::Continue
}

//=========================================================================
// Unit Tests
//=========================================================================
