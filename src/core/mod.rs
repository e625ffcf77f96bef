//=========================================================================
// Core
//=========================================================================
//
// Platform-independent building blocks.
//
// Components:
// - `signal`: typed multi-subscriber channel (Signal, SlotRef)
// - `broadcaster`: routes tagged events into per-kind signals
// - `event`: event records and their payloads
// - `render_target`: opaque surface handed to draw subscribers
// - `config` / `paths`: startup settings and resource lookup
//
// Nothing here depends on Winit; the platform layer adapts to it.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod broadcaster;
pub mod config;
pub mod event;
pub mod paths;
pub mod render_target;
pub mod signal;

//=== Public API ==========================================================

pub use broadcaster::EventBroadcaster;
pub use config::{ConfigError, GameConfig, GameSettings, WindowSize};
pub use event::{Event, EventKind, KeyCode, KeyEvent, Modifiers, MouseButton, TextEvent};
pub use render_target::RenderTarget;
pub use signal::{Signal, SignalError, SlotRef};
