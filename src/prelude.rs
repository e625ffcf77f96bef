//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use beacon_engine::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Game driver
pub use crate::engine::{Game, GameBuilder, GameHandle};

// Signals
pub use crate::core::signal::{Signal, SlotRef};
pub use crate::core::EventBroadcaster;

// Events
pub use crate::core::event::{Event, KeyCode, KeyEvent, Modifiers, MouseButton, TextEvent};

// Rendering
pub use crate::core::render_target::RenderTarget;
