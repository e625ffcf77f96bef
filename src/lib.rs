//=========================================================================
// Beacon Engine — Library Root
//
// A small game-engine scaffold: one window, one frame loop, and typed
// signal/slot event dispatch.
//
// Responsibilities:
// - Expose the signal primitive and the event broadcaster (`core`)
// - Expose the game driver (`Game`, `GameBuilder`, `GameHandle`)
// - Keep the Winit integration (`platform`) hidden from end users
//
// Typical usage:
// ```no_run
// use beacon_engine::GameBuilder;
//
// fn main() -> Result<(), beacon_engine::GameError> {
//     let game = GameBuilder::new().with_name("Demo").build();
//     game.events().update_event().connect(|_| { /* tick */ });
//     game.run()
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the platform-independent pieces: signals, the broadcaster,
// event records and configuration.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` owns the Winit event loop and window and is not part of the
// public API surface.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use engine::{Game, GameBuilder, GameCommand, GameError, GameHandle, TickControl};
pub use platform::PlatformError;
