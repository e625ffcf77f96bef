//=========================================================================
// Event Broadcaster
//=========================================================================
//
// Fan-out point from one tagged event stream to typed signals.
//
// Routing:
//   broadcast_event(event)
//     ├─► generic       (always, full record, first)
//     └─► by tag:
//           Closed       → quit
//           KeyPressed   → key_down (KeyEvent)
//           KeyReleased  → key_up   (KeyEvent)
//           TextEntered  → text     (TextEvent)
//           anything else → nothing
//
// Update and draw are not routed from events; the frame loop emits them
// directly once per frame.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::rc::Rc;

use log::trace;

//=== Internal Dependencies ===============================================

use super::event::{Event, KeyEvent, TextEvent};
use super::render_target::RenderTarget;
use super::signal::{Signal, SlotRef};

//=== EventBroadcaster ====================================================

/// Owns one signal per standard game event and routes events into them.
///
/// Components connect to the accessor signals. A broadcaster can feed
/// another one: see [`EventBroadcaster::chain_to`].
#[derive(Debug, Default)]
pub struct EventBroadcaster {
    update_event: Signal<()>,
    draw_event: Signal<dyn RenderTarget>,
    quit_event: Signal<()>,

    generic_event: Signal<Event>,
    key_down_event: Signal<KeyEvent>,
    key_up_event: Signal<KeyEvent>,
    text_event: Signal<TextEvent>,
}

impl EventBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Dispatch ---------------------------------------------------------

    /// Emits `event` on the generic signal, then on the signal for its tag.
    pub fn broadcast_event(&self, event: &Event) {
        trace!(target: "broadcaster", "Broadcasting {:?}", event.kind());

        self.generic_event.emit(event);

        match event {
            Event::Closed => self.quit_event.emit(&()),
            Event::KeyPressed(key) => self.key_down_event.emit(key),
            Event::KeyReleased(key) => self.key_up_event.emit(key),
            Event::TextEntered(text) => self.text_event.emit(text),
            _ => {}
        }
    }

    /// Emits the per-frame update signal.
    pub fn emit_update(&self) {
        self.update_event.emit(&());
    }

    /// Emits the per-frame draw signal with the frame's render target.
    pub fn emit_draw(&self, target: &(dyn RenderTarget + 'static)) {
        self.draw_event.emit(target);
    }

    /// Re-broadcasts every event of `parent` through `self`.
    ///
    /// The link holds `self` weakly: dropping the last `Rc` to this
    /// broadcaster ends forwarding. Disconnect the returned handle from
    /// `parent.generic_event()` to unlink earlier.
    pub fn chain_to(self: &Rc<Self>, parent: &EventBroadcaster) -> SlotRef {
        parent
            .generic_event
            .connect_weak(self, EventBroadcaster::broadcast_event)
    }

    //--- Signal Accessors -------------------------------------------------

    pub fn update_event(&self) -> &Signal<()> {
        &self.update_event
    }

    pub fn draw_event(&self) -> &Signal<dyn RenderTarget> {
        &self.draw_event
    }

    pub fn quit_event(&self) -> &Signal<()> {
        &self.quit_event
    }

    pub fn generic_event(&self) -> &Signal<Event> {
        &self.generic_event
    }

    pub fn key_down_event(&self) -> &Signal<KeyEvent> {
        &self.key_down_event
    }

    pub fn key_up_event(&self) -> &Signal<KeyEvent> {
        &self.key_up_event
    }

    pub fn text_event(&self) -> &Signal<TextEvent> {
        &self.text_event
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
