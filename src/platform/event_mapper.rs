//=========================================================================
// Platform Event Mapper
//=========================================================================
//
// Converts Winit window events into engine `Event` records.
//
// Architecture:
//   WindowEvent → EventMapper → Vec<Event> → Game::process_event
//
// Stateful tracking: modifier state (from ModifiersChanged) is stamped
// onto every key event, and the last cursor position is stamped onto
// mouse button events, since Winit reports neither inline. One key press
// may yield a KeyPressed followed by one TextEntered per produced char.
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::{
    event::{ElementState, KeyEvent as WinitKeyEvent, MouseButton as WinitMouseButton},
    event::{MouseScrollDelta, WindowEvent},
    keyboard::{KeyCode as WinitKeyCode, ModifiersState, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use crate::core::event::{Event, KeyCode, KeyEvent, Modifiers, MouseButton, TextEvent};

/// Pixels per wheel "line" when the platform reports pixel deltas.
const PIXELS_PER_LINE: f32 = 20.0;

//=== EventMapper =========================================================

/// Converts Winit events to engine events with modifier/cursor tracking.
pub(crate) struct EventMapper {
    modifiers: Modifiers,
    cursor: (f32, f32),
}

impl EventMapper {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new() -> Self {
        Self {
            modifiers: Modifiers::NONE,
            cursor: (0.0, 0.0),
        }
    }

    #[cfg(test)]
    pub(crate) fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    //--- Event Mapping ----------------------------------------------------

    /// Maps one window event; events the engine does not model map to
    /// nothing. `RedrawRequested` is the frame boundary and is handled by
    /// the platform loop, not here.
    pub(crate) fn map(&mut self, event: &WindowEvent) -> Vec<Event> {
        match event {
            WindowEvent::CloseRequested => vec![Event::Closed],

            WindowEvent::Resized(size) => vec![Event::Resized {
                width: size.width,
                height: size.height,
            }],

            WindowEvent::Focused(true) => vec![Event::FocusGained],
            WindowEvent::Focused(false) => vec![Event::FocusLost],

            WindowEvent::ModifiersChanged(state) => {
                self.update_modifiers(state.state());
                Vec::new()
            }

            WindowEvent::KeyboardInput { event, .. } => self.map_key_event(event),

            WindowEvent::CursorMoved { position, .. } => {
                vec![self.cursor_moved(position.x as f32, position.y as f32)]
            }

            WindowEvent::MouseInput { state, button, .. } => {
                vec![self.mouse_button(*button, *state)]
            }

            WindowEvent::MouseWheel { delta, .. } => vec![Self::wheel(*delta)],

            _ => Vec::new(),
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn update_modifiers(&mut self, state: ModifiersState) {
        self.modifiers = Modifiers::from(state);
    }

    fn map_key_event(&self, key_event: &WinitKeyEvent) -> Vec<Event> {
        let code = match key_event.physical_key {
            PhysicalKey::Code(code) => KeyCode::from(code),
            PhysicalKey::Unidentified(_) => KeyCode::Unidentified,
        };

        let mut events = vec![self.key(code, key_event.state)];
        if key_event.state == ElementState::Pressed {
            if let Some(text) = &key_event.text {
                events.extend(Self::text(text));
            }
        }
        events
    }

    fn key(&self, code: KeyCode, state: ElementState) -> Event {
        let key = KeyEvent::new(code, self.modifiers);
        match state {
            ElementState::Pressed => Event::KeyPressed(key),
            ElementState::Released => Event::KeyReleased(key),
        }
    }

    fn text(text: &str) -> impl Iterator<Item = Event> + '_ {
        text.chars()
            .map(|unicode| Event::TextEntered(TextEvent { unicode }))
    }

    fn cursor_moved(&mut self, x: f32, y: f32) -> Event {
        self.cursor = (x, y);
        Event::MouseMoved { x, y }
    }

    fn mouse_button(&self, button: WinitMouseButton, state: ElementState) -> Event {
        let button = MouseButton::from(button);
        let (x, y) = self.cursor;
        match state {
            ElementState::Pressed => Event::MouseButtonPressed { button, x, y },
            ElementState::Released => Event::MouseButtonReleased { button, x, y },
        }
    }

    fn wheel(delta: MouseScrollDelta) -> Event {
        let (delta_x, delta_y) = match delta {
            MouseScrollDelta::LineDelta(x, y) => (x, y),
            MouseScrollDelta::PixelDelta(pos) => {
                (pos.x as f32 / PIXELS_PER_LINE, pos.y as f32 / PIXELS_PER_LINE)
            }
        };
        Event::MouseWheelScrolled { delta_x, delta_y }
    }
}

//=========================================================================
// Winit Conversions
//=========================================================================

/// Winit normalizes platform keys (macOS Option → Alt, Cmd → Super).
impl From<ModifiersState> for Modifiers {
    fn from(state: ModifiersState) -> Self {
        Self {
            shift: state.shift_key(),
            ctrl: state.control_key(),
            alt: state.alt_key(),
            system: state.super_key(),
        }
    }
}

/// Maps A-Z, 0-9, F1-F12, arrows and common special keys. Everything
/// else becomes `KeyCode::Unidentified`.
impl From<WinitKeyCode> for KeyCode {
    fn from(code: WinitKeyCode) -> Self {
        use WinitKeyCode as W;
        match code {
            //--- Digits -------------------------------------------------------
            W::Digit0 => KeyCode::Digit0,
            W::Digit1 => KeyCode::Digit1,
            W::Digit2 => KeyCode::Digit2,
            W::Digit3 => KeyCode::Digit3,
            W::Digit4 => KeyCode::Digit4,
            W::Digit5 => KeyCode::Digit5,
            W::Digit6 => KeyCode::Digit6,
            W::Digit7 => KeyCode::Digit7,
            W::Digit8 => KeyCode::Digit8,
            W::Digit9 => KeyCode::Digit9,

            //--- Letters ------------------------------------------------------
            W::KeyA => KeyCode::KeyA,
            W::KeyB => KeyCode::KeyB,
            W::KeyC => KeyCode::KeyC,
            W::KeyD => KeyCode::KeyD,
            W::KeyE => KeyCode::KeyE,
            W::KeyF => KeyCode::KeyF,
            W::KeyG => KeyCode::KeyG,
            W::KeyH => KeyCode::KeyH,
            W::KeyI => KeyCode::KeyI,
            W::KeyJ => KeyCode::KeyJ,
            W::KeyK => KeyCode::KeyK,
            W::KeyL => KeyCode::KeyL,
            W::KeyM => KeyCode::KeyM,
            W::KeyN => KeyCode::KeyN,
            W::KeyO => KeyCode::KeyO,
            W::KeyP => KeyCode::KeyP,
            W::KeyQ => KeyCode::KeyQ,
            W::KeyR => KeyCode::KeyR,
            W::KeyS => KeyCode::KeyS,
            W::KeyT => KeyCode::KeyT,
            W::KeyU => KeyCode::KeyU,
            W::KeyV => KeyCode::KeyV,
            W::KeyW => KeyCode::KeyW,
            W::KeyX => KeyCode::KeyX,
            W::KeyY => KeyCode::KeyY,
            W::KeyZ => KeyCode::KeyZ,

            //--- Function -----------------------------------------------------
            W::F1 => KeyCode::F1,
            W::F2 => KeyCode::F2,
            W::F3 => KeyCode::F3,
            W::F4 => KeyCode::F4,
            W::F5 => KeyCode::F5,
            W::F6 => KeyCode::F6,
            W::F7 => KeyCode::F7,
            W::F8 => KeyCode::F8,
            W::F9 => KeyCode::F9,
            W::F10 => KeyCode::F10,
            W::F11 => KeyCode::F11,
            W::F12 => KeyCode::F12,

            //--- Arrows -------------------------------------------------------
            W::ArrowUp => KeyCode::ArrowUp,
            W::ArrowDown => KeyCode::ArrowDown,
            W::ArrowLeft => KeyCode::ArrowLeft,
            W::ArrowRight => KeyCode::ArrowRight,

            //--- Special ------------------------------------------------------
            W::Space => KeyCode::Space,
            W::Enter => KeyCode::Enter,
            W::Escape => KeyCode::Escape,
            W::Tab => KeyCode::Tab,
            W::Backspace => KeyCode::Backspace,
            W::Delete => KeyCode::Delete,
            W::Backquote => KeyCode::Backquote,

            _ => KeyCode::Unidentified,
        }
    }
}

/// Left/Right/Middle map directly; Back/Forward/Other → Other.
impl From<WinitMouseButton> for MouseButton {
    fn from(button: WinitMouseButton) -> Self {
        match button {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            _ => MouseButton::Other,
        }
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::{PhysicalPosition, PhysicalSize};

    fn make_modifiers(shift: bool, ctrl: bool, alt: bool) -> ModifiersState {
        let mut state = ModifiersState::empty();
        if shift { state.insert(ModifiersState::SHIFT); }
        if ctrl { state.insert(ModifiersState::CONTROL); }
        if alt { state.insert(ModifiersState::ALT); }
        state
    }

    //=====================================================================
    // Window Event Tests
    //=====================================================================

    #[test]
    fn close_requested_maps_to_closed() {
        let mut mapper = EventMapper::new();
        assert_eq!(mapper.map(&WindowEvent::CloseRequested), vec![Event::Closed]);
    }

    #[test]
    fn resize_and_focus_map() {
        let mut mapper = EventMapper::new();

        assert_eq!(
            mapper.map(&WindowEvent::Resized(PhysicalSize::new(800, 600))),
            vec![Event::Resized { width: 800, height: 600 }]
        );
        assert_eq!(mapper.map(&WindowEvent::Focused(true)), vec![Event::FocusGained]);
        assert_eq!(mapper.map(&WindowEvent::Focused(false)), vec![Event::FocusLost]);
    }

    #[test]
    fn redraw_requested_maps_to_nothing() {
        let mut mapper = EventMapper::new();
        assert!(mapper.map(&WindowEvent::RedrawRequested).is_empty());
    }

    //=====================================================================
    // Keyboard Tests
    //=====================================================================

    #[test]
    fn starts_with_no_modifiers() {
        let mapper = EventMapper::new();
        assert_eq!(mapper.modifiers(), Modifiers::NONE);
    }

    #[test]
    fn key_events_carry_current_modifiers() {
        let mut mapper = EventMapper::new();
        mapper.update_modifiers(make_modifiers(false, true, false));

        match mapper.key(KeyCode::KeyS, ElementState::Pressed) {
            Event::KeyPressed(key) => {
                assert_eq!(key.code, KeyCode::KeyS);
                assert!(key.modifiers.ctrl);
                assert!(!key.modifiers.shift);
            }
            other => panic!("Expected KeyPressed, got {:?}", other),
        }

        match mapper.key(KeyCode::KeyS, ElementState::Released) {
            Event::KeyReleased(key) => assert!(key.modifiers.ctrl),
            other => panic!("Expected KeyReleased, got {:?}", other),
        }
    }

    #[test]
    fn text_yields_one_event_per_char() {
        let events: Vec<Event> = EventMapper::text("hé").collect();
        assert_eq!(
            events,
            vec![
                Event::TextEntered(TextEvent { unicode: 'h' }),
                Event::TextEntered(TextEvent { unicode: 'é' }),
            ]
        );
    }

    #[test]
    fn keycode_conversion() {
        assert_eq!(KeyCode::from(WinitKeyCode::KeyA), KeyCode::KeyA);
        assert_eq!(KeyCode::from(WinitKeyCode::Escape), KeyCode::Escape);
        assert_eq!(KeyCode::from(WinitKeyCode::F12), KeyCode::F12);
        assert_eq!(KeyCode::from(WinitKeyCode::F13), KeyCode::Unidentified);
    }

    #[test]
    fn modifiers_conversion_includes_super() {
        let mut state = make_modifiers(true, false, true);
        state.insert(ModifiersState::SUPER);

        let mods = Modifiers::from(state);
        assert!(mods.shift && !mods.ctrl && mods.alt && mods.system);
    }

    //=====================================================================
    // Mouse Tests
    //=====================================================================

    #[test]
    fn mouse_button_uses_last_cursor_position() {
        let mut mapper = EventMapper::new();
        mapper.cursor_moved(12.0, 34.0);

        assert_eq!(
            mapper.mouse_button(WinitMouseButton::Left, ElementState::Pressed),
            Event::MouseButtonPressed { button: MouseButton::Left, x: 12.0, y: 34.0 }
        );
        assert_eq!(
            mapper.mouse_button(WinitMouseButton::Back, ElementState::Released),
            Event::MouseButtonReleased { button: MouseButton::Other, x: 12.0, y: 34.0 }
        );
    }

    #[test]
    fn wheel_pixel_delta_is_scaled_to_lines() {
        assert_eq!(
            EventMapper::wheel(MouseScrollDelta::LineDelta(0.0, 1.0)),
            Event::MouseWheelScrolled { delta_x: 0.0, delta_y: 1.0 }
        );
        assert_eq!(
            EventMapper::wheel(MouseScrollDelta::PixelDelta(PhysicalPosition::new(40.0, -20.0))),
            Event::MouseWheelScrolled { delta_x: 2.0, delta_y: -1.0 }
        );
    }
}
