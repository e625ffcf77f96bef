//=========================================================================
// Event Records
//=========================================================================
//
// Platform-independent representation of window and input events.
//
// The platform layer (Winit) converts its own events into `Event`
// records; the broadcaster routes them by tag into typed signals.
//
// Event Flow:
// ```text
// Platform Layer (Winit)
//         ↓
//    Event (this module)
//         ↓
//    EventBroadcaster::broadcast_event
//         ↓
//    generic signal + one tag-specific signal
// ```
//
//=========================================================================

//=== MouseButton =========================================================

/// Physical mouse button identifier.
///
/// The `Other` variant covers side buttons, macro buttons, and any
/// non-standard inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button (typically left).
    Left,

    /// Secondary button (typically right).
    Right,

    /// Middle button (wheel click).
    Middle,

    /// Any other button.
    Other,
}

//=== KeyCode =============================================================

/// Physical keyboard key identifier.
///
/// Represents the physical key location, not the character produced.
/// Text produced by a key press arrives separately as
/// [`Event::TextEntered`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------

    /// Number row: 0-9
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------

    /// Letter keys: A-Z (physical location, not character)
    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Function Keys ----------------------------------------------------

    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,

    //--- Arrow Keys -------------------------------------------------------

    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    //--- Special Keys -----------------------------------------------------

    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
    Backquote,

    /// Keys the platform reports but this enum does not name.
    Unidentified,
}

//=== Modifiers ===========================================================

/// Modifier key state at the time of a key event.
///
/// Left and right variants are not distinguished. `system` is the
/// Command key on macOS and the Windows/Super key elsewhere.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub system: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        system: false,
    };

    /// Shift only.
    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    /// Ctrl only.
    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };

    /// Alt only.
    pub const ALT: Self = Self {
        alt: true,
        ..Self::NONE
    };
}

//=== Event Payloads ======================================================

/// Detail carried by key press and release events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }
}

/// Detail carried by text input events: one Unicode scalar value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextEvent {
    pub unicode: char,
}

//=== Event ===============================================================

/// One occurrence reported by the windowing layer.
///
/// The variant is the record's discriminant tag; [`Event::kind`] exposes
/// it without the payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// The window was asked to close.
    Closed,

    /// The window's client area changed size (physical pixels).
    Resized { width: u32, height: u32 },

    FocusGained,
    FocusLost,

    KeyPressed(KeyEvent),
    KeyReleased(KeyEvent),

    /// A character was produced by the keyboard or an input method.
    TextEntered(TextEvent),

    /// Cursor position in window coordinates (pixels, top-left origin).
    MouseMoved { x: f32, y: f32 },

    MouseButtonPressed { button: MouseButton, x: f32, y: f32 },
    MouseButtonReleased { button: MouseButton, x: f32, y: f32 },

    /// Wheel movement in lines; positive `delta_y` scrolls up.
    MouseWheelScrolled { delta_x: f32, delta_y: f32 },

    /// Anything the platform layer produced but the engine does not model.
    Unidentified,
}

/// Payload-free discriminant of an [`Event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Closed,
    Resized,
    FocusGained,
    FocusLost,
    KeyPressed,
    KeyReleased,
    TextEntered,
    MouseMoved,
    MouseButtonPressed,
    MouseButtonReleased,
    MouseWheelScrolled,
    Unidentified,
}

impl Event {
    /// Returns the event's tag.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Closed => EventKind::Closed,
            Self::Resized { .. } => EventKind::Resized,
            Self::FocusGained => EventKind::FocusGained,
            Self::FocusLost => EventKind::FocusLost,
            Self::KeyPressed(_) => EventKind::KeyPressed,
            Self::KeyReleased(_) => EventKind::KeyReleased,
            Self::TextEntered(_) => EventKind::TextEntered,
            Self::MouseMoved { .. } => EventKind::MouseMoved,
            Self::MouseButtonPressed { .. } => EventKind::MouseButtonPressed,
            Self::MouseButtonReleased { .. } => EventKind::MouseButtonReleased,
            Self::MouseWheelScrolled { .. } => EventKind::MouseWheelScrolled,
            Self::Unidentified => EventKind::Unidentified,
        }
    }

    /// Returns the key detail for key press/release events.
    pub fn key(&self) -> Option<&KeyEvent> {
        match self {
            Self::KeyPressed(key) | Self::KeyReleased(key) => Some(key),
            _ => None,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
