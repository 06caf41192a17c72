//=========================================================================
// Input Event Types
//
// Portable representation of raw device input.
//
// The device layer (keyboard, mouse, gamepad polling) lives outside the
// core. It translates whatever it reads into these types and pushes them,
// batched per poll, through an `InputFeed`.
//
// Event Flow:
// ```text
// Device layer
//         ↓
//    InputBatch (this module)
//         ↓
//    InputFeed (bounded channel)
//         ↓
//    InputState (current / previous snapshot)
//         ↓
//    Focused screen's handle_input()
// ```
//
//=========================================================================

//=== MouseButton =========================================================

/// Physical mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button (typically left).
    Left,

    /// Secondary button (typically right).
    Right,

    /// Middle button (wheel click).
    Middle,

    /// Any other button (side buttons, thumb buttons).
    Other,
}

//=== PadButton ===========================================================

/// Gamepad button, named after the common console layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PadButton {
    A,
    B,
    X,
    Y,

    //--- Directional Pad --------------------------------------------------
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,

    //--- System Buttons ---------------------------------------------------
    Start,
    Back,

    LeftShoulder,
    RightShoulder,
}

//=== KeyCode =============================================================

/// Physical keyboard key identifier.
///
/// Represents the physical key location, not the character produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------

    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------

    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

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

    /// Key reported by the device layer but not mapped here.
    Unidentified,
}

//=== InputEvent ==========================================================

/// A single device change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(KeyCode),
    KeyUp(KeyCode),

    MouseButtonDown(MouseButton),
    MouseButtonUp(MouseButton),

    /// Cursor position in screen space (pixels, top-left origin).
    MouseMoved { x: f32, y: f32 },

    PadButtonDown(PadButton),
    PadButtonUp(PadButton),
}

/// Events read by the device layer in one poll, in arrival order.
pub type InputBatch = Vec<InputEvent>;
