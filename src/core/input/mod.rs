//=========================================================================
// Input
//
// Device-independent input snapshot consumed by the focused screen.
//
// Responsibilities:
// - Describe raw keyboard, mouse and gamepad changes (`event`)
// - Carry batches from the device layer over a bounded channel (`feed`)
// - Answer edge and menu queries for screens (`input_state`)
//
// The device layer itself is outside the core.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod event;
mod feed;
mod input_state;

//=== Public API ==========================================================

pub use event::{InputBatch, InputEvent, KeyCode, MouseButton, PadButton};
pub use feed::InputFeed;
pub use input_state::{DiscreteInput, InputState};
