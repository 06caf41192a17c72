//=========================================================================
// Built-in Screens
//=========================================================================
//
// Generic screen logic shipped with the engine.
//
//   MenuScreen        vertical list of entries, keyboard / pad driven
//   MessageBoxScreen  popup asking to accept or cancel
//
// Both report choices through listener lists. A listener receives the
// screen context, so it can push or exit screens in response.
//
//=========================================================================

//=== Module Declarations =================================================

mod menu;
mod message_box;

//=== Internal Dependencies ===============================================

use crate::core::screen::ScreenContext;

//=== Public API ==========================================================

pub use menu::{MenuEntry, MenuScreen};
pub use message_box::MessageBoxScreen;

/// Callback invoked when a screen reports a choice.
pub type ScreenListener = Box<dyn FnMut(&mut ScreenContext<'_>)>;
