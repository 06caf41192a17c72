//=========================================================================
// Frame Events
//=========================================================================
//
// Per-frame notifications published by a scene registry.
//
// Architecture:
//   SceneObjectManager (moves, contacts) → publish<E>()
//                                           ↓
//                          HashMap<TypeId, Vec<E>>
//                                           ↓
//   Screen logic ─────────────────────→ read<E>()
//                                           ↓
//   SceneObjectManager::update() ─────→ clear_all() (next frame)
//
// Events of frame N stay readable until frame N+1 starts updating, so
// a screen's own update can react to what its entities just did.
//
//=========================================================================

//=== Module Declarations =================================================

mod bus;
mod queue;

//=== Public API ==========================================================

pub use bus::FrameEvents;

/// Marker for types that can travel on [`FrameEvents`].
pub trait FrameEvent: 'static {}

impl<T: 'static> FrameEvent for T {}
