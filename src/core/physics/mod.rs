//=========================================================================
// Physics
//=========================================================================
//
// Collision detection and movement integration for one screen.
//
// Per-frame order (driven by SceneObjectManager::update):
//   submit() × N → detect_collisions() → MovementManager::step() × M
//
//=========================================================================

//=== Module Declarations =================================================

mod collision;
mod movement;

//=== Public API ==========================================================

pub use collision::{CollisionCategory, CollisionEvent, CollisionManager, Contact};
pub use movement::{MovementManager, MovementPhases};
