//=========================================================================
// Core Systems
//
// Per-screen simulation and the screen stack that drives it.
//
// Layout (leaves first):
// - geometry, time, render, content   value types and host contracts
// - config                            TOML-backed tunables
// - events                            per-frame typed event bus
// - entity                            capability traits + registry
// - physics                           collision grid, movement integrator
// - input                             device snapshot and feed
// - screen                            transition state machine + stack
//
// Notes:
// Nothing here spawns threads or touches the OS. One external driver
// calls update then draw once per frame.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod config;
pub mod content;
pub mod entity;
pub mod events;
pub mod geometry;
pub mod input;
pub mod physics;
pub mod render;
pub mod screen;
pub mod time;

//=== Public API ==========================================================

pub use config::{ConfigError, CoreConfig};
pub use content::{AssetHandle, ContentError, ContentLoader};
pub use entity::{EntityId, SceneObjectManager};
pub use geometry::Rect;
pub use screen::{GameScreen, ScreenManager};
pub use time::GameTime;
