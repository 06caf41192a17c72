//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use strata_engine::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine facade
pub use crate::engine::{Engine, EngineBuilder};

// Configuration and time
pub use crate::core::config::CoreConfig;
pub use crate::core::time::GameTime;

// Entities
pub use crate::core::entity::{
    Collidable, Drawable, Entity, EntityId, Loadable, Movable, SceneObjectManager, Updateable,
};

// Collision and movement
pub use crate::core::physics::{CollisionCategory, Contact};

// Geometry, rendering and content
pub use crate::core::content::{AssetHandle, ContentError, ContentLoader};
pub use crate::core::geometry::Rect;
pub use crate::core::render::{Color, RenderTarget, SpriteDraw, TextDraw};

// Input
pub use crate::core::input::{InputState, KeyCode, MouseButton, PadButton};

// Screens
pub use crate::core::screen::{GameScreen, Screen, ScreenContext, ScreenManager, ScreenState, ScreenView};
pub use crate::screens::{MenuEntry, MenuScreen, MessageBoxScreen};
