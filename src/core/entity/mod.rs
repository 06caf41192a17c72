//=========================================================================
// Entities
//=========================================================================
//
// Entity identity and the optional capabilities an entity can expose.
//
// Architecture:
//   Box<dyn Entity>
//     ├─ as_loadable_mut()   → Loadable    (content load / unload)
//     ├─ as_movable_mut()    → Movable     (position, velocity)
//     ├─ as_collidable_mut() → Collidable  (bounds, category, contacts)
//     ├─ as_updateable_mut() → Updateable  (per-frame logic)
//     └─ as_drawable()       → Drawable    (draw order, draw call)
//
// The registry probes these accessors once when an entity is added and
// files the entity under every capability that answered `Some`.
//
//=========================================================================

//=== Module Declarations =================================================

mod registry;

//=== External Dependencies ===============================================

use std::any::Any;
use std::fmt;

use bitflags::bitflags;
use glam::{Affine2, Vec2};

//=== Internal Dependencies ===============================================

use crate::core::content::{ContentError, ContentLoader};
use crate::core::geometry::Rect;
use crate::core::physics::{CollisionCategory, Contact};
use crate::core::render::RenderTarget;
use crate::core::time::GameTime;

//=== Public API ==========================================================

pub use registry::SceneObjectManager;

//=== EntityId ============================================================

/// Identity of an entity within one registry.
///
/// Assigned by [`SceneObjectManager::add_entity`], starting at 1 and
/// increasing monotonically. Ids are never reused by the same registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u64);

impl EntityId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

//=== Capabilities ========================================================

bitflags! {
    /// Capability set recorded for an entity at registration time.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        const LOADABLE   = 1 << 0;
        const MOVABLE    = 1 << 1;
        const COLLIDABLE = 1 << 2;
        const UPDATEABLE = 1 << 3;
        const DRAWABLE   = 1 << 4;
    }
}

impl Capabilities {
    /// Queries every capability accessor of `entity` once.
    pub fn probe(entity: &mut dyn Entity) -> Self {
        let mut caps = Capabilities::empty();
        caps.set(Capabilities::LOADABLE, entity.as_loadable_mut().is_some());
        caps.set(Capabilities::MOVABLE, entity.as_movable_mut().is_some());
        caps.set(Capabilities::COLLIDABLE, entity.as_collidable_mut().is_some());
        caps.set(Capabilities::UPDATEABLE, entity.as_updateable_mut().is_some());
        caps.set(Capabilities::DRAWABLE, entity.as_drawable().is_some());
        caps
    }
}

//=== AsAny ===============================================================

/// Downcasting support for entities, implemented for every `'static` type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

//=== Entity ==============================================================

/// A unit of game state owned by a screen's registry.
///
/// Only [`Entity::is_active`] is required. Each capability accessor
/// defaults to `None`; an entity opts into a capability by implementing
/// the trait and returning `Some(self)`:
///
/// ```
/// use strata_engine::prelude::*;
///
/// struct Spinner { angle: f32, alive: bool }
///
/// impl Updateable for Spinner {
///     fn update(&mut self, time: &GameTime) {
///         self.angle += time.delta_seconds();
///     }
/// }
///
/// impl Entity for Spinner {
///     fn is_active(&self) -> bool { self.alive }
///
///     fn as_updateable_mut(&mut self) -> Option<&mut dyn Updateable> {
///         Some(self)
///     }
/// }
/// ```
pub trait Entity: AsAny {
    /// `false` schedules the entity for removal at the next update or draw pass.
    fn is_active(&self) -> bool;

    /// Called once with the identity assigned by the registry.
    fn on_registered(&mut self, _id: EntityId) {}

    fn as_loadable_mut(&mut self) -> Option<&mut dyn Loadable> {
        None
    }

    fn as_movable_mut(&mut self) -> Option<&mut dyn Movable> {
        None
    }

    /// The registry reads bounds and delivers contacts through this handle.
    fn as_collidable_mut(&mut self) -> Option<&mut dyn Collidable> {
        None
    }

    fn as_updateable_mut(&mut self) -> Option<&mut dyn Updateable> {
        None
    }

    fn as_drawable(&self) -> Option<&dyn Drawable> {
        None
    }
}

//=== Capability Traits ===================================================

/// Entity that owns content resources.
pub trait Loadable {
    fn load(&mut self, content: &mut dyn ContentLoader) -> Result<(), ContentError>;

    fn unload(&mut self);

    fn is_loaded(&self) -> bool;
}

/// Entity integrated by the movement manager.
///
/// Velocity is in units per frame.
pub trait Movable {
    fn position(&self) -> Vec2;

    fn set_position(&mut self, position: Vec2);

    fn velocity(&self) -> Vec2;

    fn set_velocity(&mut self, velocity: Vec2);

    /// Multiplier applied to the configured gravity scalar.
    fn gravity_coefficient(&self) -> f32 {
        1.0
    }

    /// Multiplier applied to the configured friction scalar.
    fn friction_coefficient(&self) -> f32 {
        0.0
    }

    /// Called right after the movement manager changes the position.
    fn on_moved(&mut self) {}
}

/// Entity tested by the collision manager.
pub trait Collidable {
    /// Bounding rectangle for the current frame.
    fn bounds(&self) -> Rect;

    /// Predicted bounding rectangle for the next frame.
    fn next_bounds(&self) -> Rect {
        self.bounds()
    }

    /// What this entity is.
    fn category(&self) -> CollisionCategory;

    /// What this entity collides with.
    fn category_mask(&self) -> CollisionCategory;

    fn on_collision(&mut self, contact: &Contact);
}

pub trait Updateable {
    fn update(&mut self, time: &GameTime);
}

/// Entity drawn by its registry, lowest `draw_order` first.
pub trait Drawable {
    fn draw_order(&self) -> i32 {
        0
    }

    fn is_visible(&self) -> bool {
        true
    }

    /// Screen-fixed entities ignore the camera offset (HUD elements).
    fn is_fixed_to_screen(&self) -> bool {
        false
    }

    fn draw(&self, time: &GameTime, target: &mut dyn RenderTarget, transform: Affine2);
}

//=== Notifications =======================================================

/// Published after the movement manager repositions an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityMoved {
    pub id: EntityId,
    pub position: Vec2,
}
