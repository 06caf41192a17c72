//=========================================================================
// Scene Object Manager
//=========================================================================
//
// Owns every entity of one screen and drives their per-frame lifecycle.
//
// Architecture:
//   SceneObjectManager
//     ├─ entities: HashMap<EntityId, Slot>      (master map)
//     ├─ index:    CapabilityIndex              (one id set per capability)
//     ├─ collision: CollisionManager
//     ├─ movement:  MovementManager
//     ├─ content:   Box<dyn ContentLoader>
//     └─ events:    FrameEvents
//
// Update:  clear events → purge inactive → Updateable::update
//          → CollisionManager::submit → detect_collisions → MovementManager
// Draw:    purge inactive → sort Drawables by draw order → Drawable::draw
//
// Invariant: an id is present in the master map iff it is present in
// exactly the capability sets recorded in its slot. Insert and remove
// touch all of them together.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};

use glam::Affine2;
use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::{Capabilities, Entity, EntityId, EntityMoved};
use crate::core::config::CoreConfig;
use crate::core::content::{ContentLoader, MemoryContent};
use crate::core::events::FrameEvents;
use crate::core::physics::{CollisionEvent, CollisionManager, MovementManager};
use crate::core::render::RenderTarget;
use crate::core::time::GameTime;

//=== Slot ================================================================

struct Slot {
    entity: Box<dyn Entity>,
    capabilities: Capabilities,
}

//=== CapabilityIndex =====================================================

/// Per-capability id sets. Ordered so iteration is reproducible.
#[derive(Default)]
struct CapabilityIndex {
    loadable: BTreeSet<EntityId>,
    movable: BTreeSet<EntityId>,
    collidable: BTreeSet<EntityId>,
    updateable: BTreeSet<EntityId>,
    drawable: BTreeSet<EntityId>,
}

impl CapabilityIndex {
    fn sets_mut(&mut self) -> [(Capabilities, &mut BTreeSet<EntityId>); 5] {
        [
            (Capabilities::LOADABLE, &mut self.loadable),
            (Capabilities::MOVABLE, &mut self.movable),
            (Capabilities::COLLIDABLE, &mut self.collidable),
            (Capabilities::UPDATEABLE, &mut self.updateable),
            (Capabilities::DRAWABLE, &mut self.drawable),
        ]
    }

    fn insert(&mut self, id: EntityId, capabilities: Capabilities) {
        for (capability, set) in self.sets_mut() {
            if capabilities.contains(capability) {
                set.insert(id);
            }
        }
    }

    fn remove(&mut self, id: EntityId) {
        for (_, set) in self.sets_mut() {
            set.remove(&id);
        }
    }

    fn set(&self, capability: Capabilities) -> Option<&BTreeSet<EntityId>> {
        match capability {
            c if c == Capabilities::LOADABLE => Some(&self.loadable),
            c if c == Capabilities::MOVABLE => Some(&self.movable),
            c if c == Capabilities::COLLIDABLE => Some(&self.collidable),
            c if c == Capabilities::UPDATEABLE => Some(&self.updateable),
            c if c == Capabilities::DRAWABLE => Some(&self.drawable),
            _ => None,
        }
    }
}

//=== SceneObjectManager ==================================================

/// Entity registry for a single screen.
pub struct SceneObjectManager {
    next_id: AtomicU64,
    entities: HashMap<EntityId, Slot>,
    index: CapabilityIndex,

    collision: CollisionManager,
    movement: MovementManager,
    content: Box<dyn ContentLoader>,
    events: FrameEvents,

    initialized: bool,
    draw_list: Vec<(i32, EntityId)>,
    contacts: Vec<CollisionEvent>,
}

impl SceneObjectManager {
    //--- Construction -----------------------------------------------------

    /// Creates a registry wired to the given services.
    pub fn new(
        collision: CollisionManager,
        movement: MovementManager,
        content: Box<dyn ContentLoader>,
    ) -> Self {
        Self {
            next_id: AtomicU64::new(1),
            entities: HashMap::new(),
            index: CapabilityIndex::default(),
            collision,
            movement,
            content,
            events: FrameEvents::new(),
            initialized: false,
            draw_list: Vec::new(),
            contacts: Vec::new(),
        }
    }

    /// Registry with services built from `config` and an in-memory loader.
    pub fn from_config(config: &CoreConfig) -> Self {
        Self::new(
            CollisionManager::new(&config.collision, config.viewport.rect()),
            MovementManager::new(&config.movement),
            Box::new(MemoryContent::new()),
        )
    }

    //--- Registration -----------------------------------------------------

    /// Registers `entity` under a fresh id and files it by capability.
    ///
    /// If [`load_all`](Self::load_all) already ran and the entity is
    /// loadable, it is loaded before this call returns. A load failure is
    /// logged and the entity stays registered, unloaded.
    pub fn add_entity(&mut self, mut entity: Box<dyn Entity>) -> EntityId {
        let id = self.allocate_id();
        let capabilities = Capabilities::probe(entity.as_mut());

        entity.on_registered(id);

        if self.initialized {
            if let Some(loadable) = entity.as_loadable_mut() {
                if let Err(e) = loadable.load(self.content.as_mut()) {
                    warn!("Entity {} failed to load: {}", id, e);
                }
            }
        }

        self.index.insert(id, capabilities);
        self.entities.insert(id, Slot { entity, capabilities });

        debug!("Added entity {} with {:?}", id, capabilities);
        id
    }

    /// Convenience wrapper boxing a concrete entity.
    pub fn add<E: Entity>(&mut self, entity: E) -> EntityId {
        self.add_entity(Box::new(entity))
    }

    /// Removes `id` from the registry and every capability set.
    ///
    /// Loadable entities are unloaded first when the registry is
    /// initialized. Unknown ids are a no-op returning `None`.
    pub fn remove_entity(&mut self, id: EntityId) -> Option<Box<dyn Entity>> {
        let Some(mut slot) = self.entities.remove(&id) else {
            debug!("Entity {} not registered, skipping removal", id);
            return None;
        };

        self.index.remove(id);

        if self.initialized {
            if let Some(loadable) = slot.entity.as_loadable_mut() {
                loadable.unload();
            }
        }

        debug!("Removed entity {}", id);
        Some(slot.entity)
    }

    fn allocate_id(&self) -> EntityId {
        EntityId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    //--- Queries ----------------------------------------------------------

    pub fn get(&self, id: EntityId) -> Option<&dyn Entity> {
        self.entities.get(&id).map(|slot| slot.entity.as_ref())
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut dyn Entity> {
        match self.entities.get_mut(&id) {
            Some(slot) => Some(slot.entity.as_mut()),
            None => None,
        }
    }

    /// Borrows the entity as its concrete type.
    pub fn get_as<T: Entity>(&self, id: EntityId) -> Option<&T> {
        self.entities
            .get(&id)
            .and_then(|slot| (*slot.entity).as_any().downcast_ref::<T>())
    }

    pub fn get_as_mut<T: Entity>(&mut self, id: EntityId) -> Option<&mut T> {
        self.entities
            .get_mut(&id)
            .and_then(|slot| (*slot.entity).as_any_mut().downcast_mut::<T>())
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Capabilities recorded for `id` at registration.
    pub fn capabilities(&self, id: EntityId) -> Option<Capabilities> {
        self.entities.get(&id).map(|slot| slot.capabilities)
    }

    /// Ids filed under a single capability, in ascending order.
    ///
    /// Combined flags return an empty list.
    pub fn ids_with(&self, capability: Capabilities) -> Vec<EntityId> {
        self.index
            .set(capability)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    //--- Services ---------------------------------------------------------

    /// Events published during the most recent update.
    pub fn events(&self) -> &FrameEvents {
        &self.events
    }

    pub fn collision(&self) -> &CollisionManager {
        &self.collision
    }

    pub fn collision_mut(&mut self) -> &mut CollisionManager {
        &mut self.collision
    }

    pub fn movement(&self) -> &MovementManager {
        &self.movement
    }

    pub fn movement_mut(&mut self) -> &mut MovementManager {
        &mut self.movement
    }

    pub fn content_mut(&mut self) -> &mut dyn ContentLoader {
        self.content.as_mut()
    }

    //--- Content Lifecycle ------------------------------------------------

    /// Loads every loadable entity and marks the registry initialized.
    pub fn load_all(&mut self) {
        let mut failures = 0;
        for id in &self.index.loadable {
            let Some(loadable) = self.entities.get_mut(id).and_then(|s| s.entity.as_loadable_mut()) else {
                continue;
            };
            if let Err(e) = loadable.load(self.content.as_mut()) {
                warn!("Entity {} failed to load: {}", id, e);
                failures += 1;
            }
        }

        self.initialized = true;
        debug!(
            "Loaded {} entities ({} failed)",
            self.index.loadable.len(),
            failures
        );
    }

    /// Unloads every loadable entity, then releases the loader's assets.
    pub fn unload_all(&mut self) {
        for id in &self.index.loadable {
            if let Some(loadable) = self.entities.get_mut(id).and_then(|s| s.entity.as_loadable_mut()) {
                loadable.unload();
            }
        }

        self.content.unload();
        self.initialized = false;
    }

    //--- Frame Update -----------------------------------------------------

    /// Runs one simulation step over all entities.
    pub fn update(&mut self, time: &GameTime) {
        self.events.clear_all();
        self.purge_inactive();

        //--- Step 1: Per-entity logic -------------------------------------
        for id in &self.index.updateable {
            if let Some(entity) = self.entities.get_mut(id).and_then(|s| s.entity.as_updateable_mut()) {
                entity.update(time);
            }
        }

        //--- Step 2: Broad phase ------------------------------------------
        for id in &self.index.collidable {
            if let Some(collider) = self.entities.get_mut(id).and_then(|s| s.entity.as_collidable_mut()) {
                self.collision.submit(*id, &*collider);
            }
        }

        //--- Step 3: Narrow phase and contact delivery --------------------
        let contacts = &mut self.contacts;
        self.collision.detect_collisions(|event| contacts.push(event));

        for event in self.contacts.drain(..) {
            if let Some(collider) = self
                .entities
                .get_mut(&event.entity)
                .and_then(|s| s.entity.as_collidable_mut())
            {
                collider.on_collision(&event.contact);
            }
            self.events.publish(event);
        }

        //--- Step 4: Integration ------------------------------------------
        for id in &self.index.movable {
            let Some(body) = self.entities.get_mut(id).and_then(|s| s.entity.as_movable_mut()) else {
                continue;
            };
            if let Some(position) = self.movement.step(body) {
                self.events.publish(EntityMoved { id: *id, position });
            }
        }
    }

    //--- Frame Draw -------------------------------------------------------

    /// Draws visible entities in ascending draw order.
    ///
    /// Entities with equal draw order keep registration order. Screen-fixed
    /// entities receive the identity transform instead of `transform`.
    pub fn draw(&mut self, time: &GameTime, transform: Affine2, target: &mut dyn RenderTarget) {
        self.purge_inactive();

        self.draw_list.clear();
        for id in &self.index.drawable {
            if let Some(drawable) = self.entities.get(id).and_then(|s| s.entity.as_drawable()) {
                self.draw_list.push((drawable.draw_order(), *id));
            }
        }
        self.draw_list.sort_by_key(|&(order, _)| order);

        for (_, id) in &self.draw_list {
            let Some(drawable) = self.entities.get(id).and_then(|s| s.entity.as_drawable()) else {
                continue;
            };
            if !drawable.is_visible() {
                continue;
            }
            let transform = if drawable.is_fixed_to_screen() {
                Affine2::IDENTITY
            } else {
                transform
            };
            drawable.draw(time, target, transform);
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn purge_inactive(&mut self) {
        let inactive: Vec<EntityId> = self
            .entities
            .iter()
            .filter(|(_, slot)| !slot.entity.is_active())
            .map(|(&id, _)| id)
            .collect();

        if inactive.is_empty() {
            return;
        }

        debug!("Purging {} inactive entities", inactive.len());
        for id in inactive {
            self.remove_entity(id);
        }
    }
}

impl std::fmt::Debug for SceneObjectManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneObjectManager")
            .field("entities", &self.entities.len())
            .field("initialized", &self.initialized)
            .field("events", &self.events)
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
