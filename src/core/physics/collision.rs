//=========================================================================
// Collision Manager
//=========================================================================
//
// Grid broad phase plus AABB narrow phase over a screen's viewport.
//
// Architecture:
//   viewport ── scale(1 + margin) ──→ expanded area
//   expanded area ── columns × rows ──→ cells: Vec<Vec<proxy index>>
//
//   submit(entity)      → proxy copied once, index pushed into every
//                         cell its clipped bounds overlap
//   detect_collisions() → every pair sharing a cell, filtered by
//                         category, tested by intersection, reported
//                         to both sides; then all cells are cleared
//
// A pair sharing several cells is reported once per frame: tested pairs
// are remembered in a set for the duration of one detection pass.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

use bitflags::bitflags;
use glam::Vec2;
use log::{debug, warn};

//=== Internal Dependencies ===============================================

use crate::core::config::CollisionConfig;
use crate::core::entity::{Collidable, EntityId};
use crate::core::geometry::Rect;

//=== CollisionCategory ===================================================

bitflags! {
    /// Collision filtering bits.
    ///
    /// Each collidable has a category (what it is) and a mask (what it
    /// reacts to). Two entities collide only if each one's category
    /// intersects the other's mask. Games needing more kinds can build
    /// values from the higher bits with `from_bits_retain`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CollisionCategory: u32 {
        const GOOD    = 1 << 0;
        const BAD     = 1 << 1;
        const NEUTRAL = 1 << 2;
        const SCENERY = 1 << 3;
        const PICKUP  = 1 << 4;
    }
}

impl CollisionCategory {
    /// Bidirectional filter: both sides must accept each other.
    pub fn should_collide(
        category_a: Self,
        mask_a: Self,
        category_b: Self,
        mask_b: Self,
    ) -> bool {
        category_a.intersects(mask_b) && category_b.intersects(mask_a)
    }
}

//=== Contact =============================================================

/// Collision details delivered to one side of a colliding pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// The entity collided with.
    pub other: EntityId,
    pub other_category: CollisionCategory,
    pub other_next_bounds: Rect,
    /// Overlap of both bounding rectangles.
    pub intersection: Rect,
    /// Unit vector along the separation axis, pointing away from the other entity.
    pub offset: Vec2,
}

/// A contact addressed to a specific entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    pub entity: EntityId,
    pub contact: Contact,
}

//=== ColliderProxy =======================================================

/// Snapshot of a collidable taken at submission time.
#[derive(Debug, Clone, Copy)]
struct ColliderProxy {
    id: EntityId,
    bounds: Rect,
    next_bounds: Rect,
    category: CollisionCategory,
    mask: CollisionCategory,
}

//=== CollisionManager ====================================================

pub struct CollisionManager {
    columns: usize,
    rows: usize,
    margin: f32,

    viewport: Rect,
    expanded: Rect,
    cell_size: Vec2,

    proxies: Vec<ColliderProxy>,
    cells: Vec<Vec<usize>>,
    tested: HashSet<(EntityId, EntityId)>,
}

impl CollisionManager {
    //--- Construction -----------------------------------------------------

    pub fn new(config: &CollisionConfig, viewport: Rect) -> Self {
        let mut manager = Self {
            columns: 1,
            rows: 1,
            margin: config.margin.max(0.0),
            viewport: Rect::ZERO,
            expanded: Rect::ZERO,
            cell_size: Vec2::ZERO,
            proxies: Vec::new(),
            cells: Vec::new(),
            tested: HashSet::new(),
        };
        manager.set_grid(config.columns as usize, config.rows as usize);
        manager.set_viewport(viewport);
        manager
    }

    //--- Configuration ----------------------------------------------------

    /// Resizes the grid. Dimensions below 1 are clamped to 1.
    ///
    /// Pending submissions are discarded.
    pub fn set_grid(&mut self, columns: usize, rows: usize) {
        if columns == 0 || rows == 0 {
            warn!("Invalid collision grid {}x{}, clamping to at least 1x1", columns, rows);
        }
        self.columns = columns.max(1);
        self.rows = rows.max(1);
        self.cells = vec![Vec::new(); self.columns * self.rows];
        self.proxies.clear();
        self.update_cell_size();
    }

    /// Sets the reference viewport; the tested area is this rectangle
    /// grown by the configured margin about its center.
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
        self.expanded = viewport.scale_about_center(1.0 + self.margin);
        if self.expanded.is_zero() {
            warn!("Degenerate collision viewport {:?}, nothing will be tested", viewport);
        }
        self.update_cell_size();
    }

    fn update_cell_size(&mut self) {
        self.cell_size = if self.expanded.is_zero() {
            Vec2::ZERO
        } else {
            Vec2::new(
                self.expanded.width / self.columns as f32,
                self.expanded.height / self.rows as f32,
            )
        };
    }

    //--- Accessors --------------------------------------------------------

    pub fn grid_size(&self) -> (usize, usize) {
        (self.columns, self.rows)
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// The viewport after margin expansion.
    pub fn tested_area(&self) -> Rect {
        self.expanded
    }

    /// Number of entities submitted since the last detection pass.
    pub fn pending(&self) -> usize {
        self.proxies.len()
    }

    /// Entities currently bucketed in the given cell.
    pub fn cell_occupants(&self, column: usize, row: usize) -> Vec<EntityId> {
        if column >= self.columns || row >= self.rows {
            return Vec::new();
        }
        self.cells[row * self.columns + column]
            .iter()
            .map(|&index| self.proxies[index].id)
            .collect()
    }

    //--- Broad Phase ------------------------------------------------------

    /// Buckets `collider` into every cell its clipped bounds overlap.
    ///
    /// Returns the number of cells assigned; zero means the entity lies
    /// outside the tested area and takes no part in this frame's tests.
    pub fn submit(&mut self, id: EntityId, collider: &dyn Collidable) -> usize {
        if self.expanded.is_zero() {
            return 0;
        }

        let bounds = collider.bounds();
        let clipped = bounds.intersect(&self.expanded);
        if clipped.is_zero() {
            return 0;
        }

        let first_column = self.column_of(clipped.left);
        let last_column = self.column_of(clipped.right());
        let first_row = self.row_of(clipped.top);
        let last_row = self.row_of(clipped.bottom());

        let index = self.proxies.len();
        self.proxies.push(ColliderProxy {
            id,
            bounds,
            next_bounds: collider.next_bounds(),
            category: collider.category(),
            mask: collider.category_mask(),
        });

        for row in first_row..=last_row {
            for column in first_column..=last_column {
                self.cells[row * self.columns + column].push(index);
            }
        }

        (last_row - first_row + 1) * (last_column - first_column + 1)
    }

    fn column_of(&self, x: f32) -> usize {
        Self::cell_index(x - self.expanded.left, self.cell_size.x, self.columns)
    }

    fn row_of(&self, y: f32) -> usize {
        Self::cell_index(y - self.expanded.top, self.cell_size.y, self.rows)
    }

    fn cell_index(distance: f32, cell_size: f32, count: usize) -> usize {
        let cell = (distance / cell_size).floor();
        cell.clamp(0.0, (count - 1) as f32) as usize
    }

    //--- Narrow Phase -----------------------------------------------------

    /// Tests every pair sharing a cell and reports each collision to both
    /// entities through `on_contact`, then clears the grid.
    ///
    /// Returns the number of colliding pairs.
    pub fn detect_collisions<F>(&mut self, mut on_contact: F) -> usize
    where
        F: FnMut(CollisionEvent),
    {
        self.tested.clear();
        let mut collisions = 0;

        for cell in &self.cells {
            for (i, &first) in cell.iter().enumerate() {
                for &second in &cell[i + 1..] {
                    let a = &self.proxies[first];
                    let b = &self.proxies[second];

                    if a.id == b.id {
                        continue;
                    }

                    let key = if a.id < b.id { (a.id, b.id) } else { (b.id, a.id) };
                    if !self.tested.insert(key) {
                        continue;
                    }

                    if !CollisionCategory::should_collide(a.category, a.mask, b.category, b.mask)
                        || !a.bounds.intersects(&b.bounds)
                    {
                        continue;
                    }

                    let intersection = a.bounds.intersect(&b.bounds);
                    let offset = separation_offset(&a.bounds, &intersection);

                    on_contact(CollisionEvent {
                        entity: a.id,
                        contact: Contact {
                            other: b.id,
                            other_category: b.category,
                            other_next_bounds: b.next_bounds,
                            intersection,
                            offset,
                        },
                    });
                    on_contact(CollisionEvent {
                        entity: b.id,
                        contact: Contact {
                            other: a.id,
                            other_category: a.category,
                            other_next_bounds: a.next_bounds,
                            intersection,
                            offset: -offset,
                        },
                    });
                    collisions += 1;
                }
            }
        }

        if collisions > 0 {
            debug!("{} collision(s) among {} collider(s)", collisions, self.proxies.len());
        }

        self.clear();
        collisions
    }

    /// Drops all submissions without testing them.
    pub fn clear(&mut self) {
        self.proxies.clear();
        for cell in &mut self.cells {
            cell.clear();
        }
    }
}

//=== Separation ==========================================================

/// Unit push-out direction for the entity with bounds `bounds`.
///
/// An overlap taller than wide separates horizontally; anything else,
/// including a square overlap, separates vertically.
pub(crate) fn separation_offset(bounds: &Rect, intersection: &Rect) -> Vec2 {
    let delta = bounds.center() - intersection.center();
    if intersection.height > intersection.width {
        Vec2::new(delta.x, 0.0).normalize_or_zero()
    } else {
        Vec2::new(0.0, delta.y).normalize_or_zero()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
