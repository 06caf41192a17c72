//=========================================================================
// Geometry
//=========================================================================
//
// Axis-aligned float rectangle shared by collision and viewports.
//
// Conventions:
//   - Screen space, top-left origin, +Y pointing down
//   - `right = left + width`, `bottom = top + height`
//   - A rectangle with non-positive width or height is "zero" (empty)
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec2;
use serde::{Deserialize, Serialize};

//=== Rect ================================================================

/// Axis-aligned bounding rectangle in screen units.
///
/// Used for entity collision bounds, draw destinations and the visible
/// viewport of a screen. All operations return new values; a `Rect` is
/// `Copy` and never mutated in place by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// The empty rectangle at the origin.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    //--- Construction -----------------------------------------------------

    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self { left, top, width, height }
    }

    /// Rectangle anchored at the origin with the given size.
    pub const fn from_size(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Rectangle of the given size centered on `center`.
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self::new(center.x - size.x * 0.5, center.y - size.y * 0.5, size.x, size.y)
    }

    //--- Edges & Metrics --------------------------------------------------

    #[inline]
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width * 0.5, self.top + self.height * 0.5)
    }

    /// Returns `true` for empty or degenerate rectangles.
    ///
    /// NaN extents also count as zero so that a broken viewport never
    /// reaches the grid arithmetic.
    pub fn is_zero(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    //--- Set Operations ---------------------------------------------------

    /// Returns `true` if both rectangles share a region of positive area.
    ///
    /// Touching edges do not count as an intersection.
    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_zero()
            && !other.is_zero()
            && self.left < other.right()
            && other.left < self.right()
            && self.top < other.bottom()
            && other.top < self.bottom()
    }

    /// Overlapping region of both rectangles, or [`Rect::ZERO`] if none.
    pub fn intersect(&self, other: &Rect) -> Rect {
        if !self.intersects(other) {
            return Rect::ZERO;
        }

        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        Rect::new(left, top, right - left, bottom - top)
    }

    /// Smallest rectangle containing both. Zero rectangles are ignored.
    pub fn union(&self, other: &Rect) -> Rect {
        match (self.is_zero(), other.is_zero()) {
            (true, true) => Rect::ZERO,
            (true, false) => *other,
            (false, true) => *self,
            (false, false) => {
                let left = self.left.min(other.left);
                let top = self.top.min(other.top);
                let right = self.right().max(other.right());
                let bottom = self.bottom().max(other.bottom());
                Rect::new(left, top, right - left, bottom - top)
            }
        }
    }

    //--- Transforms -------------------------------------------------------

    /// Scales width and height by `factor`, keeping the center fixed.
    pub fn scale_about_center(&self, factor: f32) -> Rect {
        Rect::from_center(self.center(), self.size() * factor)
    }

    pub fn translate(&self, offset: Vec2) -> Rect {
        Rect::new(self.left + offset.x, self.top + offset.y, self.width, self.height)
    }

    /// Half-open containment: left/top edges inclusive, right/bottom exclusive.
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.left && point.x < self.right() && point.y >= self.top && point.y < self.bottom()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
