//=========================================================================
// Render Contract
//=========================================================================
//
// Narrow interface to the external rendering subsystem.
//
// The core never batches sprites or touches a GPU. Screens and drawable
// entities describe what to draw through `RenderTarget`; the host maps
// those calls onto its own backend.
//
// Flow:
//   ScreenManager::draw() → GameScreen::draw() → Drawable::draw()
//                                 ↓
//                          RenderTarget (host)
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::{Affine2, Vec2};

//=== Internal Dependencies ===============================================

use super::content::AssetHandle;
use super::geometry::Rect;

//=== Color ===============================================================

/// 8-bit RGBA tint color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Self = Self::rgba(255, 255, 255, 255);
    pub const BLACK: Self = Self::rgba(0, 0, 0, 255);
    pub const YELLOW: Self = Self::rgba(255, 255, 0, 255);
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Premultiplied fade: every channel is scaled by `alpha` (clamped to [0, 1]).
    ///
    /// Screens use this with their transition alpha so fading content
    /// blends correctly against whatever is drawn beneath it.
    pub fn faded(self, alpha: f32) -> Self {
        let alpha = alpha.clamp(0.0, 1.0);
        let scale = |c: u8| (f32::from(c) * alpha).round() as u8;
        Self::rgba(scale(self.r), scale(self.g), scale(self.b), scale(self.a))
    }
}

//=== Draw Descriptors ====================================================

/// A textured quad submitted to the render target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteDraw {
    pub texture: AssetHandle,
    /// Region of the texture to sample; `None` samples the whole texture.
    pub source: Option<Rect>,
    pub destination: Rect,
    pub tint: Color,
    pub transform: Affine2,
}

/// A run of text rendered with a loaded font.
#[derive(Debug, Clone, PartialEq)]
pub struct TextDraw {
    pub font: AssetHandle,
    pub text: String,
    pub position: Vec2,
    pub color: Color,
    pub scale: f32,
    pub transform: Affine2,
}

//=== RenderTarget ========================================================

/// Receiver of draw calls, implemented by the host's renderer.
pub trait RenderTarget {
    fn draw_sprite(&mut self, sprite: &SpriteDraw);

    fn draw_text(&mut self, text: &TextDraw);

    /// Solid rectangle in screen space, used for fades and backdrops.
    fn fill_rect(&mut self, rect: Rect, color: Color);
}

//=== CommandList =========================================================

/// A recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Sprite(SpriteDraw),
    Text(TextDraw),
    Fill { rect: Rect, color: Color },
}

/// Render target that records calls in submission order.
///
/// Lets hosts run headless and lets tests assert on draw ordering.
#[derive(Debug, Default)]
pub struct CommandList {
    commands: Vec<DrawCommand>,
}

impl CommandList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Removes all recorded commands, keeping the allocation.
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl RenderTarget for CommandList {
    fn draw_sprite(&mut self, sprite: &SpriteDraw) {
        self.commands.push(DrawCommand::Sprite(*sprite));
    }

    fn draw_text(&mut self, text: &TextDraw) {
        self.commands.push(DrawCommand::Text(text.clone()));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Fill { rect, color });
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
