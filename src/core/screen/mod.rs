//=========================================================================
// Screen System
//=========================================================================
//
// Layered screens with timed transitions and a focus-aware stack.
//
// Architecture:
//   ScreenManager
//     ├─ screens: Vec<GameScreen>          (bottom → top)
//     ├─ commands: CommandQueue            (requests from screen logic)
//     └─ input: InputState
//
//   GameScreen
//     ├─ behavior: Box<dyn Screen>         (game / menu / dialog logic)
//     ├─ scene: SceneObjectManager         (the screen's entities)
//     └─ transition state + position
//
// Flow:
//   update() → snapshot ids → top-down GameScreen::update()
//            → input to the first active screen → apply commands
//   draw()   → bottom-up GameScreen::draw() for non-hidden screens
//
//=========================================================================

//=== Module Declarations =================================================

mod command_queue;
mod game_screen;
mod screen_manager;

//=== External Dependencies ===============================================

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use glam::{Affine2, Vec2};

//=== Internal Dependencies ===============================================

use crate::core::config::CoreConfig;
use crate::core::entity::{AsAny, SceneObjectManager};
use crate::core::geometry::Rect;
use crate::core::input::InputState;
use crate::core::render::{Color, RenderTarget};
use crate::core::time::GameTime;

//=== Public API ==========================================================

pub use command_queue::{CommandQueue, ScreenCommand};
pub use game_screen::GameScreen;
pub use screen_manager::ScreenManager;

//=== ScreenId ============================================================

static NEXT_SCREEN_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a [`GameScreen`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScreenId(u64);

impl ScreenId {
    pub(crate) fn next() -> Self {
        Self(NEXT_SCREEN_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "screen#{}", self.0)
    }
}

//=== ScreenState =========================================================

/// Transition state of a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenState {
    /// Fading in. Initial state of every screen.
    #[default]
    TransitionOn,
    Active,
    /// Fading out, because covered or exiting.
    TransitionOff,
    /// Fully covered. Not drawn.
    Hidden,
}

//=== ScreenView ==========================================================

/// Read-only snapshot of a screen's presentation state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenView {
    pub id: ScreenId,
    pub state: ScreenState,
    /// 0 = fully shown, 1 = fully transitioned off.
    pub transition_position: f32,
    pub is_active: bool,
    pub is_exiting: bool,
    pub viewport: Rect,
    pub camera: Vec2,
}

impl ScreenView {
    pub fn transition_alpha(&self) -> f32 {
        1.0 - self.transition_position
    }

    /// Eased slide distance factor, `transition_position²`.
    pub fn transition_offset(&self) -> f32 {
        self.transition_position * self.transition_position
    }

    /// World-to-screen transform for the current camera.
    pub fn camera_transform(&self) -> Affine2 {
        Affine2::from_translation(-self.camera)
    }
}

//=== ScreenContext =======================================================

/// Everything screen logic may touch during update and input handling.
///
/// Requests that change the stack are queued and applied by the
/// coordinator once the current screen returns.
pub struct ScreenContext<'a> {
    pub time: &'a GameTime,
    pub view: ScreenView,
    pub scene: &'a mut SceneObjectManager,
    /// Camera position. Changes also move the collision viewport.
    pub camera: &'a mut Vec2,
    config: &'a CoreConfig,
    commands: &'a mut CommandQueue,
}

impl<'a> ScreenContext<'a> {
    pub(crate) fn new(
        time: &'a GameTime,
        view: ScreenView,
        scene: &'a mut SceneObjectManager,
        camera: &'a mut Vec2,
        config: &'a CoreConfig,
        commands: &'a mut CommandQueue,
    ) -> Self {
        Self { time, view, scene, camera, config, commands }
    }

    pub fn config(&self) -> &CoreConfig {
        self.config
    }

    /// Builds a screen with this stack's configuration.
    pub fn new_screen<S: Screen>(&self, behavior: S) -> GameScreen {
        GameScreen::new(behavior, self.config)
    }

    /// Pushes `screen` on top of the stack.
    pub fn add_screen(&mut self, screen: GameScreen) -> ScreenId {
        let id = screen.id();
        self.commands.push(ScreenCommand::Add(screen));
        id
    }

    /// Starts this screen's exit transition.
    pub fn exit_screen(&mut self) {
        self.commands.push(ScreenCommand::Exit(self.view.id));
    }

    pub fn exit(&mut self, id: ScreenId) {
        self.commands.push(ScreenCommand::Exit(id));
    }

    /// Removes `id` immediately, skipping its exit transition.
    pub fn remove_screen(&mut self, id: ScreenId) {
        self.commands.push(ScreenCommand::Remove(id));
    }
}

//=== Screen Trait ========================================================

/// Logic of one screen layer.
///
/// Every method has a default. Transition timing, popup behavior and the
/// entity registry are handled by the [`GameScreen`] wrapping this value.
pub trait Screen: AsAny {
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Popups leave the screens beneath them uncovered.
    fn is_popup(&self) -> bool {
        false
    }

    /// Fade-in duration; `None` uses the configured default.
    fn transition_on_time(&self) -> Option<Duration> {
        None
    }

    /// Fade-out duration; `None` uses the configured default.
    fn transition_off_time(&self) -> Option<Duration> {
        None
    }

    /// Called before the screen's entities are loaded.
    fn load_content(&mut self, _scene: &mut SceneObjectManager) {}

    /// Called before the screen's entities are unloaded.
    fn unload_content(&mut self, _scene: &mut SceneObjectManager) {}

    /// Called every frame, whatever the transition state.
    fn update(&mut self, _ctx: &mut ScreenContext<'_>) {}

    /// Called only on the frame's focused screen.
    fn handle_input(&mut self, _input: &InputState, _ctx: &mut ScreenContext<'_>) {}

    /// Called after the screen's entities are drawn.
    fn draw(&self, _time: &GameTime, _view: &ScreenView, _target: &mut dyn RenderTarget) {}
}

//=== Helpers =============================================================

/// Covers `viewport` with black at the given opacity.
pub fn fade_to_black(target: &mut dyn RenderTarget, viewport: Rect, alpha: f32) {
    target.fill_rect(viewport, Color::BLACK.faded(alpha));
}
