//=========================================================================
// Game Screen
//=========================================================================
//
// One layer of the screen stack: screen logic, its entity registry and
// the transition state machine that fades it in and out.
//
// State machine (per update):
//   exiting  → drive toward off; complete ⇒ request removal
//   covered  → drive toward off; TransitionOff, then Hidden
//   else     → drive toward on;  TransitionOn,  then Active
//
// Transition step:
//   T == 0  ⇒ snap to the bound
//   T >  0  ⇒ position += direction × elapsed / T, clamped to [0, 1]
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use glam::{Affine2, Vec2};
use log::debug;

//=== Internal Dependencies ===============================================

use super::{CommandQueue, Screen, ScreenContext, ScreenId, ScreenState, ScreenView};
use crate::core::config::CoreConfig;
use crate::core::entity::SceneObjectManager;
use crate::core::geometry::Rect;
use crate::core::input::InputState;
use crate::core::render::RenderTarget;
use crate::core::time::GameTime;

//=== Direction ===========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    /// Toward position 0.
    On,
    /// Toward position 1.
    Off,
}

//=== GameScreen ==========================================================

pub struct GameScreen {
    id: ScreenId,
    behavior: Box<dyn Screen>,
    scene: SceneObjectManager,

    state: ScreenState,
    position: f32,
    on_time: Duration,
    off_time: Duration,
    popup: bool,

    exiting: bool,
    covered: bool,
    other_has_focus: bool,
    loaded: bool,

    viewport: Rect,
    camera: Vec2,
}

impl GameScreen {
    //--- Construction -----------------------------------------------------

    /// Wraps `behavior` with a fresh registry built from `config`.
    ///
    /// Transition times and popup mode come from the behavior, falling
    /// back to `config.transitions`.
    pub fn new<S: Screen>(behavior: S, config: &CoreConfig) -> Self {
        Self::with_scene(behavior, SceneObjectManager::from_config(config), config)
    }

    /// Wraps `behavior` around an existing registry.
    pub fn with_scene<S: Screen>(behavior: S, scene: SceneObjectManager, config: &CoreConfig) -> Self {
        let on_time = behavior.transition_on_time().unwrap_or(config.transitions.on_time());
        let off_time = behavior.transition_off_time().unwrap_or(config.transitions.off_time());
        let popup = behavior.is_popup();

        Self {
            id: ScreenId::next(),
            behavior: Box::new(behavior),
            scene,
            state: ScreenState::TransitionOn,
            position: 1.0,
            on_time,
            off_time,
            popup,
            exiting: false,
            covered: false,
            other_has_focus: false,
            loaded: false,
            viewport: config.viewport.rect(),
            camera: Vec2::ZERO,
        }
    }

    pub fn with_transition_on(mut self, duration: Duration) -> Self {
        self.on_time = duration;
        self
    }

    pub fn with_transition_off(mut self, duration: Duration) -> Self {
        self.off_time = duration;
        self
    }

    pub fn with_popup(mut self, popup: bool) -> Self {
        self.popup = popup;
        self
    }

    //--- Accessors --------------------------------------------------------

    pub fn id(&self) -> ScreenId {
        self.id
    }

    pub fn name(&self) -> &str {
        self.behavior.name()
    }

    pub fn state(&self) -> ScreenState {
        self.state
    }

    /// 0 = fully shown, 1 = fully transitioned off.
    pub fn transition_position(&self) -> f32 {
        self.position
    }

    pub fn transition_alpha(&self) -> f32 {
        1.0 - self.position
    }

    /// Eased slide factor used by menus, `transition_position²`.
    pub fn transition_offset(&self) -> f32 {
        self.position * self.position
    }

    pub fn transition_on_time(&self) -> Duration {
        self.on_time
    }

    pub fn transition_off_time(&self) -> Duration {
        self.off_time
    }

    pub fn is_popup(&self) -> bool {
        self.popup
    }

    pub fn is_exiting(&self) -> bool {
        self.exiting
    }

    pub fn is_covered(&self) -> bool {
        self.covered
    }

    /// Whether another screen held input focus during the last update.
    pub fn other_screen_has_focus(&self) -> bool {
        self.other_has_focus
    }

    /// Not covered and either fading in or fully active.
    pub fn is_active(&self) -> bool {
        !self.covered && matches!(self.state, ScreenState::TransitionOn | ScreenState::Active)
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn scene(&self) -> &SceneObjectManager {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut SceneObjectManager {
        &mut self.scene
    }

    /// Borrows the screen logic as its concrete type.
    pub fn behavior<T: Screen>(&self) -> Option<&T> {
        (*self.behavior).as_any().downcast_ref::<T>()
    }

    pub fn behavior_mut<T: Screen>(&mut self) -> Option<&mut T> {
        (*self.behavior).as_any_mut().downcast_mut::<T>()
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn camera(&self) -> Vec2 {
        self.camera
    }

    /// Moves the camera and the collision viewport with it.
    pub fn set_camera(&mut self, camera: Vec2) {
        self.camera = camera;
        self.scene.collision_mut().set_viewport(self.viewport.translate(camera));
    }

    pub fn camera_transform(&self) -> Affine2 {
        Affine2::from_translation(-self.camera)
    }

    pub fn view(&self) -> ScreenView {
        ScreenView {
            id: self.id,
            state: self.state,
            transition_position: self.position,
            is_active: self.is_active(),
            is_exiting: self.exiting,
            viewport: self.viewport,
            camera: self.camera,
        }
    }

    //--- Content ----------------------------------------------------------

    /// Lets the screen logic register its entities, then loads them all.
    pub fn load_content(&mut self) {
        self.behavior.load_content(&mut self.scene);
        self.scene.load_all();
        self.loaded = true;
    }

    pub fn unload_content(&mut self) {
        self.behavior.unload_content(&mut self.scene);
        self.scene.unload_all();
        self.loaded = false;
    }

    //--- Exit -------------------------------------------------------------

    /// Begins the exit transition.
    ///
    /// Returns `true` when the fade-out time is zero, meaning the caller
    /// must remove the screen right away.
    pub fn exit_screen(&mut self) -> bool {
        if self.off_time.is_zero() {
            return true;
        }
        self.exiting = true;
        false
    }

    //--- Update -----------------------------------------------------------

    /// Advances the transition and runs the screen logic.
    ///
    /// The registry is updated only while the screen is active. Returns
    /// `true` once an exiting screen has fully transitioned off and must be
    /// removed from the stack.
    pub fn update(
        &mut self,
        time: &GameTime,
        other_has_focus: bool,
        covered: bool,
        config: &CoreConfig,
        commands: &mut CommandQueue,
    ) -> bool {
        self.other_has_focus = other_has_focus;
        self.covered = covered;

        if self.exiting {
            if !self.update_transition(time, Direction::Off) {
                debug!("{} ({}) finished exiting", self.name(), self.id);
                return true;
            }
            self.state = ScreenState::TransitionOff;
        } else if covered {
            self.state = if self.update_transition(time, Direction::Off) {
                ScreenState::TransitionOff
            } else {
                ScreenState::Hidden
            };
        } else {
            self.state = if self.update_transition(time, Direction::On) {
                ScreenState::TransitionOn
            } else {
                ScreenState::Active
            };
        }

        let camera = self.camera;
        let view = self.view();
        let mut ctx = ScreenContext::new(time, view, &mut self.scene, &mut self.camera, config, commands);
        self.behavior.update(&mut ctx);

        if self.camera != camera {
            self.scene.collision_mut().set_viewport(self.viewport.translate(self.camera));
        }

        if self.is_active() {
            self.scene.update(time);
        }

        false
    }

    /// Steps the transition position. Returns `true` while still moving.
    fn update_transition(&mut self, time: &GameTime, direction: Direction) -> bool {
        let (duration, sign, bound) = match direction {
            Direction::On => (self.on_time, -1.0, 0.0),
            Direction::Off => (self.off_time, 1.0, 1.0),
        };

        let delta = if duration.is_zero() {
            1.0
        } else {
            time.elapsed.as_secs_f32() / duration.as_secs_f32()
        };

        self.position += delta * sign;

        let complete = match direction {
            Direction::On => self.position <= bound,
            Direction::Off => self.position >= bound,
        };
        if complete {
            self.position = bound;
        }
        !complete
    }

    //--- Input ------------------------------------------------------------

    pub fn handle_input(
        &mut self,
        input: &InputState,
        time: &GameTime,
        config: &CoreConfig,
        commands: &mut CommandQueue,
    ) {
        let view = self.view();
        let mut ctx = ScreenContext::new(time, view, &mut self.scene, &mut self.camera, config, commands);
        self.behavior.handle_input(input, &mut ctx);
    }

    //--- Draw -------------------------------------------------------------

    /// Draws the screen's entities through the camera, then the screen logic.
    pub fn draw(&mut self, time: &GameTime, target: &mut dyn RenderTarget) {
        let transform = self.camera_transform();
        self.scene.draw(time, transform, target);
        self.behavior.draw(time, &self.view(), target);
    }
}

impl std::fmt::Debug for GameScreen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameScreen")
            .field("id", &self.id)
            .field("name", &self.name())
            .field("state", &self.state)
            .field("position", &self.position)
            .field("exiting", &self.exiting)
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    use crate::core::entity::{Entity, Updateable};

    #[derive(Default)]
    struct Blank {
        updates: u32,
    }

    impl Screen for Blank {
        fn update(&mut self, _ctx: &mut ScreenContext<'_>) {
            self.updates += 1;
        }
    }

    struct Ticker {
        ticks: u32,
    }

    impl Updateable for Ticker {
        fn update(&mut self, _time: &GameTime) {
            self.ticks += 1;
        }
    }

    impl Entity for Ticker {
        fn is_active(&self) -> bool {
            true
        }

        fn as_updateable_mut(&mut self) -> Option<&mut dyn Updateable> {
            Some(self)
        }
    }

    fn screen(on_ms: u64, off_ms: u64) -> GameScreen {
        GameScreen::new(Blank::default(), &CoreConfig::default())
            .with_transition_on(Duration::from_millis(on_ms))
            .with_transition_off(Duration::from_millis(off_ms))
    }

    fn step(screen: &mut GameScreen, ms: u64, covered: bool) -> bool {
        screen.update(
            &GameTime::from_millis(ms),
            false,
            covered,
            &CoreConfig::default(),
            &mut CommandQueue::new(),
        )
    }

    //--- Transition On ----------------------------------------------------

    #[test]
    fn new_screen_starts_transitioning_on() {
        let s = screen(500, 500);
        assert_eq!(s.state(), ScreenState::TransitionOn);
        assert_eq!(s.transition_position(), 1.0);
        assert_eq!(s.transition_alpha(), 0.0);
    }

    #[test]
    fn zero_on_time_is_active_after_first_update() {
        let mut s = screen(0, 0);

        step(&mut s, 16, false);

        assert_eq!(s.state(), ScreenState::Active);
        assert_eq!(s.transition_position(), 0.0);
    }

    #[test]
    fn quarter_of_on_time_moves_a_quarter() {
        let mut s = screen(1000, 0);

        step(&mut s, 250, false);

        assert_eq!(s.state(), ScreenState::TransitionOn);
        assert_relative_eq!(s.transition_position(), 0.75);
        assert_relative_eq!(s.transition_alpha(), 0.25);
    }

    #[test]
    fn transition_clamps_at_zero() {
        let mut s = screen(1000, 0);

        step(&mut s, 800, false);
        step(&mut s, 800, false);

        assert_eq!(s.state(), ScreenState::Active);
        assert_eq!(s.transition_position(), 0.0);
    }

    #[test]
    fn transition_offset_is_squared_position() {
        let mut s = screen(1000, 0);
        step(&mut s, 500, false);
        assert_relative_eq!(s.transition_offset(), 0.25);
    }

    //--- Covering ---------------------------------------------------------

    #[test]
    fn covered_screen_fades_then_hides() {
        let mut s = screen(0, 1000);
        step(&mut s, 16, false);

        step(&mut s, 500, true);
        assert_eq!(s.state(), ScreenState::TransitionOff);
        assert!(!s.is_active());

        step(&mut s, 500, true);
        assert_eq!(s.state(), ScreenState::Hidden);
        assert_eq!(s.transition_position(), 1.0);
    }

    #[test]
    fn uncovered_screen_comes_back() {
        let mut s = screen(0, 0);
        step(&mut s, 16, false);
        step(&mut s, 16, true);
        assert_eq!(s.state(), ScreenState::Hidden);

        step(&mut s, 16, false);

        assert_eq!(s.state(), ScreenState::Active);
        assert!(s.is_active());
    }

    //--- Exit -------------------------------------------------------------

    #[test]
    fn exit_with_zero_off_time_requests_immediate_removal() {
        let mut s = screen(0, 0);
        assert!(s.exit_screen());
        assert!(!s.is_exiting());
    }

    #[test]
    fn exit_fades_out_then_requests_removal() {
        let mut s = screen(0, 400);
        step(&mut s, 16, false);

        assert!(!s.exit_screen());
        assert!(!step(&mut s, 200, false));
        assert_eq!(s.state(), ScreenState::TransitionOff);
        assert!(step(&mut s, 200, false));
    }

    #[test]
    fn exiting_takes_precedence_over_covered() {
        let mut covered = screen(0, 400);
        let mut exiting = screen(0, 400);
        step(&mut covered, 16, false);
        step(&mut exiting, 16, false);
        exiting.exit_screen();

        step(&mut covered, 400, true);
        let finished = step(&mut exiting, 400, true);

        assert_eq!(covered.state(), ScreenState::Hidden);
        assert!(finished);
    }

    //--- Registry ---------------------------------------------------------

    #[test]
    fn registry_updates_only_while_active() {
        let mut s = screen(0, 1000);
        let id = s.scene_mut().add(Ticker { ticks: 0 });

        step(&mut s, 16, false);
        step(&mut s, 16, true);

        assert_eq!(s.scene().get_as::<Ticker>(id).unwrap().ticks, 1);
        assert_eq!(s.behavior::<Blank>().unwrap().updates, 2);
    }

    #[test]
    fn camera_moves_collision_viewport() {
        let mut s = screen(0, 0);
        s.set_camera(Vec2::new(100.0, 50.0));

        assert_eq!(s.scene().collision().viewport().position(), Vec2::new(100.0, 50.0));
        assert_eq!(
            s.camera_transform().transform_point2(Vec2::new(100.0, 50.0)),
            Vec2::ZERO
        );
    }
}
