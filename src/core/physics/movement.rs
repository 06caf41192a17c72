//=========================================================================
// Movement Manager
//=========================================================================
//
// Physics-lite integration for movable entities.
//
// Phases, in the order `step()` runs them:
//   GRAVITY  → velocity.y += gravity × body.gravity_coefficient
//   FRICTION → velocity.x *= 1 − 2 × body.friction × friction
//              velocity.y *= 1 −     body.friction × friction
//   MOVEMENT → position += velocity, then body.on_moved()
//
// Each phase is also callable on its own; the owning screen decides
// which subset runs every frame.
//
//=========================================================================

//=== External Dependencies ===============================================

use bitflags::bitflags;
use glam::Vec2;

//=== Internal Dependencies ===============================================

use crate::core::config::MovementConfig;
use crate::core::entity::Movable;

//=== MovementPhases ======================================================

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MovementPhases: u8 {
        const GRAVITY  = 1 << 0;
        const FRICTION = 1 << 1;
        const MOVEMENT = 1 << 2;
    }
}

impl MovementPhases {
    pub fn from_config(config: &MovementConfig) -> Self {
        let mut phases = MovementPhases::empty();
        phases.set(MovementPhases::GRAVITY, config.gravity_enabled);
        phases.set(MovementPhases::FRICTION, config.friction_enabled);
        phases.set(MovementPhases::MOVEMENT, config.movement_enabled);
        phases
    }
}

//=== MovementManager =====================================================

#[derive(Debug, Clone, PartialEq)]
pub struct MovementManager {
    gravity: f32,
    friction: f32,
    phases: MovementPhases,
}

impl MovementManager {
    pub fn new(config: &MovementConfig) -> Self {
        Self {
            gravity: config.gravity,
            friction: config.friction,
            phases: MovementPhases::from_config(config),
        }
    }

    //--- Configuration ----------------------------------------------------

    pub fn phases(&self) -> MovementPhases {
        self.phases
    }

    pub fn set_phases(&mut self, phases: MovementPhases) {
        self.phases = phases;
    }

    pub fn gravity(&self) -> f32 {
        self.gravity
    }

    pub fn set_gravity(&mut self, gravity: f32) {
        self.gravity = gravity;
    }

    pub fn friction(&self) -> f32 {
        self.friction
    }

    pub fn set_friction(&mut self, friction: f32) {
        self.friction = friction;
    }

    //--- Phases -----------------------------------------------------------

    pub fn apply_gravity(&self, body: &mut dyn Movable) {
        let mut velocity = body.velocity();
        velocity.y += self.gravity * body.gravity_coefficient();
        body.set_velocity(velocity);
    }

    /// Damps velocity; horizontal motion decays twice as fast as vertical.
    pub fn apply_friction(&self, body: &mut dyn Movable) {
        let k = body.friction_coefficient() * self.friction;
        let velocity = body.velocity();
        body.set_velocity(Vec2::new(velocity.x * (1.0 - 2.0 * k), velocity.y * (1.0 - k)));
    }

    /// Moves the body by its velocity and notifies it. Returns the new position.
    pub fn apply_movement(&self, body: &mut dyn Movable) -> Vec2 {
        let position = body.position() + body.velocity();
        body.set_position(position);
        body.on_moved();
        position
    }

    /// Runs the enabled phases on one body.
    ///
    /// Returns the new position when the movement phase ran.
    pub fn step(&self, body: &mut dyn Movable) -> Option<Vec2> {
        if self.phases.contains(MovementPhases::GRAVITY) {
            self.apply_gravity(body);
        }
        if self.phases.contains(MovementPhases::FRICTION) {
            self.apply_friction(body);
        }
        self.phases
            .contains(MovementPhases::MOVEMENT)
            .then(|| self.apply_movement(body))
    }
}

impl Default for MovementManager {
    fn default() -> Self {
        Self::new(&MovementConfig::default())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[derive(Default)]
    struct Puck {
        position: Vec2,
        velocity: Vec2,
        gravity: f32,
        friction: f32,
        moved: u32,
    }

    impl Movable for Puck {
        fn position(&self) -> Vec2 {
            self.position
        }

        fn set_position(&mut self, position: Vec2) {
            self.position = position;
        }

        fn velocity(&self) -> Vec2 {
            self.velocity
        }

        fn set_velocity(&mut self, velocity: Vec2) {
            self.velocity = velocity;
        }

        fn gravity_coefficient(&self) -> f32 {
            self.gravity
        }

        fn friction_coefficient(&self) -> f32 {
            self.friction
        }

        fn on_moved(&mut self) {
            self.moved += 1;
        }
    }

    fn manager(gravity: f32, friction: f32, phases: MovementPhases) -> MovementManager {
        let mut m = MovementManager::default();
        m.set_gravity(gravity);
        m.set_friction(friction);
        m.set_phases(phases);
        m
    }

    #[test]
    fn gravity_scales_by_coefficient() {
        let m = manager(2.0, 0.0, MovementPhases::GRAVITY);
        let mut puck = Puck { velocity: Vec2::new(1.0, 1.0), gravity: 0.5, ..Default::default() };

        m.apply_gravity(&mut puck);

        assert_eq!(puck.velocity, Vec2::new(1.0, 2.0));
    }

    #[test]
    fn friction_damps_horizontal_twice_as_hard() {
        let m = manager(0.0, 0.1, MovementPhases::FRICTION);
        let mut puck = Puck { velocity: Vec2::new(10.0, 10.0), friction: 1.0, ..Default::default() };

        m.apply_friction(&mut puck);

        assert_relative_eq!(puck.velocity.x, 8.0, epsilon = 1e-5);
        assert_relative_eq!(puck.velocity.y, 9.0, epsilon = 1e-5);
    }

    #[test]
    fn movement_adds_velocity_and_notifies() {
        let m = manager(0.0, 0.0, MovementPhases::MOVEMENT);
        let mut puck = Puck { position: Vec2::new(1.0, 1.0), velocity: Vec2::new(2.0, -1.0), ..Default::default() };

        let position = m.apply_movement(&mut puck);

        assert_eq!(position, Vec2::new(3.0, 0.0));
        assert_eq!(puck.position, position);
        assert_eq!(puck.moved, 1);
    }

    #[test]
    fn step_runs_only_enabled_phases() {
        let m = manager(1.0, 0.0, MovementPhases::GRAVITY);
        let mut puck = Puck { gravity: 1.0, ..Default::default() };

        assert_eq!(m.step(&mut puck), None);
        assert_eq!(puck.velocity, Vec2::new(0.0, 1.0));
        assert_eq!(puck.position, Vec2::ZERO);
        assert_eq!(puck.moved, 0);
    }

    #[test]
    fn step_applies_gravity_before_movement() {
        let m = manager(1.0, 0.0, MovementPhases::GRAVITY | MovementPhases::MOVEMENT);
        let mut puck = Puck { gravity: 1.0, ..Default::default() };

        assert_eq!(m.step(&mut puck), Some(Vec2::new(0.0, 1.0)));
    }

    #[test]
    fn default_config_only_moves() {
        assert_eq!(MovementManager::default().phases(), MovementPhases::MOVEMENT);
    }
}
