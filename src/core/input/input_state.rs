//=========================================================================
// Input State
//=========================================================================
//
// Current / previous device snapshot with edge queries.
//
// Frame lifecycle:
//   begin_frame()  → previous = current
//   apply(batch)*  → current mutated by each event
//   query          → pressed  = down now, up before
//                    held     = down now and before
//                    released = up now, down before
//
// Menu queries map several physical inputs onto one logical intent:
//   up     ArrowUp | DPadUp            down   ArrowDown | DPadDown
//   left   ArrowLeft | DPadLeft        right  ArrowRight | DPadRight
//   select Space | Enter | A           cancel Escape | B | Back
//   pause  Escape | Start
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;
use std::fmt;

use glam::Vec2;

//=== Internal Dependencies ===============================================

use super::event::{InputEvent, KeyCode, MouseButton, PadButton};

//=== DiscreteInput =======================================================

/// Any binary input. Presence in a set means "held".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscreteInput {
    Key(KeyCode),
    Mouse(MouseButton),
    Pad(PadButton),
}

impl From<KeyCode> for DiscreteInput {
    fn from(key: KeyCode) -> Self {
        DiscreteInput::Key(key)
    }
}

impl From<MouseButton> for DiscreteInput {
    fn from(button: MouseButton) -> Self {
        DiscreteInput::Mouse(button)
    }
}

impl From<PadButton> for DiscreteInput {
    fn from(button: PadButton) -> Self {
        DiscreteInput::Pad(button)
    }
}

//=== InputState ==========================================================

#[derive(Clone, Default)]
pub struct InputState {
    current: HashSet<DiscreteInput>,
    previous: HashSet<DiscreteInput>,
    pointer: Vec2,
    previous_pointer: Vec2,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Frame Processing -------------------------------------------------

    /// Rolls the current snapshot into the previous one.
    pub fn begin_frame(&mut self) {
        self.previous.clone_from(&self.current);
        self.previous_pointer = self.pointer;
    }

    /// Applies a batch of events to the current snapshot.
    pub fn apply(&mut self, batch: &[InputEvent]) {
        for event in batch {
            self.apply_event(event);
        }
    }

    fn apply_event(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::KeyDown(key) => self.press(key),
            InputEvent::KeyUp(key) => self.release(key),
            InputEvent::MouseButtonDown(button) => self.press(button),
            InputEvent::MouseButtonUp(button) => self.release(button),
            InputEvent::PadButtonDown(button) => self.press(button),
            InputEvent::PadButtonUp(button) => self.release(button),
            InputEvent::MouseMoved { x, y } => self.pointer = Vec2::new(x, y),
        }
    }

    fn press(&mut self, input: impl Into<DiscreteInput>) {
        self.current.insert(input.into());
    }

    fn release(&mut self, input: impl Into<DiscreteInput>) {
        self.current.remove(&input.into());
    }

    //=====================================================================
    // Query API - Edges
    //=====================================================================

    /// `true` only on the frame the input went down.
    pub fn is_new_press(&self, input: impl Into<DiscreteInput>) -> bool {
        let input = input.into();
        self.current.contains(&input) && !self.previous.contains(&input)
    }

    /// `true` while held across at least two frames.
    pub fn is_held(&self, input: impl Into<DiscreteInput>) -> bool {
        let input = input.into();
        self.current.contains(&input) && self.previous.contains(&input)
    }

    /// `true` while down, including the first frame.
    pub fn is_down(&self, input: impl Into<DiscreteInput>) -> bool {
        self.current.contains(&input.into())
    }

    /// `true` only on the frame the input went up.
    pub fn is_released(&self, input: impl Into<DiscreteInput>) -> bool {
        let input = input.into();
        !self.current.contains(&input) && self.previous.contains(&input)
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn pointer_delta(&self) -> Vec2 {
        self.pointer - self.previous_pointer
    }

    //=====================================================================
    // Query API - Menu
    //=====================================================================

    pub fn menu_up(&self) -> bool {
        self.any_new_press(&[KeyCode::ArrowUp.into(), PadButton::DPadUp.into()])
    }

    pub fn menu_down(&self) -> bool {
        self.any_new_press(&[KeyCode::ArrowDown.into(), PadButton::DPadDown.into()])
    }

    pub fn menu_left(&self) -> bool {
        self.any_new_press(&[KeyCode::ArrowLeft.into(), PadButton::DPadLeft.into()])
    }

    pub fn menu_right(&self) -> bool {
        self.any_new_press(&[KeyCode::ArrowRight.into(), PadButton::DPadRight.into()])
    }

    pub fn menu_select(&self) -> bool {
        self.any_new_press(&[
            KeyCode::Space.into(),
            KeyCode::Enter.into(),
            PadButton::A.into(),
        ])
    }

    pub fn menu_cancel(&self) -> bool {
        self.any_new_press(&[
            KeyCode::Escape.into(),
            PadButton::B.into(),
            PadButton::Back.into(),
        ])
    }

    pub fn pause(&self) -> bool {
        self.any_new_press(&[KeyCode::Escape.into(), PadButton::Start.into()])
    }

    fn any_new_press(&self, inputs: &[DiscreteInput]) -> bool {
        inputs.iter().any(|&input| self.is_new_press(input))
    }
}

//=== Debug Trait =========================================================

impl fmt::Debug for InputState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let held: Vec<_> = self.current.iter().map(|i| format!("{:?}", i)).collect();

        f.debug_struct("InputState")
            .field("pointer", &self.pointer)
            .field("held", &held)
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(state: &mut InputState, batch: &[InputEvent]) {
        state.begin_frame();
        state.apply(batch);
    }

    //--- Edges ------------------------------------------------------------

    #[test]
    fn press_is_new_for_exactly_one_frame() {
        let mut state = InputState::new();

        frame(&mut state, &[InputEvent::KeyDown(KeyCode::Space)]);
        assert!(state.is_new_press(KeyCode::Space));
        assert!(!state.is_held(KeyCode::Space));

        frame(&mut state, &[]);
        assert!(!state.is_new_press(KeyCode::Space));
        assert!(state.is_held(KeyCode::Space));
        assert!(state.is_down(KeyCode::Space));
    }

    #[test]
    fn release_is_reported_once() {
        let mut state = InputState::new();
        frame(&mut state, &[InputEvent::MouseButtonDown(MouseButton::Left)]);

        frame(&mut state, &[InputEvent::MouseButtonUp(MouseButton::Left)]);
        assert!(state.is_released(MouseButton::Left));

        frame(&mut state, &[]);
        assert!(!state.is_released(MouseButton::Left));
    }

    #[test]
    fn tap_within_one_batch_leaves_no_edge() {
        let mut state = InputState::new();
        frame(
            &mut state,
            &[InputEvent::KeyDown(KeyCode::Enter), InputEvent::KeyUp(KeyCode::Enter)],
        );
        assert!(!state.is_new_press(KeyCode::Enter));
    }

    #[test]
    fn pointer_delta_tracks_movement_between_frames() {
        let mut state = InputState::new();
        frame(&mut state, &[InputEvent::MouseMoved { x: 10.0, y: 10.0 }]);
        frame(&mut state, &[InputEvent::MouseMoved { x: 15.0, y: 8.0 }]);

        assert_eq!(state.pointer(), Vec2::new(15.0, 8.0));
        assert_eq!(state.pointer_delta(), Vec2::new(5.0, -2.0));
    }

    //--- Menu Queries -----------------------------------------------------

    #[test]
    fn menu_queries_accept_keyboard_and_pad() {
        let mut state = InputState::new();

        frame(&mut state, &[InputEvent::PadButtonDown(PadButton::DPadUp)]);
        assert!(state.menu_up());
        assert!(!state.menu_down());

        frame(&mut state, &[InputEvent::KeyDown(KeyCode::ArrowDown)]);
        assert!(state.menu_down());
        assert!(!state.menu_up());
    }

    #[test]
    fn select_and_cancel_mappings() {
        for event in [
            InputEvent::KeyDown(KeyCode::Space),
            InputEvent::KeyDown(KeyCode::Enter),
            InputEvent::PadButtonDown(PadButton::A),
        ] {
            let mut state = InputState::new();
            frame(&mut state, &[event]);
            assert!(state.menu_select(), "{:?} should select", event);
            assert!(!state.menu_cancel());
        }

        for event in [
            InputEvent::KeyDown(KeyCode::Escape),
            InputEvent::PadButtonDown(PadButton::B),
            InputEvent::PadButtonDown(PadButton::Back),
        ] {
            let mut state = InputState::new();
            frame(&mut state, &[event]);
            assert!(state.menu_cancel(), "{:?} should cancel", event);
        }
    }

    #[test]
    fn escape_pauses_and_cancels() {
        let mut state = InputState::new();
        frame(&mut state, &[InputEvent::KeyDown(KeyCode::Escape)]);

        assert!(state.pause());
        assert!(state.menu_cancel());
    }

    #[test]
    fn held_key_does_not_repeat_menu_move() {
        let mut state = InputState::new();
        frame(&mut state, &[InputEvent::KeyDown(KeyCode::ArrowUp)]);
        frame(&mut state, &[]);

        assert!(!state.menu_up());
    }
}
