//=========================================================================
// Input Feed
//=========================================================================
//
// Bounded channel between the device layer and the screen coordinator.
//
// Architecture:
//   device layer → Sender<InputBatch> → InputFeed::drain_into() → InputState
//
// Draining is capped per frame so a flooded channel cannot stall a frame.
// Leftover batches are picked up on the next frame.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::event::InputBatch;
use super::input_state::InputState;

//=== InputFeed ===========================================================

pub struct InputFeed {
    receiver: Receiver<InputBatch>,
    disconnected: bool,
}

impl InputFeed {
    /// Most batches applied in one frame.
    pub const MAX_BATCHES_PER_FRAME: usize = 100;

    /// Creates a feed holding at most `capacity` undrained batches.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn bounded(capacity: usize) -> (Sender<InputBatch>, Self) {
        assert!(capacity > 0, "Channel capacity must be positive, got {}", capacity);
        let (sender, receiver) = bounded(capacity);
        (sender, Self::new(receiver))
    }

    pub fn new(receiver: Receiver<InputBatch>) -> Self {
        Self {
            receiver,
            disconnected: false,
        }
    }

    /// Applies pending batches to `state` in arrival order.
    ///
    /// Returns the number of batches applied.
    pub fn drain_into(&mut self, state: &mut InputState) -> usize {
        let mut drained = 0;

        while drained < Self::MAX_BATCHES_PER_FRAME {
            match self.receiver.try_recv() {
                Ok(batch) => {
                    state.apply(&batch);
                    drained += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.disconnected {
                        debug!("Input feed disconnected, no further input will arrive");
                        self.disconnected = true;
                    }
                    break;
                }
            }
        }

        if drained >= Self::MAX_BATCHES_PER_FRAME {
            warn!("Input backlog: drained {} batches this frame", drained);
        }

        drained
    }

    /// `true` once every sender has been dropped and the channel is empty.
    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::event::{InputEvent, KeyCode};

    #[test]
    fn drain_handles_empty_channel() {
        let (_tx, mut feed) = InputFeed::bounded(4);
        let mut state = InputState::new();

        assert_eq!(feed.drain_into(&mut state), 0);
        assert!(!feed.is_disconnected());
    }

    #[test]
    fn batches_apply_in_arrival_order() {
        let (tx, mut feed) = InputFeed::bounded(4);
        let mut state = InputState::new();

        tx.send(vec![InputEvent::KeyDown(KeyCode::KeyA)]).unwrap();
        tx.send(vec![InputEvent::KeyUp(KeyCode::KeyA), InputEvent::KeyDown(KeyCode::KeyB)])
            .unwrap();

        state.begin_frame();
        assert_eq!(feed.drain_into(&mut state), 2);
        assert!(!state.is_down(KeyCode::KeyA));
        assert!(state.is_new_press(KeyCode::KeyB));
    }

    #[test]
    fn drain_is_capped_per_frame() {
        let cap = InputFeed::MAX_BATCHES_PER_FRAME;
        let (tx, mut feed) = InputFeed::bounded(cap + 10);
        let mut state = InputState::new();

        for _ in 0..cap + 10 {
            tx.send(Vec::new()).unwrap();
        }

        assert_eq!(feed.drain_into(&mut state), cap);
        assert_eq!(feed.drain_into(&mut state), 10);
    }

    #[test]
    fn dropped_sender_marks_feed_disconnected() {
        let (tx, mut feed) = InputFeed::bounded(1);
        drop(tx);

        feed.drain_into(&mut InputState::new());

        assert!(feed.is_disconnected());
    }

    #[test]
    #[should_panic(expected = "Channel capacity must be positive")]
    fn zero_capacity_is_rejected() {
        let _ = InputFeed::bounded(0);
    }
}
