//=========================================================================
// Event Queue
//=========================================================================
//
// Type-erased storage for one event type's per-frame queue.
//
// Lets `FrameEvents` keep queues of unrelated event types in a single
// map and reset them all at the frame boundary without knowing their
// concrete types.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;

//=== Internal Dependencies ===============================================

use super::FrameEvent;

//=========================================================================

pub(super) trait EventQueue {
    /// Drops queued events, keeping capacity for the next frame.
    fn reset(&mut self);

    fn len(&self) -> usize;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<E: FrameEvent> EventQueue for Vec<E> {
    fn reset(&mut self) {
        self.clear();
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Bump(u32);

    #[test]
    fn reset_keeps_capacity() {
        let mut queue: Vec<Bump> = (0..32).map(Bump).collect();
        let capacity = queue.capacity();

        let erased: &mut dyn EventQueue = &mut queue;
        erased.reset();

        assert_eq!(queue.len(), 0);
        assert_eq!(queue.capacity(), capacity);
    }

    #[test]
    fn downcast_recovers_concrete_queue() {
        let mut queue = vec![Bump(7)];
        let erased: &mut dyn EventQueue = &mut queue;

        assert_eq!(erased.len(), 1);
        erased
            .as_any_mut()
            .downcast_mut::<Vec<Bump>>()
            .unwrap()
            .push(Bump(8));

        assert_eq!(queue, vec![Bump(7), Bump(8)]);
    }
}
