//=========================================================================
// Frame Event Bus
//=========================================================================
//
// One queue per event type, created on first publish and reused across
// frames. Readers borrow slices; nothing is consumed by reading, so any
// number of systems can observe the same frame's events.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::TypeId;
use std::collections::HashMap;

//=== Internal Dependencies ===============================================

use super::queue::EventQueue;
use super::FrameEvent;

//=== FrameEvents =========================================================

/// Typed, per-frame event storage.
#[derive(Default)]
pub struct FrameEvents {
    queues: HashMap<TypeId, Box<dyn EventQueue>>,
}

impl FrameEvents {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Publishing -------------------------------------------------------

    /// Appends an event to its type's queue.
    pub fn publish<E: FrameEvent>(&mut self, event: E) {
        let queue = self
            .queues
            .entry(TypeId::of::<E>())
            .or_insert_with(|| Box::new(Vec::<E>::new()));

        // Keyed by TypeId, so the downcast always matches.
        if let Some(events) = queue.as_any_mut().downcast_mut::<Vec<E>>() {
            events.push(event);
        }
    }

    //--- Reading ----------------------------------------------------------

    /// All events of type `E` published since the last reset.
    pub fn read<E: FrameEvent>(&self) -> &[E] {
        self.queues
            .get(&TypeId::of::<E>())
            .and_then(|q| q.as_any().downcast_ref::<Vec<E>>())
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn count<E: FrameEvent>(&self) -> usize {
        self.queues.get(&TypeId::of::<E>()).map_or(0, |q| q.len())
    }

    /// Total number of queued events across all types.
    pub fn total(&self) -> usize {
        self.queues.values().map(|q| q.len()).sum()
    }

    //--- Frame Boundary ---------------------------------------------------

    /// Removes and returns the queued events of type `E`.
    pub fn take<E: FrameEvent>(&mut self) -> Vec<E> {
        self.queues
            .get_mut(&TypeId::of::<E>())
            .and_then(|q| q.as_any_mut().downcast_mut::<Vec<E>>())
            .map(std::mem::take)
            .unwrap_or_default()
    }

    /// Empties every queue while keeping their allocations.
    pub fn clear_all(&mut self) {
        for queue in self.queues.values_mut() {
            queue.reset();
        }
    }
}

impl std::fmt::Debug for FrameEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameEvents")
            .field("types", &self.queues.len())
            .field("queued", &self.total())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Clone, Copy)]
    struct Landed {
        entity: u64,
    }

    #[derive(Debug, PartialEq, Clone)]
    struct Scored {
        points: u32,
    }

    #[test]
    fn unpublished_type_reads_empty() {
        let events = FrameEvents::new();
        assert!(events.read::<Landed>().is_empty());
        assert_eq!(events.count::<Landed>(), 0);
    }

    #[test]
    fn events_are_grouped_by_type_in_publish_order() {
        let mut events = FrameEvents::new();
        events.publish(Landed { entity: 1 });
        events.publish(Scored { points: 10 });
        events.publish(Landed { entity: 2 });

        assert_eq!(events.read::<Landed>(), &[Landed { entity: 1 }, Landed { entity: 2 }]);
        assert_eq!(events.read::<Scored>(), &[Scored { points: 10 }]);
        assert_eq!(events.total(), 3);
    }

    #[test]
    fn reading_does_not_consume() {
        let mut events = FrameEvents::new();
        events.publish(Scored { points: 5 });

        assert_eq!(events.read::<Scored>().len(), 1);
        assert_eq!(events.read::<Scored>().len(), 1);
    }

    #[test]
    fn take_empties_only_that_type() {
        let mut events = FrameEvents::new();
        events.publish(Landed { entity: 9 });
        events.publish(Scored { points: 1 });

        let landed = events.take::<Landed>();

        assert_eq!(landed, vec![Landed { entity: 9 }]);
        assert_eq!(events.count::<Landed>(), 0);
        assert_eq!(events.count::<Scored>(), 1);
    }

    #[test]
    fn clear_all_resets_for_next_frame() {
        let mut events = FrameEvents::new();
        events.publish(Landed { entity: 1 });
        events.publish(Scored { points: 2 });

        events.clear_all();
        assert_eq!(events.total(), 0);

        events.publish(Landed { entity: 3 });
        assert_eq!(events.read::<Landed>(), &[Landed { entity: 3 }]);
    }
}
