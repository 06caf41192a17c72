//=========================================================================
// Command Queue
//=========================================================================
//
// Stack requests raised by screen logic.
//
// Screens never hold the coordinator. They queue commands here while they
// run, and the coordinator applies the queue as soon as the issuing screen
// returns, before the next screen in the snapshot is processed.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

//=== Internal Dependencies ===============================================

use super::{GameScreen, ScreenId};

//=== ScreenCommand =======================================================

pub enum ScreenCommand {
    /// Push a new screen on top of the stack.
    Add(GameScreen),

    /// Start the screen's exit transition, or remove it at once when its
    /// fade-out time is zero.
    Exit(ScreenId),

    /// Remove the screen immediately.
    Remove(ScreenId),
}

impl fmt::Debug for ScreenCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add(screen) => f.debug_tuple("Add").field(&screen.id()).finish(),
            Self::Exit(id) => f.debug_tuple("Exit").field(id).finish(),
            Self::Remove(id) => f.debug_tuple("Remove").field(id).finish(),
        }
    }
}

//=== CommandQueue ========================================================

#[derive(Debug, Default)]
pub struct CommandQueue {
    queue: Vec<ScreenCommand>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self { queue: Vec::new() }
    }

    pub fn push(&mut self, command: ScreenCommand) {
        self.queue.push(command);
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Takes all commands in FIFO order, leaving the queue empty.
    pub fn take(&mut self) -> Vec<ScreenCommand> {
        std::mem::take(&mut self.queue)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_drains_in_fifo_order() {
        let mut queue = CommandQueue::new();
        assert!(queue.is_empty());

        let first = ScreenId::next();
        let second = ScreenId::next();
        queue.push(ScreenCommand::Exit(first));
        queue.push(ScreenCommand::Remove(second));
        assert!(!queue.is_empty());

        let drained = queue.take();

        assert!(queue.is_empty());
        assert!(matches!(drained[0], ScreenCommand::Exit(id) if id == first));
        assert!(matches!(drained[1], ScreenCommand::Remove(id) if id == second));
    }
}
