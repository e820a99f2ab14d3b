//! Bounded command queue between intake and the applier

use duoline_protocol::Command;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

/// Commands that can wait for the applier
pub const QUEUE_CAPACITY: usize = 4;

/// FIFO mailbox carrying [`Command`] values
///
/// A full queue makes the producer wait; nothing is dropped or reordered.
pub struct CommandQueue<const N: usize = QUEUE_CAPACITY> {
    channel: Channel<CriticalSectionRawMutex, Command, N>,
}

impl<const N: usize> CommandQueue<N> {
    /// Empty queue, usable in a `static`
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
        }
    }

    /// Append a command, waiting while the queue is full
    pub async fn enqueue(&self, command: Command) {
        self.channel.send(command).await
    }

    /// Take the oldest command, waiting while the queue is empty
    pub async fn dequeue(&self) -> Command {
        self.channel.receive().await
    }

    /// Take the oldest command if one is queued
    pub fn try_dequeue(&self) -> Option<Command> {
        self.channel.try_receive().ok()
    }

    /// Number of queued commands
    pub fn len(&self) -> usize {
        self.channel.len()
    }

    /// Check if no command is queued
    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }

    /// Check if the next enqueue would wait
    pub fn is_full(&self) -> bool {
        self.channel.is_full()
    }
}

impl<const N: usize> Default for CommandQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use core::pin::pin;

    use duoline_protocol::BoundedText;
    use embassy_futures::{block_on, poll_once};

    use super::*;

    fn readings(n: i32) -> Command {
        Command::SetReadings { a: n, b: -n }
    }

    #[test]
    fn test_fifo_order() {
        let queue: CommandQueue = CommandQueue::new();
        block_on(async {
            queue.enqueue(readings(1)).await;
            queue.enqueue(Command::SetText(BoundedText::from("two"))).await;
            queue.enqueue(readings(3)).await;
        });
        assert_eq!(queue.len(), 3);

        assert_eq!(block_on(queue.dequeue()), readings(1));
        assert_eq!(
            block_on(queue.dequeue()),
            Command::SetText(BoundedText::from("two"))
        );
        assert_eq!(queue.try_dequeue(), Some(readings(3)));
        assert_eq!(queue.try_dequeue(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_full_queue_blocks_then_completes_in_order() {
        let queue: CommandQueue = CommandQueue::new();
        for n in 1..=4 {
            assert!(poll_once(queue.enqueue(readings(n))).is_ready());
        }
        assert!(queue.is_full());

        let mut fifth = pin!(queue.enqueue(readings(5)));
        assert!(poll_once(fifth.as_mut()).is_pending());
        assert_eq!(queue.len(), QUEUE_CAPACITY);

        assert_eq!(queue.try_dequeue(), Some(readings(1)));
        assert!(poll_once(fifth.as_mut()).is_ready());

        for n in 2..=5 {
            assert_eq!(queue.try_dequeue(), Some(readings(n)));
        }
        assert!(queue.is_empty());
    }

    #[test]
    fn test_dequeue_waits_when_empty() {
        let queue: CommandQueue = CommandQueue::new();
        let mut next = pin!(queue.dequeue());
        assert!(poll_once(next.as_mut()).is_pending());

        assert!(poll_once(queue.enqueue(readings(7))).is_ready());
        assert_eq!(poll_once(next.as_mut()), core::task::Poll::Ready(readings(7)));
    }
}
