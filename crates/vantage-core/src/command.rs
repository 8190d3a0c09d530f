//! Tip commands: fire-and-forget messages from the HTTP boundary to the
//! producer's own turn.
//!
//! The request handler enqueues with [`TipSender::submit`], which never
//! waits. The producer drains the queue at the start of each tick and
//! delivers the messages itself, so nothing outside the producer's turn
//! ever touches the host.

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::{TryRecvError, TrySendError};

/// Prefix added to a tip when it is shown to the player.
pub const TIP_PREFIX: &str = "[TIP] ";

/// One queued tip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TipCommand {
    /// The message exactly as submitted.
    pub message: String,
    /// When the HTTP boundary accepted it.
    pub received_at: DateTime<Utc>,
}

impl TipCommand {
    /// The chat line shown to the player.
    pub fn chat_line(&self) -> String {
        format!("{TIP_PREFIX}{}", self.message)
    }
}

/// Outcome of a non-blocking submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TipDelivery {
    /// The tip is waiting for the next producer turn.
    Queued,
    /// The queue is at capacity; the tip was dropped.
    QueueFull,
    /// The producer is gone; the tip was dropped.
    Closed,
}

/// Submitting half of the tip queue. Cheap to clone.
#[derive(Debug, Clone)]
pub struct TipSender {
    tx: mpsc::Sender<TipCommand>,
}

impl TipSender {
    /// Enqueue `message` without waiting.
    pub fn submit(&self, message: impl Into<String>) -> TipDelivery {
        let command = TipCommand {
            message: message.into(),
            received_at: Utc::now(),
        };
        match self.tx.try_send(command) {
            Ok(()) => TipDelivery::Queued,
            Err(TrySendError::Full(_)) => TipDelivery::QueueFull,
            Err(TrySendError::Closed(_)) => TipDelivery::Closed,
        }
    }
}

/// Receiving half of the tip queue, owned by the producer.
#[derive(Debug)]
pub struct TipReceiver {
    rx: mpsc::Receiver<TipCommand>,
}

impl TipReceiver {
    /// Take every tip queued so far, oldest first.
    pub fn drain(&mut self) -> Vec<TipCommand> {
        let mut commands = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(command) => commands.push(command),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        commands
    }
}

/// Create a bounded tip queue holding at most `capacity` undelivered tips.
pub fn tip_channel(capacity: usize) -> (TipSender, TipReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (TipSender { tx }, TipReceiver { rx })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_and_drain_in_order() {
        let (tx, mut rx) = tip_channel(8);
        assert_eq!(tx.submit("Drink a potion"), TipDelivery::Queued);
        assert_eq!(tx.submit(String::from("Find shelter")), TipDelivery::Queued);

        let drained = rx.drain();
        let messages: Vec<&str> = drained.iter().map(|c| c.message.as_str()).collect();
        assert_eq!(messages, vec!["Drink a potion", "Find shelter"]);
        assert!(rx.drain().is_empty());
    }

    #[test]
    fn full_queue_drops_without_blocking() {
        let (tx, mut rx) = tip_channel(1);
        assert_eq!(tx.submit("one"), TipDelivery::Queued);
        assert_eq!(tx.submit("two"), TipDelivery::QueueFull);
        assert_eq!(rx.drain().len(), 1);
        assert_eq!(tx.submit("three"), TipDelivery::Queued);
    }

    #[test]
    fn closed_queue_is_reported() {
        let (tx, rx) = tip_channel(4);
        drop(rx);
        assert_eq!(tx.submit("anyone?"), TipDelivery::Closed);
    }

    #[test]
    fn chat_line_is_prefixed() {
        let command = TipCommand {
            message: String::from("Craft a table"),
            received_at: Utc::now(),
        };
        assert_eq!(command.chat_line(), "[TIP] Craft a table");
    }
}
