//! Hand-off from background threads to the dispatch thread.
//!
//! The router is single-threaded. Work that completes elsewhere (a finished
//! external process, a file load) posts its message through a
//! [`MessagePoster`], which is `Send + Sync`. The dispatch thread owns the
//! [`MessagePump`] and is the only consumer: it either drains pending
//! messages between UI ticks or awaits them in a loop.
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::mpsc::error::TryRecvError;

use crate::event::dispatcher::{MessageRouter, Result};
use crate::event::error::RoutingError;
use crate::event::{Message, NodeId, RaiseOutcome};

#[derive(Debug)]
struct PostedMessage {
    target: NodeId,
    message: Message,
}

/// Cloneable, thread-safe sender half of the pump
#[derive(Debug, Clone)]
pub struct MessagePoster {
    sender: UnboundedSender<PostedMessage>,
}

impl MessagePoster {
    /// Queue `message` to be raised on `target` by the dispatch thread
    pub fn post(&self, target: NodeId, message: Message) -> Result<()> {
        self.sender
            .send(PostedMessage { target, message })
            .map_err(|e| RoutingError::PumpClosed {
                reason: format!("message for {} was not delivered", e.0.target),
            })
    }
}

/// Single-consumer queue drained on the dispatch thread
#[derive(Debug)]
pub struct MessagePump {
    sender: Option<UnboundedSender<PostedMessage>>,
    receiver: UnboundedReceiver<PostedMessage>,
}

impl MessagePump {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            sender: Some(sender),
            receiver,
        }
    }

    /// Create a poster. Fails once the pump has been closed.
    pub fn poster(&self) -> Result<MessagePoster> {
        match &self.sender {
            Some(sender) => Ok(MessagePoster { sender: sender.clone() }),
            None => Err(RoutingError::PumpClosed {
                reason: "no new posters after close".to_string(),
            }),
        }
    }

    /// Stop handing out posters. The pump finishes once every existing
    /// poster has been dropped and the queue is empty.
    pub fn close(&mut self) {
        self.sender = None;
    }

    /// Raise the messages queued when the call starts. Anything posted
    /// meanwhile, including by the handlers it runs, waits for the next
    /// drain. Returns how many were delivered.
    pub fn drain(&mut self, router: &MessageRouter) -> usize {
        let pending = self.receiver.len();
        let mut count = 0;
        for _ in 0..pending {
            match self.receiver.try_recv() {
                Ok(posted) => {
                    if Self::deliver(router, posted).is_some() {
                        count += 1;
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        count
    }

    /// Messages posted but not yet raised
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }

    /// Wait for the next posted message and raise it.
    /// Returns `None` once the pump is closed and empty.
    pub async fn next(&mut self, router: &MessageRouter) -> Option<RaiseOutcome> {
        loop {
            let posted = self.receiver.recv().await?;
            if let Some(outcome) = Self::deliver(router, posted) {
                return Some(outcome);
            }
        }
    }

    /// Consumer loop: closes the pump, then raises messages until every
    /// poster is gone. Returns how many were delivered.
    pub async fn run(&mut self, router: &MessageRouter) -> usize {
        self.close();
        let mut count = 0;
        while self.next(router).await.is_some() {
            count += 1;
        }
        count
    }

    fn deliver(router: &MessageRouter, posted: PostedMessage) -> Option<RaiseOutcome> {
        match router.raise(posted.target, posted.message) {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                log::warn!("Posted message could not be raised on {}: {}", posted.target, e);
                None
            }
        }
    }
}

impl Default for MessagePump {
    fn default() -> Self {
        Self::new()
    }
}
