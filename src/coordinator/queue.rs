//! Pending action queue with a configurable overflow policy.

use crate::config::QueuePolicy;
use crate::coordinator::protocol::DetailsAction;
use crate::error::{EpisodeDetailsError, Result};
use tokio::sync::mpsc;

/// Producer half. Sending never blocks.
#[derive(Debug, Clone)]
pub enum ActionSender {
    Unbounded(mpsc::UnboundedSender<DetailsAction>),
    Bounded {
        tx: mpsc::Sender<DetailsAction>,
        capacity: usize,
    },
}

/// Consumer half, owned by the single action worker.
#[derive(Debug)]
pub enum ActionReceiver {
    Unbounded(mpsc::UnboundedReceiver<DetailsAction>),
    Bounded(mpsc::Receiver<DetailsAction>),
}

/// Create a queue following `policy`.
pub fn action_queue(policy: QueuePolicy) -> (ActionSender, ActionReceiver) {
    match policy {
        QueuePolicy::Unbounded => {
            let (tx, rx) = mpsc::unbounded_channel();
            (ActionSender::Unbounded(tx), ActionReceiver::Unbounded(rx))
        }
        QueuePolicy::Bounded { capacity } => {
            let capacity = capacity.max(1);
            let (tx, rx) = mpsc::channel(capacity);
            (
                ActionSender::Bounded { tx, capacity },
                ActionReceiver::Bounded(rx),
            )
        }
    }
}

impl ActionSender {
    /// Enqueue without waiting. A full bounded queue rejects the new action.
    pub fn send(&self, action: DetailsAction) -> Result<()> {
        match self {
            ActionSender::Unbounded(tx) => tx
                .send(action)
                .map_err(|_| EpisodeDetailsError::CoordinatorClosed),
            ActionSender::Bounded { tx, capacity } => tx.try_send(action).map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => EpisodeDetailsError::QueueFull {
                    capacity: *capacity,
                },
                mpsc::error::TrySendError::Closed(_) => EpisodeDetailsError::CoordinatorClosed,
            }),
        }
    }

    pub fn is_closed(&self) -> bool {
        match self {
            ActionSender::Unbounded(tx) => tx.is_closed(),
            ActionSender::Bounded { tx, .. } => tx.is_closed(),
        }
    }
}

impl ActionReceiver {
    /// Next action in FIFO order, `None` once every sender is gone.
    pub async fn recv(&mut self) -> Option<DetailsAction> {
        match self {
            ActionReceiver::Unbounded(rx) => rx.recv().await,
            ActionReceiver::Bounded(rx) => rx.recv().await,
        }
    }
}
