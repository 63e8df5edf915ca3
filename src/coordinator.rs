//! View state coordinator for the episode details screen.
//!
//! The coordinator bridges two observation streams and one action queue into a
//! single [`ViewState`]. It owns three tasks:
//!
//! - the episode loop, which copies detail emissions into state
//! - the watches loop, which copies watch history emissions into state and
//!   recomputes the watch affordance
//! - the action worker, which dispatches queued actions one at a time
//!
//! All three are cancelled together on [`DetailsCoordinator::shutdown`] or drop.

pub mod observers;
pub mod protocol;
pub mod queue;
pub mod worker;

pub use protocol::DetailsAction;

use crate::config::CoordinatorConfig;
use crate::domain::EpisodeId;
use crate::error::{EpisodeDetailsError, Result};
use crate::interactors::DetailsInteractors;
use crate::state::{StateStore, ViewState};
use queue::{action_queue, ActionSender};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;

/// Coordinates the view state of one episode details screen.
pub struct DetailsCoordinator {
    store: Arc<StateStore>,
    actions: ActionSender,
    /// Number of submitted actions not yet dispatched to completion
    pending: Arc<watch::Sender<usize>>,
    tasks: Vec<JoinHandle<()>>,
}

impl DetailsCoordinator {
    /// Start coordinating `episode_id`.
    ///
    /// Must be called from within a Tokio runtime; the observation loops and
    /// the action worker are spawned onto it.
    pub fn new(
        episode_id: EpisodeId,
        interactors: DetailsInteractors,
        config: CoordinatorConfig,
    ) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|_| EpisodeDetailsError::NoRuntime)?;

        let store = Arc::new(StateStore::new(ViewState::new(episode_id)));
        let (pending, _) = watch::channel(0usize);
        let pending = Arc::new(pending);
        let (actions, action_rx) = action_queue(config.queue);

        let (episode_trigger, episode_trigger_rx) = oneshot::channel();
        let (watches_trigger, watches_trigger_rx) = oneshot::channel();

        let tasks = vec![
            runtime.spawn(observers::episode_loop(
                Arc::clone(&interactors.episode_observer),
                episode_trigger_rx,
                Arc::clone(&store),
            )),
            runtime.spawn(observers::watches_loop(
                Arc::clone(&interactors.watches_observer),
                watches_trigger_rx,
                Arc::clone(&store),
            )),
            runtime.spawn(worker::action_worker_loop(
                action_rx,
                episode_id,
                Arc::clone(&interactors.updater),
                Arc::clone(&interactors.recorder),
                Arc::clone(&pending),
            )),
        ];

        let coordinator = Self {
            store,
            actions,
            pending,
            tasks,
        };

        let subject = coordinator.store.snapshot().episode_id;
        // The loops only exit early if already cancelled; nothing to report then.
        let _ = episode_trigger.send(subject);
        let _ = watches_trigger.send(subject);

        if config.refresh_on_start {
            coordinator.submit_action(DetailsAction::Refresh)?;
        }

        log::info!("details coordinator started for episode {}", episode_id);
        Ok(coordinator)
    }

    /// Queue `action` for dispatch without waiting for it to run.
    pub fn submit_action(&self, action: DetailsAction) -> Result<()> {
        self.pending.send_modify(|count| *count += 1);
        if let Err(error) = self.actions.send(action) {
            self.pending
                .send_modify(|count| *count = count.saturating_sub(1));
            return Err(error);
        }
        Ok(())
    }

    /// Current view state snapshot.
    pub fn state(&self) -> ViewState {
        self.store.snapshot()
    }

    /// Receiver notified on every view state change.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.store.subscribe()
    }

    /// Number of actions queued or in flight.
    pub fn pending_actions(&self) -> usize {
        *self.pending.borrow()
    }

    /// Wait until every submitted action has been dispatched.
    pub async fn wait_idle(&self) {
        let mut rx = self.pending.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = rx.wait_for(|count| *count == 0).await;
    }

    /// Whether the coordinator can still accept actions.
    pub fn is_running(&self) -> bool {
        !self.actions.is_closed()
    }

    /// Cancel all coordinator tasks and wait for them to finish.
    ///
    /// Afterwards the observation streams are dropped, the action queue is
    /// closed, and [`submit_action`](Self::submit_action) reports
    /// [`EpisodeDetailsError::CoordinatorClosed`].
    pub async fn shutdown(&mut self) {
        let tasks = std::mem::take(&mut self.tasks);
        for task in &tasks {
            task.abort();
        }
        for task in tasks {
            if let Err(error) = task.await {
                if !error.is_cancelled() {
                    log::warn!("coordinator task failed during shutdown: {}", error);
                }
            }
        }
        self.pending.send_replace(0);
        log::info!(
            "details coordinator stopped for episode {}",
            self.store.snapshot().episode_id
        );
    }
}

impl Drop for DetailsCoordinator {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryEpisodeRepository;

    #[test]
    fn construction_outside_runtime_fails() {
        let repository = Arc::new(InMemoryEpisodeRepository::new());
        let result = DetailsCoordinator::new(
            EpisodeId(1),
            DetailsInteractors::from_shared(repository),
            CoordinatorConfig::default(),
        );
        assert!(matches!(result, Err(EpisodeDetailsError::NoRuntime)));
    }

    #[tokio::test]
    async fn refresh_can_be_disabled() {
        let repository = Arc::new(InMemoryEpisodeRepository::new());
        let coordinator = DetailsCoordinator::new(
            EpisodeId(1),
            DetailsInteractors::from_shared(repository),
            CoordinatorConfig {
                refresh_on_start: false,
                ..CoordinatorConfig::default()
            },
        )
        .unwrap();
        assert_eq!(coordinator.pending_actions(), 0);
    }
}
