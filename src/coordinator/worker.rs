use crate::coordinator::protocol::DetailsAction;
use crate::coordinator::queue::ActionReceiver;
use crate::domain::EpisodeId;
use crate::error::Result;
use crate::interactors::{EpisodeUpdater, WatchRecorder};
use chrono::Utc;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::watch;

/// Drain the action queue, dispatching one action at a time.
///
/// Each side effect runs to completion before the next action is taken off
/// the queue. Failures and panics in an interactor are logged and the loop
/// moves on; the pending count is released either way.
pub async fn action_worker_loop(
    mut rx: ActionReceiver,
    episode_id: EpisodeId,
    updater: Arc<dyn EpisodeUpdater>,
    recorder: Arc<dyn WatchRecorder>,
    pending: Arc<watch::Sender<usize>>,
) {
    let dispatcher = Dispatcher {
        episode_id,
        updater,
        recorder,
    };
    log::debug!("action worker started for episode {}", episode_id);

    while let Some(action) = rx.recv().await {
        log::debug!("dispatching {:?} for episode {}", action, episode_id);
        match AssertUnwindSafe(dispatcher.dispatch(action))
            .catch_unwind()
            .await
        {
            Ok(Ok(())) => {}
            Ok(Err(error)) => log::warn!(
                "{} failed for episode {}: {}",
                action.name(),
                episode_id,
                error
            ),
            Err(panic) => log::warn!(
                "{} panicked for episode {}: {}",
                action.name(),
                episode_id,
                panic_message(panic.as_ref())
            ),
        }
        pending.send_modify(|count| *count = count.saturating_sub(1));
    }

    log::debug!("action worker stopped for episode {}", episode_id);
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

struct Dispatcher {
    episode_id: EpisodeId,
    updater: Arc<dyn EpisodeUpdater>,
    recorder: Arc<dyn WatchRecorder>,
}

impl Dispatcher {
    async fn dispatch(&self, action: DetailsAction) -> Result<()> {
        match action {
            DetailsAction::Refresh => self.updater.update_episode(self.episode_id, true).await,
            DetailsAction::AddWatch => self.recorder.add_watch(self.episode_id, Utc::now()).await,
            DetailsAction::RemoveAllWatches => {
                self.recorder.remove_all_watches(self.episode_id).await
            }
            DetailsAction::RemoveWatch(watch_id) => self.recorder.remove_watch(watch_id).await,
        }
    }
}
