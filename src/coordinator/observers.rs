//! Observation loops copying upstream emissions into the view state.

use crate::domain::EpisodeId;
use crate::interactors::{EpisodeObserver, WatchesObserver};
use crate::state::StateStore;
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::oneshot;

/// Wait for the episode id, then copy every detail emission into state.
pub async fn episode_loop(
    observer: Arc<dyn EpisodeObserver>,
    trigger: oneshot::Receiver<EpisodeId>,
    store: Arc<StateStore>,
) {
    let Ok(episode_id) = trigger.await else {
        return;
    };

    let mut updates = observer.observe_episode(episode_id);
    while let Some(update) = updates.next().await {
        match update {
            Ok(episode) => {
                log::debug!("episode {} details updated", episode_id);
                store.set_state(|s| s.with_episode(episode));
            }
            Err(error) => log::warn!("episode {} observation failed: {}", episode_id, error),
        }
    }

    log::debug!("episode {} observation ended", episode_id);
}

/// Publish an empty history, wait for the episode id, then copy every watch
/// history emission into state.
pub async fn watches_loop(
    observer: Arc<dyn WatchesObserver>,
    trigger: oneshot::Receiver<EpisodeId>,
    store: Arc<StateStore>,
) {
    store.set_state(|s| s.with_watches(Vec::new()));

    let Ok(episode_id) = trigger.await else {
        return;
    };

    let mut updates = observer.observe_watches(episode_id);
    while let Some(update) = updates.next().await {
        match update {
            Ok(watches) => {
                log::debug!("episode {} has {} watches", episode_id, watches.len());
                store.set_state(|s| s.with_watches(watches));
            }
            Err(error) => log::warn!("episode {} watch observation failed: {}", episode_id, error),
        }
    }

    log::debug!("episode {} watch observation ended", episode_id);
}
