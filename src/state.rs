//! View state snapshot and its single-writer store.
//!
//! [`ViewState`] is an immutable snapshot: every update produces a new value
//! through [`StateStore::set_state`]. The store is backed by a
//! `tokio::sync::watch` channel so renderers can await changes.

use crate::domain::{Episode, EpisodeId, EpisodeWatch, WatchAction};
use tokio::sync::watch;

/// Everything the details screen needs to render.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Episode being viewed
    pub episode_id: EpisodeId,

    /// Detail record, `None` until the first observation arrives
    pub episode: Option<Episode>,

    /// Watch history, empty until the first observation arrives
    pub watches: Vec<EpisodeWatch>,

    /// Button affordance, always derived from `watches`
    pub action: WatchAction,
}

impl ViewState {
    /// Initial state for `episode_id`.
    pub fn new(episode_id: EpisodeId) -> Self {
        Self {
            episode_id,
            episode: None,
            watches: Vec::new(),
            action: WatchAction::for_watches(&[]),
        }
    }

    /// Copy with the detail record replaced.
    pub fn with_episode(&self, episode: Episode) -> Self {
        Self {
            episode: Some(episode),
            ..self.clone()
        }
    }

    /// Copy with the watch history replaced and the affordance recomputed.
    pub fn with_watches(&self, watches: Vec<EpisodeWatch>) -> Self {
        let action = WatchAction::for_watches(&watches);
        Self {
            watches,
            action,
            ..self.clone()
        }
    }
}

/// Single-writer container for [`ViewState`].
///
/// Updates are read-modify-write under the channel's write lock, so two tasks
/// updating disjoint fields never lose each other's writes.
#[derive(Debug)]
pub struct StateStore {
    tx: watch::Sender<ViewState>,
}

impl StateStore {
    pub fn new(initial: ViewState) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Apply `reducer` to the current snapshot and publish the result.
    pub fn set_state<F>(&self, reducer: F) -> ViewState
    where
        F: FnOnce(&ViewState) -> ViewState,
    {
        let mut next = None;
        self.tx.send_modify(|current| {
            let updated = reducer(current);
            *current = updated.clone();
            next = Some(updated);
        });
        next.unwrap_or_else(|| self.snapshot())
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> ViewState {
        self.tx.borrow().clone()
    }

    /// Receiver that is notified on every update.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::WatchId;
    use chrono::Utc;
    use std::sync::Arc;

    fn watch_entry(id: u64) -> EpisodeWatch {
        EpisodeWatch {
            id: WatchId(id),
            episode_id: EpisodeId(42),
            watched_at: Utc::now(),
        }
    }

    fn episode() -> Episode {
        Episode {
            id: EpisodeId(42),
            title: Some("Pilot".to_string()),
            summary: None,
            season: 1,
            number: 1,
            first_aired: None,
        }
    }

    #[test]
    fn initial_state_is_empty_and_watchable() {
        let state = ViewState::new(EpisodeId(42));
        assert_eq!(state.episode_id, EpisodeId(42));
        assert!(state.episode.is_none());
        assert!(state.watches.is_empty());
        assert_eq!(state.action, WatchAction::Watch);
    }

    #[test]
    fn with_watches_recomputes_action() {
        let state = ViewState::new(EpisodeId(42)).with_watches(vec![watch_entry(1)]);
        assert_eq!(state.action, WatchAction::Unwatch);

        let cleared = state.with_watches(Vec::new());
        assert_eq!(cleared.action, WatchAction::Watch);
        assert!(cleared.watches.is_empty());
    }

    #[test]
    fn with_episode_leaves_watches_alone() {
        let state = ViewState::new(EpisodeId(42)).with_watches(vec![watch_entry(1)]);
        let next = state.with_episode(episode());
        assert_eq!(next.episode, Some(episode()));
        assert_eq!(next.watches, state.watches);
        assert_eq!(next.action, WatchAction::Unwatch);
    }

    #[test]
    fn set_state_returns_and_publishes_snapshot() {
        let store = StateStore::new(ViewState::new(EpisodeId(42)));
        let mut rx = store.subscribe();

        let updated = store.set_state(|s| s.with_episode(episode()));

        assert_eq!(updated.episode, Some(episode()));
        assert_eq!(store.snapshot(), updated);
        assert!(rx.has_changed().unwrap_or(false));
        assert_eq!(*rx.borrow_and_update(), updated);
    }

    #[tokio::test]
    async fn concurrent_writers_do_not_lose_updates() {
        let store = Arc::new(StateStore::new(ViewState::new(EpisodeId(42))));

        let episodes = {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                for _ in 0..100 {
                    store.set_state(|s| s.with_episode(episode()));
                    tokio::task::yield_now().await;
                }
            })
        };
        let watches = {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                for i in 0..100 {
                    store.set_state(|s| s.with_watches(vec![watch_entry(i)]));
                    tokio::task::yield_now().await;
                }
            })
        };

        tokio_test::assert_ok!(episodes.await);
        tokio_test::assert_ok!(watches.await);

        let state = store.snapshot();
        assert_eq!(state.episode, Some(episode()));
        assert_eq!(state.watches.len(), 1);
        assert_eq!(state.watches[0].id, WatchId(99));
        assert_eq!(state.action, WatchAction::Unwatch);
    }
}
