//! Data-access collaborators consumed by the coordinator.
//!
//! These traits are the seam between the presentation layer and whatever
//! persistence sits behind it. Observers hand back long-lived streams; the
//! write-side interactors are fire-and-forget from the coordinator's point of
//! view, with their effects arriving later through the observers.

use crate::domain::{Episode, EpisodeId, EpisodeWatch, WatchId};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::BoxStream;
use std::sync::Arc;

/// Stream of episode detail emissions.
pub type EpisodeStream = BoxStream<'static, Result<Episode>>;

/// Stream of watch history emissions.
pub type WatchesStream = BoxStream<'static, Result<Vec<EpisodeWatch>>>;

/// Observes the detail record for an episode.
pub trait EpisodeObserver: Send + Sync {
    /// Start observing `id`. The stream re-emits whenever the record changes
    /// and ends only when the data source goes away.
    fn observe_episode(&self, id: EpisodeId) -> EpisodeStream;
}

/// Observes the watch history for an episode.
pub trait WatchesObserver: Send + Sync {
    /// Start observing the watch entries of `id`.
    fn observe_watches(&self, id: EpisodeId) -> WatchesStream;
}

/// Refreshes episode details from their source of truth.
#[async_trait]
pub trait EpisodeUpdater: Send + Sync {
    /// Refresh `id`, bypassing any cache when `force_reload` is set.
    async fn update_episode(&self, id: EpisodeId, force_reload: bool) -> Result<()>;
}

/// Mutates the watch history.
#[async_trait]
pub trait WatchRecorder: Send + Sync {
    /// Record a watch of `id` at `watched_at`.
    async fn add_watch(&self, id: EpisodeId, watched_at: DateTime<Utc>) -> Result<()>;

    /// Remove every watch entry of `id`.
    async fn remove_all_watches(&self, id: EpisodeId) -> Result<()>;

    /// Remove a single watch entry.
    async fn remove_watch(&self, watch_id: WatchId) -> Result<()>;
}

/// Bundle of collaborators injected into a coordinator.
#[derive(Clone)]
pub struct DetailsInteractors {
    pub episode_observer: Arc<dyn EpisodeObserver>,
    pub watches_observer: Arc<dyn WatchesObserver>,
    pub updater: Arc<dyn EpisodeUpdater>,
    pub recorder: Arc<dyn WatchRecorder>,
}

impl DetailsInteractors {
    /// Use one value for every collaborator role.
    pub fn from_shared<T>(shared: Arc<T>) -> Self
    where
        T: EpisodeObserver + WatchesObserver + EpisodeUpdater + WatchRecorder + 'static,
    {
        Self {
            episode_observer: shared.clone(),
            watches_observer: shared.clone(),
            updater: shared.clone(),
            recorder: shared,
        }
    }
}
