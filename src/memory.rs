//! In-memory implementation of the data-access collaborators.
//!
//! Holds a "remote" episode catalogue, a local episode cache, and the watch
//! history behind one `parking_lot::Mutex`. Every mutation bumps a revision
//! counter published on a `watch` channel; observation streams re-query on
//! each revision.

use crate::domain::{Episode, EpisodeId, EpisodeWatch, WatchId};
use crate::error::{EpisodeDetailsError, Result};
use crate::interactors::{
    EpisodeObserver, EpisodeStream, EpisodeUpdater, WatchRecorder, WatchesObserver, WatchesStream,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::StreamExt;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

#[derive(Debug, Default)]
struct Tables {
    remote: HashMap<EpisodeId, Episode>,
    local: HashMap<EpisodeId, Episode>,
    watches: Vec<EpisodeWatch>,
    next_watch_id: u64,
}

impl Tables {
    fn watches_for(&self, id: EpisodeId) -> Vec<EpisodeWatch> {
        let mut watches: Vec<_> = self
            .watches
            .iter()
            .filter(|w| w.episode_id == id)
            .cloned()
            .collect();
        watches.sort_by_key(|w| (w.watched_at, w.id));
        watches
    }
}

/// Thread-safe in-memory episode repository.
#[derive(Debug)]
pub struct InMemoryEpisodeRepository {
    tables: Arc<Mutex<Tables>>,
    revision: watch::Sender<u64>,
}

impl Default for InMemoryEpisodeRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryEpisodeRepository {
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            tables: Arc::new(Mutex::new(Tables {
                next_watch_id: 1,
                ..Tables::default()
            })),
            revision,
        }
    }

    /// Make `episode` available to `update_episode`. Observers only see it
    /// once it has been fetched into the local cache.
    pub fn publish_remote(&self, episode: Episode) {
        self.tables.lock().remote.insert(episode.id, episode);
    }

    /// Insert `episode` straight into the local cache.
    pub fn insert_local(&self, episode: Episode) {
        self.tables.lock().local.insert(episode.id, episode);
        self.bump();
    }

    /// Current watch entries for `id`, oldest first.
    pub fn watches(&self, id: EpisodeId) -> Vec<EpisodeWatch> {
        self.tables.lock().watches_for(id)
    }

    /// Locally cached details for `id`.
    pub fn cached_episode(&self, id: EpisodeId) -> Option<Episode> {
        self.tables.lock().local.get(&id).cloned()
    }

    fn bump(&self) {
        self.revision.send_modify(|rev| *rev = rev.wrapping_add(1));
    }

    fn revisions(&self) -> WatchStream<u64> {
        WatchStream::new(self.revision.subscribe())
    }
}

impl EpisodeObserver for InMemoryEpisodeRepository {
    fn observe_episode(&self, id: EpisodeId) -> EpisodeStream {
        let tables = Arc::clone(&self.tables);
        self.revisions()
            .filter_map(move |_| {
                let episode = tables.lock().local.get(&id).cloned();
                futures::future::ready(episode.map(Ok))
            })
            .boxed()
    }
}

impl WatchesObserver for InMemoryEpisodeRepository {
    fn observe_watches(&self, id: EpisodeId) -> WatchesStream {
        let tables = Arc::clone(&self.tables);
        self.revisions()
            .map(move |_| Ok(tables.lock().watches_for(id)))
            .boxed()
    }
}

#[async_trait]
impl EpisodeUpdater for InMemoryEpisodeRepository {
    async fn update_episode(&self, id: EpisodeId, force_reload: bool) -> Result<()> {
        {
            let mut tables = self.tables.lock();
            if !force_reload && tables.local.contains_key(&id) {
                return Ok(());
            }
            let fetched = tables
                .remote
                .get(&id)
                .cloned()
                .ok_or(EpisodeDetailsError::EpisodeNotFound { id })?;
            tables.local.insert(id, fetched);
        }
        self.bump();
        Ok(())
    }
}

#[async_trait]
impl WatchRecorder for InMemoryEpisodeRepository {
    async fn add_watch(&self, id: EpisodeId, watched_at: DateTime<Utc>) -> Result<()> {
        {
            let mut tables = self.tables.lock();
            let watch_id = WatchId(tables.next_watch_id);
            tables.next_watch_id += 1;
            tables.watches.push(EpisodeWatch {
                id: watch_id,
                episode_id: id,
                watched_at,
            });
        }
        self.bump();
        Ok(())
    }

    async fn remove_all_watches(&self, id: EpisodeId) -> Result<()> {
        self.tables.lock().watches.retain(|w| w.episode_id != id);
        self.bump();
        Ok(())
    }

    async fn remove_watch(&self, watch_id: WatchId) -> Result<()> {
        {
            let mut tables = self.tables.lock();
            let before = tables.watches.len();
            tables.watches.retain(|w| w.id != watch_id);
            if tables.watches.len() == before {
                return Err(EpisodeDetailsError::WatchNotFound { id: watch_id });
            }
        }
        self.bump();
        Ok(())
    }
}
