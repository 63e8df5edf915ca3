//! Domain records observed by the details screen.

use chrono::{DateTime, Utc};
use std::fmt;

/// Opaque key of the episode being viewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EpisodeId(pub u64);

impl fmt::Display for EpisodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque key of a single watch history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WatchId(pub u64);

impl fmt::Display for WatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Detail record for an episode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Episode {
    pub id: EpisodeId,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub season: u32,
    pub number: u32,
    pub first_aired: Option<DateTime<Utc>>,
}

impl Episode {
    /// Short `S01E02`-style label.
    pub fn label(&self) -> String {
        format!("S{:02}E{:02}", self.season, self.number)
    }
}

/// One entry in an episode's watch history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeWatch {
    pub id: WatchId,
    pub episode_id: EpisodeId,
    pub watched_at: DateTime<Utc>,
}

/// Affordance offered to the user for the watch button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchAction {
    Watch,
    Unwatch,
}

impl WatchAction {
    /// Derive the affordance from the watch history: an episode with no
    /// watches can be watched, anything else can be unwatched.
    pub fn for_watches(watches: &[EpisodeWatch]) -> Self {
        if watches.is_empty() {
            WatchAction::Watch
        } else {
            WatchAction::Unwatch
        }
    }
}
