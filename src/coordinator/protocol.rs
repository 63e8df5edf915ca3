//! Actions submitted by the details screen.

use crate::domain::WatchId;

/// User intents understood by the coordinator. Each value is dispatched
/// exactly once, in submission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailsAction {
    /// Force a reload of the episode details
    Refresh,
    /// Record a watch of the episode at the current time
    AddWatch,
    /// Clear the episode's watch history
    RemoveAllWatches,
    /// Remove one watch history entry
    RemoveWatch(WatchId),
}

impl DetailsAction {
    /// Operation name used in log lines.
    pub fn name(&self) -> &'static str {
        match self {
            DetailsAction::Refresh => "refresh",
            DetailsAction::AddWatch => "add_watch",
            DetailsAction::RemoveAllWatches => "remove_all_watches",
            DetailsAction::RemoveWatch(_) => "remove_watch",
        }
    }
}
