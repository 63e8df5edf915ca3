//! # episode-details - View State Coordinator
//!
//! A framework-free presentation-layer coordinator for an episode details
//! screen. It observes the episode record and its watch history, keeps a single
//! immutable [`ViewState`] up to date, and dispatches user actions to
//! data-access interactors one at a time.
//!
//! ## Architecture
//!
//! - [`error`] - Centralized error types and handling
//! - [`domain`] - Episode, watch entry, and watch affordance records
//! - [`state`] - View state snapshot and its single-writer store
//! - [`interactors`] - Collaborator traits injected into the coordinator
//! - [`coordinator`] - Observation loops, action queue, and dispatch
//! - [`memory`] - In-memory collaborator implementation
//! - [`config`] - Queue policy and startup behaviour

pub mod config;
pub mod coordinator;
pub mod domain;
pub mod error;
pub mod interactors;
pub mod memory;
pub mod state;

// Re-export commonly used types for convenience
pub use error::{EpisodeDetailsError, Result};

pub use config::{CoordinatorConfig, QueuePolicy};
pub use coordinator::{DetailsAction, DetailsCoordinator};
pub use domain::{Episode, EpisodeId, EpisodeWatch, WatchAction, WatchId};
pub use interactors::{
    DetailsInteractors, EpisodeObserver, EpisodeUpdater, WatchRecorder, WatchesObserver,
};
pub use memory::InMemoryEpisodeRepository;
pub use state::{StateStore, ViewState};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
