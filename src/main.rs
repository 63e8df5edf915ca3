//! episode-details - drive a details coordinator against the in-memory repository.

use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use clap::{Arg, ArgAction, Command};
use episode_details::{
    CoordinatorConfig, DetailsAction, DetailsCoordinator, DetailsInteractors, Episode, EpisodeId,
    EpisodeWatch, InMemoryEpisodeRepository, ViewState, WatchId,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; RUST_LOG controls verbosity
    env_logger::init();

    let matches = Command::new("episode-details")
        .version(episode_details::VERSION)
        .about("Run an episode details view state coordinator")
        .long_about(
            "Seeds an in-memory repository with a sample episode, starts a coordinator \
             for it, submits the requested actions in order, and prints the resulting \
             view state once the action queue is idle.",
        )
        .arg(
            Arg::new("episode")
                .help("Episode id to view")
                .required(true)
                .value_parser(clap::value_parser!(u64))
                .index(1),
        )
        .arg(
            Arg::new("action")
                .long("action")
                .short('a')
                .help("Action to submit: refresh, watch, unwatch, or remove:<watch id>")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Path to a TOML coordinator config (requires the `config` feature)")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .get_matches();

    let episode_id = EpisodeId(
        *matches
            .get_one::<u64>("episode")
            .context("episode argument is required")?,
    );
    let actions = matches
        .get_many::<String>("action")
        .into_iter()
        .flatten()
        .map(|raw| parse_action(raw))
        .collect::<Result<Vec<_>>>()?;
    let config = load_config(matches.get_one::<PathBuf>("config"))?;

    let repository = Arc::new(InMemoryEpisodeRepository::new());
    repository.publish_remote(sample_episode(episode_id));

    let mut coordinator = DetailsCoordinator::new(
        episode_id,
        DetailsInteractors::from_shared(Arc::clone(&repository)),
        config,
    )
    .context("failed to start coordinator")?;

    for action in actions {
        coordinator
            .submit_action(action)
            .with_context(|| format!("failed to submit {:?}", action))?;
    }
    coordinator.wait_idle().await;

    // Let the observers deliver the effects of the last dispatched action.
    let expected = repository.watches(episode_id);
    let mut updates = coordinator.subscribe();
    wait_for_settled(&mut updates, &expected, Duration::from_millis(500)).await;

    print_state(&coordinator.state());
    coordinator.shutdown().await;
    Ok(())
}

/// Wait until the view shows loaded details and `expected` watches. Returns
/// false, after logging, when that does not happen within `within`.
async fn wait_for_settled(
    updates: &mut watch::Receiver<ViewState>,
    expected: &[EpisodeWatch],
    within: Duration,
) -> bool {
    let settled = tokio::time::timeout(
        within,
        updates.wait_for(|state| state.episode.is_some() && state.watches == expected),
    )
    .await;
    match settled {
        Ok(Ok(_)) => true,
        Ok(Err(_)) => {
            log::warn!("view state channel closed before the view settled");
            false
        }
        Err(_) => {
            log::warn!(
                "view state did not settle within {:?}; printing possibly stale state",
                within
            );
            false
        }
    }
}

fn parse_action(raw: &str) -> Result<DetailsAction> {
    match raw {
        "refresh" => Ok(DetailsAction::Refresh),
        "watch" => Ok(DetailsAction::AddWatch),
        "unwatch" => Ok(DetailsAction::RemoveAllWatches),
        other => {
            let id = other
                .strip_prefix("remove:")
                .with_context(|| format!("unknown action: {}", other))?
                .parse::<u64>()
                .with_context(|| format!("invalid watch id in: {}", other))?;
            Ok(DetailsAction::RemoveWatch(WatchId(id)))
        }
    }
}

#[cfg(feature = "config")]
fn load_config(path: Option<&PathBuf>) -> Result<CoordinatorConfig> {
    let path = match path {
        Some(path) => path.clone(),
        None => match CoordinatorConfig::default_path() {
            Some(path) if path.is_file() => path,
            _ => return Ok(CoordinatorConfig::default()),
        },
    };
    CoordinatorConfig::load_from_file(&path)
        .with_context(|| format!("failed to load config from {}", path.display()))
}

#[cfg(not(feature = "config"))]
fn load_config(path: Option<&PathBuf>) -> Result<CoordinatorConfig> {
    if let Some(path) = path {
        anyhow::bail!(
            "cannot load {}: built without the `config` feature",
            path.display()
        );
    }
    Ok(CoordinatorConfig::default())
}

fn sample_episode(id: EpisodeId) -> Episode {
    Episode {
        id,
        title: Some(format!("Episode {}", id)),
        summary: Some("Sample episode served by the in-memory repository.".to_string()),
        season: 1,
        number: 1,
        first_aired: Utc.with_ymd_and_hms(2020, 1, 1, 20, 0, 0).single(),
    }
}

fn print_state(state: &ViewState) {
    println!("episode:  {}", state.episode_id);
    match &state.episode {
        Some(episode) => println!(
            "details:  {} {}",
            episode.label(),
            episode.title.as_deref().unwrap_or("<untitled>")
        ),
        None => println!("details:  <not loaded>"),
    }
    println!("watches:  {}", state.watches.len());
    for watch in &state.watches {
        println!("  #{} at {}", watch.id, watch.watched_at.to_rfc3339());
    }
    println!("action:   {:?}", state.action);
}
