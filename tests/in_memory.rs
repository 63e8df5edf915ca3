use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::{timeout, Duration};

use episode_details::{
    CoordinatorConfig, DetailsAction, DetailsCoordinator, DetailsInteractors, Episode, EpisodeId,
    InMemoryEpisodeRepository, ViewState, WatchAction,
};

const TIMEOUT_MS: u64 = 500;

async fn wait_for_state<F>(rx: &mut watch::Receiver<ViewState>, predicate: F) -> ViewState
where
    F: FnMut(&ViewState) -> bool,
{
    timeout(Duration::from_millis(TIMEOUT_MS), rx.wait_for(predicate))
        .await
        .expect("state update timed out")
        .expect("state channel closed unexpectedly")
        .clone()
}

fn pilot(id: EpisodeId) -> Episode {
    Episode {
        id,
        title: Some("Pilot".to_string()),
        summary: Some("Where it all begins.".to_string()),
        season: 1,
        number: 1,
        first_aired: None,
    }
}

fn start(repository: &Arc<InMemoryEpisodeRepository>, id: EpisodeId) -> DetailsCoordinator {
    DetailsCoordinator::new(
        id,
        DetailsInteractors::from_shared(Arc::clone(repository)),
        CoordinatorConfig::default(),
    )
    .expect("start coordinator")
}

#[tokio::test]
async fn initial_refresh_loads_details() {
    let repository = Arc::new(InMemoryEpisodeRepository::new());
    repository.publish_remote(pilot(EpisodeId(42)));

    let coordinator = start(&repository, EpisodeId(42));
    let mut states = coordinator.subscribe();

    let state = wait_for_state(&mut states, |s| s.episode.is_some()).await;
    assert_eq!(state.episode, Some(pilot(EpisodeId(42))));
    assert_eq!(state.action, WatchAction::Watch);
}

#[tokio::test]
async fn watch_and_unwatch_round_trip_through_observers() {
    let repository = Arc::new(InMemoryEpisodeRepository::new());
    repository.publish_remote(pilot(EpisodeId(42)));

    let coordinator = start(&repository, EpisodeId(42));
    let mut states = coordinator.subscribe();

    coordinator.submit_action(DetailsAction::AddWatch).unwrap();
    coordinator.submit_action(DetailsAction::AddWatch).unwrap();
    let state = wait_for_state(&mut states, |s| s.watches.len() == 2).await;
    assert_eq!(state.action, WatchAction::Unwatch);

    let first = state.watches[0].id;
    coordinator
        .submit_action(DetailsAction::RemoveWatch(first))
        .unwrap();
    let state = wait_for_state(&mut states, |s| s.watches.len() == 1).await;
    assert!(state.watches.iter().all(|w| w.id != first));
    assert_eq!(state.action, WatchAction::Unwatch);

    coordinator
        .submit_action(DetailsAction::RemoveAllWatches)
        .unwrap();
    let state = wait_for_state(&mut states, |s| s.watches.is_empty()).await;
    assert_eq!(state.action, WatchAction::Watch);
    assert!(repository.watches(EpisodeId(42)).is_empty());
}

#[tokio::test]
async fn unknown_episode_keeps_details_empty() {
    let repository = Arc::new(InMemoryEpisodeRepository::new());
    let coordinator = start(&repository, EpisodeId(404));

    timeout(Duration::from_millis(TIMEOUT_MS), coordinator.wait_idle())
        .await
        .expect("queue never drained");

    let state = coordinator.state();
    assert!(state.episode.is_none());
    assert!(state.watches.is_empty());
    assert!(coordinator.is_running());
}

#[tokio::test]
async fn coordinators_for_different_episodes_are_isolated() {
    let repository = Arc::new(InMemoryEpisodeRepository::new());
    repository.publish_remote(pilot(EpisodeId(1)));
    repository.publish_remote(pilot(EpisodeId(2)));

    let first = start(&repository, EpisodeId(1));
    let second = start(&repository, EpisodeId(2));
    let mut first_states = first.subscribe();
    let mut second_states = second.subscribe();

    first.submit_action(DetailsAction::AddWatch).unwrap();
    wait_for_state(&mut first_states, |s| s.watches.len() == 1).await;
    timeout(Duration::from_millis(TIMEOUT_MS), second.wait_idle())
        .await
        .expect("queue never drained");

    let state = wait_for_state(&mut second_states, |s| s.episode.is_some()).await;
    assert!(state.watches.is_empty());
    assert_eq!(state.action, WatchAction::Watch);
}
