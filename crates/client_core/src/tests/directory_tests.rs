use std::{collections::VecDeque, sync::Arc, time::Duration};

use async_trait::async_trait;
use shared::{
    domain::ClientId,
    locale::Locale,
    protocol::ClientRecord,
};
use tokio::sync::Mutex;

use super::*;
use crate::{EmptyListPolicy, LoadError};

type Scripted = (Duration, Result<Vec<ClientRecord>, LoadError>);

/// Replays one scripted response per call, each after its own delay.
#[derive(Clone, Default)]
struct ScriptedApi {
    responses: Arc<Mutex<VecDeque<Scripted>>>,
}

impl ScriptedApi {
    fn new(responses: Vec<Scripted>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into())),
        }
    }
}

#[async_trait]
impl ClientsApi for ScriptedApi {
    async fn fetch_clients(&self) -> Result<Vec<ClientRecord>, LoadError> {
        let (delay, result) = self
            .responses
            .lock()
            .await
            .pop_front()
            .unwrap_or((Duration::ZERO, Ok(Vec::new())));
        tokio::time::sleep(delay).await;
        result
    }
}

fn record(id: &str, name: &str) -> ClientRecord {
    ClientRecord {
        id: id.to_string(),
        name: Some(name.to_string()),
        ..ClientRecord::default()
    }
}

fn directory(responses: Vec<Scripted>) -> ClientDirectory<ScriptedApi> {
    ClientDirectory::new(ClientsLoader::with_api(
        ScriptedApi::new(responses),
        EmptyListPolicy::UseFallback,
    ))
}

fn ctx() -> LocaleContext {
    LocaleContext::embedded(Locale::En).expect("tables")
}

#[tokio::test]
async fn starts_idle_and_settles_to_loaded() {
    let directory = directory(vec![(Duration::ZERO, Ok(vec![record("1", "Foo")]))]);
    let mut events = directory.subscribe_events();
    assert_eq!(directory.state().await, LoadState::Idle);

    let settled = directory.refresh(&ctx()).await;

    match &settled {
        LoadState::Loaded {
            generation,
            clients,
        } => {
            assert_eq!(*generation, 1);
            assert_eq!(clients.len(), 1);
            assert_eq!(clients[0].id, ClientId("1".into()));
        }
        other => panic!("unexpected state: {other:?}"),
    }
    assert_eq!(directory.state().await, settled);

    let first = events.recv().await.expect("event");
    assert_eq!(
        first,
        DirectoryEvent::StateChanged(LoadState::Loading { generation: 1 })
    );
    let second = events.recv().await.expect("event");
    assert_eq!(second, DirectoryEvent::StateChanged(settled));
}

#[tokio::test]
async fn failure_settles_to_failed_without_fallback() {
    let directory = directory(vec![(
        Duration::ZERO,
        Err(LoadError::Network("connection refused".into())),
    )]);

    let settled = directory.refresh(&ctx()).await;

    assert!(
        matches!(
            settled,
            LoadState::Failed {
                generation: 1,
                error: LoadError::Network(_)
            }
        ),
        "unexpected state: {settled:?}"
    );
}

#[tokio::test]
async fn retry_after_failure_starts_a_new_generation() {
    let directory = directory(vec![
        (Duration::ZERO, Err(LoadError::Network("down".into()))),
        (Duration::ZERO, Ok(vec![record("1", "Foo")])),
    ]);

    directory.refresh(&ctx()).await;
    let settled = directory.refresh(&ctx()).await;

    assert_eq!(settled.generation(), Some(2));
    assert!(matches!(settled, LoadState::Loaded { .. }));
}

#[tokio::test]
async fn overlapping_refresh_discards_the_stale_response() {
    let directory = directory(vec![
        (Duration::from_millis(200), Ok(vec![record("old", "Stale")])),
        (Duration::ZERO, Ok(vec![record("new", "Fresh")])),
    ]);
    let mut events = directory.subscribe_events();
    let ctx = ctx();

    let slow = directory.refresh(&ctx);
    let fast = async {
        // Let the slow refresh claim generation 1 first.
        tokio::time::sleep(Duration::from_millis(20)).await;
        directory.refresh(&ctx).await
    };
    let (slow_result, fast_result) = tokio::join!(slow, fast);

    assert_eq!(fast_result.generation(), Some(2));
    assert_eq!(slow_result, fast_result);
    match directory.state().await {
        LoadState::Loaded { clients, .. } => {
            assert_eq!(clients.len(), 1);
            assert_eq!(clients[0].name, "Fresh");
        }
        other => panic!("unexpected state: {other:?}"),
    }

    let mut discarded = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let DirectoryEvent::StaleResponseDiscarded { generation, latest } = event {
            discarded.push((generation, latest));
        }
    }
    assert_eq!(discarded, vec![(1, 2)]);
}

#[tokio::test]
async fn newer_refresh_in_flight_keeps_state_loading() {
    let directory = directory(vec![
        (Duration::ZERO, Ok(vec![record("1", "Foo")])),
        (Duration::from_millis(200), Ok(vec![record("2", "Bar")])),
    ]);
    let ctx = ctx();

    let first = directory.refresh(&ctx).await;
    assert!(matches!(first, LoadState::Loaded { generation: 1, .. }));

    let observed = async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        directory.state().await
    };
    let (settled, mid_flight) = tokio::join!(directory.refresh(&ctx), observed);

    assert!(mid_flight.is_loading());
    assert_eq!(mid_flight.generation(), Some(2));
    assert!(matches!(settled, LoadState::Loaded { generation: 2, .. }));
}
