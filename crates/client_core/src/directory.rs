use std::sync::atomic::{AtomicU64, Ordering};

use shared::{domain::ResolvedClient, i18n::LocaleContext};
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

use crate::{ClientsApi, ClientsLoader, HttpClientsApi, LoadError};

const EVENT_CAPACITY: usize = 32;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading {
        generation: u64,
    },
    Loaded {
        generation: u64,
        clients: Vec<ResolvedClient>,
    },
    Failed {
        generation: u64,
        error: LoadError,
    },
}

impl LoadState {
    pub fn generation(&self) -> Option<u64> {
        match self {
            Self::Idle => None,
            Self::Loading { generation }
            | Self::Loaded { generation, .. }
            | Self::Failed { generation, .. } => Some(*generation),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DirectoryEvent {
    StateChanged(LoadState),
    StaleResponseDiscarded { generation: u64, latest: u64 },
}

/// Owns the client list shown by the clients page.
///
/// Overlapping refreshes resolve latest-wins: each refresh takes the next
/// generation, and a response that finishes after a newer refresh started is
/// dropped without touching the state.
pub struct ClientDirectory<A = HttpClientsApi> {
    loader: ClientsLoader<A>,
    state: RwLock<LoadState>,
    generation: AtomicU64,
    events: broadcast::Sender<DirectoryEvent>,
}

impl<A: ClientsApi> ClientDirectory<A> {
    pub fn new(loader: ClientsLoader<A>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            loader,
            state: RwLock::new(LoadState::Idle),
            generation: AtomicU64::new(0),
            events,
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<DirectoryEvent> {
        self.events.subscribe()
    }

    pub async fn state(&self) -> LoadState {
        self.state.read().await.clone()
    }

    pub fn latest_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Runs one load cycle and returns the directory state once it settles.
    /// When a newer refresh overtook this one, the returned state is whatever
    /// that newer refresh left behind.
    pub async fn refresh(&self, ctx: &LocaleContext) -> LoadState {
        let generation = {
            let mut state = self.state.write().await;
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *state = LoadState::Loading { generation };
            self.emit(DirectoryEvent::StateChanged(state.clone()));
            generation
        };

        let result = self.loader.load_clients(ctx).await;

        let mut state = self.state.write().await;
        let latest = self.latest_generation();
        if latest != generation {
            debug!(generation, latest, "discarding stale client list response");
            self.emit(DirectoryEvent::StaleResponseDiscarded { generation, latest });
            return state.clone();
        }

        *state = match result {
            Ok(clients) => LoadState::Loaded {
                generation,
                clients,
            },
            Err(error) => LoadState::Failed { generation, error },
        };
        self.emit(DirectoryEvent::StateChanged(state.clone()));
        state.clone()
    }

    fn emit(&self, event: DirectoryEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
#[path = "tests/directory_tests.rs"]
mod tests;
