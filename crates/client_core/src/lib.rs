use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use shared::domain::Game;
use thiserror::Error;
use tokio::sync::{watch, Mutex};
use tracing::{debug, warn};

mod http_api;

pub use http_api::HttpDraftsApi;

/// Fixed user-facing message for any failed list fetch. Transport, status
/// and payload failures all collapse into it; the underlying cause only
/// reaches the logs.
pub const FETCH_ERROR_MESSAGE: &str = "Could not load drafts from the backend. Is it running?";
/// Minimum time the refresh control stays busy after an accepted refresh,
/// independent of how fast the fetch itself resolves.
pub const REFRESH_BUSY_WINDOW: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Error)]
pub enum FetchDraftsError {
    #[error("failed to reach drafts backend: {0}")]
    Network(String),
    #[error("drafts backend returned status {status}")]
    Server { status: u16 },
    #[error("drafts payload did not match the expected list shape: {0}")]
    Payload(String),
}

/// The list endpoint the coordinator fetches from.
#[async_trait]
pub trait DraftsApi: Send + Sync {
    async fn list_drafts(&self) -> Result<Vec<Game>, FetchDraftsError>;
}

/// Presentation state of the draft list. Drafts are only ever carried by
/// `Loaded`; `Loading` and `Error` never hold partial or prior data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Loading,
    Loaded { drafts: Vec<Game> },
    Error { message: String },
}

impl ViewState {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }
}

/// Single-slot refresh signal. Holds only the latest requested generation;
/// emitting a new one logically supersedes any unresolved older fetch.
pub struct RefreshTrigger {
    generation: watch::Sender<u64>,
}

impl RefreshTrigger {
    /// Emits generation 0 and hands out the receiver the coordinator drives.
    pub fn start() -> (Self, watch::Receiver<u64>) {
        let (generation, subscription) = watch::channel(0);
        (Self { generation }, subscription)
    }

    /// Advances to the next generation. Keeping concurrent manual refreshes
    /// out is the caller's job, not the trigger's.
    pub fn request(&self) {
        self.generation.send_modify(|generation| *generation += 1);
    }

    pub fn latest(&self) -> u64 {
        *self.generation.borrow()
    }
}

/// Publishes view states under a generation lock so an older generation's
/// outcome can never land after a newer generation's `Loading`.
struct ViewStatePublisher {
    states: watch::Sender<ViewState>,
    published_generation: Mutex<u64>,
}

impl ViewStatePublisher {
    async fn begin_generation(&self, generation: u64) {
        let mut current = self.published_generation.lock().await;
        *current = generation;
        self.states.send_replace(ViewState::Loading);
    }

    async fn publish_outcome(&self, generation: u64, outcome: ViewState) {
        let current = self.published_generation.lock().await;
        if *current == generation {
            self.states.send_replace(outcome);
        } else {
            debug!(
                generation,
                current = *current,
                "discarding superseded draft fetch outcome"
            );
        }
    }
}

pub struct DraftListClient {
    api: Arc<dyn DraftsApi>,
    trigger: Arc<RefreshTrigger>,
    publisher: Arc<ViewStatePublisher>,
    busy: Arc<watch::Sender<bool>>,
}

impl DraftListClient {
    /// Builds a client over the given data source and starts the automatic
    /// initial load (generation 0). Must be called from within a tokio
    /// runtime; the coordinator runs as a background task and exits when the
    /// client is dropped.
    pub fn new(api: Arc<dyn DraftsApi>) -> Arc<Self> {
        let (trigger, generations) = RefreshTrigger::start();
        let (states, _) = watch::channel(ViewState::Loading);
        let (busy, _) = watch::channel(false);
        let publisher = Arc::new(ViewStatePublisher {
            states,
            published_generation: Mutex::new(0),
        });
        let client = Arc::new(Self {
            api,
            trigger: Arc::new(trigger),
            publisher,
            busy: Arc::new(busy),
        });
        tokio::spawn(run_coordinator(
            client.api.clone(),
            client.publisher.clone(),
            generations,
        ));
        client
    }

    pub fn over_http(api_base: impl Into<String>) -> Arc<Self> {
        Self::new(Arc::new(HttpDraftsApi::new(api_base)))
    }

    /// Requests a manual refresh. Ignored while the busy guard is engaged,
    /// so rapid repeated calls request exactly one new generation.
    pub fn refresh(&self) {
        if *self.busy.borrow() {
            debug!("refresh ignored while busy guard engaged");
            return;
        }
        self.busy.send_replace(true);

        // Trigger emission and guard release are scheduled as two separate
        // deferred actions; the cooldown never waits on the fetch.
        let trigger = self.trigger.clone();
        tokio::spawn(async move {
            trigger.request();
        });
        let busy = self.busy.clone();
        tokio::spawn(async move {
            tokio::time::sleep(REFRESH_BUSY_WINDOW).await;
            busy.send_replace(false);
        });
    }

    /// Current state plus every later transition.
    pub fn subscribe_states(&self) -> watch::Receiver<ViewState> {
        self.publisher.states.subscribe()
    }

    /// The busy flag is a separate signal from the view state: the list can
    /// be loading while the control is free, or loaded while it still cools
    /// down.
    pub fn subscribe_busy(&self) -> watch::Receiver<bool> {
        self.busy.subscribe()
    }

    pub fn current_state(&self) -> ViewState {
        self.publisher.states.borrow().clone()
    }

    pub fn is_busy(&self) -> bool {
        *self.busy.borrow()
    }
}

async fn run_coordinator(
    api: Arc<dyn DraftsApi>,
    publisher: Arc<ViewStatePublisher>,
    mut generations: watch::Receiver<u64>,
) {
    loop {
        let generation = *generations.borrow_and_update();
        publisher.begin_generation(generation).await;
        tokio::spawn(resolve_generation(
            api.clone(),
            publisher.clone(),
            generation,
        ));
        if generations.changed().await.is_err() {
            break;
        }
    }
}

async fn resolve_generation(
    api: Arc<dyn DraftsApi>,
    publisher: Arc<ViewStatePublisher>,
    generation: u64,
) {
    let outcome = match api.list_drafts().await {
        Ok(drafts) => ViewState::Loaded { drafts },
        Err(error) => {
            warn!(generation, %error, "draft list fetch failed");
            ViewState::Error {
                message: FETCH_ERROR_MESSAGE.to_string(),
            }
        }
    };
    publisher.publish_outcome(generation, outcome).await;
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
