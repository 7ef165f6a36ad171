//! farescout-bg library - background coordinator
//!
//! Per-session caches of intercepted payloads and detected flight records,
//! fed by producers embedded in hosted pages and queried by the UI consumer.
//! The HTTP surface in [`api`] exposes the message protocol to
//! out-of-process collaborators.

use axum::Router;
use farescout_common::events::EventBus;
use std::sync::Arc;

pub mod api;
pub mod cache;
pub mod collaborators;
pub mod collector;
pub mod credentials;
pub mod lifecycle;
pub mod router;
pub mod session;
pub mod timer;

#[cfg(test)]
mod testing;

use cache::SessionStateStore;
use collaborators::EventBusNotifier;
use collector::PayloadCollector;
use credentials::{CredentialService, CredentialStore};
use lifecycle::LifecycleManager;
use router::MessageRouter;
use session::FocusTracker;
use timer::{Timer, TokioTimer};

/// Every coordinator component, wired once per process
pub struct Coordinator {
    pub store: Arc<SessionStateStore>,
    pub focus: Arc<FocusTracker>,
    pub lifecycle: LifecycleManager,
    pub router: MessageRouter,
}

impl Coordinator {
    /// Coordinator publishing on `events`, waiting on the tokio clock
    pub fn new(events: EventBus, credentials: Arc<dyn CredentialStore>) -> Self {
        Self::with_timer(events, credentials, Arc::new(TokioTimer))
    }

    pub fn with_timer(
        events: EventBus,
        credentials: Arc<dyn CredentialStore>,
        timer: Arc<dyn Timer>,
    ) -> Self {
        let notifier = Arc::new(EventBusNotifier::new(events));
        let store = Arc::new(SessionStateStore::new(notifier.clone()));
        let focus = Arc::new(FocusTracker::new());
        let collector = Arc::new(PayloadCollector::new(store.clone(), notifier, timer));
        let credentials = Arc::new(CredentialService::new(credentials));

        Self {
            lifecycle: LifecycleManager::new(store.clone(), focus.clone()),
            router: MessageRouter::new(store.clone(), collector, focus.clone(), credentials),
            store,
            focus,
        }
    }
}

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<Coordinator>,
    /// Source for the per-session SSE streams
    pub events: EventBus,
}

impl AppState {
    pub fn new(events: EventBus, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            coordinator: Arc::new(Coordinator::new(events.clone(), credentials)),
            events,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post, put};

    Router::new()
        .route("/api/messages", post(api::consumer_message))
        .route("/api/sessions/:session_id", get(api::get_session))
        .route("/api/sessions/:session_id/messages", post(api::producer_message))
        .route("/api/sessions/:session_id/navigation", post(api::navigation_started))
        .route("/api/sessions/:session_id/events", get(api::session_events))
        .route("/api/active-session", put(api::set_active_session))
        .merge(api::health_routes())
        .with_state(state)
}
