/// Phase-progression decision logic.
pub mod progress;

use std::sync::Arc;

use crate::dao::team_store::TeamStore;

/// Cheaply cloneable handle to the application state.
pub type SharedState = Arc<AppState>;

/// Central application state: the storage backend chosen at startup and the
/// optional admin credential.
pub struct AppState {
    store: Arc<dyn TeamStore>,
    admin_token: Option<String>,
}

impl AppState {
    /// Construct the shared state around an already-connected store.
    ///
    /// The backend is fixed for the lifetime of the process; there is no
    /// mid-flight swapping or credential re-probing.
    pub fn new(store: Arc<dyn TeamStore>, admin_token: Option<String>) -> SharedState {
        Arc::new(Self { store, admin_token })
    }

    /// Handle to the team store.
    pub fn store(&self) -> Arc<dyn TeamStore> {
        self.store.clone()
    }

    /// Configured admin token, when admin routes are locked down.
    pub fn admin_token(&self) -> Option<&str> {
        self.admin_token.as_deref()
    }
}
