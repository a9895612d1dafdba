//! Labloan client
//!
//! Client library for the laboratory equipment borrowing service: catalog
//! browsing, cart aggregation, pickup bookings with a QR ticket, status
//! polling, and unit-level returns. All business rules (availability,
//! approval, inventory, status transitions) are owned by the remote
//! backend; this crate keeps client-side state and a typed boundary
//! around the backend's REST API.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod session;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared by the CLI and any embedding UI
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
    pub sessions: session::SessionStore,
}

impl AppState {
    /// Wire up the API client and services from configuration, attaching
    /// the persisted session token when one exists.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let sessions = session::SessionStore::new(&config.session);
        let token = sessions.load().map(|s| s.token);
        let api = Arc::new(api::ApiClient::new(&config.backend, token)?);
        let services = services::Services::new(api, &config.polling);

        Ok(Self {
            config: Arc::new(config),
            services: Arc::new(services),
            sessions,
        })
    }
}
