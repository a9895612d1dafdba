//! Client-side services

pub mod bookings;
pub mod cart;
pub mod catalog;
pub mod poller;
pub mod returns;

use std::sync::Arc;

use crate::{api::BorrowingApi, config::PollingConfig};

/// Container for all services, sharing one API handle
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub bookings: bookings::BookingsService,
    pub returns: returns::ReturnsService,
    pub poller: poller::StatusPoller,
}

impl Services {
    /// Create all services with the given API handle
    pub fn new(api: Arc<dyn BorrowingApi>, polling: &PollingConfig) -> Self {
        Self {
            catalog: catalog::CatalogService::new(api.clone()),
            bookings: bookings::BookingsService::new(api.clone()),
            returns: returns::ReturnsService::new(api.clone()),
            poller: poller::StatusPoller::new(api, polling),
        }
    }
}
