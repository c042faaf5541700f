//! Builds the HTTP state from the configured employee store.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tracing::info;

use employees::domain::EmployeeService;
use employees::domain::ports::EmployeeRepository;
use employees::inbound::http::state::HttpState;
use employees::outbound::memory::InMemoryEmployeeRepository;
use employees::outbound::persistence::DieselEmployeeRepository;

use super::ServerConfig;

/// Wire one [`EmployeeService`] over `repo` into both driving ports.
fn state_for<R>(repo: R) -> HttpState
where
    R: EmployeeRepository + 'static,
{
    let service = Arc::new(EmployeeService::new(Arc::new(repo), Arc::new(DefaultClock)));
    HttpState::new(service.clone(), service)
}

/// Use PostgreSQL when a pool is configured, otherwise the in-memory store.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let state = match &config.db_pool {
        Some(pool) => {
            info!(store = "postgres", "employee store configured");
            state_for(DieselEmployeeRepository::new(pool.clone()))
        }
        None => {
            info!(store = "memory", "employee store configured");
            state_for(InMemoryEmployeeRepository::new())
        }
    };
    web::Data::new(state)
}
