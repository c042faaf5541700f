//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    EmployeeCommand, EmployeeQuery, FixtureEmployeeCommand, FixtureEmployeeQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub employees: Arc<dyn EmployeeCommand>,
    pub employees_query: Arc<dyn EmployeeQuery>,
}

impl HttpState {
    /// Construct state from the employee driving ports.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use employees::domain::ports::{FixtureEmployeeCommand, FixtureEmployeeQuery};
    /// use employees::inbound::http::state::HttpState;
    ///
    /// let state = HttpState::new(
    ///     Arc::new(FixtureEmployeeCommand),
    ///     Arc::new(FixtureEmployeeQuery),
    /// );
    /// let _employees = state.employees.clone();
    /// ```
    pub fn new(employees: Arc<dyn EmployeeCommand>, employees_query: Arc<dyn EmployeeQuery>) -> Self {
        Self {
            employees,
            employees_query,
        }
    }
}

impl Default for HttpState {
    fn default() -> Self {
        Self::new(Arc::new(FixtureEmployeeCommand), Arc::new(FixtureEmployeeQuery))
    }
}
