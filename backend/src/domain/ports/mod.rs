//! Domain ports for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod employee_command;
mod employee_query;
mod employee_repository;

#[cfg(test)]
pub use employee_command::MockEmployeeCommand;
pub use employee_command::{EmployeeCommand, FixtureEmployeeCommand, UpdateEmployeeRequest};
#[cfg(test)]
pub use employee_query::MockEmployeeQuery;
pub use employee_query::{EmployeeQuery, FixtureEmployeeQuery};
#[cfg(test)]
pub use employee_repository::MockEmployeeRepository;
pub use employee_repository::{
    EmployeeRepository, EmployeeRepositoryError, FixtureEmployeeRepository,
};
