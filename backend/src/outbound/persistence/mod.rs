//! PostgreSQL persistence adapter using Diesel ORM.
//!
//! Implements the employee repository port on top of `diesel-async` with
//! `bb8` pooling. Row structs (`models.rs`) and table definitions
//! (`schema.rs`) never leave this module; the adapter only translates
//! between them and domain types, and maps every database failure onto
//! [`crate::domain::ports::EmployeeRepositoryError`].
//!
//! ```ignore
//! use employees::outbound::persistence::{DbPool, DieselEmployeeRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/employees")).await?;
//! let repo = DieselEmployeeRepository::new(pool);
//! ```

mod diesel_employee_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_employee_repository::DieselEmployeeRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
