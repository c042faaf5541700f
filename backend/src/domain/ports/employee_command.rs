//! Driving port for employee mutations.
//!
//! HTTP handlers and other inbound adapters call [`EmployeeCommand`] to create,
//! replace, or remove employee records without touching the store directly.

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{
    CreatedEmployee, Employee, EmployeeDetails, EmployeeId, EmployeeTimestamps, Error,
};

/// Full replacement of an existing employee's business fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateEmployeeRequest {
    /// Identifier of the record being replaced.
    pub id: EmployeeId,
    /// New business fields.
    pub details: EmployeeDetails,
}

/// Domain use-case port for employee mutations.
///
/// # Idempotency
///
/// Creating an employee whose (first name, last name, department id) is
/// already stored returns the stored record with `idempotent: true` instead
/// of failing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmployeeCommand: Send + Sync {
    /// Create a record with a fresh identifier.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` when no email entry is primary.
    /// - `ServiceUnavailable` when the store is unreachable, or when a
    ///   duplicate could not be resolved to the stored record.
    async fn create(&self, details: EmployeeDetails) -> Result<CreatedEmployee, Error>;

    /// Replace the business fields of an existing record.
    ///
    /// # Errors
    ///
    /// - `NotFound` when no record has the identifier.
    /// - `Conflict` when the replacement equals the stored fields, or when it
    ///   collides with another employee's identity.
    async fn update(&self, request: UpdateEmployeeRequest) -> Result<Employee, Error>;

    /// Remove a record.
    ///
    /// # Errors
    ///
    /// `NotFound` when no record has the identifier.
    async fn delete(&self, id: &EmployeeId) -> Result<(), Error>;
}

/// Fixture command that echoes its input without persisting anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureEmployeeCommand;

#[async_trait]
impl EmployeeCommand for FixtureEmployeeCommand {
    async fn create(&self, details: EmployeeDetails) -> Result<CreatedEmployee, Error> {
        Ok(CreatedEmployee {
            employee: Employee {
                id: EmployeeId::random(),
                details,
                timestamps: EmployeeTimestamps::stamp(Utc::now()),
            },
            idempotent: false,
        })
    }

    async fn update(&self, request: UpdateEmployeeRequest) -> Result<Employee, Error> {
        Ok(Employee {
            id: request.id,
            details: request.details,
            timestamps: EmployeeTimestamps::stamp(Utc::now()),
        })
    }

    async fn delete(&self, _id: &EmployeeId) -> Result<(), Error> {
        Ok(())
    }
}
