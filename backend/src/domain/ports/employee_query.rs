//! Driving port for employee lookups.

use async_trait::async_trait;

use crate::domain::{Employee, EmployeeId, Error};

/// Domain use-case port for reading employee records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmployeeQuery: Send + Sync {
    /// Fetch a record by identifier, failing with `NotFound` when absent.
    async fn find_by_id(&self, id: &EmployeeId) -> Result<Employee, Error>;

    /// Fetch the record with this exact first name, failing with `NotFound`
    /// when absent.
    async fn find_by_first_name(&self, first_name: &str) -> Result<Employee, Error>;

    /// All records in the named department. An empty result is not an error.
    async fn find_by_department_name(&self, department_name: &str)
    -> Result<Vec<Employee>, Error>;
}

/// Fixture query backed by an empty directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureEmployeeQuery;

#[async_trait]
impl EmployeeQuery for FixtureEmployeeQuery {
    async fn find_by_id(&self, id: &EmployeeId) -> Result<Employee, Error> {
        Err(Error::not_found(format!("employee {id} not found")))
    }

    async fn find_by_first_name(&self, first_name: &str) -> Result<Employee, Error> {
        Err(Error::not_found(format!(
            "employee named {first_name} not found"
        )))
    }

    async fn find_by_department_name(
        &self,
        _department_name: &str,
    ) -> Result<Vec<Employee>, Error> {
        Ok(Vec::new())
    }
}
