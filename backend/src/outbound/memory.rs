//! In-process employee store used when no database URL is configured.
//!
//! Enforces the same `(first_name, last_name, department_id)` uniqueness
//! rule as the PostgreSQL schema so the service behaves identically on
//! either backend. Contents are lost on restart.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::domain::ports::{EmployeeRepository, EmployeeRepositoryError};
use crate::domain::{Employee, EmployeeId};

/// `RwLock`-guarded map of employee records keyed by id.
#[derive(Debug, Default)]
pub struct InMemoryEmployeeRepository {
    records: RwLock<HashMap<EmployeeId, Employee>>,
}

impl InMemoryEmployeeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(
        &self,
    ) -> Result<RwLockReadGuard<'_, HashMap<EmployeeId, Employee>>, EmployeeRepositoryError> {
        self.records
            .read()
            .map_err(|_| EmployeeRepositoryError::query("employee store lock poisoned"))
    }

    fn write(
        &self,
    ) -> Result<RwLockWriteGuard<'_, HashMap<EmployeeId, Employee>>, EmployeeRepositoryError> {
        self.records
            .write()
            .map_err(|_| EmployeeRepositoryError::query("employee store lock poisoned"))
    }

    /// Matching records ordered by creation time, ties broken by id.
    fn collides(records: &HashMap<EmployeeId, Employee>, employee: &Employee) -> bool {
        records.values().any(|existing| {
            existing.id != employee.id && existing.details.same_identity(&employee.details)
        })
    }

    fn matching(
        &self,
        predicate: impl Fn(&Employee) -> bool,
    ) -> Result<Vec<Employee>, EmployeeRepositoryError> {
        let records = self.read()?;
        let mut found: Vec<Employee> = records
            .values()
            .filter(|employee| predicate(employee))
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            a.timestamps
                .created_at
                .cmp(&b.timestamps.created_at)
                .then_with(|| a.id.as_ref().cmp(b.id.as_ref()))
        });
        Ok(found)
    }
}

fn duplicate_identity() -> EmployeeRepositoryError {
    EmployeeRepositoryError::duplicate_key("violates employees_identity_key")
}

#[async_trait]
impl EmployeeRepository for InMemoryEmployeeRepository {
    async fn save(&self, employee: &Employee) -> Result<(), EmployeeRepositoryError> {
        let mut records = self.write()?;
        if Self::collides(&records, employee) {
            return Err(duplicate_identity());
        }
        records.insert(employee.id.clone(), employee.clone());
        Ok(())
    }

    async fn replace(&self, employee: &Employee) -> Result<bool, EmployeeRepositoryError> {
        let mut records = self.write()?;
        if !records.contains_key(&employee.id) {
            return Ok(false);
        }
        if Self::collides(&records, employee) {
            return Err(duplicate_identity());
        }
        records.insert(employee.id.clone(), employee.clone());
        Ok(true)
    }

    async fn find_by_id(
        &self,
        id: &EmployeeId,
    ) -> Result<Option<Employee>, EmployeeRepositoryError> {
        Ok(self.read()?.get(id).cloned())
    }

    async fn find_by_first_name(
        &self,
        first_name: &str,
    ) -> Result<Option<Employee>, EmployeeRepositoryError> {
        let found = self.matching(|employee| employee.details.first_name == first_name)?;
        Ok(found.into_iter().next())
    }

    async fn find_by_department_name(
        &self,
        department_name: &str,
    ) -> Result<Vec<Employee>, EmployeeRepositoryError> {
        self.matching(|employee| employee.details.department.name == department_name)
    }

    async fn delete(&self, employee: &Employee) -> Result<(), EmployeeRepositoryError> {
        self.write()?.remove(&employee.id);
        Ok(())
    }
}
