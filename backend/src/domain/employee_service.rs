//! Employee domain service.
//!
//! Implements the employee driving ports on top of [`EmployeeRepository`].
//! The service owns identity assignment, the idempotent-create rule, and the
//! no-op-update rule. Uniqueness is left to the store: a create that collides
//! with an existing identity is resolved by looking the stored record up
//! rather than by checking beforehand.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    EmployeeCommand, EmployeeQuery, EmployeeRepository, EmployeeRepositoryError,
    UpdateEmployeeRequest,
};
use crate::domain::{
    CreatedEmployee, Employee, EmployeeDetails, EmployeeId, EmployeeTimestamps,
    EmployeeValidationError, Error,
};

/// Employee service implementing [`EmployeeCommand`] and [`EmployeeQuery`].
#[derive(Clone)]
pub struct EmployeeService<R> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> EmployeeService<R> {
    /// Create a new service over the given store.
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }
}

impl From<EmployeeValidationError> for Error {
    fn from(value: EmployeeValidationError) -> Self {
        Error::invalid_request(value.to_string()).with_details(json!({
            "field": value.field(),
        }))
    }
}

fn map_repository_error(error: EmployeeRepositoryError) -> Error {
    match error {
        EmployeeRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("employee store unavailable: {message}"))
        }
        EmployeeRepositoryError::Query { message } => {
            Error::persistence(format!("employee store error: {message}"))
        }
        EmployeeRepositoryError::DuplicateKey { message } => {
            Error::persistence(format!("unexpected duplicate key: {message}"))
        }
        EmployeeRepositoryError::Serialization { message } => {
            Error::persistence(format!("employee document could not be decoded: {message}"))
        }
    }
}

fn not_found(id: &EmployeeId) -> Error {
    Error::not_found(format!("employee {id} not found")).with_details(json!({
        "id": id.as_ref(),
    }))
}

impl<R> EmployeeService<R>
where
    R: EmployeeRepository,
{
    async fn fetch(&self, id: &EmployeeId) -> Result<Employee, Error> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found(id))
    }

    /// Look for the stored record a colliding create ran into.
    ///
    /// The first-name index usually finds it. When several employees share
    /// the first name that hit may be someone else, so the candidate's
    /// department is scanned as well.
    async fn find_collided(&self, candidate: &EmployeeDetails) -> Result<Recovery, Error> {
        let by_name = self
            .repo
            .find_by_first_name(&candidate.first_name)
            .await
            .map_err(map_repository_error)?;
        let name_hit = by_name.is_some();
        if let Some(employee) = by_name.filter(|e| e.details.same_identity(candidate)) {
            return Ok(Recovery::Found(employee));
        }

        let peers = self
            .repo
            .find_by_department_name(&candidate.department.name)
            .await
            .map_err(map_repository_error)?;
        let peers_seen = !peers.is_empty();
        if let Some(employee) = peers
            .into_iter()
            .find(|e| e.details.same_identity(candidate))
        {
            return Ok(Recovery::Found(employee));
        }

        if name_hit || peers_seen {
            Ok(Recovery::Mismatch)
        } else {
            Ok(Recovery::Missing)
        }
    }

    /// Resolve a create that hit the uniqueness constraint to the stored
    /// record it collided with.
    async fn resolve_duplicate(
        &self,
        candidate: &EmployeeDetails,
        message: &str,
    ) -> Result<CreatedEmployee, Error> {
        match self.find_collided(candidate).await? {
            Recovery::Found(employee) => {
                info!(
                    employee_id = %employee.id,
                    "create replayed against existing employee"
                );
                Ok(CreatedEmployee {
                    employee,
                    idempotent: true,
                })
            }
            Recovery::Missing => {
                warn!(
                    first_name = %candidate.first_name,
                    duplicate = message,
                    "duplicate employee not visible yet"
                );
                Err(Error::service_unavailable(
                    "employee already exists but could not be read back; retry the request",
                )
                .with_details(json!({
                    "retryable": true,
                    "firstName": candidate.first_name,
                })))
            }
            Recovery::Mismatch => {
                warn!(
                    first_name = %candidate.first_name,
                    department_id = candidate.department.department_id,
                    duplicate = message,
                    "duplicate employee does not match any visible record"
                );
                Err(Error::conflict(
                    "an employee with this name already exists in this department",
                )
                .with_details(json!({
                    "firstName": candidate.first_name,
                    "lastName": candidate.last_name,
                    "departmentId": candidate.department.department_id,
                })))
            }
        }
    }
}

/// Outcome of looking up the record behind a create-time duplicate.
enum Recovery {
    Found(Employee),
    /// Neither lookup returned anything.
    Missing,
    /// Records were returned but none shares the candidate's identity.
    Mismatch,
}

#[async_trait]
impl<R> EmployeeCommand for EmployeeService<R>
where
    R: EmployeeRepository,
{
    async fn create(&self, details: EmployeeDetails) -> Result<CreatedEmployee, Error> {
        details.validate()?;
        if !details.has_primary_email() {
            return Err(
                Error::invalid_request("at least one email address must be primary")
                    .with_details(json!({ "field": "emailAddresses" })),
            );
        }

        let employee = Employee {
            id: EmployeeId::random(),
            details,
            timestamps: EmployeeTimestamps::stamp(self.clock.utc()),
        };

        match self.repo.save(&employee).await {
            Ok(()) => {
                info!(employee_id = %employee.id, "employee created");
                Ok(CreatedEmployee {
                    employee,
                    idempotent: false,
                })
            }
            Err(EmployeeRepositoryError::DuplicateKey { message }) => {
                self.resolve_duplicate(&employee.details, &message).await
            }
            Err(error) => Err(map_repository_error(error)),
        }
    }

    async fn update(&self, request: UpdateEmployeeRequest) -> Result<Employee, Error> {
        request.details.validate()?;
        let mut employee = self.fetch(&request.id).await?;

        if employee.details == request.details {
            return Err(
                Error::conflict("update does not change the stored employee").with_details(
                    json!({
                        "id": employee.id.as_ref(),
                    }),
                ),
            );
        }

        employee.details = request.details;
        employee.timestamps.touch(self.clock.utc());

        match self.repo.replace(&employee).await {
            Ok(true) => {
                info!(employee_id = %employee.id, "employee updated");
                Ok(employee)
            }
            Ok(false) => Err(not_found(&employee.id)),
            Err(EmployeeRepositoryError::DuplicateKey { .. }) => Err(Error::conflict(
                "another employee already has this name in this department",
            )
            .with_details(json!({
                "id": employee.id.as_ref(),
            }))),
            Err(error) => Err(map_repository_error(error)),
        }
    }

    async fn delete(&self, id: &EmployeeId) -> Result<(), Error> {
        let employee = self.fetch(id).await?;
        self.repo
            .delete(&employee)
            .await
            .map_err(map_repository_error)?;
        info!(employee_id = %id, "employee deleted");
        Ok(())
    }
}

#[async_trait]
impl<R> EmployeeQuery for EmployeeService<R>
where
    R: EmployeeRepository,
{
    async fn find_by_id(&self, id: &EmployeeId) -> Result<Employee, Error> {
        info!(employee_id = %id, "employee lookup by id");
        self.fetch(id).await
    }

    async fn find_by_first_name(&self, first_name: &str) -> Result<Employee, Error> {
        info!(first_name, "employee lookup by first name");
        self.repo
            .find_by_first_name(first_name)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| {
                Error::not_found(format!("employee named {first_name} not found"))
                    .with_details(json!({ "firstName": first_name }))
            })
    }

    async fn find_by_department_name(
        &self,
        department_name: &str,
    ) -> Result<Vec<Employee>, Error> {
        info!(department_name, "employee lookup by department");
        self.repo
            .find_by_department_name(department_name)
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
#[path = "employee_service_tests.rs"]
mod tests;
