//! Port for employee record persistence.
//!
//! The store is the sole arbiter of the (first name, last name, department
//! id) uniqueness constraint. Adapters report a violation as
//! [`EmployeeRepositoryError::DuplicateKey`] and never pre-check it in
//! memory.

use async_trait::async_trait;

use crate::domain::{Employee, EmployeeId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by employee repository adapters.
    pub enum EmployeeRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } =>
            "employee repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "employee repository query failed: {message}",
        /// The write collided with the uniqueness constraint.
        DuplicateKey { message: String } =>
            "employee repository duplicate key: {message}",
        /// A stored document could not be encoded or decoded.
        Serialization { message: String } =>
            "employee repository serialization failed: {message}",
    }
}

/// Durable keyed storage for employee records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Insert the record, or replace the one stored under the same id.
    async fn save(&self, employee: &Employee) -> Result<(), EmployeeRepositoryError>;

    /// Overwrite the record stored under the same id. Never inserts.
    ///
    /// Returns `false` when no record has that id, so a delete that lands
    /// between a read and this write is not undone.
    async fn replace(&self, employee: &Employee) -> Result<bool, EmployeeRepositoryError>;

    /// Exact identifier lookup.
    async fn find_by_id(
        &self,
        id: &EmployeeId,
    ) -> Result<Option<Employee>, EmployeeRepositoryError>;

    /// Exact first-name lookup. When several records share the name the
    /// earliest created wins.
    async fn find_by_first_name(
        &self,
        first_name: &str,
    ) -> Result<Option<Employee>, EmployeeRepositoryError>;

    /// All records whose department name matches exactly, oldest first.
    async fn find_by_department_name(
        &self,
        department_name: &str,
    ) -> Result<Vec<Employee>, EmployeeRepositoryError>;

    /// Remove the record. Removing an absent record is not an error.
    async fn delete(&self, employee: &Employee) -> Result<(), EmployeeRepositoryError>;
}

/// Fixture implementation for testing without a real store.
///
/// Lookups always miss and writes are discarded.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureEmployeeRepository;

#[async_trait]
impl EmployeeRepository for FixtureEmployeeRepository {
    async fn save(&self, _employee: &Employee) -> Result<(), EmployeeRepositoryError> {
        Ok(())
    }

    async fn replace(&self, _employee: &Employee) -> Result<bool, EmployeeRepositoryError> {
        Ok(false)
    }

    async fn find_by_id(
        &self,
        _id: &EmployeeId,
    ) -> Result<Option<Employee>, EmployeeRepositoryError> {
        Ok(None)
    }

    async fn find_by_first_name(
        &self,
        _first_name: &str,
    ) -> Result<Option<Employee>, EmployeeRepositoryError> {
        Ok(None)
    }

    async fn find_by_department_name(
        &self,
        _department_name: &str,
    ) -> Result<Vec<Employee>, EmployeeRepositoryError> {
        Ok(Vec::new())
    }

    async fn delete(&self, _employee: &Employee) -> Result<(), EmployeeRepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn stub_employee() -> Employee {
        use crate::domain::{Address, Department, EmailAddress, EmployeeDetails, EmployeeTimestamps};

        Employee {
            id: EmployeeId::random(),
            details: EmployeeDetails {
                first_name: "Vishwanath".to_owned(),
                last_name: "Patil".to_owned(),
                department: Department {
                    department_id: 101,
                    name: "NDE".to_owned(),
                    size: 1,
                    function: "Technology".to_owned(),
                },
                address: Address {
                    city: "Hillsboro".to_owned(),
                    street: None,
                    postal_code: None,
                    state: "Oregon".to_owned(),
                },
                email_addresses: vec![EmailAddress {
                    email: "abc@mailinator.com".to_owned(),
                    primary: true,
                }],
            },
            timestamps: EmployeeTimestamps::stamp(chrono::Utc::now()),
        }
    }

    #[tokio::test]
    async fn fixture_repository_misses_and_never_replaces() {
        let repo = FixtureEmployeeRepository;
        let id = EmployeeId::random();

        assert!(repo.find_by_id(&id).await.expect("lookup").is_none());
        assert!(
            repo.find_by_first_name("Vishwanath")
                .await
                .expect("lookup")
                .is_none()
        );
        assert!(
            repo.find_by_department_name("NDE")
                .await
                .expect("lookup")
                .is_empty()
        );
        assert!(!repo.replace(&stub_employee()).await.expect("replace"));
    }

    #[rstest]
    #[case(EmployeeRepositoryError::connection("refused"), "connection failed: refused")]
    #[case(EmployeeRepositoryError::duplicate_key("employees_identity"), "duplicate key: employees_identity")]
    #[case(EmployeeRepositoryError::serialization("bad json"), "serialization failed: bad json")]
    fn errors_format_their_message(#[case] error: EmployeeRepositoryError, #[case] fragment: &str) {
        assert!(error.to_string().contains(fragment));
    }
}
