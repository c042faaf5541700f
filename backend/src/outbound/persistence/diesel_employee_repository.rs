//! PostgreSQL-backed `EmployeeRepository` implementation using Diesel ORM.
//!
//! Saves are upserts keyed on `id`; replacements are plain updates so a
//! concurrently deleted row stays deleted. The unique index on
//! `(first_name, last_name, department_id)` is what rejects a second record
//! for the same person; its violation is reported as
//! [`EmployeeRepositoryError::DuplicateKey`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::ports::{EmployeeRepository, EmployeeRepositoryError};
use crate::domain::{
    Address, Department, EmailAddress, Employee, EmployeeDetails, EmployeeId, EmployeeTimestamps,
};

use super::models::{EmployeeRow, NewEmployeeRow};
use super::pool::{DbPool, PoolError};
use super::schema::employees;

/// Diesel-backed implementation of the `EmployeeRepository` port.
#[derive(Clone)]
pub struct DieselEmployeeRepository {
    pool: DbPool,
}

impl DieselEmployeeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> EmployeeRepositoryError {
    EmployeeRepositoryError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error) -> EmployeeRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(error = %error, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            let constraint = info.constraint_name().unwrap_or("unique constraint");
            EmployeeRepositoryError::duplicate_key(format!("violates {constraint}"))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            EmployeeRepositoryError::connection("database connection error")
        }
        DieselError::DeserializationError(err) | DieselError::SerializationError(err) => {
            EmployeeRepositoryError::serialization(err.to_string())
        }
        DieselError::QueryBuilderError(_) => EmployeeRepositoryError::query("database query error"),
        _ => EmployeeRepositoryError::query("database error"),
    }
}

fn encode<T: Serialize>(value: &T, column: &str) -> Result<serde_json::Value, EmployeeRepositoryError> {
    serde_json::to_value(value).map_err(|err| {
        EmployeeRepositoryError::serialization(format!("failed to encode {column}: {err}"))
    })
}

fn decode<T: DeserializeOwned>(
    value: serde_json::Value,
    column: &str,
) -> Result<T, EmployeeRepositoryError> {
    serde_json::from_value(value).map_err(|err| {
        EmployeeRepositoryError::serialization(format!("invalid {column} in database: {err}"))
    })
}

fn employee_to_row(employee: &Employee) -> Result<NewEmployeeRow<'_>, EmployeeRepositoryError> {
    let details = &employee.details;
    Ok(NewEmployeeRow {
        id: employee.id.as_ref(),
        first_name: &details.first_name,
        last_name: &details.last_name,
        department_id: i64::from(details.department.department_id),
        department_name: &details.department.name,
        department: encode(&details.department, "department")?,
        address: encode(&details.address, "address")?,
        email_addresses: encode(&details.email_addresses, "email_addresses")?,
        created_at: employee.timestamps.created_at,
        updated_at: employee.timestamps.updated_at,
    })
}

fn row_to_employee(row: EmployeeRow) -> Result<Employee, EmployeeRepositoryError> {
    let id = EmployeeId::new(row.id).map_err(|err| {
        EmployeeRepositoryError::serialization(format!("invalid id in database: {err}"))
    })?;
    let department: Department = decode(row.department, "department")?;
    let address: Address = decode(row.address, "address")?;
    let email_addresses: Vec<EmailAddress> = decode(row.email_addresses, "email_addresses")?;

    Ok(Employee {
        id,
        details: EmployeeDetails {
            first_name: row.first_name,
            last_name: row.last_name,
            department,
            address,
            email_addresses,
        },
        timestamps: EmployeeTimestamps {
            created_at: row.created_at,
            updated_at: row.updated_at,
        },
    })
}

#[async_trait]
impl EmployeeRepository for DieselEmployeeRepository {
    async fn save(&self, employee: &Employee) -> Result<(), EmployeeRepositoryError> {
        let row = employee_to_row(employee)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(employees::table)
            .values(&row)
            .on_conflict(employees::id)
            .do_update()
            .set((
                employees::first_name.eq(excluded(employees::first_name)),
                employees::last_name.eq(excluded(employees::last_name)),
                employees::department_id.eq(excluded(employees::department_id)),
                employees::department_name.eq(excluded(employees::department_name)),
                employees::department.eq(excluded(employees::department)),
                employees::address.eq(excluded(employees::address)),
                employees::email_addresses.eq(excluded(employees::email_addresses)),
                employees::updated_at.eq(excluded(employees::updated_at)),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(())
    }

    async fn replace(&self, employee: &Employee) -> Result<bool, EmployeeRepositoryError> {
        let row = employee_to_row(employee)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let affected = diesel::update(employees::table.filter(employees::id.eq(row.id)))
            .set((
                employees::first_name.eq(row.first_name),
                employees::last_name.eq(row.last_name),
                employees::department_id.eq(row.department_id),
                employees::department_name.eq(row.department_name),
                employees::department.eq(row.department),
                employees::address.eq(row.address),
                employees::email_addresses.eq(row.email_addresses),
                employees::updated_at.eq(row.updated_at),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(affected > 0)
    }

    async fn find_by_id(
        &self,
        id: &EmployeeId,
    ) -> Result<Option<Employee>, EmployeeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<EmployeeRow> = employees::table
            .filter(employees::id.eq(id.as_ref()))
            .select(EmployeeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_employee).transpose()
    }

    async fn find_by_first_name(
        &self,
        first_name: &str,
    ) -> Result<Option<Employee>, EmployeeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<EmployeeRow> = employees::table
            .filter(employees::first_name.eq(first_name))
            .order((employees::created_at.asc(), employees::id.asc()))
            .select(EmployeeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_employee).transpose()
    }

    async fn find_by_department_name(
        &self,
        department_name: &str,
    ) -> Result<Vec<Employee>, EmployeeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<EmployeeRow> = employees::table
            .filter(employees::department_name.eq(department_name))
            .order((employees::created_at.asc(), employees::id.asc()))
            .select(EmployeeRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_employee).collect()
    }

    async fn delete(&self, employee: &Employee) -> Result<(), EmployeeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(employees::table.filter(employees::id.eq(employee.id.as_ref())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn employee() -> Employee {
        let at = Utc
            .with_ymd_and_hms(2026, 2, 24, 10, 30, 0)
            .single()
            .expect("valid timestamp");
        Employee {
            id: EmployeeId::new("6f1c1c8e-3c4f-4d0e-9a57-2f0f5a3f9b11").expect("valid id"),
            details: EmployeeDetails {
                first_name: "Ada".to_owned(),
                last_name: "Lovelace".to_owned(),
                department: Department {
                    department_id: 7,
                    name: "Engineering".to_owned(),
                    size: 42,
                    function: "Build things".to_owned(),
                },
                address: Address {
                    city: "London".to_owned(),
                    street: None,
                    postal_code: Some("02134".to_owned()),
                    state: "LDN".to_owned(),
                },
                email_addresses: vec![EmailAddress {
                    email: "ada@example.com".to_owned(),
                    primary: true,
                }],
            },
            timestamps: EmployeeTimestamps::stamp(at),
        }
    }

    fn stored_row(employee: &Employee) -> EmployeeRow {
        let row = employee_to_row(employee).expect("encodable employee");
        EmployeeRow {
            id: row.id.to_owned(),
            first_name: row.first_name.to_owned(),
            last_name: row.last_name.to_owned(),
            department: row.department,
            address: row.address,
            email_addresses: row.email_addresses,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let repo_err = map_pool_error(PoolError::checkout("timed out"));

        assert!(matches!(repo_err, EmployeeRepositoryError::Connection { .. }));
        assert!(repo_err.to_string().contains("timed out"));
    }

    #[rstest]
    fn unique_violation_maps_to_duplicate_key() {
        let diesel_err = DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key".to_string()),
        );

        assert!(matches!(
            map_diesel_error(diesel_err),
            EmployeeRepositoryError::DuplicateKey { .. }
        ));
    }

    #[rstest]
    fn closed_connection_maps_to_connection_error() {
        let diesel_err = DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection,
            Box::new("server closed the connection".to_string()),
        );

        assert!(matches!(
            map_diesel_error(diesel_err),
            EmployeeRepositoryError::Connection { .. }
        ));
    }

    #[rstest]
    fn other_diesel_errors_map_to_query_error() {
        assert!(matches!(
            map_diesel_error(DieselError::NotFound),
            EmployeeRepositoryError::Query { .. }
        ));
    }

    #[rstest]
    fn row_encoding_copies_identity_columns(employee: Employee) {
        let row = employee_to_row(&employee).expect("encodable employee");

        assert_eq!(row.department_id, 7);
        assert_eq!(row.department_name, "Engineering");
        assert_eq!(
            row.email_addresses,
            json!([{ "email": "ada@example.com", "primary": true }])
        );
        assert_eq!(row.address.get("postalCode"), Some(&json!("02134")));
        assert!(row.address.get("street").is_none());
    }

    #[rstest]
    fn stored_row_decodes_to_the_same_employee(employee: Employee) {
        let decoded = row_to_employee(stored_row(&employee)).expect("decodable row");
        assert_eq!(decoded, employee);
    }

    #[rstest]
    fn malformed_document_maps_to_serialization_error(employee: Employee) {
        let mut row = stored_row(&employee);
        row.email_addresses = json!({ "email": "not-a-list" });

        let err = row_to_employee(row).expect_err("malformed emails");

        assert!(matches!(err, EmployeeRepositoryError::Serialization { .. }));
        assert!(err.to_string().contains("email_addresses"));
    }

    #[rstest]
    fn blank_stored_id_maps_to_serialization_error(employee: Employee) {
        let mut row = stored_row(&employee);
        row.id = "  ".to_owned();

        assert!(matches!(
            row_to_employee(row),
            Err(EmployeeRepositoryError::Serialization { .. })
        ));
    }
}
