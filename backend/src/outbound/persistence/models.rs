//! Internal Diesel row structs. Never exposed outside the persistence
//! adapter.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::employees;

/// Row read back from the `employees` table.
///
/// The flat department columns are left out; the JSONB document is the
/// source of truth on read.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = employees)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EmployeeRow {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub department: serde_json::Value,
    pub address: serde_json::Value,
    pub email_addresses: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row written on insert or upsert.
#[derive(Debug, Insertable)]
#[diesel(table_name = employees)]
pub(crate) struct NewEmployeeRow<'a> {
    pub id: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub department_id: i64,
    pub department_name: &'a str,
    pub department: serde_json::Value,
    pub address: serde_json::Value,
    pub email_addresses: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
