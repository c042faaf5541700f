//! Diesel table definitions for employee persistence.
//!
//! Kept in sync with the SQL under `backend/migrations`.

diesel::table! {
    /// Employee records.
    ///
    /// Identity columns are stored flat so the unique index on
    /// `(first_name, last_name, department_id)` and the department lookup
    /// index can see them. The nested documents are stored as JSONB.
    employees (id) {
        /// Opaque record identifier.
        id -> Varchar,
        first_name -> Varchar,
        last_name -> Varchar,
        /// Copied from `department.departmentId`.
        department_id -> Int8,
        /// Copied from `department.name`.
        department_name -> Varchar,
        department -> Jsonb,
        address -> Jsonb,
        /// Ordered array of `{email, primary}` objects.
        email_addresses -> Jsonb,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}
