//! Domain primitives, ports, and services.
//!
//! Purpose: define the employee record, the error taxonomy shared by every
//! adapter, and the service that applies create/update/delete policy on top
//! of the store port. Nothing here depends on HTTP or Diesel.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Employee and its value components.
//! - EmployeeService: implements the driving ports in [`ports`].
//! - TraceId: request correlation identifier.

pub mod employee;
mod employee_service;
pub mod error;
pub mod ports;
pub mod trace_id;

pub use self::employee::{
    Address, CreatedEmployee, Department, EmailAddress, Employee, EmployeeDetails, EmployeeId,
    EmployeeTimestamps, EmployeeValidationError,
};
pub use self::employee_service::EmployeeService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

