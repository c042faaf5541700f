//! Employee HTTP handlers.
//!
//! ```text
//! POST   /api/v1/employees
//! GET    /api/v1/employees/{id}
//! GET    /api/v1/employees/names/{firstName}
//! GET    /api/v1/employees/departments/names/{departmentName}
//! PUT    /api/v1/employees/{id}
//! DELETE /api/v1/employees/{id}
//! ```

use actix_web::http::header;
use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::UpdateEmployeeRequest;
use crate::domain::{
    Address, Department, EmailAddress, Employee, EmployeeDetails, EmployeeId, Error,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, format_timestamp, id_mismatch_error, missing_field_error,
    parse_optional_timestamp,
};

const ID: FieldName = FieldName::new("id");
const FIRST_NAME: FieldName = FieldName::new("firstName");
const LAST_NAME: FieldName = FieldName::new("lastName");
const DEPARTMENT: FieldName = FieldName::new("department");
const ADDRESS: FieldName = FieldName::new("address");
const EMAIL_ADDRESSES: FieldName = FieldName::new("emailAddresses");
const CREATED_AT: FieldName = FieldName::new("createdAt");
const UPDATED_AT: FieldName = FieldName::new("updatedAt");

/// Base path used to build `Location` headers.
const EMPLOYEES_PATH: &str = "/api/v1/employees";

/// Department as sent and returned on the wire.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentBody {
    #[schema(example = 101)]
    pub department_id: u32,
    #[schema(example = "NDE")]
    pub name: String,
    #[serde(default)]
    #[schema(example = 5000)]
    pub size: u32,
    #[schema(example = "Technology")]
    pub function: String,
}

/// Postal code accepted as text or as a bare number.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(untagged)]
pub enum PostalCodeBody {
    Text(String),
    Number(u64),
}

impl From<PostalCodeBody> for String {
    fn from(value: PostalCodeBody) -> Self {
        match value {
            PostalCodeBody::Text(text) => text,
            PostalCodeBody::Number(number) => number.to_string(),
        }
    }
}

/// Postal address as sent and returned on the wire.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressBody {
    #[schema(example = "Hillsboro")]
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "1189 NE 89th Street")]
    pub street: Option<String>,
    #[serde(default, alias = "zipcode", skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<PostalCodeBody>,
    #[schema(example = "Oregon")]
    pub state: String,
}

/// Email entry as sent and returned on the wire.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct EmailAddressBody {
    #[schema(example = "abc@mailinator.com")]
    pub email: String,
    #[serde(default, alias = "isPrimary")]
    pub primary: bool,
}

/// Request payload for creating or replacing an employee.
///
/// `createdAt` and `updatedAt` are accepted for compatibility and ignored.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRequest {
    pub id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub department: Option<DepartmentBody>,
    pub address: Option<AddressBody>,
    pub email_addresses: Option<Vec<EmailAddressBody>>,
    #[schema(example = "2026-02-24T10:30:00.000Z")]
    pub created_at: Option<String>,
    #[schema(example = "2026-02-24T10:30:00.000Z")]
    pub updated_at: Option<String>,
}

/// Response payload for an employee record.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub department: DepartmentBody,
    pub address: AddressBody,
    pub email_addresses: Vec<EmailAddressBody>,
    #[schema(example = "2026-02-24T10:30:00.000Z")]
    pub created_at: String,
    #[schema(example = "2026-02-24T10:30:00.000Z")]
    pub updated_at: String,
}

impl From<Employee> for EmployeeResponse {
    fn from(value: Employee) -> Self {
        let Employee {
            id,
            details,
            timestamps,
        } = value;
        let EmployeeDetails {
            first_name,
            last_name,
            department,
            address,
            email_addresses,
        } = details;

        Self {
            id: id.into(),
            first_name,
            last_name,
            department: DepartmentBody {
                department_id: department.department_id,
                name: department.name,
                size: department.size,
                function: department.function,
            },
            address: AddressBody {
                city: address.city,
                street: address.street,
                postal_code: address.postal_code.map(PostalCodeBody::Text),
                state: address.state,
            },
            email_addresses: email_addresses
                .into_iter()
                .map(|entry| EmailAddressBody {
                    email: entry.email,
                    primary: entry.primary,
                })
                .collect(),
            created_at: format_timestamp(&timestamps.created_at),
            updated_at: format_timestamp(&timestamps.updated_at),
        }
    }
}

#[derive(Debug)]
struct ParsedEmployee {
    id: Option<String>,
    details: EmployeeDetails,
}

fn parse_employee_request(payload: EmployeeRequest) -> Result<ParsedEmployee, Error> {
    let first_name = payload
        .first_name
        .ok_or_else(|| missing_field_error(FIRST_NAME))?;
    let last_name = payload
        .last_name
        .ok_or_else(|| missing_field_error(LAST_NAME))?;
    let department = payload
        .department
        .ok_or_else(|| missing_field_error(DEPARTMENT))?;
    let address = payload
        .address
        .ok_or_else(|| missing_field_error(ADDRESS))?;
    let email_addresses = payload
        .email_addresses
        .ok_or_else(|| missing_field_error(EMAIL_ADDRESSES))?;
    parse_optional_timestamp(payload.created_at, CREATED_AT)?;
    parse_optional_timestamp(payload.updated_at, UPDATED_AT)?;

    let details = EmployeeDetails {
        first_name,
        last_name,
        department: Department {
            department_id: department.department_id,
            name: department.name,
            size: department.size,
            function: department.function,
        },
        address: Address {
            city: address.city,
            street: address.street,
            postal_code: address.postal_code.map(String::from),
            state: address.state,
        },
        email_addresses: email_addresses
            .into_iter()
            .map(|entry| EmailAddress {
                email: entry.email,
                primary: entry.primary,
            })
            .collect(),
    };
    details.validate()?;

    Ok(ParsedEmployee {
        id: payload.id,
        details,
    })
}

fn parse_replacement(path_id: String, payload: EmployeeRequest) -> ApiResult<UpdateEmployeeRequest> {
    let parsed = parse_employee_request(payload)?;
    let body_id = parsed.id.ok_or_else(|| missing_field_error(ID))?;
    if body_id != path_id {
        return Err(id_mismatch_error(ID, &path_id, &body_id));
    }
    Ok(UpdateEmployeeRequest {
        id: EmployeeId::new(path_id)?,
        details: parsed.details,
    })
}

/// Create an employee.
///
/// Repeating a create for an employee that already exists returns the stored
/// record with status 200 instead of 201.
#[utoipa::path(
    post,
    path = "/api/v1/employees",
    request_body = EmployeeRequest,
    responses(
        (
            status = 201,
            description = "Employee created",
            headers(("Location" = String, description = "URL of the new employee")),
            body = EmployeeResponse
        ),
        (
            status = 200,
            description = "Employee already existed",
            headers(("Location" = String, description = "URL of the stored employee")),
            body = EmployeeResponse
        ),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["employees"],
    operation_id = "createEmployee"
)]
#[post("/employees")]
pub async fn create_employee(
    state: web::Data<HttpState>,
    payload: web::Json<EmployeeRequest>,
) -> ApiResult<HttpResponse> {
    let parsed = parse_employee_request(payload.into_inner())?;
    let created = state.employees.create(parsed.details).await?;

    let location = format!("{EMPLOYEES_PATH}/{}", created.employee.id);
    let mut response = if created.idempotent {
        HttpResponse::Ok()
    } else {
        HttpResponse::Created()
    };
    Ok(response
        .insert_header((header::LOCATION, location))
        .json(EmployeeResponse::from(created.employee)))
}

/// Fetch an employee by identifier.
#[utoipa::path(
    get,
    path = "/api/v1/employees/{id}",
    params(("id" = String, Path, description = "Employee identifier")),
    responses(
        (status = 200, description = "Employee", body = EmployeeResponse),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["employees"],
    operation_id = "getEmployee"
)]
#[get("/employees/{id}")]
pub async fn get_employee(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<EmployeeResponse>> {
    let id = EmployeeId::new(path.into_inner())?;
    let employee = state.employees_query.find_by_id(&id).await?;
    Ok(web::Json(EmployeeResponse::from(employee)))
}

/// Fetch the employee with an exact first name.
#[utoipa::path(
    get,
    path = "/api/v1/employees/names/{first_name}",
    params(("first_name" = String, Path, description = "First name to match exactly")),
    responses(
        (status = 200, description = "Employee", body = EmployeeResponse),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["employees"],
    operation_id = "getEmployeeByFirstName"
)]
#[get("/employees/names/{first_name}")]
pub async fn get_employee_by_first_name(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<EmployeeResponse>> {
    let first_name = path.into_inner();
    let employee = state.employees_query.find_by_first_name(&first_name).await?;
    Ok(web::Json(EmployeeResponse::from(employee)))
}

/// List employees in a department.
#[utoipa::path(
    get,
    path = "/api/v1/employees/departments/names/{department_name}",
    params(("department_name" = String, Path, description = "Department name to match exactly")),
    responses(
        (status = 200, description = "Employees in the department", body = [EmployeeResponse]),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["employees"],
    operation_id = "listEmployeesByDepartment"
)]
#[get("/employees/departments/names/{department_name}")]
pub async fn list_employees_by_department(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<EmployeeResponse>>> {
    let department_name = path.into_inner();
    let employees = state
        .employees_query
        .find_by_department_name(&department_name)
        .await?;
    Ok(web::Json(
        employees.into_iter().map(EmployeeResponse::from).collect(),
    ))
}

/// Replace an employee's business fields.
///
/// The body must carry the same `id` as the path.
#[utoipa::path(
    put,
    path = "/api/v1/employees/{id}",
    params(("id" = String, Path, description = "Employee identifier")),
    request_body = EmployeeRequest,
    responses(
        (status = 200, description = "Updated employee", body = EmployeeResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Update changes nothing or collides", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["employees"],
    operation_id = "updateEmployee"
)]
#[put("/employees/{id}")]
pub async fn update_employee(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<EmployeeRequest>,
) -> ApiResult<web::Json<EmployeeResponse>> {
    let request = parse_replacement(path.into_inner(), payload.into_inner())?;
    let employee = state.employees.update(request).await?;
    Ok(web::Json(EmployeeResponse::from(employee)))
}

/// Delete an employee.
#[utoipa::path(
    delete,
    path = "/api/v1/employees/{id}",
    params(("id" = String, Path, description = "Employee identifier")),
    responses(
        (status = 204, description = "Employee deleted"),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["employees"],
    operation_id = "deleteEmployee"
)]
#[delete("/employees/{id}")]
pub async fn delete_employee(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = EmployeeId::new(path.into_inner())?;
    state.employees.delete(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "employees_tests.rs"]
mod tests;
