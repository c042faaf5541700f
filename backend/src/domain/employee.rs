//! Employee record model.
//!
//! Business fields live in [`EmployeeDetails`] so structural equality for
//! conflict detection never sees the identifier or the timestamps. The
//! record itself is [`Employee`], which composes the three parts.

use std::fmt;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors returned by [`EmployeeDetails::validate`] and
/// [`EmployeeId::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmployeeValidationError {
    /// Identifier was empty or whitespace.
    EmptyId,
    /// First name was empty or whitespace.
    BlankFirstName,
    /// Last name was empty or whitespace.
    BlankLastName,
    /// Department name was empty or whitespace.
    BlankDepartmentName,
    /// Department function was empty or whitespace.
    BlankDepartmentFunction,
    /// Address city was empty or whitespace.
    BlankCity,
    /// Address state was empty or whitespace.
    BlankState,
    /// The email list had no entries.
    EmptyEmailAddresses,
    /// The email entry at `index` had a blank address.
    BlankEmailAddress { index: usize },
}

impl EmployeeValidationError {
    /// Wire name of the offending field, for error details.
    pub fn field(&self) -> String {
        match self {
            Self::EmptyId => "id".to_owned(),
            Self::BlankFirstName => "firstName".to_owned(),
            Self::BlankLastName => "lastName".to_owned(),
            Self::BlankDepartmentName => "department.name".to_owned(),
            Self::BlankDepartmentFunction => "department.function".to_owned(),
            Self::BlankCity => "address.city".to_owned(),
            Self::BlankState => "address.state".to_owned(),
            Self::EmptyEmailAddresses => "emailAddresses".to_owned(),
            Self::BlankEmailAddress { index } => format!("emailAddresses[{index}].email"),
        }
    }
}

impl fmt::Display for EmployeeValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "employee id must not be empty"),
            Self::BlankFirstName => write!(f, "first name must not be blank"),
            Self::BlankLastName => write!(f, "last name must not be blank"),
            Self::BlankDepartmentName => write!(f, "department name must not be blank"),
            Self::BlankDepartmentFunction => write!(f, "department function must not be blank"),
            Self::BlankCity => write!(f, "city must not be blank"),
            Self::BlankState => write!(f, "state must not be blank"),
            Self::EmptyEmailAddresses => write!(f, "at least one email address is required"),
            Self::BlankEmailAddress { index } => {
                write!(f, "email address at position {index} must not be blank")
            }
        }
    }
}

impl std::error::Error for EmployeeValidationError {}

/// Opaque employee identifier assigned by the service.
///
/// # Examples
/// ```
/// use employees::domain::EmployeeId;
///
/// let id = EmployeeId::new("abc").expect("non-blank id");
/// assert_eq!(id.as_ref(), "abc");
/// assert!(EmployeeId::new("  ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmployeeId(String);

impl EmployeeId {
    /// Validate and construct an [`EmployeeId`].
    pub fn new(id: impl Into<String>) -> Result<Self, EmployeeValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(EmployeeValidationError::EmptyId);
        }
        Ok(Self(id))
    }

    /// Generate a fresh identifier from a random UUID.
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl AsRef<str> for EmployeeId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<EmployeeId> for String {
    fn from(value: EmployeeId) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmployeeId {
    type Error = EmployeeValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Department an employee belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub department_id: u32,
    pub name: String,
    pub size: u32,
    pub function: String,
}

/// Postal address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    pub state: String,
}

/// One entry in an employee's ordered email list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress {
    pub email: String,
    pub primary: bool,
}

/// Business fields of an employee record.
///
/// Equality over this value is what decides whether an update changes
/// anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeDetails {
    pub first_name: String,
    pub last_name: String,
    pub department: Department,
    pub address: Address,
    pub email_addresses: Vec<EmailAddress>,
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

impl EmployeeDetails {
    /// Check field-level constraints, reporting the first violation found.
    ///
    /// The primary-email rule is not checked here; it only applies when a
    /// record is created.
    pub fn validate(&self) -> Result<(), EmployeeValidationError> {
        if is_blank(&self.first_name) {
            return Err(EmployeeValidationError::BlankFirstName);
        }
        if is_blank(&self.last_name) {
            return Err(EmployeeValidationError::BlankLastName);
        }
        if is_blank(&self.department.name) {
            return Err(EmployeeValidationError::BlankDepartmentName);
        }
        if is_blank(&self.department.function) {
            return Err(EmployeeValidationError::BlankDepartmentFunction);
        }
        if is_blank(&self.address.city) {
            return Err(EmployeeValidationError::BlankCity);
        }
        if is_blank(&self.address.state) {
            return Err(EmployeeValidationError::BlankState);
        }
        if self.email_addresses.is_empty() {
            return Err(EmployeeValidationError::EmptyEmailAddresses);
        }
        if let Some(index) = self
            .email_addresses
            .iter()
            .position(|entry| is_blank(&entry.email))
        {
            return Err(EmployeeValidationError::BlankEmailAddress { index });
        }
        Ok(())
    }

    /// Whether any email entry is flagged primary.
    pub fn has_primary_email(&self) -> bool {
        self.email_addresses.iter().any(|entry| entry.primary)
    }

    /// Whether `other` names the same person in the same department.
    pub fn same_identity(&self, other: &Self) -> bool {
        self.first_name == other.first_name
            && self.last_name == other.last_name
            && self.department.department_id == other.department.department_id
    }
}

/// Creation and last-modification instants, in UTC with millisecond
/// precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmployeeTimestamps {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EmployeeTimestamps {
    /// Both timestamps set to `now`.
    pub fn stamp(now: DateTime<Utc>) -> Self {
        let now = now.trunc_subsecs(3);
        Self {
            created_at: now,
            updated_at: now,
        }
    }

    /// Refresh the modification instant, leaving creation untouched.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.trunc_subsecs(3);
    }
}

/// Stored employee record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    pub id: EmployeeId,
    pub details: EmployeeDetails,
    pub timestamps: EmployeeTimestamps,
}

/// Outcome of a create request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedEmployee {
    pub employee: Employee,
    /// `true` when the request replayed an earlier create of the same
    /// identity and no new record was written.
    pub idempotent: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    #[fixture]
    fn details() -> EmployeeDetails {
        EmployeeDetails {
            first_name: "Vishwanath".to_owned(),
            last_name: "Patil".to_owned(),
            department: Department {
                department_id: 101,
                name: "NDE".to_owned(),
                size: 5000,
                function: "Technology".to_owned(),
            },
            address: Address {
                city: "Hillsboro".to_owned(),
                street: Some("1189 NE 89th Street".to_owned()),
                postal_code: Some("97006".to_owned()),
                state: "Oregon".to_owned(),
            },
            email_addresses: vec![
                EmailAddress {
                    email: "abc@mailinator.com".to_owned(),
                    primary: true,
                },
                EmailAddress {
                    email: "def@mailinator.com".to_owned(),
                    primary: false,
                },
            ],
        }
    }

    #[rstest]
    fn valid_details_pass(details: EmployeeDetails) {
        assert_eq!(details.validate(), Ok(()));
        assert!(details.has_primary_email());
    }

    #[rstest]
    #[case::first_name(|d: &mut EmployeeDetails| d.first_name = " ".into(), EmployeeValidationError::BlankFirstName)]
    #[case::last_name(|d: &mut EmployeeDetails| d.last_name.clear(), EmployeeValidationError::BlankLastName)]
    #[case::department_name(|d: &mut EmployeeDetails| d.department.name.clear(), EmployeeValidationError::BlankDepartmentName)]
    #[case::department_function(|d: &mut EmployeeDetails| d.department.function = "\t".into(), EmployeeValidationError::BlankDepartmentFunction)]
    #[case::city(|d: &mut EmployeeDetails| d.address.city.clear(), EmployeeValidationError::BlankCity)]
    #[case::state(|d: &mut EmployeeDetails| d.address.state.clear(), EmployeeValidationError::BlankState)]
    #[case::no_emails(|d: &mut EmployeeDetails| d.email_addresses.clear(), EmployeeValidationError::EmptyEmailAddresses)]
    #[case::blank_email(|d: &mut EmployeeDetails| d.email_addresses[1].email = "  ".into(), EmployeeValidationError::BlankEmailAddress { index: 1 })]
    fn invalid_details_are_rejected(
        mut details: EmployeeDetails,
        #[case] mutate: fn(&mut EmployeeDetails),
        #[case] expected: EmployeeValidationError,
    ) {
        mutate(&mut details);
        assert_eq!(details.validate(), Err(expected));
    }

    #[rstest]
    fn optional_address_parts_may_be_absent(mut details: EmployeeDetails) {
        details.address.street = None;
        details.address.postal_code = None;
        assert_eq!(details.validate(), Ok(()));
    }

    #[rstest]
    fn primary_flag_is_detected(mut details: EmployeeDetails) {
        for entry in &mut details.email_addresses {
            entry.primary = false;
        }
        assert!(!details.has_primary_email());
        assert_eq!(details.validate(), Ok(()), "primary is a create-time rule");
    }

    #[rstest]
    fn identity_ignores_non_key_fields(details: EmployeeDetails) {
        let mut other = details.clone();
        other.address.city = "Portland".to_owned();
        other.department.name = "Platform".to_owned();
        assert!(details.same_identity(&other));

        other.department.department_id = 102;
        assert!(!details.same_identity(&other));
    }

    #[rstest]
    fn stamping_truncates_to_milliseconds() {
        let now = Utc
            .timestamp_opt(1_700_000_000, 123_456_789)
            .single()
            .expect("valid instant");
        let stamped = EmployeeTimestamps::stamp(now);
        assert_eq!(stamped.created_at.timestamp_subsec_nanos(), 123_000_000);
        assert_eq!(stamped.created_at, stamped.updated_at);
    }

    #[rstest]
    fn touch_preserves_creation_instant() {
        let created = Utc
            .timestamp_opt(1_700_000_000, 0)
            .single()
            .expect("valid instant");
        let mut stamps = EmployeeTimestamps::stamp(created);
        let later = Utc
            .timestamp_opt(1_700_000_060, 999_999)
            .single()
            .expect("valid instant");
        stamps.touch(later);

        assert_eq!(stamps.created_at, created);
        assert_eq!(stamps.updated_at.timestamp(), 1_700_000_060);
        assert_eq!(stamps.updated_at.timestamp_subsec_nanos(), 0);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_ids_are_rejected(#[case] raw: &str) {
        assert_eq!(EmployeeId::new(raw), Err(EmployeeValidationError::EmptyId));
    }

    #[rstest]
    fn random_ids_are_uuids() {
        let id = EmployeeId::random();
        assert!(Uuid::parse_str(id.as_ref()).is_ok());
        assert_ne!(id, EmployeeId::random());
    }

    #[rstest]
    fn validation_errors_name_their_field() {
        assert_eq!(
            EmployeeValidationError::BlankEmailAddress { index: 2 }.field(),
            "emailAddresses[2].email"
        );
        assert_eq!(EmployeeValidationError::BlankCity.field(), "address.city");
    }
}
