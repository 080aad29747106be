//! Person entity and its value objects.
//!
//! A person is one row in the organizational directory. The nullable
//! `manager_id` forms the organizational forest; everything in
//! [`crate::domain::hierarchy`] is derived from it. The storage layer does
//! not enforce forest shape, so traversals check it defensively.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Type of person in the organization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum PersonType {
    /// A regular employee.
    #[default]
    Employee,
    /// An external partner listed in the directory.
    Partner,
}

impl PersonType {
    /// Canonical string form, as stored and serialized.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "Employee",
            Self::Partner => "Partner",
        }
    }
}

impl std::fmt::Display for PersonType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PersonType {
    type Err = PersonValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Employee" => Ok(Self::Employee),
            "Partner" => Ok(Self::Partner),
            other => Err(PersonValidationError::UnknownPersonType(other.to_owned())),
        }
    }
}

/// Current status of a person.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum PersonStatus {
    /// Currently part of the organization.
    #[default]
    Active,
    /// No longer active but still listed.
    Inactive,
}

impl PersonStatus {
    /// Canonical string form, as stored and serialized.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }
}

impl std::fmt::Display for PersonStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PersonStatus {
    type Err = PersonValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(Self::Active),
            "Inactive" => Ok(Self::Inactive),
            other => Err(PersonValidationError::UnknownStatus(other.to_owned())),
        }
    }
}

/// Validation errors for person input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersonValidationError {
    /// A required text field is empty after trimming.
    #[error("{field} must not be empty")]
    EmptyField {
        /// Name of the offending field.
        field: &'static str,
    },
    /// The person type string is not recognised.
    #[error("unknown person type '{0}', expected Employee or Partner")]
    UnknownPersonType(String),
    /// The status string is not recognised.
    #[error("unknown status '{0}', expected Active or Inactive")]
    UnknownStatus(String),
}

/// A person row as read from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    /// Immutable identity.
    pub id: i32,
    /// Full display name.
    pub name: String,
    /// Role title.
    pub job_title: String,
    /// Department name.
    pub department: String,
    /// The person this one reports to; `None` for the organizational root.
    pub manager_id: Option<i32>,
    /// Relative photo path, if a photo is on file.
    pub photo_path: Option<String>,
    /// Employee or partner.
    pub person_type: PersonType,
    /// Active or inactive.
    pub status: PersonStatus,
    /// Work email address.
    pub email: Option<String>,
    /// Work phone number.
    pub phone: Option<String>,
    /// Office location.
    pub location: Option<String>,
    /// Date the person joined.
    pub hire_date: Option<NaiveDate>,
    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new person.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewPerson {
    /// Full display name.
    pub name: String,
    /// Role title.
    pub job_title: String,
    /// Department name.
    pub department: String,
    /// Optional manager reference.
    pub manager_id: Option<i32>,
    /// Relative photo path.
    pub photo_path: Option<String>,
    /// Employee or partner.
    pub person_type: PersonType,
    /// Active or inactive.
    pub status: PersonStatus,
    /// Work email address.
    pub email: Option<String>,
    /// Work phone number.
    pub phone: Option<String>,
    /// Office location.
    pub location: Option<String>,
    /// Date the person joined.
    pub hire_date: Option<NaiveDate>,
}

impl NewPerson {
    /// Check the required text fields.
    ///
    /// # Errors
    ///
    /// Returns [`PersonValidationError::EmptyField`] when name, job title,
    /// or department is blank after trimming.
    pub fn validate(&self) -> Result<(), PersonValidationError> {
        require_non_empty(&self.name, "name")?;
        require_non_empty(&self.job_title, "jobTitle")?;
        require_non_empty(&self.department, "department")?;
        Ok(())
    }
}

/// Partial update for an existing person; `None` fields are left untouched.
///
/// `manager_id` is doubly optional: the outer `Option` means "change it",
/// the inner one distinguishes assigning a manager from clearing it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PersonUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New role title.
    pub job_title: Option<String>,
    /// New department.
    pub department: Option<String>,
    /// Manager change: `Some(None)` detaches, `Some(Some(id))` reassigns.
    pub manager_id: Option<Option<i32>>,
    /// New photo path.
    pub photo_path: Option<Option<String>>,
    /// New person type.
    pub person_type: Option<PersonType>,
    /// New status.
    pub status: Option<PersonStatus>,
    /// New email.
    pub email: Option<Option<String>>,
    /// New phone.
    pub phone: Option<Option<String>>,
    /// New location.
    pub location: Option<Option<String>>,
    /// New hire date.
    pub hire_date: Option<Option<NaiveDate>>,
}

impl PersonUpdate {
    /// Check any text fields present in the update.
    ///
    /// # Errors
    ///
    /// Returns [`PersonValidationError::EmptyField`] when a supplied name,
    /// job title, or department is blank after trimming.
    pub fn validate(&self) -> Result<(), PersonValidationError> {
        if let Some(name) = &self.name {
            require_non_empty(name, "name")?;
        }
        if let Some(job_title) = &self.job_title {
            require_non_empty(job_title, "jobTitle")?;
        }
        if let Some(department) = &self.department {
            require_non_empty(department, "department")?;
        }
        Ok(())
    }

    /// Whether the update changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

fn require_non_empty(value: &str, field: &'static str) -> Result<(), PersonValidationError> {
    if value.trim().is_empty() {
        return Err(PersonValidationError::EmptyField { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    fn valid_new_person() -> NewPerson {
        NewPerson {
            name: "Sarah Connor".to_owned(),
            job_title: "Engineering Manager".to_owned(),
            department: "Engineering".to_owned(),
            ..NewPerson::default()
        }
    }

    #[rstest]
    fn valid_person_passes_validation() {
        assert_eq!(valid_new_person().validate(), Ok(()));
    }

    #[rstest]
    #[case("name")]
    #[case("jobTitle")]
    #[case("department")]
    fn blank_required_fields_are_rejected(#[case] field: &str) {
        let mut person = valid_new_person();
        match field {
            "name" => person.name = "   ".to_owned(),
            "jobTitle" => person.job_title = String::new(),
            _ => person.department = "\t".to_owned(),
        }
        let err = person.validate().expect_err("rejected");
        assert!(matches!(err, PersonValidationError::EmptyField { .. }));
    }

    #[rstest]
    fn update_only_validates_supplied_fields() {
        let update = PersonUpdate {
            job_title: Some("Director".to_owned()),
            ..PersonUpdate::default()
        };
        assert_eq!(update.validate(), Ok(()));

        let update = PersonUpdate {
            name: Some(String::new()),
            ..PersonUpdate::default()
        };
        assert!(update.validate().is_err());
    }

    #[rstest]
    #[case("Employee", PersonType::Employee)]
    #[case("Partner", PersonType::Partner)]
    fn person_type_round_trips(#[case] text: &str, #[case] expected: PersonType) {
        assert_eq!(PersonType::from_str(text), Ok(expected));
        assert_eq!(expected.as_str(), text);
    }

    #[rstest]
    fn unknown_enum_strings_are_rejected() {
        assert!(PersonType::from_str("Contractor").is_err());
        assert!(PersonStatus::from_str("Retired").is_err());
    }

    #[rstest]
    fn empty_update_is_detected() {
        assert!(PersonUpdate::default().is_empty());
        let update = PersonUpdate {
            status: Some(PersonStatus::Inactive),
            ..PersonUpdate::default()
        };
        assert!(!update.is_empty());
    }
}
