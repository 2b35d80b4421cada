//! crates/skill_swap_core/src/domain.rs
//!
//! Defines the pure, core data structures for the skill swap board.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::ports::{PortError, PortResult};

//=========================================================================================
// Required Fields and Validation Errors
//=========================================================================================

/// A field that must hold a non-empty string on a persisted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    StudentName,
    Department,
    CanHelpWith,
    NeedsHelpWith,
    Name,
    Email,
    PreferredTime,
    PreferredLocation,
}

impl Field {
    /// The public (wire) name of the field.
    pub const fn key(self) -> &'static str {
        match self {
            Field::StudentName => "studentName",
            Field::Department => "department",
            Field::CanHelpWith => "canHelpWith",
            Field::NeedsHelpWith => "needsHelpWith",
            Field::Name => "name",
            Field::Email => "email",
            Field::PreferredTime => "preferredTime",
            Field::PreferredLocation => "preferredLocation",
        }
    }

    /// Human readable message reported when the field is missing.
    pub const fn required_message(self) -> &'static str {
        match self {
            Field::StudentName => "Student name is required",
            Field::Department => "Department is required",
            Field::CanHelpWith => "Can help with is required",
            Field::NeedsHelpWith => "Needs help with is required",
            Field::Name => "Name is required",
            Field::Email => "Email is required",
            Field::PreferredTime => "Preferred time is required",
            Field::PreferredLocation => "Preferred location is required",
        }
    }
}

/// The required fields of an interest, in the order they are reported.
pub const INTEREST_FIELDS: [Field; 4] = [
    Field::Name,
    Field::Email,
    Field::PreferredTime,
    Field::PreferredLocation,
];

/// Raised when one or more required fields are missing or empty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
    pub missing: Vec<Field>,
}

impl ValidationError {
    fn for_swap(missing: Vec<Field>) -> Self {
        let fields = missing
            .iter()
            .map(|f| format!("{} is required", f.key()))
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            message: format!("Skill swap validation failed: {}", fields),
            missing,
        }
    }

    fn for_interest(missing: Vec<Field>) -> Self {
        Self {
            message: "Missing required fields".to_string(),
            missing,
        }
    }

    pub fn is_missing(&self, field: Field) -> bool {
        self.missing.contains(&field)
    }
}

// A required value counts as present only when it is a non-empty string.
fn take_required(value: Option<String>, field: Field, missing: &mut Vec<Field>) -> String {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => {
            missing.push(field);
            String::new()
        }
    }
}

// Required fields cannot be cleared, so an empty replacement leaves the slot untouched.
fn assign_required(slot: &mut String, value: Option<&String>) {
    if let Some(v) = value.filter(|v| !v.is_empty()) {
        slot.clone_from(v);
    }
}

//=========================================================================================
// Interest
//=========================================================================================

/// A respondent's expression of interest, embedded in exactly one swap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interest {
    /// Stable identifier, unaffected by removal of sibling entries.
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub preferred_time: String,
    pub preferred_location: String,
    pub contact_date: DateTime<Utc>,
}

/// Fields supplied when expressing interest. `None` means the field was absent.
#[derive(Debug, Clone, Default)]
pub struct NewInterest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub preferred_time: Option<String>,
    pub preferred_location: Option<String>,
}

/// A partial edit of an interest. Absent fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct InterestPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub preferred_time: Option<String>,
    pub preferred_location: Option<String>,
}

impl NewInterest {
    /// Checks that all four fields are present and non-empty, reporting every
    /// missing one.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let missing: Vec<Field> = [
            (Field::Name, &self.name),
            (Field::Email, &self.email),
            (Field::PreferredTime, &self.preferred_time),
            (Field::PreferredLocation, &self.preferred_location),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().map_or(true, str::is_empty))
        .map(|(field, _)| field)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::for_interest(missing))
        }
    }
}

impl Interest {
    /// Validates all four fields and stamps the contact date.
    pub fn create(fields: NewInterest, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        fields.validate()?;

        Ok(Self {
            id: Uuid::new_v4(),
            name: fields.name.unwrap_or_default(),
            email: fields.email.unwrap_or_default(),
            preferred_time: fields.preferred_time.unwrap_or_default(),
            preferred_location: fields.preferred_location.unwrap_or_default(),
            contact_date: now,
        })
    }

    pub fn apply_patch(&mut self, patch: &InterestPatch) {
        assign_required(&mut self.name, patch.name.as_ref());
        assign_required(&mut self.email, patch.email.as_ref());
        assign_required(&mut self.preferred_time, patch.preferred_time.as_ref());
        assign_required(&mut self.preferred_location, patch.preferred_location.as_ref());
    }
}

//=========================================================================================
// Swap
//=========================================================================================

/// A posting pairing a skill the student can teach with one they want to learn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Swap {
    pub id: Uuid,
    pub student_name: String,
    pub department: String,
    pub can_help_with: String,
    pub needs_help_with: String,
    pub notes: String,
    pub posted_at: DateTime<Utc>,
    /// Insertion order is display order.
    pub interested_users: Vec<Interest>,
    /// Incremented by the store on every successful write.
    pub revision: u64,
}

/// Fields supplied when posting a swap. `None` means the field was absent.
#[derive(Debug, Clone, Default)]
pub struct NewSwap {
    pub student_name: Option<String>,
    pub department: Option<String>,
    pub can_help_with: Option<String>,
    pub needs_help_with: Option<String>,
    pub notes: Option<String>,
}

/// A partial edit of a swap. Absent fields are left unchanged; `notes` may be
/// set to an empty string to clear it.
#[derive(Debug, Clone, Default)]
pub struct SwapPatch {
    pub student_name: Option<String>,
    pub department: Option<String>,
    pub can_help_with: Option<String>,
    pub needs_help_with: Option<String>,
    pub notes: Option<String>,
}

impl Swap {
    /// Builds a new swap with an empty interest list, rejecting missing required fields.
    pub fn create(fields: NewSwap, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        let mut missing = Vec::new();
        let student_name = take_required(fields.student_name, Field::StudentName, &mut missing);
        let department = take_required(fields.department, Field::Department, &mut missing);
        let can_help_with = take_required(fields.can_help_with, Field::CanHelpWith, &mut missing);
        let needs_help_with =
            take_required(fields.needs_help_with, Field::NeedsHelpWith, &mut missing);

        if !missing.is_empty() {
            return Err(ValidationError::for_swap(missing));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            student_name,
            department,
            can_help_with,
            needs_help_with,
            notes: fields.notes.unwrap_or_default(),
            posted_at: now,
            interested_users: Vec::new(),
            revision: 0,
        })
    }

    /// Storage-boundary guard: the four required strings must be non-empty.
    pub fn check_invariants(&self) -> Result<(), ValidationError> {
        let missing: Vec<Field> = [
            (Field::StudentName, &self.student_name),
            (Field::Department, &self.department),
            (Field::CanHelpWith, &self.can_help_with),
            (Field::NeedsHelpWith, &self.needs_help_with),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| field)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::for_swap(missing))
        }
    }

    pub fn apply_patch(&mut self, patch: &SwapPatch) {
        assign_required(&mut self.student_name, patch.student_name.as_ref());
        assign_required(&mut self.department, patch.department.as_ref());
        assign_required(&mut self.can_help_with, patch.can_help_with.as_ref());
        assign_required(&mut self.needs_help_with, patch.needs_help_with.as_ref());
        if let Some(notes) = &patch.notes {
            self.notes.clone_from(notes);
        }
    }

    /// Appends at the end of the interest list.
    pub fn push_interest(&mut self, interest: Interest) {
        self.interested_users.push(interest);
    }

    fn check_index(&self, index: usize) -> PortResult<()> {
        let len = self.interested_users.len();
        if index < len {
            Ok(())
        } else {
            Err(PortError::InvalidIndex { index, len })
        }
    }

    pub fn interest_at_mut(&mut self, index: usize) -> PortResult<&mut Interest> {
        self.check_index(index)?;
        Ok(&mut self.interested_users[index])
    }

    /// Removes the entry at `index`; later entries shift down by one.
    pub fn remove_interest_at(&mut self, index: usize) -> PortResult<Interest> {
        self.check_index(index)?;
        Ok(self.interested_users.remove(index))
    }

    /// Current position of the interest with the given stable id.
    pub fn position_of(&self, interest_id: Uuid) -> PortResult<usize> {
        self.interested_users
            .iter()
            .position(|i| i.id == interest_id)
            .ok_or(PortError::InterestNotFound(interest_id))
    }
}
