//! services/api/src/web/dto.rs
//!
//! Defines the JSON bodies exchanged over the REST API. Field names are
//! camelCase and identifiers are exposed as `_id`, matching what the browser
//! client already consumes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skill_swap_core::domain::{
    Interest, InterestPatch, NewInterest, NewSwap, Swap, SwapPatch, ValidationError,
    INTEREST_FIELDS,
};
use skill_swap_core::Field;
use utoipa::ToSchema;
use uuid::Uuid;

//=========================================================================================
// Responses
//=========================================================================================

/// A full swap document, returned by every read and every mutation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SwapResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub student_name: String,
    pub department: String,
    pub can_help_with: String,
    pub needs_help_with: String,
    pub notes: String,
    pub posted_at: DateTime<Utc>,
    pub interested_users: Vec<InterestResponse>,
    pub revision: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InterestResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub preferred_time: String,
    pub preferred_location: String,
    pub contact_date: DateTime<Utc>,
}

/// A plain confirmation or error message.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Per-field outcome of interest validation; `null` means the field was supplied.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InterestFieldDetails {
    pub name: Option<String>,
    pub email: Option<String>,
    pub preferred_time: Option<String>,
    pub preferred_location: Option<String>,
}

impl InterestFieldDetails {
    pub fn from_validation(err: &ValidationError) -> Self {
        let detail = |field: Field| {
            err.is_missing(field)
                .then(|| field.required_message().to_string())
        };
        Self {
            name: detail(Field::Name),
            email: detail(Field::Email),
            preferred_time: detail(Field::PreferredTime),
            preferred_location: detail(Field::PreferredLocation),
        }
    }

    /// Whether the error concerns interest fields at all.
    pub fn applies_to(err: &ValidationError) -> bool {
        err.missing.iter().any(|f| INTEREST_FIELDS.contains(f))
    }
}

/// The error body. `details` is only present for interest validation failures.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<InterestFieldDetails>,
}

//=========================================================================================
// Requests
//=========================================================================================

/// Swap fields for both posting and editing. Every key is optional on the
/// wire; which ones are required is decided by the operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SwapFieldsRequest {
    pub student_name: Option<String>,
    pub department: Option<String>,
    pub can_help_with: Option<String>,
    pub needs_help_with: Option<String>,
    pub notes: Option<String>,
}

/// Interest fields for both expressing interest and editing an entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InterestFieldsRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub preferred_time: Option<String>,
    pub preferred_location: Option<String>,
}

//=========================================================================================
// Conversions
//=========================================================================================

impl From<Interest> for InterestResponse {
    fn from(interest: Interest) -> Self {
        Self {
            id: interest.id,
            name: interest.name,
            email: interest.email,
            preferred_time: interest.preferred_time,
            preferred_location: interest.preferred_location,
            contact_date: interest.contact_date,
        }
    }
}

impl From<Swap> for SwapResponse {
    fn from(swap: Swap) -> Self {
        Self {
            id: swap.id,
            student_name: swap.student_name,
            department: swap.department,
            can_help_with: swap.can_help_with,
            needs_help_with: swap.needs_help_with,
            notes: swap.notes,
            posted_at: swap.posted_at,
            interested_users: swap
                .interested_users
                .into_iter()
                .map(InterestResponse::from)
                .collect(),
            revision: swap.revision,
        }
    }
}

impl From<SwapFieldsRequest> for NewSwap {
    fn from(req: SwapFieldsRequest) -> Self {
        Self {
            student_name: req.student_name,
            department: req.department,
            can_help_with: req.can_help_with,
            needs_help_with: req.needs_help_with,
            notes: req.notes,
        }
    }
}

impl From<SwapFieldsRequest> for SwapPatch {
    fn from(req: SwapFieldsRequest) -> Self {
        Self {
            student_name: req.student_name,
            department: req.department,
            can_help_with: req.can_help_with,
            needs_help_with: req.needs_help_with,
            notes: req.notes,
        }
    }
}

impl From<InterestFieldsRequest> for NewInterest {
    fn from(req: InterestFieldsRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            preferred_time: req.preferred_time,
            preferred_location: req.preferred_location,
        }
    }
}

impl From<InterestFieldsRequest> for InterestPatch {
    fn from(req: InterestFieldsRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            preferred_time: req.preferred_time,
            preferred_location: req.preferred_location,
        }
    }
}
