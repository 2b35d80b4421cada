//! crates/skill_swap_client/src/session.rs
//!
//! Who is using the board right now, and what they may touch. These checks
//! only gate what a client offers; the server does not enforce ownership.

use crate::model::SwapDocument;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    /// The display name the user posts under. `None` until they pick one.
    pub current_user: Option<String>,
    pub admin_mode: bool,
}

impl SessionContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn as_user(name: impl Into<String>) -> Self {
        Self {
            current_user: Some(name.into()),
            admin_mode: false,
        }
    }

    pub fn as_admin() -> Self {
        Self {
            current_user: None,
            admin_mode: true,
        }
    }

    /// A swap belongs to whoever posted it under the same student name.
    pub fn is_owner(&self, swap: &SwapDocument) -> bool {
        match &self.current_user {
            Some(name) => !name.trim().is_empty() && name.trim() == swap.student_name.trim(),
            None => false,
        }
    }

    pub fn can_edit(&self, swap: &SwapDocument) -> bool {
        self.admin_mode || self.is_owner(swap)
    }

    /// Removing other people's interest entries is an admin action.
    pub fn can_moderate(&self) -> bool {
        self.admin_mode
    }
}
