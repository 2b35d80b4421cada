//! crates/skill_swap_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the document store actually holding the swaps.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Swap, ValidationError};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Invalid user index {index}: swap has {len} interested users")]
    InvalidIndex { index: usize, len: usize },
    #[error("Interested user {0} not found")]
    InterestNotFound(Uuid),
    /// The stored revision moved between read and write.
    #[error("Write conflict: {0}")]
    Conflict(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

impl PortError {
    pub fn swap_not_found(id: Uuid) -> Self {
        PortError::NotFound(format!("Skill swap {} not found", id))
    }
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// One collection of swap documents, each embedding its interest list.
#[async_trait]
pub trait SwapStore: Send + Sync {
    /// All swaps, most recently posted first.
    async fn list_swaps(&self) -> PortResult<Vec<Swap>>;

    async fn insert_swap(&self, swap: Swap) -> PortResult<Swap>;

    async fn get_swap(&self, id: Uuid) -> PortResult<Swap>;

    /// Writes the whole document if the stored revision still equals
    /// `expected_revision`, storing it as `expected_revision + 1`.
    ///
    /// Fails with `NotFound` if the swap is gone and `Conflict` if another
    /// writer got there first.
    async fn replace_swap(&self, expected_revision: u64, swap: Swap) -> PortResult<Swap>;

    /// Removes the swap together with its embedded interests.
    async fn delete_swap(&self, id: Uuid) -> PortResult<()>;
}

/// Source of creation timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
