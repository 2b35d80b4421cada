//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `SwapStore` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.
//!
//! Each swap is one row; its interested users are embedded in a JSONB array
//! column rather than a separate table, so a swap is always written whole.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skill_swap_core::domain::{Interest, Swap};
use skill_swap_core::ports::{PortError, PortResult, SwapStore};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

const SWAP_COLUMNS: &str = "id, student_name, department, can_help_with, needs_help_with, \
     notes, posted_at, interested_users, revision";

// Ties on `posted_at` list the later insertion first.
const LIST_ORDER: &str = "ORDER BY posted_at DESC, insert_seq DESC";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `SwapStore` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct SwapRecord {
    id: Uuid,
    student_name: String,
    department: String,
    can_help_with: String,
    needs_help_with: String,
    notes: String,
    posted_at: DateTime<Utc>,
    interested_users: Json<Vec<InterestRecord>>,
    revision: i64,
}

impl SwapRecord {
    fn into_domain(self) -> PortResult<Swap> {
        let revision = u64::try_from(self.revision).map_err(|e| {
            PortError::Unexpected(format!("Swap {} has a negative revision: {}", self.id, e))
        })?;
        Ok(Swap {
            id: self.id,
            student_name: self.student_name,
            department: self.department,
            can_help_with: self.can_help_with,
            needs_help_with: self.needs_help_with,
            notes: self.notes,
            posted_at: self.posted_at,
            interested_users: self
                .interested_users
                .0
                .into_iter()
                .map(InterestRecord::into_domain)
                .collect(),
            revision,
        })
    }
}

/// The JSON shape of one element of the `interested_users` column.
#[derive(Serialize, Deserialize)]
struct InterestRecord {
    id: Uuid,
    name: String,
    email: String,
    preferred_time: String,
    preferred_location: String,
    contact_date: DateTime<Utc>,
}

impl InterestRecord {
    fn from_domain(interest: &Interest) -> Self {
        Self {
            id: interest.id,
            name: interest.name.clone(),
            email: interest.email.clone(),
            preferred_time: interest.preferred_time.clone(),
            preferred_location: interest.preferred_location.clone(),
            contact_date: interest.contact_date,
        }
    }

    fn into_domain(self) -> Interest {
        Interest {
            id: self.id,
            name: self.name,
            email: self.email,
            preferred_time: self.preferred_time,
            preferred_location: self.preferred_location,
            contact_date: self.contact_date,
        }
    }
}

fn interests_column(swap: &Swap) -> Json<Vec<InterestRecord>> {
    Json(
        swap.interested_users
            .iter()
            .map(InterestRecord::from_domain)
            .collect(),
    )
}

fn to_db_revision(revision: u64) -> PortResult<i64> {
    i64::try_from(revision)
        .map_err(|e| PortError::Unexpected(format!("Revision {} out of range: {}", revision, e)))
}

fn list_swaps_sql() -> String {
    format!("SELECT {} FROM swaps {}", SWAP_COLUMNS, LIST_ORDER)
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

//=========================================================================================
// `SwapStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl SwapStore for DbAdapter {
    async fn list_swaps(&self) -> PortResult<Vec<Swap>> {
        let records = sqlx::query_as::<_, SwapRecord>(&list_swaps_sql())
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;

        records.into_iter().map(SwapRecord::into_domain).collect()
    }

    async fn insert_swap(&self, swap: Swap) -> PortResult<Swap> {
        swap.check_invariants()?;
        let record = sqlx::query_as::<_, SwapRecord>(&format!(
            "INSERT INTO swaps ({cols}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {cols}",
            cols = SWAP_COLUMNS
        ))
        .bind(swap.id)
        .bind(&swap.student_name)
        .bind(&swap.department)
        .bind(&swap.can_help_with)
        .bind(&swap.needs_help_with)
        .bind(&swap.notes)
        .bind(swap.posted_at)
        .bind(interests_column(&swap))
        .bind(to_db_revision(swap.revision)?)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;

        record.into_domain()
    }

    async fn get_swap(&self, id: Uuid) -> PortResult<Swap> {
        let record = sqlx::query_as::<_, SwapRecord>(&format!(
            "SELECT {} FROM swaps WHERE id = $1",
            SWAP_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| PortError::swap_not_found(id))?;

        record.into_domain()
    }

    async fn replace_swap(&self, expected_revision: u64, swap: Swap) -> PortResult<Swap> {
        swap.check_invariants()?;
        let expected = to_db_revision(expected_revision)?;

        // The revision predicate makes the whole-document write conditional.
        let updated = sqlx::query_as::<_, SwapRecord>(&format!(
            "UPDATE swaps SET student_name = $3, department = $4, can_help_with = $5, \
             needs_help_with = $6, notes = $7, interested_users = $8, revision = revision + 1 \
             WHERE id = $1 AND revision = $2 RETURNING {}",
            SWAP_COLUMNS
        ))
        .bind(swap.id)
        .bind(expected)
        .bind(&swap.student_name)
        .bind(&swap.department)
        .bind(&swap.can_help_with)
        .bind(&swap.needs_help_with)
        .bind(&swap.notes)
        .bind(interests_column(&swap))
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;

        if let Some(record) = updated {
            return record.into_domain();
        }

        let current: Option<i64> = sqlx::query_scalar("SELECT revision FROM swaps WHERE id = $1")
            .bind(swap.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?;

        match current {
            None => Err(PortError::swap_not_found(swap.id)),
            Some(revision) => Err(PortError::Conflict(format!(
                "Skill swap {} is at revision {}, expected {}",
                swap.id, revision, expected_revision
            ))),
        }
    }

    async fn delete_swap(&self, id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM swaps WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(PortError::swap_not_found(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_breaks_timestamp_ties_by_insertion_order() {
        let sql = list_swaps_sql();
        assert!(sql.ends_with("ORDER BY posted_at DESC, insert_seq DESC"));
        assert!(!SWAP_COLUMNS.contains("insert_seq"));
    }

    #[test]
    fn negative_revision_is_rejected() {
        let record = SwapRecord {
            id: Uuid::new_v4(),
            student_name: "A".to_string(),
            department: "CS".to_string(),
            can_help_with: "X".to_string(),
            needs_help_with: "Y".to_string(),
            notes: String::new(),
            posted_at: Utc::now(),
            interested_users: Json(Vec::new()),
            revision: -1,
        };
        assert!(matches!(record.into_domain(), Err(PortError::Unexpected(_))));
    }
}
