//! services/api/src/adapters/memory.rs
//!
//! An in-process implementation of the `SwapStore` port. Used when no
//! database is configured and by the test suites.

use async_trait::async_trait;
use skill_swap_core::domain::Swap;
use skill_swap_core::ports::{PortError, PortResult, SwapStore};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Keeps every swap document in insertion order behind a single lock.
#[derive(Default)]
pub struct MemorySwapStore {
    swaps: RwLock<Vec<Swap>>,
}

impl MemorySwapStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SwapStore for MemorySwapStore {
    async fn list_swaps(&self) -> PortResult<Vec<Swap>> {
        let swaps = self.swaps.read().await;
        // Newest insertions first, so equal timestamps still list most recent first.
        let mut listed: Vec<Swap> = swaps.iter().rev().cloned().collect();
        listed.sort_by(|a, b| b.posted_at.cmp(&a.posted_at));
        Ok(listed)
    }

    async fn insert_swap(&self, swap: Swap) -> PortResult<Swap> {
        swap.check_invariants()?;
        let mut swaps = self.swaps.write().await;
        if swaps.iter().any(|s| s.id == swap.id) {
            return Err(PortError::Unexpected(format!(
                "Skill swap {} already exists",
                swap.id
            )));
        }
        swaps.push(swap.clone());
        Ok(swap)
    }

    async fn get_swap(&self, id: Uuid) -> PortResult<Swap> {
        self.swaps
            .read()
            .await
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| PortError::swap_not_found(id))
    }

    async fn replace_swap(&self, expected_revision: u64, mut swap: Swap) -> PortResult<Swap> {
        swap.check_invariants()?;
        let mut swaps = self.swaps.write().await;
        let stored = swaps
            .iter_mut()
            .find(|s| s.id == swap.id)
            .ok_or_else(|| PortError::swap_not_found(swap.id))?;

        if stored.revision != expected_revision {
            return Err(PortError::Conflict(format!(
                "Skill swap {} is at revision {}, expected {}",
                swap.id, stored.revision, expected_revision
            )));
        }

        swap.revision = expected_revision + 1;
        *stored = swap.clone();
        Ok(swap)
    }

    async fn delete_swap(&self, id: Uuid) -> PortResult<()> {
        let mut swaps = self.swaps.write().await;
        let position = swaps
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| PortError::swap_not_found(id))?;
        swaps.remove(position);
        Ok(())
    }
}
