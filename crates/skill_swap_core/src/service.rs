//! crates/skill_swap_core/src/service.rs
//!
//! The swap board service: every store operation the HTTP layer exposes,
//! built on top of a `SwapStore` port.
//!
//! All mutations are read-modify-write cycles guarded by the document
//! revision. A cycle that loses a race is replayed against the fresh document
//! up to `mutation_attempts` times before the conflict surfaces.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{Interest, InterestPatch, NewInterest, NewSwap, Swap, SwapPatch};
use crate::ports::{Clock, PortError, PortResult, SwapStore};

/// Number of read-modify-write cycles attempted before a conflict is reported.
pub const DEFAULT_MUTATION_ATTEMPTS: usize = 3;

#[derive(Clone)]
pub struct SwapBoard {
    store: Arc<dyn SwapStore>,
    clock: Arc<dyn Clock>,
    mutation_attempts: usize,
}

impl SwapBoard {
    pub fn new(store: Arc<dyn SwapStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            mutation_attempts: DEFAULT_MUTATION_ATTEMPTS,
        }
    }

    /// Overrides the replay budget. At least one attempt is always made.
    pub fn with_mutation_attempts(mut self, attempts: usize) -> Self {
        self.mutation_attempts = attempts.max(1);
        self
    }

    pub async fn list_swaps(&self) -> PortResult<Vec<Swap>> {
        self.store.list_swaps().await
    }

    pub async fn create_swap(&self, fields: NewSwap) -> PortResult<Swap> {
        let swap = Swap::create(fields, self.clock.now())?;
        let swap = self.store.insert_swap(swap).await?;
        info!(swap_id = %swap.id, "Created skill swap");
        Ok(swap)
    }

    pub async fn get_swap(&self, id: Uuid) -> PortResult<Swap> {
        self.store.get_swap(id).await
    }

    pub async fn update_swap(&self, id: Uuid, patch: SwapPatch) -> PortResult<Swap> {
        let swap = self
            .mutate(id, |swap| {
                swap.apply_patch(&patch);
                Ok(())
            })
            .await?;
        info!(swap_id = %id, "Updated skill swap");
        Ok(swap)
    }

    pub async fn delete_swap(&self, id: Uuid) -> PortResult<()> {
        self.store.delete_swap(id).await?;
        info!(swap_id = %id, "Deleted skill swap");
        Ok(())
    }

    /// Validates the interest before looking up the swap, so a bad payload is
    /// reported even when the swap does not exist.
    pub async fn append_interest(&self, id: Uuid, fields: NewInterest) -> PortResult<Swap> {
        let interest = Interest::create(fields, self.clock.now())?;
        let interest_id = interest.id;
        let swap = self
            .mutate(id, |swap| {
                swap.push_interest(interest.clone());
                Ok(())
            })
            .await?;
        info!(swap_id = %id, %interest_id, "Added interested user");
        Ok(swap)
    }

    pub async fn update_interest_at(
        &self,
        id: Uuid,
        index: usize,
        patch: InterestPatch,
    ) -> PortResult<Swap> {
        let swap = self
            .mutate(id, |swap| {
                swap.interest_at_mut(index)?.apply_patch(&patch);
                Ok(())
            })
            .await?;
        info!(swap_id = %id, index, "Updated interested user");
        Ok(swap)
    }

    pub async fn delete_interest_at(&self, id: Uuid, index: usize) -> PortResult<Swap> {
        let swap = self
            .mutate(id, |swap| swap.remove_interest_at(index).map(|_| ()))
            .await?;
        info!(swap_id = %id, index, "Removed interested user");
        Ok(swap)
    }

    pub async fn update_interest(
        &self,
        id: Uuid,
        interest_id: Uuid,
        patch: InterestPatch,
    ) -> PortResult<Swap> {
        let swap = self
            .mutate(id, |swap| {
                let index = swap.position_of(interest_id)?;
                swap.interest_at_mut(index)?.apply_patch(&patch);
                Ok(())
            })
            .await?;
        info!(swap_id = %id, %interest_id, "Updated interested user");
        Ok(swap)
    }

    pub async fn delete_interest(&self, id: Uuid, interest_id: Uuid) -> PortResult<Swap> {
        let swap = self
            .mutate(id, |swap| {
                let index = swap.position_of(interest_id)?;
                swap.remove_interest_at(index).map(|_| ())
            })
            .await?;
        info!(swap_id = %id, %interest_id, "Removed interested user");
        Ok(swap)
    }

    async fn mutate<F>(&self, id: Uuid, mut mutation: F) -> PortResult<Swap>
    where
        F: FnMut(&mut Swap) -> PortResult<()> + Send,
    {
        let mut attempt = 1;
        loop {
            let mut swap = self.store.get_swap(id).await?;
            let expected_revision = swap.revision;
            mutation(&mut swap)?;
            swap.check_invariants()?;

            match self.store.replace_swap(expected_revision, swap).await {
                Err(PortError::Conflict(reason)) if attempt < self.mutation_attempts => {
                    warn!(
                        swap_id = %id,
                        attempt,
                        "Revision conflict, replaying mutation: {}",
                        reason
                    );
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}
