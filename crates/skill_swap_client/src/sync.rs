//! crates/skill_swap_client/src/sync.rs
//!
//! `BoardView` keeps a client's copy of the swap list in step with the server.
//! The local list only ever changes to reflect something the server returned.

use tracing::{info, warn};
use uuid::Uuid;

use crate::api::{ClientResult, SwapApi};
use crate::model::{InterestFields, SwapDocument, SwapFields};

pub struct BoardView<A: SwapApi> {
    api: A,
    swaps: Vec<SwapDocument>,
}

impl<A: SwapApi> BoardView<A> {
    /// Starts with an empty view; call [`BoardView::refresh`] to load it.
    pub fn new(api: A) -> Self {
        Self {
            api,
            swaps: Vec::new(),
        }
    }

    pub fn swaps(&self) -> &[SwapDocument] {
        &self.swaps
    }

    pub fn find(&self, id: Uuid) -> Option<&SwapDocument> {
        self.swaps.iter().find(|swap| swap.id == id)
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Replaces the view with the server's current list.
    pub async fn refresh(&mut self) -> ClientResult<()> {
        let swaps = self.api.list_swaps().await.inspect_err(|e| {
            warn!("Refreshing the swap list failed: {}", e);
        })?;
        info!("Swap list refreshed ({} swaps)", swaps.len());
        self.swaps = swaps;
        Ok(())
    }

    pub async fn post_swap(&mut self, fields: &SwapFields) -> ClientResult<SwapDocument> {
        let created = self.api.create_swap(fields).await?;
        self.apply(created.clone());
        Ok(created)
    }

    pub async fn edit_swap(&mut self, id: Uuid, fields: &SwapFields) -> ClientResult<SwapDocument> {
        let updated = self.api.update_swap(id, fields).await?;
        self.apply(updated.clone());
        Ok(updated)
    }

    pub async fn express_interest(
        &mut self,
        id: Uuid,
        fields: &InterestFields,
    ) -> ClientResult<SwapDocument> {
        let updated = self.api.add_interest(id, fields).await?;
        self.apply(updated.clone());
        Ok(updated)
    }

    pub async fn edit_interest_at(
        &mut self,
        id: Uuid,
        index: usize,
        fields: &InterestFields,
    ) -> ClientResult<SwapDocument> {
        let updated = self.api.update_interest_at(id, index, fields).await?;
        self.apply(updated.clone());
        Ok(updated)
    }

    pub async fn edit_interest(
        &mut self,
        id: Uuid,
        interest_id: Uuid,
        fields: &InterestFields,
    ) -> ClientResult<SwapDocument> {
        let updated = self.api.update_interest(id, interest_id, fields).await?;
        self.apply(updated.clone());
        Ok(updated)
    }

    /// Deletes the swap, then reloads the whole list.
    pub async fn remove_swap(&mut self, id: Uuid) -> ClientResult<()> {
        self.api.delete_swap(id).await?;
        info!("Swap {} deleted; reloading list", id);
        self.refresh().await
    }

    pub async fn remove_interest_at(&mut self, id: Uuid, index: usize) -> ClientResult<()> {
        self.api.delete_interest_at(id, index).await?;
        self.refresh().await
    }

    pub async fn remove_interest(&mut self, id: Uuid, interest_id: Uuid) -> ClientResult<()> {
        self.api.delete_interest(id, interest_id).await?;
        self.refresh().await
    }

    /// Replaces the entry with the same id, or inserts it so that the list
    /// stays ordered by `posted_at` descending.
    fn apply(&mut self, document: SwapDocument) {
        if let Some(slot) = self.swaps.iter_mut().find(|swap| swap.id == document.id) {
            *slot = document;
            return;
        }
        let position = self
            .swaps
            .iter()
            .position(|swap| swap.posted_at <= document.posted_at)
            .unwrap_or(self.swaps.len());
        self.swaps.insert(position, document);
    }
}
