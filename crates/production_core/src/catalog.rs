use shared::{domain::ProductId, protocol::ProductRecord};
use tracing::{debug, info, warn};

use crate::{api::ProductionApi, error::ConsoleError, model::Product};

/// Identity of one catalog refresh. Only the most recently started refresh
/// may replace the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RefreshTicket(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied { count: usize },
    Failed { message: String },
    Stale,
}

/// In-memory product list. Replaced wholesale on every refresh; the only
/// local edit is removing a deleted product.
#[derive(Debug, Default)]
pub struct CatalogStore {
    products: Vec<Product>,
    issued_tickets: u64,
    pending: Option<RefreshTicket>,
    last_error: Option<String>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products,
            ..Self::default()
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.issued_tickets += 1;
        let ticket = RefreshTicket(self.issued_tickets);
        self.pending = Some(ticket);
        ticket
    }

    pub fn apply_refresh(
        &mut self,
        ticket: RefreshTicket,
        result: Result<Vec<ProductRecord>, ConsoleError>,
    ) -> RefreshOutcome {
        if self.pending != Some(ticket) {
            debug!(?ticket, latest = ?self.pending, "dropping superseded catalog refresh");
            return RefreshOutcome::Stale;
        }
        self.pending = None;

        match result {
            Ok(records) => {
                self.products = records.into_iter().map(Product::from_record).collect();
                self.last_error = None;
                info!(count = self.products.len(), "catalog refreshed");
                RefreshOutcome::Applied {
                    count: self.products.len(),
                }
            }
            Err(err) => {
                warn!("catalog refresh failed: {err}");
                let message = err.user_message();
                self.last_error = Some(message.clone());
                RefreshOutcome::Failed { message }
            }
        }
    }

    pub async fn refresh<A>(&mut self, api: &A) -> RefreshOutcome
    where
        A: ProductionApi + ?Sized,
    {
        let ticket = self.begin_refresh();
        let result = api.get_all_products().await;
        self.apply_refresh(ticket, result)
    }

    /// Removes one product by id, leaving the rest in place.
    pub fn remove(&mut self, id: &ProductId) -> bool {
        let before = self.products.len();
        self.products.retain(|product| &product.id != id);
        before != self.products.len()
    }
}

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod tests;
