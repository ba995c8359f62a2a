use std::{cmp::Ordering, collections::HashSet};

use shared::{
    domain::{Operation, ProductId},
    error::ErrorCode,
    protocol::{DeleteProductRequest, OperationReply},
};
use tracing::{info, warn};

use crate::{
    api::ProductionApi,
    catalog::CatalogStore,
    compat,
    dialog::ConfirmationDialog,
    error::{ConsoleError, ValidationError},
    matches_query,
    model::Product,
    ConsoleEvent, StatusMessage,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Name,
    MaxProduce,
    ProductionCost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            field: SortField::Name,
            direction: SortDirection::Ascending,
        }
    }
}

fn compare_products(a: &Product, b: &Product, field: SortField) -> Ordering {
    match field {
        SortField::Name => a
            .name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name)),
        SortField::MaxProduce => a.max_produce.cmp(&b.max_produce),
        SortField::ProductionCost => a.production_cost_total.total_cmp(&b.production_cost_total),
    }
}

pub fn interpret_delete_reply(reply: OperationReply) -> Result<(), ConsoleError> {
    if compat::is_delete_success(&reply) {
        Ok(())
    } else {
        Err(ConsoleError::remote(
            Operation::DeleteProduct,
            ErrorCode::Rejected,
            reply.server_message(),
        ))
    }
}

/// Product list view-model: search, sort, and per-row delete.
#[derive(Debug, Default)]
pub struct ProductBrowser {
    search: String,
    sort: SortState,
    pending_delete: Option<ProductId>,
    deleting: HashSet<ProductId>,
    status: Option<StatusMessage>,
}

impl ProductBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    pub fn sort(&self) -> SortState {
        self.sort
    }

    /// Same field flips direction; a new field starts ascending.
    pub fn toggle_sort(&mut self, field: SortField) {
        self.sort = if self.sort.field == field {
            SortState {
                field,
                direction: self.sort.direction.toggled(),
            }
        } else {
            SortState {
                field,
                direction: SortDirection::Ascending,
            }
        };
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    /// Filtered and sorted rows. The sort is stable, and descending order
    /// reverses the comparator, not the list, so ties keep catalog order.
    pub fn visible<'a>(&self, catalog: &'a CatalogStore) -> Vec<&'a Product> {
        let mut rows: Vec<&Product> = catalog
            .products()
            .iter()
            .filter(|product| matches_query(product, &self.search))
            .collect();
        let SortState { field, direction } = self.sort;
        match direction {
            SortDirection::Ascending => rows.sort_by(|a, b| compare_products(a, b, field)),
            SortDirection::Descending => rows.sort_by(|a, b| compare_products(b, a, field)),
        }
        rows
    }

    pub fn is_deleting(&self, id: &ProductId) -> bool {
        self.deleting.contains(id)
    }

    pub fn pending_delete(&self) -> Option<&ProductId> {
        self.pending_delete.as_ref()
    }

    /// Points the confirmation dialog at `id`. Other rows may still have a
    /// delete in flight; only a row that is itself being deleted is refused.
    pub fn request_delete(&mut self, id: ProductId) -> Result<(), ValidationError> {
        if self.deleting.contains(&id) {
            return Err(ValidationError::DeleteInFlight(id));
        }
        self.status = None;
        self.pending_delete = Some(id);
        Ok(())
    }

    pub fn cancel_delete(&mut self) {
        if let Some(id) = &self.pending_delete {
            if self.deleting.contains(id) {
                return;
            }
        }
        self.pending_delete = None;
    }

    pub fn delete_dialog(&self, catalog: &CatalogStore) -> ConfirmationDialog {
        let Some(id) = &self.pending_delete else {
            return ConfirmationDialog::closed();
        };
        let label = catalog
            .get(id)
            .map(|product| format!("{} ({})", product.name, product.id))
            .unwrap_or_else(|| id.to_string());
        ConfirmationDialog::new(
            true,
            "Delete product",
            format!("Delete {label}? This cannot be undone."),
            self.deleting.contains(id),
        )
    }

    pub fn begin_delete(&mut self, username: &str) -> Result<DeleteProductRequest, ValidationError> {
        let id = self
            .pending_delete
            .clone()
            .ok_or(ValidationError::NotConfirmed)?;
        if self.deleting.contains(&id) {
            return Err(ValidationError::DeleteInFlight(id));
        }
        let username = username.trim();
        if username.is_empty() {
            return Err(ValidationError::MissingUser);
        }

        info!(product_id = %id, "deleting product");
        self.deleting.insert(id.clone());
        Ok(DeleteProductRequest {
            product_id: id,
            username: username.to_string(),
        })
    }

    /// Applies a delete outcome. Success removes only that product from the
    /// in-memory catalog; failure leaves the list alone.
    pub fn finish_delete(
        &mut self,
        id: &ProductId,
        outcome: Result<(), ConsoleError>,
        catalog: &mut CatalogStore,
    ) -> Vec<ConsoleEvent> {
        self.deleting.remove(id);
        if self.pending_delete.as_ref() == Some(id) {
            self.pending_delete = None;
        }

        match outcome {
            Ok(()) => {
                catalog.remove(id);
                info!(product_id = %id, "product deleted");
                self.status = Some(StatusMessage::success(format!("Product {id} deleted")));
                vec![ConsoleEvent::ProductDeleted(id.clone())]
            }
            Err(err) => {
                warn!(product_id = %id, "delete failed: {err}");
                let message = err.user_message();
                self.status = Some(StatusMessage::error(message.clone()));
                vec![ConsoleEvent::Error(message)]
            }
        }
    }

    /// Run the confirmed delete end to end.
    pub async fn delete<A>(
        &mut self,
        api: &A,
        catalog: &mut CatalogStore,
        username: &str,
    ) -> Vec<ConsoleEvent>
    where
        A: ProductionApi + ?Sized,
    {
        let request = match self.begin_delete(username) {
            Ok(request) => request,
            Err(err) => {
                self.status = Some(StatusMessage::error(err.to_string()));
                return Vec::new();
            }
        };
        let id = request.product_id.clone();
        let outcome = match api.delete_product(request).await {
            Ok(reply) => interpret_delete_reply(reply),
            Err(err) => Err(err),
        };
        self.finish_delete(&id, outcome, catalog)
    }
}

#[cfg(test)]
#[path = "tests/browser_tests.rs"]
mod tests;
