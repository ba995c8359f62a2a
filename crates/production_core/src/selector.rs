use shared::domain::ProductId;

use crate::{catalog::CatalogStore, error::ValidationError, matches_query, model::Product};

pub const INSUFFICIENT_STOCK_REASON: &str = "Insufficient stock";

/// Search-and-dropdown product picker used by the production form.
#[derive(Debug, Clone, Default)]
pub struct ProductSelector {
    open: bool,
    query: String,
    selected: Option<ProductId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectorOption<'a> {
    pub product: &'a Product,
    pub enabled: bool,
    pub disabled_reason: Option<&'static str>,
}

impl ProductSelector {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn selected(&self) -> Option<&ProductId> {
        self.selected.as_ref()
    }

    pub fn selected_product<'a>(&self, catalog: &'a CatalogStore) -> Option<&'a Product> {
        self.selected.as_ref().and_then(|id| catalog.get(id))
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    /// Any pointer or focus interaction outside the selector's bounds.
    pub fn interaction_outside(&mut self) {
        self.close();
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.open = true;
    }

    pub fn options<'a>(&self, catalog: &'a CatalogStore) -> Vec<SelectorOption<'a>> {
        catalog
            .products()
            .iter()
            .filter(|product| matches_query(product, &self.query))
            .map(|product| {
                let enabled = product.is_producible();
                SelectorOption {
                    product,
                    enabled,
                    disabled_reason: (!enabled).then_some(INSUFFICIENT_STOCK_REASON),
                }
            })
            .collect()
    }

    pub fn select(&mut self, id: &ProductId, catalog: &CatalogStore) -> Result<(), ValidationError> {
        let product = catalog
            .get(id)
            .ok_or_else(|| ValidationError::UnknownProduct(id.clone()))?;
        if !product.is_producible() {
            return Err(ValidationError::ProductUnavailable(id.clone()));
        }
        self.selected = Some(id.clone());
        self.query.clear();
        self.open = false;
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }
}

#[cfg(test)]
#[path = "tests/selector_tests.rs"]
mod tests;
