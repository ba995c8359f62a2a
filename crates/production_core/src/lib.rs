//! Headless client core for the production console: catalog store, the
//! production and undo workflows, product selector and browser view-models,
//! the confirmation dialog, and the persisted last-production cache.

use shared::domain::{ProductId, PushId};

pub mod api;
pub mod browser;
pub mod catalog;
pub mod compat;
pub mod config;
pub mod console;
pub mod dialog;
pub mod error;
pub mod model;
pub mod production;
pub mod result_cache;
pub mod selector;
pub mod undo;

#[cfg(test)]
pub(crate) mod test_support;

pub use api::{HttpProductionApi, ProductionApi};
pub use browser::{ProductBrowser, SortDirection, SortField, SortState};
pub use catalog::{CatalogStore, RefreshOutcome, RefreshTicket};
pub use config::{load_settings, Settings};
pub use console::ProductionConsole;
pub use dialog::{ConfirmationDialog, DialogAction, DialogView};
pub use error::{ConsoleError, QuantityError, ValidationError};
pub use model::{CostComponents, CostPreview, MaterialRequirement, Product, ProductionResult};
pub use production::ProductionForm;
pub use result_cache::{FileStore, LocalStore, MemoryStore, ProductionResultCache, ResultSlot};
pub use selector::{ProductSelector, SelectorOption};
pub use undo::UndoWorkflow;

/// Notifications raised by the workflows. The console broadcasts them so the
/// surrounding shell (inventory view, status bar) can react.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleEvent {
    CatalogRefreshed { count: usize },
    CatalogRefreshRequested,
    InventoryRefreshRequested,
    ProductionRecorded(ProductionResult),
    ProductionUndone { push_id: PushId },
    ProductDeleted(ProductId),
    Error(String),
}

/// In-flight state of a single kind of action. Validation happens
/// synchronously inside `begin_*`, so it never shows up as a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionPhase {
    #[default]
    Idle,
    Submitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

/// Inline message shown next to the control that triggered it. It stays
/// until the next attempt replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == StatusKind::Error
    }
}

/// Case-insensitive substring match on product name or id. An empty (or
/// all-whitespace) query matches everything.
pub fn matches_query(product: &Product, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    product.name.to_lowercase().contains(&needle)
        || product.id.as_str().to_lowercase().contains(&needle)
}
