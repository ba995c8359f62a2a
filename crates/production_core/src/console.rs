use shared::domain::ProductId;
use tokio::sync::broadcast;
use tracing::debug;

use crate::{
    api::ProductionApi,
    browser::ProductBrowser,
    catalog::{CatalogStore, RefreshOutcome},
    error::ValidationError,
    model::ProductionResult,
    production::ProductionForm,
    result_cache::{LocalStore, ProductionResultCache, ResultSlot},
    undo::UndoWorkflow,
    ConsoleEvent,
};

/// Everything the production screen owns, wired to one endpoint and one
/// local store. Workflow events are broadcast to subscribers after the
/// console has reacted to them (catalog refresh, clearing stale messages).
pub struct ProductionConsole<A: ProductionApi, S: LocalStore> {
    api: A,
    username: String,
    catalog: CatalogStore,
    form: ProductionForm,
    undo: UndoWorkflow,
    browser: ProductBrowser,
    results: ResultSlot<S>,
    events: broadcast::Sender<ConsoleEvent>,
}

impl<A: ProductionApi, S: LocalStore> ProductionConsole<A, S> {
    pub fn new(api: A, store: S, username: impl Into<String>) -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            api,
            username: username.into(),
            catalog: CatalogStore::new(),
            form: ProductionForm::new(),
            undo: UndoWorkflow::new(),
            browser: ProductBrowser::new(),
            results: ResultSlot::restore(ProductionResultCache::new(store)),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ConsoleEvent> {
        self.events.subscribe()
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub fn form(&self) -> &ProductionForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ProductionForm {
        &mut self.form
    }

    pub fn undo(&self) -> &UndoWorkflow {
        &self.undo
    }

    pub fn browser(&self) -> &ProductBrowser {
        &self.browser
    }

    pub fn browser_mut(&mut self) -> &mut ProductBrowser {
        &mut self.browser
    }

    pub fn last_result(&self) -> Option<&ProductionResult> {
        self.results.current()
    }

    pub fn select_product(&mut self, id: &ProductId) -> Result<(), ValidationError> {
        self.form.selector_mut().select(id, &self.catalog)
    }

    pub fn set_quantity(&mut self, input: impl Into<String>) {
        self.form.set_quantity_input(input);
    }

    pub fn request_delete(&mut self, id: &ProductId) -> Result<(), ValidationError> {
        if self.catalog.get(id).is_none() {
            return Err(ValidationError::UnknownProduct(id.clone()));
        }
        self.browser.request_delete(id.clone())
    }

    pub fn can_undo(&self) -> bool {
        self.undo.can_undo(self.results.current())
    }

    pub fn request_undo(&mut self) -> bool {
        self.undo.request(self.results.current())
    }

    pub fn cancel_undo(&mut self) {
        self.undo.cancel();
    }

    pub async fn refresh_catalog(&mut self) -> RefreshOutcome {
        let outcome = self.catalog.refresh(&self.api).await;
        match &outcome {
            RefreshOutcome::Applied { count } => {
                let _ = self
                    .events
                    .send(ConsoleEvent::CatalogRefreshed { count: *count });
            }
            RefreshOutcome::Failed { message } => {
                let _ = self.events.send(ConsoleEvent::Error(message.clone()));
            }
            RefreshOutcome::Stale => {}
        }
        outcome
    }

    pub async fn submit_production(&mut self) -> Vec<ConsoleEvent> {
        let events = self
            .form
            .submit(&self.api, &self.catalog, &self.username, &mut self.results)
            .await;
        self.dispatch(&events).await;
        events
    }

    pub async fn undo_last(&mut self) -> Vec<ConsoleEvent> {
        let events = self
            .undo
            .undo(&self.api, &self.username, &mut self.results)
            .await;
        self.dispatch(&events).await;
        events
    }

    pub async fn delete_pending(&mut self) -> Vec<ConsoleEvent> {
        let events = self
            .browser
            .delete(&self.api, &mut self.catalog, &self.username)
            .await;
        self.dispatch(&events).await;
        events
    }

    async fn dispatch(&mut self, events: &[ConsoleEvent]) {
        for event in events {
            match event {
                ConsoleEvent::CatalogRefreshRequested => {
                    self.refresh_catalog().await;
                }
                ConsoleEvent::ProductionUndone { .. } => self.form.clear_status(),
                _ => {}
            }
            debug!(?event, "broadcasting console event");
            let _ = self.events.send(event.clone());
        }
    }
}

#[cfg(test)]
#[path = "tests/console_tests.rs"]
mod tests;
