use shared::{
    domain::{Operation, ProductId},
    error::ErrorCode,
    protocol::{OperationReply, PushToProductionRequest},
};
use tracing::{info, warn};

use crate::{
    api::ProductionApi,
    catalog::CatalogStore,
    compat,
    error::{ConsoleError, QuantityError, ValidationError},
    model::{CostPreview, ProductionResult},
    result_cache::{LocalStore, ResultSlot},
    selector::ProductSelector,
    ActionPhase, ConsoleEvent, StatusMessage,
};

/// Parses the free-text quantity. It must be a whole number between 1 and
/// `max_produce` inclusive.
pub fn validate_quantity(input: &str, max_produce: u64) -> Result<u64, QuantityError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(QuantityError::Empty);
    }
    let value: i64 = trimmed.parse().map_err(|_| QuantityError::NotANumber)?;
    if value < 1 {
        return Err(QuantityError::BelowMinimum);
    }
    let requested = value as u64;
    if requested > max_produce {
        return Err(QuantityError::ExceedsMaximum {
            requested,
            max: max_produce,
        });
    }
    Ok(requested)
}

/// Turns a push reply into a result, or into a remote error carrying the
/// server's message.
pub fn interpret_push_reply(
    reply: OperationReply,
    request: &PushToProductionRequest,
) -> Result<ProductionResult, ConsoleError> {
    compat::push_result(&reply, request).ok_or_else(|| {
        ConsoleError::remote(
            Operation::PushToProduction,
            ErrorCode::Rejected,
            reply.server_message(),
        )
    })
}

#[derive(Debug, Clone)]
struct PendingSubmission {
    product_id: ProductId,
    product_name: String,
}

/// Production form controller: product choice, quantity input, derived cost
/// figures and the submit transition.
#[derive(Debug, Default)]
pub struct ProductionForm {
    selector: ProductSelector,
    quantity_input: String,
    phase: ActionPhase,
    pending: Option<PendingSubmission>,
    status: Option<StatusMessage>,
}

impl ProductionForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selector(&self) -> &ProductSelector {
        &self.selector
    }

    pub fn selector_mut(&mut self) -> &mut ProductSelector {
        &mut self.selector
    }

    pub fn quantity_input(&self) -> &str {
        &self.quantity_input
    }

    pub fn set_quantity_input(&mut self, input: impl Into<String>) {
        self.quantity_input = input.into();
    }

    pub fn phase(&self) -> ActionPhase {
        self.phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == ActionPhase::Submitting
    }

    /// The submit control is live only while idle and with a product chosen.
    pub fn can_submit(&self, catalog: &CatalogStore) -> bool {
        !self.is_submitting() && self.selector.selected_product(catalog).is_some()
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    /// Figures shown before submitting. `None` until both a product and a
    /// positive whole quantity are present; the stock limit is not applied
    /// here so the user still sees what an oversized request would cost.
    pub fn cost_preview(&self, catalog: &CatalogStore) -> Option<CostPreview> {
        let product = self.selector.selected_product(catalog)?;
        let quantity = validate_quantity(&self.quantity_input, u64::MAX).ok()?;
        Some(CostPreview::new(&product.costs, quantity))
    }

    pub fn begin_submit(
        &mut self,
        catalog: &CatalogStore,
        username: &str,
    ) -> Result<PushToProductionRequest, ValidationError> {
        if self.is_submitting() {
            return Err(ValidationError::AlreadySubmitting);
        }
        match self.validate(catalog, username) {
            Ok((request, pending)) => {
                info!(
                    product_id = %request.product_id,
                    quantity = request.quantity,
                    unit_cost = request.production_cost_per_unit,
                    "submitting production"
                );
                self.phase = ActionPhase::Submitting;
                self.pending = Some(pending);
                self.status = None;
                Ok(request)
            }
            Err(err) => {
                self.status = Some(StatusMessage::error(err.to_string()));
                Err(err)
            }
        }
    }

    fn validate(
        &self,
        catalog: &CatalogStore,
        username: &str,
    ) -> Result<(PushToProductionRequest, PendingSubmission), ValidationError> {
        let product_id = self
            .selector
            .selected()
            .ok_or(ValidationError::NoProductSelected)?;
        let product = catalog
            .get(product_id)
            .ok_or_else(|| ValidationError::UnknownProduct(product_id.clone()))?;
        let quantity = validate_quantity(&self.quantity_input, product.max_produce)?;
        let username = username.trim();
        if username.is_empty() {
            return Err(ValidationError::MissingUser);
        }

        Ok((
            PushToProductionRequest {
                product_id: product.id.clone(),
                quantity,
                username: username.to_string(),
                production_cost_per_unit: product.unit_cost(),
            },
            PendingSubmission {
                product_id: product.id.clone(),
                product_name: product.name.clone(),
            },
        ))
    }

    pub fn finish_submit<S: LocalStore>(
        &mut self,
        outcome: Result<ProductionResult, ConsoleError>,
        results: &mut ResultSlot<S>,
    ) -> Vec<ConsoleEvent> {
        self.phase = ActionPhase::Idle;
        let pending = self.pending.take();

        match outcome {
            Ok(result) => {
                let product_label = pending
                    .filter(|pending| pending.product_id == result.product_id)
                    .map(|pending| pending.product_name)
                    .unwrap_or_else(|| result.product_id.to_string());
                info!(
                    push_id = %result.push_id,
                    quantity = result.quantity_produced,
                    total = result.total_production_cost,
                    "production recorded"
                );
                self.status = Some(StatusMessage::success(format!(
                    "Produced {} unit(s) of {}. Total cost: {:.2}",
                    result.quantity_produced, product_label, result.total_production_cost
                )));
                self.quantity_input.clear();
                results.set(result.clone());
                vec![
                    ConsoleEvent::CatalogRefreshRequested,
                    ConsoleEvent::InventoryRefreshRequested,
                    ConsoleEvent::ProductionRecorded(result),
                ]
            }
            Err(err) => {
                warn!("production submission failed: {err}");
                let message = err.user_message();
                self.status = Some(StatusMessage::error(message.clone()));
                vec![ConsoleEvent::Error(message)]
            }
        }
    }

    /// Validate, call the endpoint, and apply the outcome. Local rejections
    /// return no events and leave the error in [`Self::status`].
    pub async fn submit<A, S>(
        &mut self,
        api: &A,
        catalog: &CatalogStore,
        username: &str,
        results: &mut ResultSlot<S>,
    ) -> Vec<ConsoleEvent>
    where
        A: ProductionApi + ?Sized,
        S: LocalStore,
    {
        let Ok(request) = self.begin_submit(catalog, username) else {
            return Vec::new();
        };
        let outcome = match api.push_to_production(request.clone()).await {
            Ok(reply) => interpret_push_reply(reply, &request),
            Err(err) => Err(err),
        };
        self.finish_submit(outcome, results)
    }
}

#[cfg(test)]
#[path = "tests/production_tests.rs"]
mod tests;
