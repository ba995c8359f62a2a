//! Success-shape recognition for the mutating operations.
//!
//! The endpoint answers the same operation with more than one success body
//! depending on which handler served it. Everything that knows about those
//! variants lives here so it can be narrowed once the backend settles on one
//! contract.

use shared::protocol::{OperationReply, PushToProductionRequest};

use crate::model::ProductionResult;

pub const SUCCESS_STATUS: &str = "success";
pub const PUSH_SUCCESS_MESSAGE: &str = "Product pushed to production successfully";
pub const UNDO_SUCCESS_FRAGMENT: &str = "undone successfully";
pub const DELETE_SUCCESS_FRAGMENT: &str = "deleted successfully";

fn has_success_status(reply: &OperationReply) -> bool {
    reply
        .status
        .as_deref()
        .is_some_and(|status| status.trim().eq_ignore_ascii_case(SUCCESS_STATUS))
}

fn message_contains(reply: &OperationReply, fragment: &str) -> bool {
    reply
        .message
        .as_deref()
        .is_some_and(|message| message.to_lowercase().contains(fragment))
}

/// Builds the production result from a push reply, or `None` when the reply
/// is not a recognised success. Fields the server omitted are taken from the
/// request that produced it.
pub fn push_result(
    reply: &OperationReply,
    request: &PushToProductionRequest,
) -> Option<ProductionResult> {
    let success = has_success_status(reply)
        || reply
            .message
            .as_deref()
            .is_some_and(|message| message.trim() == PUSH_SUCCESS_MESSAGE);
    if !success {
        return None;
    }

    let push_id = reply
        .push_id
        .clone()
        .filter(|push_id| !push_id.as_str().trim().is_empty())?;
    let quantity_produced = reply.quantity_produced.unwrap_or(request.quantity);
    let total_production_cost = reply
        .total_production_cost
        .filter(|total| total.is_finite())
        .unwrap_or(request.production_cost_per_unit * quantity_produced as f64);

    Some(ProductionResult {
        push_id,
        product_id: reply
            .product_id
            .clone()
            .unwrap_or_else(|| request.product_id.clone()),
        quantity_produced,
        total_production_cost,
    })
}

pub fn is_undo_success(reply: &OperationReply) -> bool {
    has_success_status(reply) || message_contains(reply, UNDO_SUCCESS_FRAGMENT)
}

pub fn is_delete_success(reply: &OperationReply) -> bool {
    message_contains(reply, DELETE_SUCCESS_FRAGMENT)
}
