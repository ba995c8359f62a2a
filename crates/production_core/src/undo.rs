use shared::{
    domain::{Operation, PushId},
    error::ErrorCode,
    protocol::{OperationReply, UndoProductionRequest},
};
use tracing::{info, warn};

use crate::{
    api::ProductionApi,
    compat,
    dialog::ConfirmationDialog,
    error::{ConsoleError, ValidationError},
    model::ProductionResult,
    result_cache::{LocalStore, ResultSlot},
    ActionPhase, ConsoleEvent, StatusMessage,
};

pub fn interpret_undo_reply(reply: OperationReply) -> Result<(), ConsoleError> {
    if compat::is_undo_success(&reply) {
        Ok(())
    } else {
        Err(ConsoleError::remote(
            Operation::UndoProduction,
            ErrorCode::Rejected,
            reply.server_message(),
        ))
    }
}

fn undoable(current: Option<&ProductionResult>) -> Option<&ProductionResult> {
    current.filter(|result| !result.push_id.as_str().trim().is_empty())
}

/// Reverses the most recent production behind a confirmation step. Its
/// in-flight flag is separate from the submission flag.
#[derive(Debug, Default)]
pub struct UndoWorkflow {
    confirm_open: bool,
    phase: ActionPhase,
    pending: Option<PushId>,
    status: Option<StatusMessage>,
}

impl UndoWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn can_undo(&self, current: Option<&ProductionResult>) -> bool {
        self.phase == ActionPhase::Idle && undoable(current).is_some()
    }

    pub fn is_undoing(&self) -> bool {
        self.phase == ActionPhase::Submitting
    }

    pub fn is_confirming(&self) -> bool {
        self.confirm_open
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    /// Opens the confirmation step. Returns false when there is nothing to
    /// undo.
    pub fn request(&mut self, current: Option<&ProductionResult>) -> bool {
        if !self.can_undo(current) {
            return false;
        }
        self.confirm_open = true;
        self.status = None;
        true
    }

    pub fn cancel(&mut self) {
        if !self.is_undoing() {
            self.confirm_open = false;
        }
    }

    pub fn dialog(&self, current: Option<&ProductionResult>) -> ConfirmationDialog {
        let message = match current {
            Some(result) => format!(
                "Undo production {} ({} unit(s) of {})? The consumed materials will be returned to stock.",
                result.push_id, result.quantity_produced, result.product_id
            ),
            None => "Undo the last production?".to_string(),
        };
        ConfirmationDialog::new(
            self.confirm_open,
            "Undo production",
            message,
            self.is_undoing(),
        )
    }

    pub fn begin_undo(
        &mut self,
        current: Option<&ProductionResult>,
        username: &str,
    ) -> Result<UndoProductionRequest, ValidationError> {
        if self.is_undoing() {
            return Err(ValidationError::UndoInFlight);
        }
        let result = undoable(current).ok_or(ValidationError::NothingToUndo)?;
        if !self.confirm_open {
            return Err(ValidationError::NotConfirmed);
        }
        let username = username.trim();
        if username.is_empty() {
            return Err(ValidationError::MissingUser);
        }

        info!(push_id = %result.push_id, "undoing production");
        self.phase = ActionPhase::Submitting;
        self.pending = Some(result.push_id.clone());
        Ok(UndoProductionRequest {
            push_id: result.push_id.clone(),
            username: username.to_string(),
        })
    }

    pub fn finish_undo<S: LocalStore>(
        &mut self,
        outcome: Result<(), ConsoleError>,
        results: &mut ResultSlot<S>,
    ) -> Vec<ConsoleEvent> {
        self.phase = ActionPhase::Idle;
        self.confirm_open = false;
        let Some(push_id) = self.pending.take() else {
            return Vec::new();
        };

        match outcome {
            Ok(()) => {
                info!(%push_id, "production undone");
                if results.current().map(|result| &result.push_id) == Some(&push_id) {
                    results.clear();
                }
                self.status = Some(StatusMessage::success(format!(
                    "Production {push_id} undone"
                )));
                vec![
                    ConsoleEvent::CatalogRefreshRequested,
                    ConsoleEvent::InventoryRefreshRequested,
                    ConsoleEvent::ProductionUndone { push_id },
                ]
            }
            Err(err) => {
                warn!(%push_id, "undo failed: {err}");
                let message = err.user_message();
                self.status = Some(StatusMessage::error(message.clone()));
                vec![ConsoleEvent::Error(message)]
            }
        }
    }

    /// Run a confirmed undo end to end.
    pub async fn undo<A, S>(
        &mut self,
        api: &A,
        username: &str,
        results: &mut ResultSlot<S>,
    ) -> Vec<ConsoleEvent>
    where
        A: ProductionApi + ?Sized,
        S: LocalStore,
    {
        let request = match self.begin_undo(results.current(), username) {
            Ok(request) => request,
            Err(err) => {
                self.status = Some(StatusMessage::error(err.to_string()));
                return Vec::new();
            }
        };
        let outcome = match api.undo_production(request).await {
            Ok(reply) => interpret_undo_reply(reply),
            Err(err) => Err(err),
        };
        self.finish_undo(outcome, results)
    }
}

#[cfg(test)]
#[path = "tests/undo_tests.rs"]
mod tests;
