//! Backend commands queued from UI to backend worker.

use production_core::RefreshTicket;
use shared::protocol::{DeleteProductRequest, PushToProductionRequest, UndoProductionRequest};

pub enum BackendCommand {
    LoadProducts { ticket: RefreshTicket },
    PushToProduction(PushToProductionRequest),
    UndoProduction(UndoProductionRequest),
    DeleteProduct(DeleteProductRequest),
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::LoadProducts { .. } => "load_products",
            BackendCommand::PushToProduction(_) => "push_to_production",
            BackendCommand::UndoProduction(_) => "undo_production",
            BackendCommand::DeleteProduct(_) => "delete_product",
        }
    }
}
