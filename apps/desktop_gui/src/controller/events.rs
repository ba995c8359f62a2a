//! Events flowing from the backend worker back to the UI thread.

use production_core::{ConsoleError, ProductionResult, RefreshTicket};
use shared::{domain::ProductId, protocol::ProductRecord};

pub enum UiEvent {
    ProductsLoaded {
        ticket: RefreshTicket,
        result: Result<Vec<ProductRecord>, ConsoleError>,
    },
    ProductionFinished(Result<ProductionResult, ConsoleError>),
    UndoFinished(Result<(), ConsoleError>),
    DeleteFinished {
        product_id: ProductId,
        outcome: Result<(), ConsoleError>,
    },
    BackendUnavailable(String),
}
