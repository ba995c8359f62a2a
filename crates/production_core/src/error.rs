use shared::{
    domain::{Operation, ProductId},
    error::{ApiError, ErrorCode},
};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QuantityError {
    #[error("Please enter a quantity")]
    Empty,
    #[error("Quantity must be a whole number")]
    NotANumber,
    #[error("Quantity must be at least 1")]
    BelowMinimum,
    #[error("Quantity {requested} exceeds the maximum producible ({max})")]
    ExceedsMaximum { requested: u64, max: u64 },
}

/// Local rejections. None of these reach the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select a product")]
    NoProductSelected,
    #[error("Product {0} is not in the current catalog")]
    UnknownProduct(ProductId),
    #[error("Product {0} cannot be produced with the current stock")]
    ProductUnavailable(ProductId),
    #[error(transparent)]
    Quantity(#[from] QuantityError),
    #[error("No signed-in user")]
    MissingUser,
    #[error("A production request is already in progress")]
    AlreadySubmitting,
    #[error("There is no production to undo")]
    NothingToUndo,
    #[error("An undo is already in progress")]
    UndoInFlight,
    #[error("Action was not confirmed")]
    NotConfirmed,
    #[error("Product {0} is already being deleted")]
    DeleteInFlight(ProductId),
}

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{operation} failed ({code:?}): {message}")]
    Remote {
        operation: Operation,
        code: ErrorCode,
        message: String,
    },
    #[error("{operation} request failed: {source}")]
    Transport {
        operation: Operation,
        #[source]
        source: reqwest::Error,
    },
    #[error("{operation} returned an unreadable body: {source}")]
    Decode {
        operation: Operation,
        #[source]
        source: serde_json::Error,
    },
    #[error("local storage error: {0}")]
    Storage(String),
}

impl ConsoleError {
    /// Remote rejection. Falls back to the operation's generic message when
    /// the server did not say anything useful.
    pub fn remote(operation: Operation, code: ErrorCode, message: Option<&str>) -> Self {
        let message = message
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| fallback_message(operation));
        ConsoleError::Remote {
            operation,
            code,
            message,
        }
    }

    pub fn from_api_error(operation: Operation, error: ApiError) -> Self {
        Self::remote(operation, error.code, Some(&error.message))
    }

    pub fn operation(&self) -> Option<Operation> {
        match self {
            ConsoleError::Remote { operation, .. }
            | ConsoleError::Transport { operation, .. }
            | ConsoleError::Decode { operation, .. } => Some(*operation),
            ConsoleError::Validation(_) | ConsoleError::Storage(_) => None,
        }
    }

    /// Text shown inline next to the control that triggered the action.
    pub fn user_message(&self) -> String {
        match self {
            ConsoleError::Validation(err) => err.to_string(),
            ConsoleError::Remote { message, .. } => message.clone(),
            ConsoleError::Transport { operation, .. } | ConsoleError::Decode { operation, .. } => {
                fallback_message(*operation)
            }
            ConsoleError::Storage(message) => message.clone(),
        }
    }
}

pub fn fallback_message(operation: Operation) -> String {
    format!("Failed to {}. Please try again.", operation.action_label())
}
