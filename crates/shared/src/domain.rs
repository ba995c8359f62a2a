use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

id_newtype!(ProductId);
id_newtype!(PushId);

/// Name of a remote operation carried in the request envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    GetAllProducts,
    PushToProduction,
    UndoProduction,
    DeleteProduct,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::GetAllProducts => "GetAllProducts",
            Operation::PushToProduction => "PushToProduction",
            Operation::UndoProduction => "UndoProduction",
            Operation::DeleteProduct => "DeleteProduct",
        }
    }

    /// Short verb phrase used in user-facing fallback messages.
    pub fn action_label(self) -> &'static str {
        match self {
            Operation::GetAllProducts => "load products",
            Operation::PushToProduction => "push to production",
            Operation::UndoProduction => "undo production",
            Operation::DeleteProduct => "delete product",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
