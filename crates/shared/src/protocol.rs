use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Operation, ProductId, PushId};

/// Request envelope posted to the single remote endpoint. The variant name is
/// written into the `operation` field and the payload fields sit beside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation")]
pub enum OperationRequest {
    GetAllProducts,
    PushToProduction(PushToProductionRequest),
    UndoProduction(UndoProductionRequest),
    DeleteProduct(DeleteProductRequest),
}

impl OperationRequest {
    pub fn operation(&self) -> Operation {
        match self {
            OperationRequest::GetAllProducts => Operation::GetAllProducts,
            OperationRequest::PushToProduction(_) => Operation::PushToProduction,
            OperationRequest::UndoProduction(_) => Operation::UndoProduction,
            OperationRequest::DeleteProduct(_) => Operation::DeleteProduct,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushToProductionRequest {
    pub product_id: ProductId,
    pub quantity: u64,
    pub username: String,
    pub production_cost_per_unit: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndoProductionRequest {
    pub push_id: PushId,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteProductRequest {
    pub product_id: ProductId,
    pub username: String,
}

/// Product row exactly as `GetAllProducts` returns it. Every field other than
/// the id is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(deserialize_with = "lenient::id")]
    pub product_id: ProductId,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub max_produce: Option<f64>,
    #[serde(default)]
    pub original_max_produce: Option<f64>,
    #[serde(default)]
    pub production_cost_total: Option<f64>,
    #[serde(default)]
    pub production_cost: BTreeMap<String, f64>,
    #[serde(default)]
    pub labor_cost: Option<f64>,
    #[serde(default)]
    pub transport_cost: Option<f64>,
    #[serde(default)]
    pub wastage_amount: Option<f64>,
    #[serde(default)]
    pub other_cost: Option<f64>,
    #[serde(default)]
    pub stock_needed: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Body returned by the mutating operations. The endpoint is loose about
/// which fields it fills, so all of them are optional here and the success
/// shape is decided per operation by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::optional_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub push_id: Option<PushId>,
    #[serde(
        default,
        deserialize_with = "lenient::optional_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub product_id: Option<ProductId>,
    #[serde(
        default,
        deserialize_with = "lenient::optional_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub quantity_produced: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_production_cost: Option<f64>,
}

impl OperationReply {
    /// Human-readable text the server attached, preferring `message`.
    pub fn server_message(&self) -> Option<&str> {
        [self.message.as_deref(), self.error.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|text| !text.is_empty())
    }
}

/// Decoders for fields the endpoint writes with whatever JSON type its
/// backing store handed it: ids as strings or numbers, counts as integers,
/// integral floats, or numeric strings.
mod lenient {
    use serde::{de::Error, Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Unsigned(u64),
        Signed(i64),
        Float(f64),
        Text(String),
    }

    impl Scalar {
        fn into_id(self) -> String {
            match self {
                Scalar::Unsigned(value) => value.to_string(),
                Scalar::Signed(value) => value.to_string(),
                Scalar::Float(value) if value.is_finite() && value.fract() == 0.0 => {
                    format!("{value:.0}")
                }
                Scalar::Float(value) => value.to_string(),
                Scalar::Text(value) => value,
            }
        }

        fn into_count(self) -> Option<u64> {
            let whole = |value: f64| {
                (value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64)
                    .then_some(value as u64)
            };
            match self {
                Scalar::Unsigned(value) => Some(value),
                Scalar::Signed(value) => u64::try_from(value).ok(),
                Scalar::Float(value) => whole(value),
                Scalar::Text(text) => {
                    let text = text.trim();
                    text.parse::<u64>()
                        .ok()
                        .or_else(|| text.parse::<f64>().ok().and_then(whole))
                }
            }
        }
    }

    pub fn id<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: From<String>,
    {
        Scalar::deserialize(deserializer).map(|scalar| T::from(scalar.into_id()))
    }

    pub fn optional_id<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: From<String>,
    {
        Ok(Option::<Scalar>::deserialize(deserializer)?.map(|scalar| T::from(scalar.into_id())))
    }

    pub fn optional_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Scalar>::deserialize(deserializer)? {
            None => Ok(None),
            Some(scalar) => scalar
                .into_count()
                .map(Some)
                .ok_or_else(|| D::Error::custom("expected a whole, non-negative quantity")),
        }
    }
}
