use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{
    domain::{ProductId, PushId},
    protocol::ProductRecord,
};

/// Per-unit cost components. Every field is required; anything the server
/// leaves out is zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CostComponents {
    pub production_cost_total: f64,
    pub labor_cost: f64,
    pub transport_cost: f64,
    pub wastage_amount: f64,
    pub other_cost: f64,
}

impl CostComponents {
    pub fn unit_cost(&self) -> f64 {
        self.production_cost_total
            + self.labor_cost
            + self.transport_cost
            + self.wastage_amount
            + self.other_cost
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRequirement {
    pub name: String,
    pub quantity_per_unit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub max_produce: u64,
    pub original_max_produce: u64,
    pub production_cost_total: f64,
    pub cost_breakdown: BTreeMap<String, f64>,
    pub costs: CostComponents,
    pub stock_needed: BTreeMap<String, f64>,
    pub materials: Vec<MaterialRequirement>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Reshapes a server row into the client model.
    pub fn from_record(record: ProductRecord) -> Self {
        let production_cost_total = record
            .production_cost_total
            .filter(|value| value.is_finite())
            .unwrap_or_else(|| record.production_cost.values().sum());
        let max_produce = clamp_count(record.max_produce);
        let original_max_produce = match record.original_max_produce {
            Some(value) => clamp_count(Some(value)),
            None => max_produce,
        };
        let materials = record
            .stock_needed
            .iter()
            .map(|(name, quantity)| MaterialRequirement {
                name: name.clone(),
                quantity_per_unit: *quantity,
            })
            .collect();
        let name = record
            .product_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| record.product_id.to_string());

        Self {
            costs: CostComponents {
                production_cost_total,
                labor_cost: cost_or_zero(record.labor_cost),
                transport_cost: cost_or_zero(record.transport_cost),
                wastage_amount: cost_or_zero(record.wastage_amount),
                other_cost: cost_or_zero(record.other_cost),
            },
            id: record.product_id,
            name,
            max_produce,
            original_max_produce,
            production_cost_total,
            cost_breakdown: record.production_cost,
            stock_needed: record.stock_needed,
            materials,
            created_at: record.created_at.as_deref().and_then(parse_timestamp),
        }
    }

    pub fn is_producible(&self) -> bool {
        self.max_produce > 0
    }

    pub fn unit_cost(&self) -> f64 {
        self.costs.unit_cost()
    }
}

/// Outcome of one successful push to production. Only the latest one is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionResult {
    pub push_id: PushId,
    pub product_id: ProductId,
    pub quantity_produced: u64,
    pub total_production_cost: f64,
}

impl ProductionResult {
    pub fn is_valid(&self) -> bool {
        !self.push_id.as_str().trim().is_empty()
            && !self.product_id.as_str().trim().is_empty()
            && self.total_production_cost.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostPreview {
    pub unit_cost: f64,
    pub quantity: u64,
    pub total: f64,
}

impl CostPreview {
    pub fn new(costs: &CostComponents, quantity: u64) -> Self {
        let unit_cost = costs.unit_cost();
        Self {
            unit_cost,
            quantity,
            total: unit_cost * quantity as f64,
        }
    }
}

fn clamp_count(value: Option<f64>) -> u64 {
    match value {
        Some(value) if value.is_finite() && value > 0.0 => value.floor() as u64,
        _ => 0,
    }
}

fn cost_or_zero(value: Option<f64>) -> f64 {
    value.filter(|value| value.is_finite()).unwrap_or(0.0)
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
#[path = "tests/model_tests.rs"]
mod tests;
