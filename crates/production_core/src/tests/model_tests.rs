use super::*;

fn record(json: serde_json::Value) -> ProductRecord {
    serde_json::from_value(json).expect("product record")
}

#[test]
fn reshapes_server_record_into_client_product() {
    let product = Product::from_record(record(serde_json::json!({
        "product_id": "bread",
        "product_name": "Sourdough",
        "max_produce": 12,
        "original_max_produce": 20,
        "production_cost_total": 100.0,
        "production_cost": { "flour": 60.0, "yeast": 40.0 },
        "labor_cost": 10.0,
        "transport_cost": 5.0,
        "wastage_amount": 2.0,
        "other_cost": 3.0,
        "stock_needed": { "yeast": 0.1, "flour": 0.5 },
        "created_at": "2024-03-01T08:30:00Z"
    })));

    assert_eq!(product.id, ProductId::new("bread"));
    assert_eq!(product.name, "Sourdough");
    assert_eq!(product.max_produce, 12);
    assert_eq!(product.original_max_produce, 20);
    assert_eq!(product.cost_breakdown.get("flour"), Some(&60.0));
    assert_eq!(product.unit_cost(), 120.0);
    assert_eq!(
        product.materials,
        vec![
            MaterialRequirement {
                name: "flour".to_string(),
                quantity_per_unit: 0.5,
            },
            MaterialRequirement {
                name: "yeast".to_string(),
                quantity_per_unit: 0.1,
            },
        ]
    );
    assert_eq!(
        product.created_at,
        Some("2024-03-01T08:30:00Z".parse().expect("timestamp"))
    );
}

#[test]
fn missing_cost_components_default_to_zero() {
    let product = Product::from_record(record(serde_json::json!({
        "product_id": "p",
        "production_cost_total": 42.5
    })));
    assert_eq!(product.costs.labor_cost, 0.0);
    assert_eq!(product.costs.other_cost, 0.0);
    assert_eq!(product.unit_cost(), 42.5);
}

#[test]
fn total_falls_back_to_breakdown_sum() {
    let product = Product::from_record(record(serde_json::json!({
        "product_id": "p",
        "production_cost": { "a": 1.5, "b": 2.5 }
    })));
    assert_eq!(product.production_cost_total, 4.0);
}

#[test]
fn negative_or_missing_max_produce_is_clamped_to_zero() {
    let negative = Product::from_record(record(serde_json::json!({
        "product_id": "p",
        "max_produce": -3
    })));
    assert_eq!(negative.max_produce, 0);
    assert!(!negative.is_producible());

    let missing = Product::from_record(record(serde_json::json!({ "product_id": "q" })));
    assert_eq!(missing.max_produce, 0);
    assert_eq!(missing.original_max_produce, 0);
}

#[test]
fn blank_name_falls_back_to_id_and_bad_timestamp_is_dropped() {
    let product = Product::from_record(record(serde_json::json!({
        "product_id": "sku-9",
        "product_name": "  ",
        "created_at": "yesterday"
    })));
    assert_eq!(product.name, "sku-9");
    assert!(product.created_at.is_none());
}

#[test]
fn naive_timestamps_are_read_as_utc() {
    let product = Product::from_record(record(serde_json::json!({
        "product_id": "p",
        "created_at": "2024-03-01 08:30:00"
    })));
    assert_eq!(
        product.created_at,
        Some("2024-03-01T08:30:00Z".parse().expect("timestamp"))
    );
}

#[test]
fn cost_preview_multiplies_unit_cost_by_quantity() {
    let costs = CostComponents {
        production_cost_total: 100.0,
        labor_cost: 10.0,
        transport_cost: 5.0,
        wastage_amount: 2.0,
        other_cost: 3.0,
    };
    let preview = CostPreview::new(&costs, 4);
    assert_eq!(preview.unit_cost, 120.0);
    assert_eq!(preview.total, 480.0);
}
