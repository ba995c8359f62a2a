use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use production_core::{
    ConsoleEvent, FileStore, HttpProductionApi, ProductionConsole, RefreshOutcome, SortField,
};
use serde_json::{json, Value};
use shared::domain::{ProductId, PushId};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Default)]
struct Backend {
    products: Vec<Value>,
    pushes: Vec<(String, String, u64)>,
    received: Vec<String>,
}

type Shared = Arc<Mutex<Backend>>;

fn adjust_max(products: &mut [Value], product_id: &str, delta: i64) {
    if let Some(product) = products
        .iter_mut()
        .find(|product| product["product_id"] == product_id)
    {
        let current = product["max_produce"].as_i64().unwrap_or(0);
        product["max_produce"] = json!(current + delta);
    }
}

async fn handle(State(backend): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let mut backend = backend.lock().await;
    let operation = body["operation"].as_str().unwrap_or_default().to_string();
    backend.received.push(operation.clone());

    match operation.as_str() {
        "GetAllProducts" => Json(Value::Array(backend.products.clone())),
        "PushToProduction" => {
            let product_id = body["product_id"].as_str().unwrap_or_default().to_string();
            let quantity = body["quantity"].as_u64().unwrap_or(0);
            let unit = body["production_cost_per_unit"].as_f64().unwrap_or(0.0);
            let push_id = format!("push-{}", backend.pushes.len() + 1);
            adjust_max(&mut backend.products, &product_id, -(quantity as i64));
            backend
                .pushes
                .push((push_id.clone(), product_id.clone(), quantity));
            Json(json!({
                "status": "success",
                "push_id": push_id,
                "product_id": product_id,
                "quantity_produced": quantity,
                "total_production_cost": unit * quantity as f64,
            }))
        }
        "UndoProduction" => {
            let push_id = body["push_id"].as_str().unwrap_or_default();
            let found = backend
                .pushes
                .iter()
                .position(|(id, _, _)| id == push_id);
            match found {
                Some(index) => {
                    let (_, product_id, quantity) = backend.pushes.remove(index);
                    adjust_max(&mut backend.products, &product_id, quantity as i64);
                    Json(json!({ "message": format!("Production {push_id} undone successfully") }))
                }
                None => Json(json!({ "status": "error", "message": "Unknown push id" })),
            }
        }
        "DeleteProduct" => {
            let product_id = body["product_id"].as_str().unwrap_or_default().to_string();
            backend
                .products
                .retain(|product| product["product_id"] != product_id.as_str());
            Json(json!({ "message": format!("Product {product_id} deleted successfully") }))
        }
        _ => Json(json!({ "error": "unsupported operation" })),
    }
}

async fn spawn_backend() -> (String, Shared) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let backend = Arc::new(Mutex::new(Backend {
        products: vec![
            json!({
                "product_id": "jam",
                "product_name": "Cherry Jam",
                "max_produce": 12,
                "production_cost_total": 100.0,
                "labor_cost": 10.0,
                "transport_cost": 5.0,
                "wastage_amount": 2.0,
                "other_cost": 3.0,
                "stock_needed": { "cherries": 0.5, "sugar": 0.25 }
            }),
            json!({
                "product_id": "bread",
                "product_name": "Banana Bread",
                "max_produce": -3,
                "production_cost_total": 40.0
            }),
        ],
        ..Backend::default()
    }));
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let app = Router::new()
        .route("/api", post(handle))
        .with_state(backend.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}/api"), backend)
}

fn open_console(url: &str, storage: &std::path::Path) -> ProductionConsole<HttpProductionApi, FileStore> {
    ProductionConsole::new(HttpProductionApi::new(url), FileStore::open(storage), "alice")
}

#[tokio::test]
async fn produce_restart_undo_and_delete_against_http_backend() {
    let (url, backend) = spawn_backend().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let storage = dir.path().join("local_storage.json");

    let mut console = open_console(&url, &storage);
    assert_eq!(
        console.refresh_catalog().await,
        RefreshOutcome::Applied { count: 2 }
    );
    let bread = console
        .catalog()
        .get(&ProductId::new("bread"))
        .expect("bread");
    assert_eq!(bread.max_produce, 0);
    assert!(console.select_product(&ProductId::new("bread")).is_err());

    console
        .select_product(&ProductId::new("jam"))
        .expect("select jam");
    console.set_quantity("4");
    let preview = console
        .form()
        .cost_preview(console.catalog())
        .expect("preview");
    assert_eq!(preview.unit_cost, 120.0);
    assert_eq!(preview.total, 480.0);

    let events = console.submit_production().await;
    assert!(events.contains(&ConsoleEvent::InventoryRefreshRequested));
    let result = console.last_result().cloned().expect("result");
    assert_eq!(result.push_id, PushId::new("push-1"));
    assert_eq!(result.total_production_cost, 480.0);
    assert_eq!(
        console
            .catalog()
            .get(&ProductId::new("jam"))
            .map(|p| p.max_produce),
        Some(8)
    );
    drop(console);

    let mut console = open_console(&url, &storage);
    assert_eq!(console.last_result(), Some(&result));
    assert!(console.request_undo());
    let events = console.undo_last().await;
    assert!(events.contains(&ConsoleEvent::ProductionUndone {
        push_id: PushId::new("push-1")
    }));
    assert!(console.last_result().is_none());
    assert_eq!(
        console
            .catalog()
            .get(&ProductId::new("jam"))
            .map(|p| p.max_produce),
        Some(12)
    );

    console.browser_mut().toggle_sort(SortField::MaxProduce);
    let order: Vec<_> = console
        .browser()
        .visible(console.catalog())
        .iter()
        .map(|p| p.id.as_str())
        .collect();
    assert_eq!(order, vec!["bread", "jam"]);

    console
        .request_delete(&ProductId::new("bread"))
        .expect("request delete");
    let events = console.delete_pending().await;
    assert_eq!(events, vec![ConsoleEvent::ProductDeleted(ProductId::new("bread"))]);
    assert_eq!(console.catalog().len(), 1);

    drop(console);
    let console = open_console(&url, &storage);
    assert!(console.last_result().is_none());

    let received = backend.lock().await.received.clone();
    assert_eq!(
        received,
        vec![
            "GetAllProducts",
            "PushToProduction",
            "GetAllProducts",
            "UndoProduction",
            "GetAllProducts",
            "DeleteProduct",
        ]
    );
}
