use std::sync::Mutex;

use async_trait::async_trait;
use shared::{
    domain::{Operation, ProductId},
    error::ErrorCode,
    protocol::{
        DeleteProductRequest, OperationReply, OperationRequest, ProductRecord,
        PushToProductionRequest, UndoProductionRequest,
    },
};

use crate::{api::ProductionApi, error::ConsoleError, model::Product};

#[derive(Clone)]
pub(crate) enum Scripted<T> {
    Ok(T),
    Fail(String),
}

impl<T: Clone> Scripted<T> {
    fn resolve(&self, operation: Operation) -> Result<T, ConsoleError> {
        match self {
            Scripted::Ok(value) => Ok(value.clone()),
            Scripted::Fail(message) => Err(ConsoleError::remote(
                operation,
                ErrorCode::Internal,
                Some(message),
            )),
        }
    }
}

/// In-process stand-in for the remote endpoint. Records every request and
/// answers from scripted replies.
pub(crate) struct FakeApi {
    pub products: Mutex<Scripted<Vec<ProductRecord>>>,
    pub push_reply: Mutex<Scripted<OperationReply>>,
    pub undo_reply: Mutex<Scripted<OperationReply>>,
    pub delete_reply: Mutex<Scripted<OperationReply>>,
    pub calls: Mutex<Vec<OperationRequest>>,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            products: Mutex::new(Scripted::Ok(Vec::new())),
            push_reply: Mutex::new(Scripted::Ok(OperationReply::default())),
            undo_reply: Mutex::new(Scripted::Ok(OperationReply::default())),
            delete_reply: Mutex::new(Scripted::Ok(OperationReply::default())),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl FakeApi {
    pub fn with_products(records: Vec<ProductRecord>) -> Self {
        let api = Self::default();
        *api.products.lock().expect("lock") = Scripted::Ok(records);
        api
    }

    pub fn set_push_reply(&self, reply: Scripted<OperationReply>) {
        *self.push_reply.lock().expect("lock") = reply;
    }

    pub fn set_undo_reply(&self, reply: Scripted<OperationReply>) {
        *self.undo_reply.lock().expect("lock") = reply;
    }

    pub fn set_delete_reply(&self, reply: Scripted<OperationReply>) {
        *self.delete_reply.lock().expect("lock") = reply;
    }

    pub fn set_products(&self, products: Scripted<Vec<ProductRecord>>) {
        *self.products.lock().expect("lock") = products;
    }

    pub fn calls(&self) -> Vec<OperationRequest> {
        self.calls.lock().expect("lock").clone()
    }

    pub fn call_count(&self, operation: Operation) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.operation() == operation)
            .count()
    }

    fn record(&self, request: OperationRequest) {
        self.calls.lock().expect("lock").push(request);
    }
}

#[async_trait]
impl ProductionApi for FakeApi {
    async fn get_all_products(&self) -> Result<Vec<ProductRecord>, ConsoleError> {
        self.record(OperationRequest::GetAllProducts);
        self.products
            .lock()
            .expect("lock")
            .resolve(Operation::GetAllProducts)
    }

    async fn push_to_production(
        &self,
        request: PushToProductionRequest,
    ) -> Result<OperationReply, ConsoleError> {
        self.record(OperationRequest::PushToProduction(request));
        self.push_reply
            .lock()
            .expect("lock")
            .resolve(Operation::PushToProduction)
    }

    async fn undo_production(
        &self,
        request: UndoProductionRequest,
    ) -> Result<OperationReply, ConsoleError> {
        self.record(OperationRequest::UndoProduction(request));
        self.undo_reply
            .lock()
            .expect("lock")
            .resolve(Operation::UndoProduction)
    }

    async fn delete_product(
        &self,
        request: DeleteProductRequest,
    ) -> Result<OperationReply, ConsoleError> {
        self.record(OperationRequest::DeleteProduct(request));
        self.delete_reply
            .lock()
            .expect("lock")
            .resolve(Operation::DeleteProduct)
    }
}

pub(crate) fn record(id: &str, name: &str, max_produce: f64, cost_total: f64) -> ProductRecord {
    ProductRecord {
        product_id: ProductId::new(id),
        product_name: Some(name.to_string()),
        max_produce: Some(max_produce),
        production_cost_total: Some(cost_total),
        ..ProductRecord::default()
    }
}

pub(crate) fn product(id: &str, name: &str, max_produce: u64, cost_total: f64) -> Product {
    Product::from_record(record(id, name, max_produce as f64, cost_total))
}

/// Product whose components add up to a unit cost of 120.
pub(crate) fn costed_record(id: &str, max_produce: f64) -> ProductRecord {
    ProductRecord {
        labor_cost: Some(10.0),
        transport_cost: Some(5.0),
        wastage_amount: Some(2.0),
        other_cost: Some(3.0),
        ..record(id, "Costed", max_produce, 100.0)
    }
}

pub(crate) fn success_push_reply(push_id: &str, product_id: &str) -> OperationReply {
    OperationReply {
        status: Some("success".to_string()),
        push_id: Some(push_id.into()),
        product_id: Some(product_id.into()),
        quantity_produced: Some(4),
        total_production_cost: Some(480.0),
        ..OperationReply::default()
    }
}

pub(crate) fn message_reply(message: &str) -> OperationReply {
    OperationReply {
        message: Some(message.to_string()),
        ..OperationReply::default()
    }
}
