use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize};
use shared::{
    domain::Operation,
    error::{ApiError, ErrorBody, ErrorCode},
    protocol::{
        DeleteProductRequest, OperationReply, OperationRequest, ProductRecord,
        PushToProductionRequest, UndoProductionRequest,
    },
};
use tracing::{debug, warn};

use crate::{config::Settings, error::ConsoleError};

/// The remote operations the console consumes. Replies are returned raw;
/// deciding whether a 2xx body means success is up to the workflows.
#[async_trait]
pub trait ProductionApi: Send + Sync {
    async fn get_all_products(&self) -> Result<Vec<ProductRecord>, ConsoleError>;
    async fn push_to_production(
        &self,
        request: PushToProductionRequest,
    ) -> Result<OperationReply, ConsoleError>;
    async fn undo_production(
        &self,
        request: UndoProductionRequest,
    ) -> Result<OperationReply, ConsoleError>;
    async fn delete_product(
        &self,
        request: DeleteProductRequest,
    ) -> Result<OperationReply, ConsoleError>;
}

#[async_trait]
impl<T> ProductionApi for Arc<T>
where
    T: ProductionApi + ?Sized,
{
    async fn get_all_products(&self) -> Result<Vec<ProductRecord>, ConsoleError> {
        (**self).get_all_products().await
    }

    async fn push_to_production(
        &self,
        request: PushToProductionRequest,
    ) -> Result<OperationReply, ConsoleError> {
        (**self).push_to_production(request).await
    }

    async fn undo_production(
        &self,
        request: UndoProductionRequest,
    ) -> Result<OperationReply, ConsoleError> {
        (**self).undo_production(request).await
    }

    async fn delete_product(
        &self,
        request: DeleteProductRequest,
    ) -> Result<OperationReply, ConsoleError> {
        (**self).delete_product(request).await
    }
}

/// Some deployments wrap the product list in an object.
#[derive(Deserialize)]
#[serde(untagged)]
enum ProductListBody {
    List(Vec<ProductRecord>),
    Wrapped { products: Vec<ProductRecord> },
    Data { data: Vec<ProductRecord> },
}

impl ProductListBody {
    fn into_records(self) -> Vec<ProductRecord> {
        match self {
            ProductListBody::List(records)
            | ProductListBody::Wrapped { products: records }
            | ProductListBody::Data { data: records } => records,
        }
    }
}

#[derive(Clone)]
pub struct HttpProductionApi {
    http: Client,
    endpoint_url: String,
}

impl HttpProductionApi {
    pub fn new(endpoint_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint_url: endpoint_url.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, ConsoleError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|source| ConsoleError::Transport {
                operation: Operation::GetAllProducts,
                source,
            })?;
        Ok(Self {
            http,
            endpoint_url: settings.endpoint_url.clone(),
        })
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    async fn post<T: DeserializeOwned>(&self, request: &OperationRequest) -> Result<T, ConsoleError> {
        let operation = request.operation();
        debug!(%operation, endpoint = %self.endpoint_url, "posting operation");

        let response = self
            .http
            .post(&self.endpoint_url)
            .json(request)
            .send()
            .await
            .map_err(|source| ConsoleError::Transport { operation, source })?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| ConsoleError::Transport { operation, source })?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(ErrorBody::into_message);
            warn!(%operation, status = status.as_u16(), "endpoint returned an error status");
            let code = ErrorCode::from_http_status(status.as_u16());
            return Err(match message {
                Some(message) => {
                    ConsoleError::from_api_error(operation, ApiError::new(code, message))
                }
                None => ConsoleError::remote(operation, code, None),
            });
        }

        serde_json::from_str(&body).map_err(|source| ConsoleError::Decode { operation, source })
    }
}

#[async_trait]
impl ProductionApi for HttpProductionApi {
    async fn get_all_products(&self) -> Result<Vec<ProductRecord>, ConsoleError> {
        let body: ProductListBody = self.post(&OperationRequest::GetAllProducts).await?;
        Ok(body.into_records())
    }

    async fn push_to_production(
        &self,
        request: PushToProductionRequest,
    ) -> Result<OperationReply, ConsoleError> {
        self.post(&OperationRequest::PushToProduction(request)).await
    }

    async fn undo_production(
        &self,
        request: UndoProductionRequest,
    ) -> Result<OperationReply, ConsoleError> {
        self.post(&OperationRequest::UndoProduction(request)).await
    }

    async fn delete_product(
        &self,
        request: DeleteProductRequest,
    ) -> Result<OperationReply, ConsoleError> {
        self.post(&OperationRequest::DeleteProduct(request)).await
    }
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
