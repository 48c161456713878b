//! Almacen API Client
//!
//! `StockApi` over HTTP. Every call shares one client with a fixed timeout;
//! a timed-out call surfaces as a transport error and triggers rollback.

use almacen::models::{
    AdjustmentBody, ConsolidatedRecord, ErrorBody, ItemRecord, PositionRecord, QuickAddBody,
    RemitoBody, SupplierRecord, TransferBody,
};
use almacen::{DomainError, StockApi};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// HTTP client for the warehouse backend
pub struct HttpStockApi {
    client: Client,
    base_url: String,
}

impl HttpStockApi {
    /// Create a new API client
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("almacen-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, DomainError> {
        let url = self.url(path);
        tracing::debug!("GET {}", url);

        let resp = self.client.get(&url).send().await.map_err(transport_error)?;
        let resp = check_status(resp).await?;

        resp.json::<T>()
            .await
            .map_err(|e| DomainError::Decode(format!("{}: {}", path, e)))
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), DomainError> {
        let url = self.url(path);
        tracing::debug!("POST {}", url);

        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;
        check_status(resp).await?;
        Ok(())
    }
}

fn transport_error(e: reqwest::Error) -> DomainError {
    if e.is_timeout() {
        DomainError::Transport(format!("request timed out: {}", e))
    } else {
        DomainError::Transport(e.to_string())
    }
}

/// Map a non-success status and its body to a backend error
pub fn backend_error(status: StatusCode, body: &str) -> DomainError {
    DomainError::Backend {
        status: status.as_u16(),
        message: ErrorBody::parse(body).into_message(),
    }
}

async fn check_status(resp: Response) -> Result<Response, DomainError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    tracing::warn!("API error ({}): {}", status, body);
    Err(backend_error(status, &body))
}

#[async_trait]
impl StockApi for HttpStockApi {
    async fn fetch_positions(&self) -> Result<Vec<PositionRecord>, DomainError> {
        self.get_json("posiciones").await
    }

    async fn fetch_consolidated_stock(&self) -> Result<Vec<ConsolidatedRecord>, DomainError> {
        self.get_json("stock/consolidado").await
    }

    async fn fetch_items(&self) -> Result<Vec<ItemRecord>, DomainError> {
        self.get_json("items").await
    }

    async fn fetch_suppliers(&self) -> Result<Vec<SupplierRecord>, DomainError> {
        self.get_json("proveedores").await
    }

    async fn post_internal_transfer(&self, body: &TransferBody) -> Result<(), DomainError> {
        self.post_json("movimientos/interno", body).await
    }

    async fn post_quick_add(&self, body: &QuickAddBody) -> Result<(), DomainError> {
        self.post_json("movimientos/alta-rapida", body).await
    }

    async fn post_stock_adjustment(&self, body: &AdjustmentBody) -> Result<(), DomainError> {
        self.post_json("movimientos/ajuste", body).await
    }

    async fn post_remito(&self, body: &RemitoBody) -> Result<(), DomainError> {
        self.post_json("remitos", body).await
    }
}
