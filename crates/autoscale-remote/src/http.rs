//! `HttpResizeClient` / `HttpOperationStatusClient` — `reqwest`-backed
//! implementations of the resize driver and operation-status ports.

use async_trait::async_trait;
use reqwest::Client;

use autoscale_core::error::{RemoteError, RemoteResult};
use autoscale_core::ports::{OperationStatusClient, ResizeClient};
use autoscale_core::types::{InstanceSnapshot, OperationHandle, OperationStatusPayload};

use crate::wire::{OperationStatusResponse, ResizeRequest, ResizeResponse};

pub struct HttpResizeClient {
    client: Client,
}

impl HttpResizeClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl Default for HttpResizeClient {
    fn default() -> Self {
        Self::new(Client::new())
    }
}

#[async_trait]
impl ResizeClient for HttpResizeClient {
    async fn start(&self, snapshot: &InstanceSnapshot, target_size: i64) -> RemoteResult<OperationHandle> {
        let endpoint = snapshot.resize_endpoint.as_deref().ok_or(RemoteError::NoEndpoint)?;
        let body = ResizeRequest::for_units(snapshot.units, target_size);

        let response = self
            .client
            .post(endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| RemoteError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status(status.as_u16()));
        }

        let parsed: ResizeResponse = response
            .json()
            .await
            .map_err(|e| RemoteError::Malformed(e.to_string()))?;
        Ok(OperationHandle {
            operation_id: parsed.name,
        })
    }
}

pub struct HttpOperationStatusClient {
    client: Client,
}

impl HttpOperationStatusClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn status_url(&self, base: &str, operation_id: &str) -> String {
        let base = base.trim_end_matches('/');
        format!("{base}/operations/{operation_id}")
    }
}

impl Default for HttpOperationStatusClient {
    fn default() -> Self {
        Self::new(Client::new())
    }
}

#[async_trait]
impl OperationStatusClient for HttpOperationStatusClient {
    async fn get_status(
        &self,
        snapshot: &InstanceSnapshot,
        operation_id: &str,
    ) -> RemoteResult<OperationStatusPayload> {
        let endpoint = snapshot.resize_endpoint.as_deref().ok_or(RemoteError::NoEndpoint)?;
        let url = self.status_url(endpoint, operation_id);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| RemoteError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status(status.as_u16()));
        }

        let parsed: OperationStatusResponse = response
            .json()
            .await
            .map_err(|e| RemoteError::Malformed(e.to_string()))?;
        Ok(parsed.into_payload())
    }
}
