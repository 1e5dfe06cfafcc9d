use async_trait::async_trait;
use reqwest::header::CACHE_CONTROL;
use reqwest::{Client, Response};
use vmdash_common::{DeleteVmResponse, ErrorBody, NewVm, UpdateVmRequest, Vm};

use crate::config::ClientConfig;
use crate::error::StoreError;

/// Transport to the VM collection. One request per call, never retried.
#[async_trait]
pub trait VmApi: Send + Sync {
    async fn list_vms(&self) -> Result<Vec<Vm>, StoreError>;
    async fn create_vm(&self, vm: &NewVm) -> Result<Vm, StoreError>;
    async fn update_vm(&self, id: &str, update: &UpdateVmRequest) -> Result<Vm, StoreError>;
    async fn delete_vm(&self, id: &str) -> Result<(), StoreError>;
}

/// `VmApi` over HTTP/JSON.
#[derive(Debug, Clone)]
pub struct HttpVmApi {
    client: Client,
    base_url: String,
}

impl HttpVmApi {
    pub fn new(config: &ClientConfig) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn vms_url(&self) -> String {
        format!("{}/vms", self.base_url)
    }

    // Ids are free text; encode so `/`, `?` or `#` stay inside the segment.
    fn vm_url(&self, id: &str) -> String {
        format!("{}/vms/{}", self.base_url, urlencoding::encode(id))
    }
}

/// Pass 2xx responses through; turn anything else into `StoreError::Api`.
async fn check_status(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.message().to_string(),
        Err(_) => format!(
            "HTTP {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown")
        ),
    };
    Err(StoreError::Api {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, StoreError> {
    response
        .json::<T>()
        .await
        .map_err(|e| StoreError::Decode(e.to_string()))
}

#[async_trait]
impl VmApi for HttpVmApi {
    async fn list_vms(&self) -> Result<Vec<Vm>, StoreError> {
        let response = self
            .client
            .get(self.vms_url())
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await?;
        decode(check_status(response).await?).await
    }

    async fn create_vm(&self, vm: &NewVm) -> Result<Vm, StoreError> {
        let response = self.client.post(self.vms_url()).json(vm).send().await?;
        decode(check_status(response).await?).await
    }

    async fn update_vm(&self, id: &str, update: &UpdateVmRequest) -> Result<Vm, StoreError> {
        let response = self.client.put(self.vm_url(id)).json(update).send().await?;
        decode(check_status(response).await?).await
    }

    async fn delete_vm(&self, id: &str) -> Result<(), StoreError> {
        let response = self.client.delete(self.vm_url(id)).send().await?;
        let body: DeleteVmResponse = decode(check_status(response).await?).await?;
        tracing::debug!("delete {}: {}", id, body.message);
        Ok(())
    }
}
