use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::IgnoredAny;
use serde_json::Value;
use shared::{domain::RecordId, protocol::ApiResponse};
use thiserror::Error;
use tracing::debug;
use url::Url;

pub mod alert;
pub mod customers;
pub mod entity;
pub mod form;
pub mod panel;
pub mod products;
pub mod view;

pub use alert::{Alert, AlertKind, AlertPresenter, DEFAULT_ALERT_DURATION};
pub use customers::Customers;
pub use entity::{Entity, EntityLabels, FieldKind, FieldSpec};
pub use form::{FormChrome, FormError, FormMode, FormValues};
pub use panel::{CrudPanel, DeleteOutcome, PanelError};
pub use products::Products;
pub use view::{PanelView, TableRow};

const CONNECTION_ERROR_PREFIX: &str = "Error de conexión: ";
const MISSING_ERROR_TEXT: &str = "error desconocido";

#[derive(Debug, Error)]
pub enum ClientError {
    /// The backend answered and marked the request unsuccessful.
    #[error("{0}")]
    Application(String),
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("response is missing `{0}`")]
    Incomplete(&'static str),
    #[error("invalid endpoint url: {0}")]
    Url(#[from] url::ParseError),
}

impl ClientError {
    pub fn is_application(&self) -> bool {
        matches!(self, ClientError::Application(_))
    }

    /// Alert text: server-supplied errors get `failure_prefix`, everything
    /// else is reported as a connection error.
    pub fn alert_message(&self, failure_prefix: &str) -> String {
        match self {
            ClientError::Application(error) => format!("{failure_prefix}{error}"),
            other => format!("{CONNECTION_ERROR_PREFIX}{other}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Origin the `/api` paths are resolved against.
    pub base_url: Url,
    pub alert_duration: Duration,
    /// `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let mut base_url = Url::parse(base_url.trim())?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            base_url,
            alert_duration: DEFAULT_ALERT_DURATION,
            request_timeout: None,
        })
    }

    pub fn with_alert_duration(mut self, alert_duration: Duration) -> Self {
        self.alert_duration = alert_duration;
        self
    }

    pub fn with_request_timeout(mut self, request_timeout: Option<Duration>) -> Self {
        self.request_timeout = request_timeout;
        self
    }
}

/// One-request-per-call client for the `/api/<entity>` surface.
///
/// HTTP status codes are not inspected: the JSON body alone decides between
/// success and application failure.
#[derive(Debug, Clone)]
pub struct AdminClient {
    http: Client,
    config: ClientConfig,
}

impl AdminClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn collection_url<E: Entity>(&self) -> Result<Url, ClientError> {
        Ok(self.config.base_url.join(&format!("api/{}", E::ENDPOINT))?)
    }

    pub fn record_url<E: Entity>(&self, id: RecordId) -> Result<Url, ClientError> {
        Ok(self
            .config
            .base_url
            .join(&format!("api/{}/{}", E::ENDPOINT, id.0))?)
    }

    pub async fn list<E: Entity>(&self) -> Result<Vec<E::Record>, ClientError> {
        let url = self.collection_url::<E>()?;
        let body = self.send(self.http.get(url)).await?;
        into_data(serde_json::from_value::<ApiResponse<Vec<E::Record>>>(body)?)
    }

    /// Accepts `{success, data}` as well as a bare record.
    pub async fn fetch<E: Entity>(&self, id: RecordId) -> Result<E::Record, ClientError> {
        let url = self.record_url::<E>(id)?;
        let body = self.send(self.http.get(url)).await?;
        if is_envelope(&body) {
            into_data(serde_json::from_value::<ApiResponse<E::Record>>(body)?)
        } else {
            Ok(serde_json::from_value(body)?)
        }
    }

    pub async fn create<E: Entity>(&self, payload: &E::Payload) -> Result<String, ClientError> {
        let url = self.collection_url::<E>()?;
        into_message(self.send(self.http.post(url).json(payload)).await?)
    }

    pub async fn update<E: Entity>(
        &self,
        id: RecordId,
        payload: &E::Payload,
    ) -> Result<String, ClientError> {
        let url = self.record_url::<E>(id)?;
        into_message(self.send(self.http.put(url).json(payload)).await?)
    }

    pub async fn delete<E: Entity>(&self, id: RecordId) -> Result<String, ClientError> {
        let url = self.record_url::<E>(id)?;
        into_message(self.send(self.http.delete(url)).await?)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().clone();
        let bytes = response.bytes().await?;
        debug!(%url, %status, len = bytes.len(), "api response");
        Ok(serde_json::from_slice(&bytes)?)
    }
}

fn is_envelope(body: &Value) -> bool {
    body.get("success").is_some() || body.get("error").is_some()
}

fn into_data<T>(envelope: ApiResponse<T>) -> Result<T, ClientError> {
    if !envelope.success {
        return Err(application_failure(envelope.error));
    }
    envelope.data.ok_or(ClientError::Incomplete("data"))
}

fn into_message(body: Value) -> Result<String, ClientError> {
    let envelope: ApiResponse<IgnoredAny> = serde_json::from_value(body)?;
    if !envelope.success {
        return Err(application_failure(envelope.error));
    }
    Ok(envelope.message.unwrap_or_default())
}

fn application_failure(error: Option<String>) -> ClientError {
    ClientError::Application(error.unwrap_or_else(|| MISSING_ERROR_TEXT.to_string()))
}

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
