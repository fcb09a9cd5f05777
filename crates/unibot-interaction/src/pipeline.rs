//! Request pipeline: credential injection and authentication-failure handling.
//!
//! Outbound, every request gets `Authorization: Bearer <access token>` when
//! the credential store holds a session, and goes out unauthenticated
//! otherwise. Inbound, a 401 clears the credential store before the caller
//! sees [`ApiError::AuthExpired`]; this happens for every request and cannot
//! be switched off per call. Other error statuses and transport failures are
//! handed back as [`ApiError::Failure`] without retries.
//!
//! The pipeline never navigates. Sending the user to the login surface is
//! left to whoever dispatches UI events.

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use unibot_core::api::{ApiError, ApiResult, FailureDetail};
use unibot_core::config::ClientConfig;
use unibot_core::credential::CredentialStore;
use unibot_core::error::{Result, UnibotError};

#[derive(Clone)]
pub struct RequestPipeline {
    client: Client,
    base_url: Url,
    credentials: Arc<dyn CredentialStore>,
}

impl RequestPipeline {
    /// Builds the pipeline for `config.base_url`. The timeout is only set
    /// when `request_timeout_secs` is configured.
    pub fn new(config: &ClientConfig, credentials: Arc<dyn CredentialStore>) -> Result<Self> {
        let base_url = Url::parse(&config.normalized_base_url()?)
            .map_err(|e| UnibotError::config(format!("Invalid base_url: {e}")))?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| UnibotError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Starts a request against `path`, relative to the base URL.
    pub fn request(&self, method: Method, path: &str) -> ApiResult<RequestBuilder> {
        let url = self.base_url.join(path.trim_start_matches('/')).map_err(|e| {
            ApiError::Failure(FailureDetail::transport(format!(
                "Invalid endpoint '{path}': {e}"
            )))
        })?;
        Ok(self.client.request(method, url))
    }

    /// Sends a prepared request through both pipeline stages.
    pub async fn execute(&self, request: RequestBuilder) -> ApiResult<Response> {
        let request = match self.credentials.read() {
            Some(credential) => request.bearer_auth(&credential.access_token),
            None => request,
        };

        let response = request.send().await.map_err(|err| {
            tracing::warn!("Request failed without a response: {}", err);
            ApiError::Failure(FailureDetail::transport(describe_transport_error(&err)))
        })?;

        self.inspect(response).await
    }

    async fn inspect(&self, response: Response) -> ApiResult<Response> {
        let status = response.status();
        tracing::debug!(url = %response.url(), status = status.as_u16(), "Response received");

        if status == StatusCode::UNAUTHORIZED {
            tracing::info!("Server rejected the session; clearing stored credentials");
            if let Err(e) = self.credentials.clear() {
                tracing::warn!("Failed to clear credentials after 401: {}", e);
            }
            return Err(ApiError::AuthExpired);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = FailureDetail::http(status.as_u16(), &body);
            tracing::warn!(status = status.as_u16(), "Request failed: {}", detail);
            return Err(ApiError::Failure(detail));
        }

        Ok(response)
    }

    pub async fn get_json<T>(&self, path: &str) -> ApiResult<T>
    where
        T: DeserializeOwned,
    {
        let response = self.execute(self.request(Method::GET, path)?).await?;
        decode(response).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .execute(self.request(Method::POST, path)?.json(body))
            .await?;
        decode(response).await
    }

    pub async fn post_multipart<T>(&self, path: &str, form: reqwest::multipart::Form) -> ApiResult<T>
    where
        T: DeserializeOwned,
    {
        let response = self
            .execute(self.request(Method::POST, path)?.multipart(form))
            .await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let status = response.status().as_u16();
    let body = response.text().await.map_err(|err| {
        ApiError::Failure(FailureDetail::transport(format!(
            "Failed to read response body: {err}"
        )))
    })?;

    serde_json::from_str(&body).map_err(|err| {
        tracing::warn!(status, "Malformed response payload: {}", err);
        ApiError::Failure(FailureDetail::malformed(
            status,
            format!("Malformed response payload: {err}"),
        ))
    })
}

fn describe_transport_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("Request timed out: {err}")
    } else if err.is_connect() {
        format!("Could not reach the server: {err}")
    } else {
        format!("Request failed: {err}")
    }
}
