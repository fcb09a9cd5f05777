//! UnibotApi - the chatbot backend's endpoints over the request pipeline.

use crate::pipeline::RequestPipeline;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::sync::Arc;
use unibot_core::api::{
    ApiError, ApiResult, AuthBackend, ChatBackend, ChatReply, ChatRequest, FailureDetail,
    HistoryResponse, LoginRequest, LoginResponse, UploadBackend, UploadReceipt,
};
use unibot_core::config::{ClientConfig, EndpointConfig};
use unibot_core::credential::CredentialStore;
use unibot_core::error::Result;
use unibot_core::upload::{UploadFile, UploadHistoryEntry};

/// Field name the upload endpoint reads the file from.
const UPLOAD_FIELD: &str = "file";

#[derive(Clone)]
pub struct UnibotApi {
    pipeline: RequestPipeline,
    endpoints: EndpointConfig,
}

impl UnibotApi {
    pub fn new(config: &ClientConfig, credentials: Arc<dyn CredentialStore>) -> Result<Self> {
        Ok(Self::with_pipeline(
            RequestPipeline::new(config, credentials)?,
            config.endpoints.clone(),
        ))
    }

    pub fn with_pipeline(pipeline: RequestPipeline, endpoints: EndpointConfig) -> Self {
        Self {
            pipeline,
            endpoints,
        }
    }

    pub fn pipeline(&self) -> &RequestPipeline {
        &self.pipeline
    }
}

#[async_trait]
impl AuthBackend for UnibotApi {
    async fn login(&self, request: &LoginRequest) -> ApiResult<LoginResponse> {
        tracing::debug!(identifier = %request.identifier, "Logging in");
        self.pipeline
            .post_json(&self.endpoints.login, request)
            .await
    }
}

#[async_trait]
impl ChatBackend for UnibotApi {
    async fn chat(&self, prompt: &str) -> ApiResult<ChatReply> {
        let body = ChatRequest {
            prompt: prompt.to_string(),
        };
        self.pipeline.post_json(&self.endpoints.chat, &body).await
    }
}

#[async_trait]
impl UploadBackend for UnibotApi {
    async fn upload(&self, file: &UploadFile) -> ApiResult<UploadReceipt> {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.mime_type)
            .map_err(|e| {
                ApiError::Failure(FailureDetail::transport(format!(
                    "Invalid MIME type '{}': {e}",
                    file.mime_type
                )))
            })?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        tracing::debug!(file_name = %file.file_name, bytes = file.len(), "Uploading file");
        self.pipeline
            .post_multipart(&self.endpoints.upload, form)
            .await
    }

    async fn history(&self) -> ApiResult<Vec<UploadHistoryEntry>> {
        let response: HistoryResponse = self.pipeline.get_json(&self.endpoints.history).await?;
        Ok(response.message.unwrap_or_default())
    }
}
