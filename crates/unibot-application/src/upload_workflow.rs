//! Upload workflow for the admin surface.
//!
//! Same shape as a chat send without the placeholder: validate locally, mark
//! the workflow busy, await the request, then settle and refresh the history.

use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use unibot_core::api::{ApiError, ApiResult, UploadBackend, UploadReceipt};
use unibot_core::error::{Result, UnibotError};
use unibot_core::navigation::Notifier;
use unibot_core::upload::{UploadFile, UploadHistoryEntry, validate_selection};

pub const UPLOAD_SUCCEEDED: &str = "Uploaded successfully";
pub const UPLOAD_FAILED: &str = "Upload failed.";
pub const HISTORY_FAILED: &str = "Failed to load upload history";

#[derive(Debug, Default)]
struct UploadState {
    history: Vec<UploadHistoryEntry>,
    uploading: bool,
}

/// How an upload attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Refused before any request: invalid file, or an upload already running.
    Rejected,
    /// The server accepted the file. `history_refresh` tells whether the
    /// follow-up history fetch worked.
    Uploaded {
        receipt: UploadReceipt,
        history_refresh: ApiResult<()>,
    },
    Failed(ApiError),
}

impl UploadOutcome {
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            UploadOutcome::Rejected => None,
            UploadOutcome::Uploaded {
                history_refresh, ..
            } => history_refresh.as_ref().err(),
            UploadOutcome::Failed(err) => Some(err),
        }
    }
}

pub struct UploadWorkflow {
    backend: Arc<dyn UploadBackend>,
    notifier: Arc<dyn Notifier>,
    max_upload_bytes: u64,
    state: Mutex<UploadState>,
}

impl UploadWorkflow {
    pub fn new(
        backend: Arc<dyn UploadBackend>,
        notifier: Arc<dyn Notifier>,
        max_upload_bytes: u64,
    ) -> Self {
        Self {
            backend,
            notifier,
            max_upload_bytes,
            state: Mutex::new(UploadState::default()),
        }
    }

    pub async fn history(&self) -> Vec<UploadHistoryEntry> {
        self.state.lock().await.history.clone()
    }

    pub async fn is_uploading(&self) -> bool {
        self.state.lock().await.uploading
    }

    /// Reads and validates the selected file. Validation problems are shown
    /// to the user and returned as [`UnibotError::Validation`].
    pub async fn select(&self, path: Option<&Path>) -> Result<UploadFile> {
        let result = self.read_selection(path).await;
        if let Err(err) = &result {
            match err {
                UnibotError::Validation(text) => self.notifier.error(text),
                other => self.notifier.error(&other.to_string()),
            }
        }
        result
    }

    async fn read_selection(&self, path: Option<&Path>) -> Result<UploadFile> {
        // Selection and type first, so a wrong extension never hits the disk.
        validate_selection(path, 0, self.max_upload_bytes)?;
        let path = path.ok_or_else(|| UnibotError::internal("missing upload path"))?;

        let size = tokio::fs::metadata(path).await?.len();
        let mime_type = validate_selection(Some(path), size, self.max_upload_bytes)?;
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.json".to_string());

        Ok(UploadFile {
            file_name,
            mime_type,
            bytes,
        })
    }

    /// Validates and uploads the file at `path`, then refreshes the history.
    pub async fn upload(&self, path: Option<&Path>) -> UploadOutcome {
        {
            let mut state = self.state.lock().await;
            if state.uploading {
                tracing::debug!("[UploadWorkflow] Upload already running; ignoring");
                return UploadOutcome::Rejected;
            }
            state.uploading = true;
        }

        let outcome = self.run_upload(path).await;

        self.state.lock().await.uploading = false;
        outcome
    }

    async fn run_upload(&self, path: Option<&Path>) -> UploadOutcome {
        let Ok(file) = self.select(path).await else {
            return UploadOutcome::Rejected;
        };

        match self.backend.upload(&file).await {
            Ok(receipt) => {
                tracing::info!(
                    "[UploadWorkflow] Uploaded {} (inserted={:?}, skipped={:?})",
                    file.file_name,
                    receipt.inserted,
                    receipt.skipped
                );
                self.notifier.success(UPLOAD_SUCCEEDED);
                let history_refresh = self.refresh_history().await;
                UploadOutcome::Uploaded {
                    receipt,
                    history_refresh,
                }
            }
            Err(err) => {
                tracing::warn!("[UploadWorkflow] Upload of {} failed: {}", file.file_name, err);
                self.notifier
                    .error(err.server_message().unwrap_or(UPLOAD_FAILED));
                UploadOutcome::Failed(err)
            }
        }
    }

    /// Replaces the history wholesale with the server's list. On failure
    /// the previous list is kept.
    pub async fn refresh_history(&self) -> ApiResult<()> {
        match self.backend.history().await {
            Ok(entries) => {
                tracing::debug!("[UploadWorkflow] History refreshed ({} entries)", entries.len());
                self.state.lock().await.history = entries;
                Ok(())
            }
            Err(err) => {
                tracing::warn!("[UploadWorkflow] History refresh failed: {}", err);
                self.notifier.error(HISTORY_FAILED);
                Err(err)
            }
        }
    }
}
