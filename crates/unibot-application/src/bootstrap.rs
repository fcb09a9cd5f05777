//! Composition root: wires the credential store, the API client and the
//! services behind a [`Dispatcher`].

use crate::auth_service::AuthService;
use crate::chat_service::ChatService;
use crate::dispatcher::Dispatcher;
use crate::upload_workflow::UploadWorkflow;
use anyhow::{Result, anyhow};
use std::sync::Arc;
use unibot_core::config::ClientConfig;
use unibot_core::credential::CredentialStore;
use unibot_core::navigation::{Navigator, Notifier};
use unibot_infrastructure::FileCredentialStore;
use unibot_interaction::UnibotApi;

pub struct AppBootstrap {
    pub config: ClientConfig,
    pub store: Arc<dyn CredentialStore>,
    pub dispatcher: Arc<Dispatcher>,
}

impl AppBootstrap {
    /// Builds the application around the on-disk session file.
    pub fn new(
        config: ClientConfig,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let store = FileCredentialStore::new()
            .map_err(|e| anyhow!("Failed to locate session file: {}", e))?;
        tracing::info!("[Bootstrap] Session file: {:?}", store.path());
        Self::with_store(config, Arc::new(store), navigator, notifier)
    }

    /// Builds the application around an existing credential store.
    pub fn with_store(
        config: ClientConfig,
        store: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let api = Arc::new(
            UnibotApi::new(&config, store.clone())
                .map_err(|e| anyhow!("Failed to create API client: {}", e))?,
        );
        tracing::info!(
            "[Bootstrap] Backend: {} (timeout: {:?})",
            api.pipeline().base_url(),
            config.request_timeout()
        );

        let chat = Arc::new(ChatService::new(api.clone(), notifier.clone()));
        let uploads = Arc::new(UploadWorkflow::new(
            api.clone(),
            notifier.clone(),
            config.max_upload_bytes,
        ));
        let auth = Arc::new(AuthService::new(api, store.clone(), notifier));

        let dispatcher = Arc::new(Dispatcher::new(
            chat,
            uploads,
            auth,
            navigator,
            config.logout_redirect_delay(),
        ));

        Ok(Self {
            config,
            store,
            dispatcher,
        })
    }
}
