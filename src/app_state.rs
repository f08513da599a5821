use std::sync::Arc;

use crate::{
    api::{AdminApi, ApiClient, WebsiteApi},
    config::AppConfig,
    session::{FileStore, SessionIdProvider},
    ui::{TerminalUi, Ui},
};

/// Colaboradores compartidos por los componentes de una página.
#[derive(Clone)]
pub struct AppState {
    pub website: Arc<dyn WebsiteApi>,
    pub admin: Arc<dyn AdminApi>,
    pub sessions: SessionIdProvider,
    pub ui: Arc<dyn Ui>,
}

impl AppState {
    /// Cliente HTTP real, almacén en fichero y front-end de terminal.
    pub fn from_config(cfg: &AppConfig) -> Self {
        let client = Arc::new(ApiClient::new(cfg.base_url.clone()));
        Self {
            website: client.clone(),
            admin: client,
            sessions: SessionIdProvider::new(Arc::new(FileStore::new(&cfg.storage_path))),
            ui: Arc::new(TerminalUi),
        }
    }
}
