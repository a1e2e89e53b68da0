//! Shared state for the web handlers

use crate::licensing::SharedClient;
use std::path::PathBuf;
use std::sync::Arc;

/// State cloned into every handler
#[derive(Clone)]
pub struct AppState {
    /// Memoizing licensing API client
    pub client: SharedClient,
    /// Logo image served at /logo.png
    pub logo_path: Arc<PathBuf>,
}

impl AppState {
    pub fn new(client: SharedClient, logo_path: PathBuf) -> Self {
        Self {
            client,
            logo_path: Arc::new(logo_path),
        }
    }
}
