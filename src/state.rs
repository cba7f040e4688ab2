//! Shared application state
//!
//! Cloned into every handler by axum's `State` extractor.

use std::sync::Arc;

use crate::config::EnvironmentConfig;
use crate::repositories::FleetStore;
use crate::services::{AssignmentService, UploadStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn FleetStore>,
    pub config: EnvironmentConfig,
    pub uploads: UploadStore,
    pub assignments: AssignmentService,
}

impl AppState {
    pub fn new(store: Arc<dyn FleetStore>, config: EnvironmentConfig) -> Self {
        let uploads = UploadStore::new(&config.upload_dir, config.max_upload_bytes);
        let assignments = AssignmentService::new(store.clone(), config.availability_policy);
        Self {
            store,
            config,
            uploads,
            assignments,
        }
    }
}
