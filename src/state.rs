//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub config: Arc<EnvironmentConfig>,
}

impl AppState {
    pub fn new(store: Store, config: EnvironmentConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}
