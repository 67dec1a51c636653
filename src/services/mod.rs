//! Business logic services

pub mod auth;
pub mod catalog;
pub mod mirror;
pub mod stats;

use std::sync::Arc;

use crate::{config::AppConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub repository: Repository,
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
    pub stats: stats::StatsService,
}

impl Services {
    /// Create all services with the given repository and mirror
    pub fn new(repository: Repository, config: &AppConfig, mirror: Arc<dyn mirror::BookMirror>) -> Self {
        Self {
            auth: auth::AuthService::new(repository.clone(), config.auth.clone()),
            catalog: catalog::CatalogService::new(
                repository.clone(),
                mirror.clone(),
                config.mirror.sync_on_write,
            ),
            stats: stats::StatsService::new(mirror),
            repository,
        }
    }
}
