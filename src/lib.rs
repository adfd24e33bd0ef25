pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod storage;
pub mod telemetry;
pub mod utils;

use std::sync::Arc;

use crate::config::Config;
use crate::database::{postgres::PgStore, store::InterviewStore};
use crate::services::interview_service::InterviewService;
use crate::storage::{MediaStorage, PublicMediaStorage};
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn InterviewStore>,
    pub interview_service: InterviewService,
}

impl AppState {
    pub fn new(store: Arc<dyn InterviewStore>, media: Arc<dyn MediaStorage>) -> Self {
        let interview_service = InterviewService::new(store.clone(), media);
        Self {
            store,
            interview_service,
        }
    }

    pub fn from_pool(pool: PgPool, config: &Config) -> Self {
        Self::new(
            Arc::new(PgStore::new(pool)),
            Arc::new(PublicMediaStorage::from_config(config)),
        )
    }
}
