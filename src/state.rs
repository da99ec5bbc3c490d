use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::db::UnitOfWork;

#[derive(Clone)]
pub struct AppState {
    pub uow: UnitOfWork,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: AppConfig) -> Self {
        Self {
            uow: UnitOfWork::new(db),
            config,
        }
    }
}
