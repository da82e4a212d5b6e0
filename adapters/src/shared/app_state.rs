use std::sync::Arc;

use banstore_application::{infrastructure_config::Config, ports::incoming::ban::BanUseCase};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub ban_use_case: Arc<dyn BanUseCase>,
}

impl AppState {
    pub fn new(config: Arc<Config>, ban_use_case: Arc<dyn BanUseCase>) -> Self {
        Self {
            config,
            ban_use_case,
        }
    }
}
