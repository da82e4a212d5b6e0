use std::sync::Arc;
use tracing::info;

use banstore_adapters::{
    outgoing::flat_file::{
        ban_store_file::{FlatFileBanStoreAdapter, FlatFileBanStoreConfig},
        blacklist_file::FileBlacklistAdapter,
    },
    shared::app_state::AppState as AdaptersAppState,
};
use banstore_application::{
    ban::service::BanService,
    config::ListingSettings,
    error::AppError,
    infrastructure_config::Config,
    ports::{
        incoming::ban::BanUseCase,
        outgoing::{ban_enforcement::DynBanEnforcementPort, ban_store::DynBanStorePort},
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub ban_service: Arc<dyn BanUseCase>,
}

impl AppState {
    pub async fn new(config: Config) -> Result<Self, AppError> {
        let config = Arc::new(config);

        let enforcement = Self::create_enforcement(&config).await?;
        let ban_store = Self::create_ban_store(&config, Arc::clone(&enforcement)).await?;
        let ban_service = Self::create_ban_service(&config, ban_store, enforcement);

        Ok(Self {
            config,
            ban_service,
        })
    }

    async fn create_enforcement(config: &Config) -> Result<DynBanEnforcementPort, AppError> {
        let blacklist =
            FileBlacklistAdapter::open(config.enforcement.blacklist_file.clone()).await?;
        Ok(Arc::new(blacklist))
    }

    async fn create_ban_store(
        config: &Config,
        enforcement: DynBanEnforcementPort,
    ) -> Result<DynBanStorePort, AppError> {
        let store_config = FlatFileBanStoreConfig::from(&config.storage);
        let store = FlatFileBanStoreAdapter::open(store_config, enforcement).await?;
        info!(path = %config.storage.data_path().display(), "Ban store ready");
        Ok(Arc::new(store))
    }

    fn create_ban_service(
        config: &Config,
        ban_store: DynBanStorePort,
        enforcement: DynBanEnforcementPort,
    ) -> Arc<dyn BanUseCase> {
        Arc::new(BanService::new(
            ban_store,
            enforcement,
            ListingSettings::from(&config.listing),
        ))
    }

    pub fn to_adapters_state(&self) -> AdaptersAppState {
        AdaptersAppState::new(Arc::clone(&self.config), Arc::clone(&self.ban_service))
    }
}
