use banstore_application::infrastructure_config::{Config, StorageConfig, SweepConfig};
use tracing::info;

pub fn print_startup_info(config: &Config) {
    info!("Configuration:");
    info!("  Environment: {}", config.environment.env);
    print_storage_info(&config.storage);
    info!(
        "  Blacklist: {}",
        config.enforcement.blacklist_file.display()
    );
    print_sweep_info(&config.sweep);
    info!(
        "  Listing: {} per page by default, at most {}",
        config.listing.default_page_size, config.listing.max_page_size
    );
}

fn print_storage_info(storage: &StorageConfig) {
    info!("  Ban data: {}", storage.data_path().display());
    info!("  Backup: {}", storage.backup_path().display());
    if storage.enable_expired_export {
        info!(
            "  Expired export: {}",
            storage.expired_export_path().display()
        );
    } else {
        info!("  Expired export: DISABLED");
    }
}

fn print_sweep_info(sweep: &SweepConfig) {
    if sweep.enabled {
        info!("  Expiry sweep: every {}s", sweep.interval_secs);
    } else {
        info!("  Expiry sweep: DISABLED");
    }
}
