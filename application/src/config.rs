use crate::infrastructure_config::ListingConfig;

#[derive(Debug, Clone, Copy)]
pub struct ListingSettings {
    pub max_page_size: usize,
}

impl From<&ListingConfig> for ListingSettings {
    fn from(config: &ListingConfig) -> Self {
        Self {
            max_page_size: config.max_page_size,
        }
    }
}
