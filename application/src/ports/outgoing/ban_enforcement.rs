use std::sync::Arc;

use crate::error::AppResult;
use domain::ban::PlayerId;

/// The mechanism that actually refuses connections from banned players.
#[async_trait::async_trait]
pub trait BanEnforcementPort: Send + Sync {
    async fn ban(&self, target_id: PlayerId) -> AppResult<()>;

    async fn unban(&self, target_id: PlayerId) -> AppResult<()>;

    async fn save(&self) -> AppResult<()>;
}

pub type DynBanEnforcementPort = Arc<dyn BanEnforcementPort>;
