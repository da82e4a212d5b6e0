use crate::error::AppResult;
use domain::{
    ban::{BanCommand, BanRecord, PlayerId},
    page::{BanListQuery, BanPage},
};

#[async_trait::async_trait]
pub trait BanUseCase: Send + Sync {
    async fn ban_player(&self, command: BanCommand) -> AppResult<BanRecord>;

    async fn unban_player(&self, target_id: PlayerId) -> AppResult<bool>;

    async fn get_ban(&self, target_id: PlayerId) -> AppResult<Option<BanRecord>>;

    async fn find_ban_by_name(&self, fragment: &str) -> AppResult<Option<BanRecord>>;

    async fn list_bans(&self, query: BanListQuery) -> AppResult<BanPage>;

    async fn sweep_expired(&self) -> AppResult<Vec<BanRecord>>;

    async fn shutdown(&self);
}
