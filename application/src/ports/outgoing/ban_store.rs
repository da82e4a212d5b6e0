use std::sync::Arc;
use time::OffsetDateTime;

use crate::error::AppResult;
use domain::{
    ban::{BanRecord, PlayerId},
    page::{BanListQuery, BanPage},
};

/// Keyed store of ban records, one per target.
#[async_trait::async_trait]
pub trait BanStorePort: Send + Sync {
    /// Inserts or fully replaces the record for `record.target_id`, then persists.
    /// On a persistence failure the in-memory change is kept and the error returned.
    async fn set(&self, record: BanRecord) -> AppResult<()>;

    /// Returns `false` when no record exists. On a persistence failure the record stays
    /// removed from memory and the error is returned; a later mutation retries the write.
    async fn remove(&self, target_id: PlayerId) -> AppResult<bool>;

    async fn get(&self, target_id: PlayerId) -> AppResult<Option<BanRecord>>;

    async fn find_by_name(&self, fragment: &str) -> AppResult<Option<BanRecord>>;

    async fn list(&self, query: &BanListQuery) -> AppResult<BanPage>;

    /// Lifts and drops every record expired at `now`, returning what was removed.
    /// On a persistence failure the records stay dropped and the error is returned.
    async fn sweep_expired(&self, now: OffsetDateTime) -> AppResult<Vec<BanRecord>>;

    async fn close(&self);
}

pub type DynBanStorePort = Arc<dyn BanStorePort>;
