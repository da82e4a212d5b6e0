use std::sync::Arc;
use time::OffsetDateTime;

use crate::config::ListingSettings;
use crate::error::{AppError, AppResult};
use crate::ports::incoming::ban::BanUseCase;
use crate::ports::outgoing::{ban_enforcement::BanEnforcementPort, ban_store::BanStorePort};
use domain::{
    ban::{BanCommand, BanRecord, PlayerId},
    error::DomainError,
    page::{BanListQuery, BanPage},
};

pub struct BanService {
    ban_store: Arc<dyn BanStorePort>,
    enforcement: Arc<dyn BanEnforcementPort>,
    listing: ListingSettings,
}

impl BanService {
    pub fn new(
        ban_store: Arc<dyn BanStorePort>,
        enforcement: Arc<dyn BanEnforcementPort>,
        listing: ListingSettings,
    ) -> Self {
        Self {
            ban_store,
            enforcement,
            listing,
        }
    }

    fn validate_record(record: &BanRecord) -> AppResult<()> {
        if record.reason.trim().is_empty() {
            return Err(AppError::ValidationError {
                message: "reason cannot be empty".to_string(),
            });
        }

        if let Some((field, sequence)) = record.reserved_field() {
            return Err(AppError::ValidationError {
                message: format!("{field} cannot contain {sequence:?}"),
            });
        }

        Ok(())
    }

    async fn apply_enforcement(&self, target_id: PlayerId) -> AppResult<()> {
        self.enforcement.ban(target_id).await?;
        self.enforcement.save().await
    }

    async fn lift_enforcement(&self, target_id: PlayerId) -> AppResult<()> {
        self.enforcement.unban(target_id).await?;
        self.enforcement.save().await
    }

    fn validate_query(&self, query: &BanListQuery) -> AppResult<()> {
        if query.page_size == 0 || query.page_size > self.listing.max_page_size {
            return Err(DomainError::InvalidPagination(format!(
                "page_size must be between 1 and {}",
                self.listing.max_page_size
            ))
            .into());
        }

        if query.page_number == 0 {
            return Err(
                DomainError::InvalidPagination("page numbers start at 1".to_string()).into(),
            );
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl BanUseCase for BanService {
    async fn ban_player(&self, command: BanCommand) -> AppResult<BanRecord> {
        let record = command.into_record(OffsetDateTime::now_utc());
        Self::validate_record(&record)?;

        if let Err(e) = self.ban_store.set(record.clone()).await {
            // A failed write keeps the record in the index, so enforcement must follow it.
            if self.ban_store.get(record.target_id).await?.as_ref() == Some(&record) {
                self.apply_enforcement(record.target_id).await?;
            }
            return Err(e);
        }
        self.apply_enforcement(record.target_id).await?;

        tracing::info!(
            target_id = %record.target_id,
            admin_id = %record.admin_id,
            duration_secs = record.duration_secs,
            "Player banned"
        );

        Ok(record)
    }

    async fn unban_player(&self, target_id: PlayerId) -> AppResult<bool> {
        let removed = match self.ban_store.remove(target_id).await {
            Ok(removed) => removed,
            Err(e) => {
                // The record may already be gone from the index even though the write failed.
                if self.ban_store.get(target_id).await?.is_none() {
                    self.lift_enforcement(target_id).await?;
                    tracing::warn!(target_id = %target_id, error = %e, "Player unbanned but the ban file is stale");
                }
                return Err(e);
            }
        };

        if removed {
            self.lift_enforcement(target_id).await?;
            tracing::info!(target_id = %target_id, "Player unbanned");
        }

        Ok(removed)
    }

    async fn get_ban(&self, target_id: PlayerId) -> AppResult<Option<BanRecord>> {
        self.ban_store.get(target_id).await
    }

    async fn find_ban_by_name(&self, fragment: &str) -> AppResult<Option<BanRecord>> {
        self.ban_store.find_by_name(fragment).await
    }

    async fn list_bans(&self, query: BanListQuery) -> AppResult<BanPage> {
        self.validate_query(&query)?;
        self.ban_store.list(&query).await
    }

    async fn sweep_expired(&self) -> AppResult<Vec<BanRecord>> {
        let lifted = self
            .ban_store
            .sweep_expired(OffsetDateTime::now_utc())
            .await?;

        if !lifted.is_empty() {
            tracing::info!(count = lifted.len(), "Expired bans lifted");
        }

        Ok(lifted)
    }

    async fn shutdown(&self) {
        self.ban_store.close().await;
    }
}
