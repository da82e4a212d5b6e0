use std::collections::HashMap;
use std::path::PathBuf;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

use banstore_application::{
    error::AppResult,
    infrastructure_config::StorageConfig,
    ports::outgoing::{ban_enforcement::DynBanEnforcementPort, ban_store::BanStorePort},
};
use domain::{
    ban::{BanRecord, PlayerId},
    page::{BanListQuery, BanPage},
};

use super::line_codec::{self, FIELD_COUNT, FILE_HEADER, LineError};
use super::utils::{append, ensure_parent_dir, read_lossy, rotate_backup, write_atomically};

#[derive(Debug, Clone)]
pub struct FlatFileBanStoreConfig {
    pub data_path: PathBuf,
    pub backup_path: PathBuf,
    pub expired_export_path: PathBuf,
    pub enable_expired_export: bool,
}

impl From<&StorageConfig> for FlatFileBanStoreConfig {
    fn from(storage: &StorageConfig) -> Self {
        Self {
            data_path: storage.data_path(),
            backup_path: storage.backup_path(),
            expired_export_path: storage.expired_export_path(),
            enable_expired_export: storage.enable_expired_export,
        }
    }
}

type BanIndex = HashMap<PlayerId, BanRecord>;

struct IndexState {
    records: BanIndex,
    /// The last rewrite failed, so the file lags behind `records`.
    unsaved: bool,
}

impl IndexState {
    async fn persist(&mut self, config: &FlatFileBanStoreConfig) -> AppResult<()> {
        let result = persist(config, &self.records).await;
        self.unsaved = result.is_err();
        result
    }

    async fn flush_unsaved(&mut self, config: &FlatFileBanStoreConfig) -> AppResult<()> {
        if self.unsaved {
            info!("Retrying write of unsaved ban records");
            self.persist(config).await?;
        }
        Ok(())
    }
}

/// Ban records held in memory and mirrored to a flat text file on every change.
///
/// One lock guards both the index and the file: writers hold it across the file
/// rewrite, so the file always reflects a single, complete version of the index.
/// A failed rewrite leaves the index changed; the next mutation or sweep writes it again.
pub struct FlatFileBanStoreAdapter {
    config: FlatFileBanStoreConfig,
    state: RwLock<IndexState>,
    enforcement: DynBanEnforcementPort,
}

impl FlatFileBanStoreAdapter {
    /// Loads the data file, creating it with only the header when it does not exist.
    #[instrument(skip(enforcement), fields(path = %config.data_path.display()))]
    pub async fn open(
        config: FlatFileBanStoreConfig,
        enforcement: DynBanEnforcementPort,
    ) -> AppResult<Self> {
        let records = match read_lossy(&config.data_path).await? {
            Some(contents) => parse_index(&contents),
            None => {
                let empty = BanIndex::new();
                persist(&config, &empty).await?;
                info!("Created empty ban data file");
                empty
            }
        };

        info!(count = records.len(), "Ban records loaded");

        Ok(Self {
            config,
            state: RwLock::new(IndexState {
                records,
                unsaved: false,
            }),
            enforcement,
        })
    }

    async fn lift_enforcement(&self, expired: &[BanRecord]) {
        for record in expired {
            if let Err(e) = self.enforcement.unban(record.target_id).await {
                warn!(target_id = %record.target_id, error = %e, "Failed to lift enforcement for expired ban");
            }
            if let Err(e) = self.enforcement.save().await {
                warn!(target_id = %record.target_id, error = %e, "Failed to save enforcement state");
            }
        }
    }

    async fn export_expired(&self, expired: &[BanRecord]) -> AppResult<()> {
        let path = &self.config.expired_export_path;
        ensure_parent_dir(path).await?;
        append(path, render_lines(expired.iter()).as_bytes()).await?;
        info!(count = expired.len(), path = %path.display(), "Exported expired bans");
        Ok(())
    }
}

#[async_trait::async_trait]
impl BanStorePort for FlatFileBanStoreAdapter {
    #[instrument(skip(self, record), fields(target_id = %record.target_id))]
    async fn set(&self, record: BanRecord) -> AppResult<()> {
        let mut state = self.state.write().await;
        state.records.insert(record.target_id, record);
        state.persist(&self.config).await
    }

    #[instrument(skip(self))]
    async fn remove(&self, target_id: PlayerId) -> AppResult<bool> {
        let mut state = self.state.write().await;
        if state.records.remove(&target_id).is_none() {
            state.flush_unsaved(&self.config).await?;
            return Ok(false);
        }
        state.persist(&self.config).await?;
        Ok(true)
    }

    async fn get(&self, target_id: PlayerId) -> AppResult<Option<BanRecord>> {
        Ok(self.state.read().await.records.get(&target_id).cloned())
    }

    async fn find_by_name(&self, fragment: &str) -> AppResult<Option<BanRecord>> {
        let state = self.state.read().await;
        Ok(state
            .records
            .values()
            .filter(|record| record.matches_name(fragment))
            .min_by(|a, b| BanRecord::chronological(a, b))
            .cloned())
    }

    async fn list(&self, query: &BanListQuery) -> AppResult<BanPage> {
        let mut matches: Vec<BanRecord> = {
            let state = self.state.read().await;
            state
                .records
                .values()
                .filter(|record| query.search.is_empty() || record.matches_name(&query.search))
                .cloned()
                .collect()
        };
        matches.sort_by(BanRecord::chronological);
        Ok(BanPage::from_sorted(matches, query))
    }

    #[instrument(skip(self))]
    async fn sweep_expired(&self, now: OffsetDateTime) -> AppResult<Vec<BanRecord>> {
        let mut state = self.state.write().await;

        let mut expired: Vec<BanRecord> = state
            .records
            .values()
            .filter(|record| record.is_expired_at(now))
            .cloned()
            .collect();
        if expired.is_empty() {
            state.flush_unsaved(&self.config).await?;
            return Ok(expired);
        }
        expired.sort_by(BanRecord::chronological);

        self.lift_enforcement(&expired).await;

        if self.config.enable_expired_export {
            if let Err(e) = self.export_expired(&expired).await {
                warn!(error = %e, "Failed to export expired bans");
            }
        }

        for record in &expired {
            state.records.remove(&record.target_id);
        }
        state.persist(&self.config).await?;

        Ok(expired)
    }

    async fn close(&self) {
        self.state.write().await.records.clear();
        info!("Ban store closed");
    }
}

fn parse_index(contents: &str) -> BanIndex {
    let lines: Vec<&str> = contents.lines().collect();
    let total = lines.len();
    let mut records = BanIndex::new();

    for (index, line) in lines.iter().enumerate() {
        if !line_codec::is_record_line(line) {
            continue;
        }

        match line_codec::decode(line) {
            // Later duplicates replace earlier ones.
            Ok(record) => {
                records.insert(record.target_id, record);
            }
            Err(LineError::WrongFieldCount { found }) => {
                warn!(
                    line = index + 1,
                    found,
                    expected = FIELD_COUNT,
                    "Skipping ban entry with the wrong number of values"
                );
            }
            Err(e) => {
                warn!(
                    line = index + 1,
                    total,
                    error = %e,
                    "Skipping ban entry that failed to parse"
                );
            }
        }
    }

    records
}

fn render_lines<'a>(records: impl Iterator<Item = &'a BanRecord>) -> String {
    let mut out = String::new();
    for record in records {
        match line_codec::encode(record) {
            Ok(line) => {
                out.push_str(&line);
                out.push('\n');
            }
            Err(e) => {
                warn!(target_id = %record.target_id, error = %e, "Omitting ban entry that cannot be written");
            }
        }
    }
    out
}

/// Rotates the backup from the current file, then atomically rewrites the file from `records`.
async fn persist(config: &FlatFileBanStoreConfig, records: &BanIndex) -> AppResult<()> {
    ensure_parent_dir(&config.data_path).await?;
    rotate_backup(&config.data_path, &config.backup_path).await?;

    let mut contents = String::with_capacity(FILE_HEADER.len() + 1);
    contents.push_str(FILE_HEADER);
    contents.push('\n');
    contents.push_str(&render_lines(records.values()));

    write_atomically(&config.data_path, contents.as_bytes()).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parse_skips_comments_blanks_and_bad_lines() {
        let contents = format!(
            "{FILE_HEADER}\n\n1><a><b><9><c><d><r><0><100\n2><a><b><9><c><d><r\nnot-a-number><a><b><9><c><d><r><0><0\n3/x/y/9/c/d/r/60/200\n"
        );

        let index = parse_index(&contents);

        assert_eq!(index.len(), 2);
        assert!(index.contains_key(&PlayerId(1)));
        assert!(index.contains_key(&PlayerId(3)));
    }

    #[test]
    fn parse_keeps_the_last_duplicate() {
        let contents = "7><first><a><9><c><d><old><0><100\n7><second><a><9><c><d><new><0><200\n";

        let index = parse_index(contents);

        assert_eq!(index.len(), 1);
        assert_eq!(index.get(&PlayerId(7)).unwrap().reason, "new");
    }

    #[test]
    fn render_omits_unwritable_records() {
        let good = line_codec::decode("1><a><b><9><c><d><r><0><100").unwrap();
        let mut bad = good.clone();
        bad.target_id = PlayerId(2);
        bad.reason = "broken><reason".to_string();

        let rendered = render_lines([&good, &bad].into_iter());

        assert_eq!(rendered, "1><a><b><9><c><d><r><0><100\n");
    }
}
