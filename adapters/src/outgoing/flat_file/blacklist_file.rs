use std::collections::BTreeSet;
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use banstore_application::{
    error::AppResult, ports::outgoing::ban_enforcement::BanEnforcementPort,
};
use domain::ban::PlayerId;

use super::line_codec::is_record_line;
use super::utils::{ensure_parent_dir, read_lossy, write_atomically};

const BLACKLIST_HEADER: &str = "## Blocked player ids, one per line";

/// Connection blacklist kept as a file of player ids.
///
/// Changes stay in memory until [`BanEnforcementPort::save`] writes them out.
pub struct FileBlacklistAdapter {
    path: PathBuf,
    blocked: Mutex<BTreeSet<PlayerId>>,
}

impl FileBlacklistAdapter {
    #[instrument(skip_all, fields(path = %path.display()))]
    pub async fn open(path: PathBuf) -> AppResult<Self> {
        let blocked = match read_lossy(&path).await? {
            Some(contents) => parse_blacklist(&contents),
            None => BTreeSet::new(),
        };

        info!(count = blocked.len(), "Blacklist loaded");

        Ok(Self {
            path,
            blocked: Mutex::new(blocked),
        })
    }
}

#[async_trait::async_trait]
impl BanEnforcementPort for FileBlacklistAdapter {
    async fn ban(&self, target_id: PlayerId) -> AppResult<()> {
        self.blocked.lock().await.insert(target_id);
        Ok(())
    }

    async fn unban(&self, target_id: PlayerId) -> AppResult<()> {
        self.blocked.lock().await.remove(&target_id);
        Ok(())
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn save(&self) -> AppResult<()> {
        let blocked = self.blocked.lock().await;

        let mut contents = String::from(BLACKLIST_HEADER);
        contents.push('\n');
        for player_id in blocked.iter() {
            contents.push_str(&player_id.to_string());
            contents.push('\n');
        }

        ensure_parent_dir(&self.path).await?;
        write_atomically(&self.path, contents.as_bytes()).await
    }
}

fn parse_blacklist(contents: &str) -> BTreeSet<PlayerId> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| is_record_line(line))
        .filter_map(|(index, line)| match line.parse::<PlayerId>() {
            Ok(player_id) => Some(player_id),
            Err(e) => {
                warn!(line = index + 1, error = %e, "Skipping invalid blacklist entry");
                None
            }
        })
        .collect()
}
