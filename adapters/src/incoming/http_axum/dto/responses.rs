use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use domain::{ban::BanRecord, page::BanPage};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    #[must_use]
    pub fn success() -> Self {
        Self {
            ok: true,
            error: None,
            data: None,
        }
    }

    #[must_use]
    pub fn success_with_data(data: Option<T>) -> Self {
        Self {
            ok: true,
            error: None,
            data,
        }
    }
}

fn format_datetime(dt: OffsetDateTime) -> String {
    dt.format(&Rfc3339).unwrap_or_else(|_| dt.to_string())
}

/// Identities are rendered as strings; 64-bit ids do not survive JSON number parsing in every client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BanResponse {
    pub target_id: String,
    pub target_display_name: String,
    pub target_account_name: String,
    pub admin_id: String,
    pub admin_display_name: String,
    pub admin_account_name: String,
    pub reason: String,
    pub duration_secs: u32,
    pub permanent: bool,
    pub issued_at: String,
    pub expires_at: Option<String>,
}

impl From<BanRecord> for BanResponse {
    fn from(record: BanRecord) -> Self {
        Self {
            target_id: record.target_id.to_string(),
            admin_id: record.admin_id.to_string(),
            duration_secs: record.duration_secs,
            permanent: record.is_permanent(),
            issued_at: format_datetime(record.issued_at),
            expires_at: record.expires_at().map(format_datetime),
            target_display_name: record.target_display_name,
            target_account_name: record.target_account_name,
            admin_display_name: record.admin_display_name,
            admin_account_name: record.admin_account_name,
            reason: record.reason,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BanPageResponse {
    /// 1-based rank of the first entry on this page, counted from the oldest match.
    pub start_rank: usize,
    pub total_matches: usize,
    pub page_size: usize,
    pub page: usize,
    pub bans: Vec<BanResponse>,
}

impl BanPageResponse {
    pub fn new(page: BanPage, page_size: usize, page_number: usize) -> Self {
        Self {
            start_rank: page.start_rank,
            total_matches: page.total_matches,
            page_size,
            page: page_number,
            bans: page.records.into_iter().map(BanResponse::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepResponse {
    pub lifted: usize,
    pub bans: Vec<BanResponse>,
}

impl From<Vec<BanRecord>> for SweepResponse {
    fn from(records: Vec<BanRecord>) -> Self {
        Self {
            lifted: records.len(),
            bans: records.into_iter().map(BanResponse::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub environment: String,
    pub sweep_enabled: bool,
}
