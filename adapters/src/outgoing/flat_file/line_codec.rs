//! Line format of the ban data file.
//!
//! Each record is one line of nine fields joined by [`DELIMITER`]:
//! `target_id><target_display_name><target_account_name><admin_id><admin_display_name><admin_account_name><reason><duration><issued_at`.
//! Files written by older versions separate fields with [`LEGACY_DELIMITER`]; that form is
//! read only when a line contains no modern delimiter and is never written.
//!
//! `issued_at` is whole UNIX seconds. Data files from the original plugin stored
//! serialized .NET `DateTime` values there instead; those are not converted and load
//! as the epoch with a warning, so their timed bans read as already expired.

use thiserror::Error;
use time::OffsetDateTime;
use tracing::warn;

use domain::{
    ban::{BanRecord, PERMANENT, PlayerId},
    error::DomainError,
};

pub const DELIMITER: &str = "><";
pub const LEGACY_DELIMITER: char = '/';
pub const COMMENT_PREFIX: &str = "##";
pub const FIELD_COUNT: usize = 9;
pub const FILE_HEADER: &str = "## Data file for ban records, format: target_id><target_display_name><target_account_name><admin_id><admin_display_name><admin_account_name><reason><duration><issued_at";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LineError {
    #[error("wrong number of values, {found} of 9")]
    WrongFieldCount { found: usize },

    #[error("invalid {field}: {source}")]
    InvalidId {
        field: &'static str,
        #[source]
        source: DomainError,
    },

    #[error("{field} contains a reserved sequence")]
    ReservedSequence { field: &'static str },
}

/// Blank lines and `##` comments carry no record.
pub fn is_record_line(line: &str) -> bool {
    !line.trim().is_empty() && !line.starts_with(COMMENT_PREFIX)
}

pub fn decode(line: &str) -> Result<BanRecord, LineError> {
    let fields: Vec<&str> = if line.contains(DELIMITER) {
        line.split(DELIMITER).collect()
    } else {
        line.split(LEGACY_DELIMITER).collect()
    };

    let [
        target_id,
        target_display_name,
        target_account_name,
        admin_id,
        admin_display_name,
        admin_account_name,
        reason,
        duration,
        issued_at,
    ] = fields.as_slice()
    else {
        return Err(LineError::WrongFieldCount {
            found: fields.len(),
        });
    };

    Ok(BanRecord {
        target_id: decode_id("target_id", target_id)?,
        target_display_name: (*target_display_name).to_string(),
        target_account_name: (*target_account_name).to_string(),
        admin_id: decode_id("admin_id", admin_id)?,
        admin_display_name: (*admin_display_name).to_string(),
        admin_account_name: (*admin_account_name).to_string(),
        reason: (*reason).to_string(),
        duration_secs: decode_duration(duration),
        issued_at: decode_timestamp(issued_at),
    })
}

pub fn encode(record: &BanRecord) -> Result<String, LineError> {
    if let Some((field, _)) = record.reserved_field() {
        return Err(LineError::ReservedSequence { field });
    }

    Ok([
        record.target_id.to_string(),
        record.target_display_name.clone(),
        record.target_account_name.clone(),
        record.admin_id.to_string(),
        record.admin_display_name.clone(),
        record.admin_account_name.clone(),
        record.reason.clone(),
        record.duration_secs.to_string(),
        record.issued_at.unix_timestamp().to_string(),
    ]
    .join(DELIMITER))
}

fn decode_id(field: &'static str, raw: &str) -> Result<PlayerId, LineError> {
    raw.parse()
        .map_err(|source| LineError::InvalidId { field, source })
}

// Unreadable durations fall back to permanent.
fn decode_duration(raw: &str) -> u32 {
    raw.trim().parse().unwrap_or(PERMANENT)
}

fn decode_timestamp(raw: &str) -> OffsetDateTime {
    let parsed = raw
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(|secs| OffsetDateTime::from_unix_timestamp(secs).ok());

    parsed.unwrap_or_else(|| {
        warn!(raw, "Unreadable issue time, treating the ban as issued at the epoch");
        OffsetDateTime::UNIX_EPOCH
    })
}
