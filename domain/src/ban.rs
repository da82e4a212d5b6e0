use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt, str::FromStr};
use time::{Duration, OffsetDateTime};

use crate::error::DomainError;

/// Network identity of a player or admin, a 64-bit numeric handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u64);

impl PlayerId {
    #[must_use]
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PlayerId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(PlayerId)
            .map_err(|e| DomainError::InvalidPlayerId(format!("'{s}': {e}")))
    }
}

/// Duration value meaning the ban never expires.
pub const PERMANENT: u32 = 0;

/// Sequences a stored text field may not contain.
pub const RESERVED_SEQUENCES: [&str; 3] = ["><", "\n", "\r"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BanRecord {
    pub target_id: PlayerId,
    pub target_display_name: String,
    pub target_account_name: String,
    pub admin_id: PlayerId,
    pub admin_display_name: String,
    pub admin_account_name: String,
    pub reason: String,
    /// Seconds; [`PERMANENT`] never expires.
    pub duration_secs: u32,
    pub issued_at: OffsetDateTime,
}

impl BanRecord {
    #[must_use]
    pub fn is_permanent(&self) -> bool {
        self.duration_secs == PERMANENT
    }

    #[must_use]
    pub fn expires_at(&self) -> Option<OffsetDateTime> {
        if self.is_permanent() {
            None
        } else {
            Some(self.issued_at + Duration::seconds(i64::from(self.duration_secs)))
        }
    }

    #[must_use]
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        if self.is_permanent() {
            return false;
        }
        (now - self.issued_at).whole_seconds() >= i64::from(self.duration_secs)
    }

    /// Case-insensitive substring match against the target's display and account names.
    #[must_use]
    pub fn matches_name(&self, fragment: &str) -> bool {
        let needle = fragment.to_lowercase();
        self.target_display_name.to_lowercase().contains(&needle)
            || self.target_account_name.to_lowercase().contains(&needle)
    }

    /// Text fields in the order they are stored, paired with their names.
    #[must_use]
    pub fn text_fields(&self) -> [(&'static str, &str); 5] {
        [
            ("target_display_name", &self.target_display_name),
            ("target_account_name", &self.target_account_name),
            ("admin_display_name", &self.admin_display_name),
            ("admin_account_name", &self.admin_account_name),
            ("reason", &self.reason),
        ]
    }

    /// First text field holding a [`RESERVED_SEQUENCES`] entry, with the offending sequence.
    #[must_use]
    pub fn reserved_field(&self) -> Option<(&'static str, &'static str)> {
        self.text_fields().into_iter().find_map(|(field, value)| {
            RESERVED_SEQUENCES
                .into_iter()
                .find(|sequence| value.contains(sequence))
                .map(|sequence| (field, sequence))
        })
    }

    /// Issuance order, oldest first. Equal timestamps fall back to the target id.
    #[must_use]
    pub fn chronological(a: &Self, b: &Self) -> Ordering {
        a.issued_at
            .cmp(&b.issued_at)
            .then_with(|| a.target_id.cmp(&b.target_id))
    }
}

/// Input for issuing a ban; the issuance time is stamped when the record is built.
#[derive(Debug, Clone)]
pub struct BanCommand {
    pub target_id: PlayerId,
    pub target_display_name: String,
    pub target_account_name: String,
    pub admin_id: PlayerId,
    pub admin_display_name: String,
    pub admin_account_name: String,
    pub reason: String,
    pub duration_secs: u32,
}

impl BanCommand {
    #[must_use]
    pub fn into_record(self, issued_at: OffsetDateTime) -> BanRecord {
        BanRecord {
            target_id: self.target_id,
            target_display_name: self.target_display_name,
            target_account_name: self.target_account_name,
            admin_id: self.admin_id,
            admin_display_name: self.admin_display_name,
            admin_account_name: self.admin_account_name,
            reason: self.reason,
            duration_secs: self.duration_secs,
            issued_at: truncate_to_second(issued_at),
        }
    }
}

/// Stored timestamps have whole-second resolution.
#[must_use]
pub fn truncate_to_second(at: OffsetDateTime) -> OffsetDateTime {
    at - Duration::nanoseconds(i64::from(at.nanosecond()))
}
