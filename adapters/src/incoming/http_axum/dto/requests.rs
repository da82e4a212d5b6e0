use serde::{Deserialize, Serialize};
use validator::Validate;

use domain::{
    ban::{BanCommand, PlayerId},
    error::DomainError,
};

/// A player id sent either as a JSON number or as a decimal string.
///
/// Responses render ids as strings, so clients may echo them back in that form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlayerIdInput {
    Number(u64),
    Text(String),
}

impl PlayerIdInput {
    pub fn resolve(&self) -> Result<PlayerId, DomainError> {
        match self {
            Self::Number(raw) => Ok(PlayerId::new(*raw)),
            Self::Text(raw) => raw.parse(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BanPlayerRequest {
    #[serde(default)]
    #[validate(length(max = 64, message = "Display name cannot exceed 64 characters"))]
    pub target_display_name: String,

    #[serde(default)]
    #[validate(length(max = 64, message = "Account name cannot exceed 64 characters"))]
    pub target_account_name: String,

    pub admin_id: PlayerIdInput,

    #[serde(default)]
    #[validate(length(max = 64, message = "Display name cannot exceed 64 characters"))]
    pub admin_display_name: String,

    #[serde(default)]
    #[validate(length(max = 64, message = "Account name cannot exceed 64 characters"))]
    pub admin_account_name: String,

    #[validate(length(
        min = 1,
        max = 256,
        message = "Reason must be between 1 and 256 characters"
    ))]
    pub reason: String,

    /// Seconds until the ban lapses; omitted or zero means permanent.
    #[serde(default)]
    pub duration_secs: u32,
}

impl BanPlayerRequest {
    pub fn into_command(self, target_id: PlayerId) -> Result<BanCommand, DomainError> {
        Ok(BanCommand {
            target_id,
            target_display_name: self.target_display_name,
            target_account_name: self.target_account_name,
            admin_id: self.admin_id.resolve()?,
            admin_display_name: self.admin_display_name,
            admin_account_name: self.admin_account_name,
            reason: self.reason,
            duration_secs: self.duration_secs,
        })
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NameSearchQuery {
    #[validate(length(min = 1, message = "Name fragment cannot be empty"))]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ListBansQuery {
    #[serde(default)]
    pub search: Option<String>,

    #[validate(range(min = 1, message = "page_size must be at least 1"))]
    pub page_size: Option<usize>,

    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: Option<usize>,
}
