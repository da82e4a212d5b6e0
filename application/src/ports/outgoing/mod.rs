pub mod ban_enforcement;
pub mod ban_store;
