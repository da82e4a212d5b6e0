pub mod ban;
pub mod health;
