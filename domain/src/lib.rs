pub mod ban;
pub mod error;
pub mod page;
