#[cfg(any(feature = "adapters", feature = "axum"))]
compile_error!("application must not depend on adapters/framework crates");

pub mod ban;
pub mod config;
pub mod error;
pub mod infrastructure_config;
pub mod ports;
