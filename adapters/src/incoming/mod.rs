pub mod http_axum;
pub mod tokio_interval;
