pub mod ban_store_file;
pub mod blacklist_file;
pub mod line_codec;
pub mod utils;
