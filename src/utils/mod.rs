pub mod config;
pub mod fd_limit;
pub mod hashpipe_toml;
pub mod logger;

pub use config::*;
pub use fd_limit::{max_open_fds, max_open_handles};
pub use logger::setup_logging;
