//! Configuration management
//!
//! 監視対象 API とアラーム定義の読み込み

mod loader;
mod types;

pub use loader::{ConfigLoader, ENV_PREFIX};
pub use types::{LogFormat, LoggingConfig, MonitoringConfig};
