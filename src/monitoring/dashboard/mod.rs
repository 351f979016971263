//! Dashboard Module
//!
//! アラームごとのウィジェットを並べる CloudWatch ダッシュボード

mod config;
mod widget;

pub use self::config::DashboardConfig;
pub use widget::AlarmWidget;
