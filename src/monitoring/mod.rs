//! API Gateway 監視リソース
//!
//! アラーム定義を SNS トピック・ダッシュボードと結び付け、
//! [`MonitoringPort`] 経由で登録します。

pub mod builder;
pub mod dashboard;
pub mod port;
pub mod template;

pub use builder::{
    ApiGatewayMonitoring, BuildSummary, PlannedAlarm, ALARM_TOPIC_DISPLAY_NAME, DASHBOARD_NAME,
};
pub use dashboard::{AlarmWidget, DashboardConfig};
pub use port::MonitoringPort;
pub use template::MonitoringTemplate;
