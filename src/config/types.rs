use crate::alarms::{AlarmDefaults, AlarmSpec, MissingDataAlarmSpec};
use crate::types::ApiGateway;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Main monitoring configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct MonitoringConfig {
    /// Monitored API and deployment stage
    #[validate(nested)]
    pub api_gateway: ApiGateway,

    /// Anomaly-detection alarms
    #[serde(default)]
    pub alarms: Vec<AlarmSpec>,

    /// Fallback values shared by all alarms
    #[serde(default)]
    pub alarm_defaults: Option<AlarmDefaults>,

    /// "No traffic" alarms
    #[serde(default)]
    pub missing_data_alarms: Vec<MissingDataAlarmSpec>,

    /// Email subscribed to the alarm topic
    #[serde(default)]
    #[validate(email(message = "sns_email_address is not a valid email address"))]
    pub sns_email_address: Option<String>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl MonitoringConfig {
    pub fn new(api_gateway: ApiGateway) -> Self {
        Self {
            api_gateway,
            alarms: Vec::new(),
            alarm_defaults: None,
            missing_data_alarms: Vec::new(),
            sns_email_address: None,
            logging: LoggingConfig::default(),
        }
    }

    pub fn with_alarm(mut self, alarm: AlarmSpec) -> Self {
        self.alarms.push(alarm);
        self
    }

    pub fn with_missing_data_alarm(mut self, alarm: MissingDataAlarmSpec) -> Self {
        self.missing_data_alarms.push(alarm);
        self
    }

    pub fn with_alarm_defaults(mut self, defaults: AlarmDefaults) -> Self {
        self.alarm_defaults = Some(defaults);
        self
    }

    pub fn with_sns_email_address(mut self, address: impl Into<String>) -> Self {
        self.sns_email_address = Some(address.into());
        self
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogFormat {
    /// Pretty-printed format
    #[default]
    #[serde(rename = "pretty")]
    Pretty,

    /// JSON format
    #[serde(rename = "json")]
    Json,

    /// Compact format
    #[serde(rename = "compact")]
    Compact,
}
