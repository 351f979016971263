//! # apigw-monitoring
//!
//! Declarative CloudWatch monitoring for Amazon API Gateway.
//!
//! Alarm declarations are merged with shared defaults, validated, and turned
//! into anomaly-detection or missing-data alarm definitions built from
//! metric-math expressions. The definitions, an SNS alarm topic and a
//! dashboard are handed to a [`MonitoringPort`], e.g. the in-memory
//! [`MonitoringTemplate`] that renders a CloudFormation `Resources` document.

pub mod alarms;
pub mod config;
pub mod error;
pub mod logging;
pub mod monitoring;
pub mod types;

pub use self::config::{ConfigLoader, MonitoringConfig};
pub use error::{Error, Result, ValidationError};
pub use monitoring::{ApiGatewayMonitoring, MonitoringPort, MonitoringTemplate};
pub use types::{ApiGateway, Method, MethodSelection, MetricKind};
