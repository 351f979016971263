//! API Gateway Monitoring
//!
//! 設定から全アラームを組み立て、[`MonitoringPort`] に登録する

use super::dashboard::AlarmWidget;
use super::port::MonitoringPort;
use crate::alarms::definition::{
    anomaly_label, anomaly_logical_id, missing_data_label, missing_data_logical_id,
};
use crate::alarms::resolver::{
    resolve_actions_enabled, resolve_evaluation, resolve_n_stds, resolve_treat_missing_data,
};
use crate::alarms::{resolve, resolve_missing_data, AlarmDefinition, ExpressionSynthesizer};
use crate::config::MonitoringConfig;
use crate::error::{Error, Result};
use std::collections::HashSet;
use tracing::{debug, info, warn};
use validator::Validate;

pub const ALARM_TOPIC_DISPLAY_NAME: &str = "API Gateway monitoring alarm";
pub const DASHBOARD_NAME: &str = "monitoring-dashboard";

/// 登録前のアラーム
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedAlarm {
    pub logical_id: String,
    pub widget_title: String,
    pub actions_enabled: bool,
    pub definition: AlarmDefinition,
}

/// Result of [`ApiGatewayMonitoring::build`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub topic: String,
    pub anomaly_alarms: usize,
    pub missing_data_alarms: usize,
    pub actions_enabled: usize,
    pub alarm_refs: Vec<String>,
}

impl BuildSummary {
    pub fn total_alarms(&self) -> usize {
        self.anomaly_alarms + self.missing_data_alarms
    }
}

/// API Gateway 監視
pub struct ApiGatewayMonitoring {
    config: MonitoringConfig,
}

impl ApiGatewayMonitoring {
    pub fn new(config: MonitoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MonitoringConfig {
        &self.config
    }

    /// Resolves every declared alarm, anomaly alarms first, in declaration order.
    ///
    /// Definitions carry no actions yet; [`build`](Self::build) attaches the
    /// topic to those with `actions_enabled`. Two declarations resolving to
    /// the same logical id fail here with [`Error::DuplicateResource`].
    pub fn plan(&self) -> Result<Vec<PlannedAlarm>> {
        self.config.validate()?;

        let defaults = self.config.alarm_defaults.as_ref();
        let synthesizer = ExpressionSynthesizer::new(&self.config.api_gateway);
        let mut planned =
            Vec::with_capacity(self.config.alarms.len() + self.config.missing_data_alarms.len());

        for spec in &self.config.alarms {
            let metric = resolve(spec, defaults)?;
            let metrics = synthesizer.synthesize(&metric, resolve_n_stds(spec, defaults)?);
            let definition = AlarmDefinition::anomaly(
                &metric,
                metrics,
                resolve_evaluation(spec, defaults),
                resolve_treat_missing_data(spec, defaults),
                None,
            );

            planned.push(PlannedAlarm {
                logical_id: anomaly_logical_id(&metric),
                widget_title: format!("{} alarm", anomaly_label(&metric)),
                actions_enabled: resolve_actions_enabled(spec, defaults),
                definition,
            });
        }

        for spec in &self.config.missing_data_alarms {
            let metric = resolve_missing_data(spec, defaults)?;
            let queries = synthesizer.synthesize_missing_data(&metric);
            let definition = AlarmDefinition::missing_data(
                &metric,
                queries,
                resolve_evaluation(spec, defaults),
                None,
            );

            planned.push(PlannedAlarm {
                logical_id: missing_data_logical_id(&metric.resource),
                widget_title: format!("{} alarm", missing_data_label(&metric.resource)),
                actions_enabled: resolve_actions_enabled(spec, defaults),
                definition,
            });
        }

        let mut logical_ids = HashSet::with_capacity(planned.len());
        let duplicate = planned
            .iter()
            .find(|alarm| !logical_ids.insert(alarm.logical_id.as_str()))
            .map(|alarm| alarm.logical_id.clone());
        if let Some(logical_id) = duplicate {
            return Err(Error::DuplicateResource(logical_id));
        }

        Ok(planned)
    }

    /// Registers the topic, the dashboard and every alarm with `port`.
    ///
    /// Nothing is sent to the port when any alarm fails validation.
    pub fn build<P: MonitoringPort + ?Sized>(&self, port: &mut P) -> Result<BuildSummary> {
        let planned = self.plan()?;
        let email = self.config.sns_email_address.as_deref();

        if email.is_some() && !planned.iter().any(|alarm| alarm.actions_enabled) {
            warn!("⚠️ SNS email configured but no alarm has actions enabled");
        }

        let topic = port.create_alarm_topic(ALARM_TOPIC_DISPLAY_NAME, email)?;
        port.create_dashboard(DASHBOARD_NAME)?;

        let mut summary = BuildSummary {
            topic: topic.clone(),
            anomaly_alarms: self.config.alarms.len(),
            missing_data_alarms: self.config.missing_data_alarms.len(),
            ..Default::default()
        };

        for PlannedAlarm {
            logical_id,
            widget_title,
            actions_enabled,
            mut definition,
        } in planned
        {
            if actions_enabled {
                definition.alarm_actions = vec![topic.clone()];
                summary.actions_enabled += 1;
            }

            debug!(
                logical_id = %logical_id,
                alarm_name = %definition.alarm_name,
                actions_enabled,
                "recording alarm"
            );

            let alarm_ref = port.record_alarm_definition(&logical_id, definition)?;
            port.add_alarm_widget(AlarmWidget::new(widget_title, alarm_ref.clone()))?;
            summary.alarm_refs.push(alarm_ref);
        }

        info!(
            api = %self.config.api_gateway.api_name,
            stage = %self.config.api_gateway.stage,
            anomaly_alarms = summary.anomaly_alarms,
            missing_data_alarms = summary.missing_data_alarms,
            actions_enabled = summary.actions_enabled,
            "✅ monitoring resources built"
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alarms::{AlarmDefaults, AlarmSpec, MissingDataAlarmSpec};
    use crate::error::{Error, ValidationError};
    use crate::monitoring::template::{MonitoringTemplate, ALARM_TYPE};
    use crate::types::{ApiGateway, LatencyStatistic, Method, MetricKind};

    fn config() -> MonitoringConfig {
        MonitoringConfig::new(ApiGateway::new("api", "prod"))
    }

    #[test]
    fn test_plan_order_and_ids() {
        let monitoring = ApiGatewayMonitoring::new(
            config()
                .with_missing_data_alarm(MissingDataAlarmSpec::new("/pets"))
                .with_alarm(AlarmSpec::new("/pets", MetricKind::Error5xx))
                .with_alarm(
                    AlarmSpec::new("/pets", MetricKind::Latency)
                        .with_methods(Method::Get)
                        .with_latency_statistic(LatencyStatistic::P90),
                ),
        );

        let planned = monitoring.plan().unwrap();
        let ids: Vec<_> = planned.iter().map(|p| p.logical_id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "/pets 5XXError Sum alarm",
                "/pets Latency p90 alarm",
                "/pets missing data points alarm",
            ]
        );
        assert_eq!(planned[1].widget_title, "/pets Latency p90 alarm");
        assert!(planned.iter().all(|p| p.definition.alarm_actions.is_empty()));
    }

    #[test]
    fn test_build_attaches_topic_to_enabled_alarms() {
        let monitoring = ApiGatewayMonitoring::new(
            config()
                .with_alarm(AlarmSpec::new("/a", MetricKind::Count).with_enabled(true))
                .with_alarm(AlarmSpec::new("/b", MetricKind::Count)),
        );
        let mut template = MonitoringTemplate::new();

        let summary = monitoring.build(&mut template).unwrap();

        assert_eq!(summary.total_alarms(), 2);
        assert_eq!(summary.actions_enabled, 1);
        let enabled = template.alarm("/a Count Sum alarm").unwrap();
        assert_eq!(enabled.alarm_actions, vec![summary.topic.clone()]);
        let disabled = template.alarm("/b Count Sum alarm").unwrap();
        assert!(disabled.alarm_actions.is_empty());
        assert_eq!(template.dashboard().unwrap().widgets.len(), 2);
    }

    #[test]
    fn test_defaults_enable_actions() {
        let monitoring = ApiGatewayMonitoring::new(
            config()
                .with_alarm_defaults(AlarmDefaults {
                    enabled: Some(true),
                    ..Default::default()
                })
                .with_missing_data_alarm(MissingDataAlarmSpec::new("/a")),
        );
        let mut template = MonitoringTemplate::new();

        let summary = monitoring.build(&mut template).unwrap();
        assert_eq!(summary.actions_enabled, 1);
    }

    #[test]
    fn test_validation_failure_leaves_port_untouched() {
        let monitoring = ApiGatewayMonitoring::new(
            config()
                .with_alarm(AlarmSpec::new("/ok", MetricKind::Count))
                .with_alarm(
                    AlarmSpec::new("/bad", MetricKind::Count)
                        .with_latency_statistic(LatencyStatistic::P99),
                ),
        );
        let mut template = MonitoringTemplate::new();

        let err = monitoring.build(&mut template).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::LatencyStatisticWithoutLatencyMetric { .. })
        ));
        assert!(template.topic().is_none());
        assert_eq!(template.resource_count(ALARM_TYPE), 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let monitoring = ApiGatewayMonitoring::new(
            MonitoringConfig::new(ApiGateway::new("api", "")).with_sns_email_address("x"),
        );

        let err = monitoring.plan().unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
    }

    #[test]
    fn test_duplicate_alarm_declaration_rejected() {
        let monitoring = ApiGatewayMonitoring::new(
            config()
                .with_alarm(AlarmSpec::new("/a", MetricKind::Count))
                .with_alarm(AlarmSpec::new("/a", MetricKind::Count)),
        );
        let err = monitoring.plan().unwrap_err();
        assert!(matches!(err, Error::DuplicateResource(ref id) if id == "/a Count Sum alarm"));

        let mut template = MonitoringTemplate::new();
        let err = monitoring.build(&mut template).unwrap_err();
        assert!(matches!(err, Error::DuplicateResource(id) if id == "/a Count Sum alarm"));
        assert!(template.topic().is_none());
        assert!(template.dashboard().is_none());
        assert_eq!(template.resource_count(ALARM_TYPE), 0);
    }

    #[test]
    fn test_duplicate_missing_data_declaration_rejected() {
        let monitoring = ApiGatewayMonitoring::new(
            config()
                .with_missing_data_alarm(MissingDataAlarmSpec::new("/a"))
                .with_missing_data_alarm(MissingDataAlarmSpec::new("/a").with_period(60)),
        );

        let err = monitoring.plan().unwrap_err();
        assert!(
            matches!(err, Error::DuplicateResource(id) if id == "/a missing data points alarm")
        );
    }

    #[test]
    fn test_repeated_method_fails_plan() {
        let monitoring = ApiGatewayMonitoring::new(config().with_alarm(
            AlarmSpec::new("/a", MetricKind::Count).with_methods(vec![Method::Get, Method::Get]),
        ));
        let mut template = MonitoringTemplate::new();

        let err = monitoring.build(&mut template).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::DuplicateMethod { method: Method::Get, .. })
        ));
        assert!(template.topic().is_none());
    }

    #[test]
    fn test_invalid_n_stds_fails_plan() {
        let monitoring = ApiGatewayMonitoring::new(
            config().with_alarm(AlarmSpec::new("/a", MetricKind::Count).with_n_stds(f64::NAN)),
        );

        let err = monitoring.plan().unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::InvalidNStds { .. })
        ));
    }
}
