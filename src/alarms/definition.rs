//! Alarm definition assembly

use super::comparison::{select_comparison, ComparisonOperator, MISSING_DATA_THRESHOLD};
use super::spec::{ResolvedAlarmMetric, ResolvedMissingDataMetric};
use super::synthesizer::{AlarmMetrics, MetricDataQuery};
use crate::types::{AlarmEvaluation, TreatMissingData};
use serde::{Deserialize, Serialize};

/// CloudWatch アラーム定義
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AlarmDefinition {
    pub alarm_name: String,
    pub alarm_description: String,
    pub alarm_actions: Vec<String>,
    pub metrics: Vec<MetricDataQuery>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold_metric_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    pub comparison_operator: ComparisonOperator,
    pub treat_missing_data: TreatMissingData,
    pub evaluation_periods: u32,
    pub datapoints_to_alarm: u32,
}

impl AlarmDefinition {
    /// 異常検知アラームを作成
    pub fn anomaly(
        metric: &ResolvedAlarmMetric,
        alarm_metrics: AlarmMetrics,
        evaluation: AlarmEvaluation,
        treat_missing_data: TreatMissingData,
        action_topic: Option<&str>,
    ) -> Self {
        let label = anomaly_label(metric);
        Self {
            alarm_name: format!("ALARM: {label}"),
            alarm_description: format!(
                "resource: {}, metric: {}, stats: {}.",
                metric.resource, metric.metric, metric.statistic
            ),
            alarm_actions: actions(action_topic),
            metrics: alarm_metrics.metrics,
            threshold_metric_id: Some(alarm_metrics.threshold_metric_id),
            threshold: None,
            comparison_operator: select_comparison(metric.metric),
            treat_missing_data,
            evaluation_periods: evaluation.evaluation_periods,
            datapoints_to_alarm: evaluation.datapoints_to_alarm,
        }
    }

    /// 欠損データアラームを作成
    pub fn missing_data(
        metric: &ResolvedMissingDataMetric,
        metrics: Vec<MetricDataQuery>,
        evaluation: AlarmEvaluation,
        action_topic: Option<&str>,
    ) -> Self {
        Self {
            alarm_name: format!("MISSING ALARM: {}", metric.resource),
            alarm_description: format!("resource: {}", metric.resource),
            alarm_actions: actions(action_topic),
            metrics,
            threshold_metric_id: None,
            threshold: Some(MISSING_DATA_THRESHOLD.threshold),
            comparison_operator: MISSING_DATA_THRESHOLD.comparison,
            treat_missing_data: MISSING_DATA_THRESHOLD.treat_missing_data,
            evaluation_periods: evaluation.evaluation_periods,
            datapoints_to_alarm: evaluation.datapoints_to_alarm,
        }
    }

    /// The record the alarm evaluates, if any.
    pub fn evaluated_metric(&self) -> Option<&MetricDataQuery> {
        self.metrics.iter().find(|q| q.returns_data())
    }
}

/// `"{resource} {metric} {statistic}"`, shared by ids, names and widgets.
pub fn anomaly_label(metric: &ResolvedAlarmMetric) -> String {
    format!("{} {} {}", metric.resource, metric.metric, metric.statistic)
}

pub fn anomaly_logical_id(metric: &ResolvedAlarmMetric) -> String {
    format!("{} alarm", anomaly_label(metric))
}

pub fn missing_data_label(resource: &str) -> String {
    format!("{resource} missing data points")
}

pub fn missing_data_logical_id(resource: &str) -> String {
    format!("{} alarm", missing_data_label(resource))
}

fn actions(action_topic: Option<&str>) -> Vec<String> {
    action_topic.map(|t| vec![t.to_string()]).unwrap_or_default()
}
