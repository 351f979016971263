//! Expression synthesis
//!
//! Turns a resolved alarm metric into the ordered metric data queries of a
//! CloudWatch metric-math alarm: per-method statistic leaves, the combined
//! expression `m` and the anomaly detection band `ad` around it.

use super::spec::{ResolvedAlarmMetric, ResolvedMissingDataMetric};
use crate::types::{ApiGateway, Method, MethodSelection, MetricKind, Statistic};
use serde::{Deserialize, Serialize};

pub const API_GATEWAY_NAMESPACE: &str = "AWS/ApiGateway";

/// Id of the record the alarm evaluates.
pub const EVALUATION_METRIC_ID: &str = "m";

/// Id of the anomaly detection band record.
pub const THRESHOLD_METRIC_ID: &str = "ad";

/// メトリクスディメンション
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Dimension {
    pub name: String,
    pub value: String,
}

impl Dimension {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// CloudWatch メトリクス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Metric {
    pub namespace: String,
    pub metric_name: String,
    pub dimensions: Vec<Dimension>,
}

/// 単一メソッドに対する統計クエリ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetricStat {
    pub metric: Metric,
    pub period: u32,
    pub stat: Statistic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryKind {
    MetricStat(MetricStat),
    Expression(String),
}

/// One entry of the alarm's metric expression graph.
///
/// `return_data` is unset on the anomaly band, `false` on helper leaves and
/// `true` on the evaluated record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetricDataQuery {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_data: Option<bool>,
    #[serde(flatten)]
    pub kind: QueryKind,
}

impl MetricDataQuery {
    pub fn expression(id: impl Into<String>, return_data: Option<bool>, expr: String) -> Self {
        Self {
            id: id.into(),
            return_data,
            kind: QueryKind::Expression(expr),
        }
    }

    pub fn returns_data(&self) -> bool {
        self.return_data.unwrap_or(false)
    }

    pub fn expression_str(&self) -> Option<&str> {
        match &self.kind {
            QueryKind::Expression(expr) => Some(expr),
            QueryKind::MetricStat(_) => None,
        }
    }

    pub fn metric_stat(&self) -> Option<&MetricStat> {
        match &self.kind {
            QueryKind::MetricStat(stat) => Some(stat),
            QueryKind::Expression(_) => None,
        }
    }
}

/// Records of one anomaly alarm plus the id of its threshold band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmMetrics {
    pub threshold_metric_id: String,
    pub metrics: Vec<MetricDataQuery>,
}

/// Builds metric data queries for one API stage.
#[derive(Debug, Clone)]
pub struct ExpressionSynthesizer<'a> {
    api: &'a ApiGateway,
}

impl<'a> ExpressionSynthesizer<'a> {
    pub fn new(api: &'a ApiGateway) -> Self {
        Self { api }
    }

    /// 異常検知アラームのメトリクスを生成
    pub fn synthesize(&self, metric: &ResolvedAlarmMetric, n_stds: f64) -> AlarmMetrics {
        match &metric.methods {
            MethodSelection::Single(method) => self.single_method(metric, *method, n_stds),
            MethodSelection::Many(methods) if metric.metric.is_latency() => {
                self.weighted_average(metric, methods, n_stds)
            }
            MethodSelection::Many(methods) => self.sum(metric, methods, n_stds),
        }
    }

    /// 欠損データアラームのメトリクスを生成
    pub fn synthesize_missing_data(&self, metric: &ResolvedMissingDataMetric) -> Vec<MetricDataQuery> {
        match &metric.methods {
            MethodSelection::Many(methods) => {
                let mut queries = Vec::with_capacity(methods.len() + 1);
                queries.push(MetricDataQuery::expression(
                    EVALUATION_METRIC_ID,
                    Some(true),
                    join_ids(methods, |m| format!("count{m}")),
                ));
                queries.extend(methods.iter().map(|method| {
                    self.method_query(
                        format!("count{method}"),
                        false,
                        &metric.resource,
                        MetricKind::Count,
                        *method,
                        metric.period,
                        Statistic::SampleCount,
                    )
                }));
                queries
            }
            MethodSelection::Single(method) => vec![self.method_query(
                EVALUATION_METRIC_ID,
                true,
                &metric.resource,
                MetricKind::Count,
                *method,
                metric.period,
                Statistic::SampleCount,
            )],
        }
    }

    /// Leaf query against a single method of the API stage.
    #[allow(clippy::too_many_arguments)]
    pub fn method_query(
        &self,
        id: impl Into<String>,
        return_data: bool,
        resource: &str,
        metric: MetricKind,
        method: Method,
        period: u32,
        stat: Statistic,
    ) -> MetricDataQuery {
        MetricDataQuery {
            id: id.into(),
            return_data: Some(return_data),
            kind: QueryKind::MetricStat(MetricStat {
                metric: Metric {
                    namespace: API_GATEWAY_NAMESPACE.to_string(),
                    metric_name: metric.as_str().to_string(),
                    dimensions: vec![
                        Dimension::new("ApiName", &self.api.api_name),
                        Dimension::new("Resource", resource),
                        Dimension::new("Stage", &self.api.stage),
                        Dimension::new("Method", method.as_str()),
                    ],
                },
                period,
                stat,
            }),
        }
    }

    fn single_method(
        &self,
        metric: &ResolvedAlarmMetric,
        method: Method,
        n_stds: f64,
    ) -> AlarmMetrics {
        AlarmMetrics {
            threshold_metric_id: THRESHOLD_METRIC_ID.to_string(),
            metrics: vec![
                anomaly_band(n_stds),
                self.method_query(
                    EVALUATION_METRIC_ID,
                    true,
                    &metric.resource,
                    metric.metric,
                    method,
                    metric.period,
                    metric.statistic,
                ),
            ],
        }
    }

    fn sum(&self, metric: &ResolvedAlarmMetric, methods: &[Method], n_stds: f64) -> AlarmMetrics {
        let mut metrics = Vec::with_capacity(methods.len() + 2);
        metrics.push(anomaly_band(n_stds));
        metrics.push(MetricDataQuery::expression(
            EVALUATION_METRIC_ID,
            Some(true),
            join_ids(methods, |m| format!("Sum_{m}")),
        ));
        metrics.extend(
            methods
                .iter()
                .map(|method| self.stat_leaf(metric, "Sum", *method, Statistic::Sum)),
        );

        AlarmMetrics {
            threshold_metric_id: THRESHOLD_METRIC_ID.to_string(),
            metrics,
        }
    }

    fn weighted_average(
        &self,
        metric: &ResolvedAlarmMetric,
        methods: &[Method],
        n_stds: f64,
    ) -> AlarmMetrics {
        let numerator = join_ids(methods, |m| format!("Average_{m} * SampleCount_{m}"));
        let denominator = join_ids(methods, |m| format!("SampleCount_{m}"));

        let mut metrics = Vec::with_capacity(2 * methods.len() + 2);
        metrics.push(anomaly_band(n_stds));
        metrics.push(MetricDataQuery::expression(
            EVALUATION_METRIC_ID,
            Some(true),
            format!("({numerator}) / ({denominator})"),
        ));
        metrics.extend(
            methods
                .iter()
                .map(|method| self.stat_leaf(metric, "Average", *method, Statistic::Average)),
        );
        metrics.extend(methods.iter().map(|method| {
            self.stat_leaf(metric, "SampleCount", *method, Statistic::SampleCount)
        }));

        AlarmMetrics {
            threshold_metric_id: THRESHOLD_METRIC_ID.to_string(),
            metrics,
        }
    }

    fn stat_leaf(
        &self,
        metric: &ResolvedAlarmMetric,
        prefix: &str,
        method: Method,
        stat: Statistic,
    ) -> MetricDataQuery {
        self.method_query(
            format!("{prefix}_{method}"),
            false,
            &metric.resource,
            metric.metric,
            method,
            metric.period,
            stat,
        )
    }
}

fn anomaly_band(n_stds: f64) -> MetricDataQuery {
    MetricDataQuery::expression(
        THRESHOLD_METRIC_ID,
        None,
        format!("ANOMALY_DETECTION_BAND({EVALUATION_METRIC_ID}, {n_stds})"),
    )
}

fn join_ids(methods: &[Method], id: impl Fn(Method) -> String) -> String {
    methods
        .iter()
        .map(|method| id(*method))
        .collect::<Vec<_>>()
        .join(" + ")
}
