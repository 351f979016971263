//! Core value types shared by the resolver, the synthesizer and the wiring layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// API Gateway のメトリクス種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricKind {
    /// サーバーエラー数
    #[serde(rename = "5XXError")]
    Error5xx,
    /// クライアントエラー数
    #[serde(rename = "4XXError")]
    Error4xx,
    /// リクエスト数
    Count,
    /// レイテンシ
    Latency,
}

impl MetricKind {
    /// CloudWatch 上のメトリクス名
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Error5xx => "5XXError",
            MetricKind::Error4xx => "4XXError",
            MetricKind::Count => "Count",
            MetricKind::Latency => "Latency",
        }
    }

    pub fn is_latency(&self) -> bool {
        matches!(self, MetricKind::Latency)
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HTTP メソッド
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Delete,
    Get,
    Head,
    Options,
    Patch,
    Post,
    Put,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Delete => "DELETE",
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
            Method::Patch => "PATCH",
            Method::Post => "POST",
            Method::Put => "PUT",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One method or a list of methods.
///
/// A list holding a single method stays distinct from
/// `Single`: only `Single` may be combined with a latency statistic
/// override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MethodSelection {
    Single(Method),
    Many(Vec<Method>),
}

impl MethodSelection {
    pub fn is_many(&self) -> bool {
        matches!(self, MethodSelection::Many(_))
    }

    /// Number of methods covered by the selection.
    pub fn len(&self) -> usize {
        match self {
            MethodSelection::Single(_) => 1,
            MethodSelection::Many(methods) => methods.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Method> for MethodSelection {
    fn from(method: Method) -> Self {
        MethodSelection::Single(method)
    }
}

impl From<Vec<Method>> for MethodSelection {
    fn from(methods: Vec<Method>) -> Self {
        MethodSelection::Many(methods)
    }
}

/// Statistic override accepted for latency alarms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LatencyStatistic {
    Average,
    Maximum,
    #[serde(rename = "p99")]
    P99,
    #[serde(rename = "p95")]
    P95,
    #[serde(rename = "p90")]
    P90,
    #[serde(rename = "p85")]
    P85,
    #[serde(rename = "p80")]
    P80,
    #[serde(rename = "p75")]
    P75,
    #[serde(rename = "p70")]
    P70,
    #[serde(rename = "p65")]
    P65,
    #[serde(rename = "p60")]
    P60,
    #[serde(rename = "p55")]
    P55,
    #[serde(rename = "p50")]
    P50,
}

/// Statistic applied to a single-method metric query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Statistic {
    Sum,
    Average,
    SampleCount,
    Maximum,
    #[serde(rename = "p99")]
    P99,
    #[serde(rename = "p95")]
    P95,
    #[serde(rename = "p90")]
    P90,
    #[serde(rename = "p85")]
    P85,
    #[serde(rename = "p80")]
    P80,
    #[serde(rename = "p75")]
    P75,
    #[serde(rename = "p70")]
    P70,
    #[serde(rename = "p65")]
    P65,
    #[serde(rename = "p60")]
    P60,
    #[serde(rename = "p55")]
    P55,
    #[serde(rename = "p50")]
    P50,
}

impl Statistic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Statistic::Sum => "Sum",
            Statistic::Average => "Average",
            Statistic::SampleCount => "SampleCount",
            Statistic::Maximum => "Maximum",
            Statistic::P99 => "p99",
            Statistic::P95 => "p95",
            Statistic::P90 => "p90",
            Statistic::P85 => "p85",
            Statistic::P80 => "p80",
            Statistic::P75 => "p75",
            Statistic::P70 => "p70",
            Statistic::P65 => "p65",
            Statistic::P60 => "p60",
            Statistic::P55 => "p55",
            Statistic::P50 => "p50",
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<LatencyStatistic> for Statistic {
    fn from(stat: LatencyStatistic) -> Self {
        match stat {
            LatencyStatistic::Average => Statistic::Average,
            LatencyStatistic::Maximum => Statistic::Maximum,
            LatencyStatistic::P99 => Statistic::P99,
            LatencyStatistic::P95 => Statistic::P95,
            LatencyStatistic::P90 => Statistic::P90,
            LatencyStatistic::P85 => Statistic::P85,
            LatencyStatistic::P80 => Statistic::P80,
            LatencyStatistic::P75 => Statistic::P75,
            LatencyStatistic::P70 => Statistic::P70,
            LatencyStatistic::P65 => Statistic::P65,
            LatencyStatistic::P60 => Statistic::P60,
            LatencyStatistic::P55 => Statistic::P55,
            LatencyStatistic::P50 => Statistic::P50,
        }
    }
}

/// 欠損データの扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TreatMissingData {
    Breaching,
    NotBreaching,
    Ignore,
    Missing,
}

/// 評価ウィンドウ
///
/// `datapoints_to_alarm <= evaluation_periods` is not checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmEvaluation {
    pub evaluation_periods: u32,
    pub datapoints_to_alarm: u32,
}

impl AlarmEvaluation {
    pub fn new(evaluation_periods: u32, datapoints_to_alarm: u32) -> Self {
        Self {
            evaluation_periods,
            datapoints_to_alarm,
        }
    }
}

/// Identity of the monitored REST API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ApiGateway {
    #[validate(length(min = 1, message = "api_name must not be empty"))]
    pub api_name: String,
    #[validate(length(min = 1, message = "stage must not be empty"))]
    pub stage: String,
}

impl ApiGateway {
    pub fn new(api_name: impl Into<String>, stage: impl Into<String>) -> Self {
        Self {
            api_name: api_name.into(),
            stage: stage.into(),
        }
    }
}
