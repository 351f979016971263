//! Alarm Declaration Types

use crate::types::{
    AlarmEvaluation, LatencyStatistic, MethodSelection, MetricKind, Statistic, TreatMissingData,
};
use serde::{Deserialize, Serialize};

/// アラーム宣言
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlarmSpec {
    /// API Gateway リソースパス
    pub resource: String,
    /// 監視メトリクス
    pub metric: MetricKind,
    /// アラームアクション有効フラグ
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// 対象メソッド
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub methods: Option<MethodSelection>,
    /// 集計期間（秒）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<u32>,
    /// 評価ウィンドウ
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<AlarmEvaluation>,
    /// 異常検知バンドの標準偏差倍率
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_stds: Option<f64>,
    /// 欠損データの扱い
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treat_missing_data: Option<TreatMissingData>,
    /// レイテンシ統計の上書き
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_metric_statistic: Option<LatencyStatistic>,
}

impl AlarmSpec {
    pub fn new(resource: impl Into<String>, metric: MetricKind) -> Self {
        Self {
            resource: resource.into(),
            metric,
            enabled: None,
            methods: None,
            period: None,
            evaluation: None,
            n_stds: None,
            treat_missing_data: None,
            latency_metric_statistic: None,
        }
    }

    pub fn with_methods(mut self, methods: impl Into<MethodSelection>) -> Self {
        self.methods = Some(methods.into());
        self
    }

    pub fn with_period(mut self, seconds: u32) -> Self {
        self.period = Some(seconds);
        self
    }

    pub fn with_evaluation(mut self, evaluation: AlarmEvaluation) -> Self {
        self.evaluation = Some(evaluation);
        self
    }

    pub fn with_n_stds(mut self, n_stds: f64) -> Self {
        self.n_stds = Some(n_stds);
        self
    }

    pub fn with_treat_missing_data(mut self, treatment: TreatMissingData) -> Self {
        self.treat_missing_data = Some(treatment);
        self
    }

    pub fn with_latency_statistic(mut self, statistic: LatencyStatistic) -> Self {
        self.latency_metric_statistic = Some(statistic);
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }
}

/// 欠損データアラーム宣言
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingDataAlarmSpec {
    pub resource: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub methods: Option<MethodSelection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<AlarmEvaluation>,
}

impl MissingDataAlarmSpec {
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            enabled: None,
            methods: None,
            period: None,
            evaluation: None,
        }
    }

    pub fn with_methods(mut self, methods: impl Into<MethodSelection>) -> Self {
        self.methods = Some(methods.into());
        self
    }

    pub fn with_period(mut self, seconds: u32) -> Self {
        self.period = Some(seconds);
        self
    }

    pub fn with_evaluation(mut self, evaluation: AlarmEvaluation) -> Self {
        self.evaluation = Some(evaluation);
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }
}

/// 全アラーム共通のデフォルト値
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlarmDefaults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub methods: Option<MethodSelection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<AlarmEvaluation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_stds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treat_missing_data: Option<TreatMissingData>,
}

/// Settings shared by anomaly and missing-data alarm declarations.
pub trait AlarmSettings {
    fn evaluation(&self) -> Option<AlarmEvaluation>;
    fn enabled(&self) -> Option<bool>;
}

impl AlarmSettings for AlarmSpec {
    fn evaluation(&self) -> Option<AlarmEvaluation> {
        self.evaluation
    }

    fn enabled(&self) -> Option<bool> {
        self.enabled
    }
}

impl AlarmSettings for MissingDataAlarmSpec {
    fn evaluation(&self) -> Option<AlarmEvaluation> {
        self.evaluation
    }

    fn enabled(&self) -> Option<bool> {
        self.enabled
    }
}

/// Fully resolved metric description of an anomaly alarm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedAlarmMetric {
    pub resource: String,
    pub metric: MetricKind,
    pub statistic: Statistic,
    pub period: u32,
    pub methods: MethodSelection,
}

/// Fully resolved metric description of a missing-data alarm.
///
/// Always counts samples of the `Count` metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedMissingDataMetric {
    pub resource: String,
    pub methods: MethodSelection,
    pub period: u32,
}
