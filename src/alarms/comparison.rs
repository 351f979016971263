//! Threshold and comparison selection

use crate::types::{MetricKind, TreatMissingData};
use serde::{Deserialize, Serialize};

/// 比較演算子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonOperator {
    /// 異常検知バンドの上限超過
    GreaterThanUpperThreshold,
    /// 異常検知バンドの範囲外（上下両方向）
    LessThanLowerOrGreaterThanUpperThreshold,
    /// 固定閾値未満
    LessThanThreshold,
}

/// Request counts alarm on both sides of the band, everything else only
/// above it.
pub fn select_comparison(metric: MetricKind) -> ComparisonOperator {
    match metric {
        MetricKind::Count => ComparisonOperator::LessThanLowerOrGreaterThanUpperThreshold,
        MetricKind::Error4xx | MetricKind::Error5xx | MetricKind::Latency => {
            ComparisonOperator::GreaterThanUpperThreshold
        }
    }
}

/// Fixed settings of every missing-data alarm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MissingDataThreshold {
    pub threshold: f64,
    pub comparison: ComparisonOperator,
    pub treat_missing_data: TreatMissingData,
}

/// Fires below one sample; no data at all counts as breaching regardless
/// of configured defaults.
pub const MISSING_DATA_THRESHOLD: MissingDataThreshold = MissingDataThreshold {
    threshold: 1.0,
    comparison: ComparisonOperator::LessThanThreshold,
    treat_missing_data: TreatMissingData::Breaching,
};
