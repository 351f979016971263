//! Alarms Module
//!
//! アラーム宣言から CloudWatch アラーム定義への変換

pub mod comparison;
pub mod defaults;
pub mod definition;
pub mod resolver;
pub mod spec;
pub mod synthesizer;

pub use comparison::{select_comparison, ComparisonOperator, MISSING_DATA_THRESHOLD};
pub use definition::AlarmDefinition;
pub use resolver::{resolve, resolve_missing_data};
pub use spec::{
    AlarmDefaults, AlarmSpec, MissingDataAlarmSpec, ResolvedAlarmMetric,
    ResolvedMissingDataMetric,
};
pub use synthesizer::{AlarmMetrics, ExpressionSynthesizer, MetricDataQuery, QueryKind};
