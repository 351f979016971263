//! System-wide fallback values, used when neither the alarm nor the
//! alarm defaults set a field.

use crate::types::{AlarmEvaluation, Method, MethodSelection, TreatMissingData};

pub const DEFAULT_METHODS: [Method; 5] = [
    Method::Delete,
    Method::Get,
    Method::Post,
    Method::Put,
    Method::Options,
];
pub const DEFAULT_N_STDS: f64 = 3.0;
pub const DEFAULT_ALARM_EVALUATION: AlarmEvaluation = AlarmEvaluation {
    evaluation_periods: 1,
    datapoints_to_alarm: 1,
};
pub const DEFAULT_ALARM_PERIOD: u32 = 60 * 5;
pub const DEFAULT_ALARM_ACTIONS_ENABLED: bool = false;
pub const DEFAULT_TREAT_MISSING_DATA: TreatMissingData = TreatMissingData::NotBreaching;

/// Latency alarms combine at most this many methods.
pub const MAX_LATENCY_METHODS: usize = 5;

/// The default method set, always as a list.
pub fn default_methods() -> MethodSelection {
    MethodSelection::Many(DEFAULT_METHODS.to_vec())
}

/// First present value of the alarm tier, then the defaults tier,
/// otherwise the system fallback.
pub fn coalesce<T>(alarm: Option<T>, defaults: Option<T>, fallback: impl FnOnce() -> T) -> T {
    alarm.or(defaults).unwrap_or_else(fallback)
}
