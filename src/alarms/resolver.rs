//! Parameter resolution
//!
//! Merges an alarm declaration with the optional alarm defaults and the
//! system fallbacks, and rejects inconsistent combinations.

use super::defaults::{
    coalesce, default_methods, DEFAULT_ALARM_ACTIONS_ENABLED, DEFAULT_ALARM_EVALUATION,
    DEFAULT_ALARM_PERIOD, DEFAULT_N_STDS, DEFAULT_TREAT_MISSING_DATA, MAX_LATENCY_METHODS,
};
use super::spec::{
    AlarmDefaults, AlarmSettings, AlarmSpec, MissingDataAlarmSpec, ResolvedAlarmMetric,
    ResolvedMissingDataMetric,
};
use crate::error::ValidationError;
use crate::types::{AlarmEvaluation, MethodSelection, Statistic, TreatMissingData};
use std::collections::HashSet;
use tracing::debug;

/// アラーム宣言を解決
pub fn resolve(
    spec: &AlarmSpec,
    defaults: Option<&AlarmDefaults>,
) -> Result<ResolvedAlarmMetric, ValidationError> {
    validate_latency_methods(spec, defaults)?;
    validate_latency_statistic(spec, defaults)?;

    let methods = resolve_methods(spec.methods.as_ref(), defaults);
    ensure_methods(&spec.resource, &methods)?;

    let statistic = match spec.latency_metric_statistic {
        Some(stat) => Statistic::from(stat),
        None if spec.metric.is_latency() => Statistic::Average,
        None => Statistic::Sum,
    };

    let resolved = ResolvedAlarmMetric {
        resource: spec.resource.clone(),
        metric: spec.metric,
        statistic,
        period: coalesce(spec.period, defaults.and_then(|d| d.period), || {
            DEFAULT_ALARM_PERIOD
        }),
        methods,
    };

    debug!(
        resource = %resolved.resource,
        metric = %resolved.metric,
        statistic = %resolved.statistic,
        period = resolved.period,
        "resolved alarm metric"
    );

    Ok(resolved)
}

/// 欠損データアラーム宣言を解決
pub fn resolve_missing_data(
    spec: &MissingDataAlarmSpec,
    defaults: Option<&AlarmDefaults>,
) -> Result<ResolvedMissingDataMetric, ValidationError> {
    let methods = resolve_methods(spec.methods.as_ref(), defaults);
    ensure_methods(&spec.resource, &methods)?;

    Ok(ResolvedMissingDataMetric {
        resource: spec.resource.clone(),
        methods,
        period: coalesce(spec.period, defaults.and_then(|d| d.period), || {
            DEFAULT_ALARM_PERIOD
        }),
    })
}

pub fn resolve_n_stds(
    spec: &AlarmSpec,
    defaults: Option<&AlarmDefaults>,
) -> Result<f64, ValidationError> {
    let n_stds = coalesce(spec.n_stds, defaults.and_then(|d| d.n_stds), || DEFAULT_N_STDS);
    if !n_stds.is_finite() || n_stds < 0.0 {
        return Err(ValidationError::InvalidNStds {
            value: n_stds.to_string(),
        });
    }
    Ok(n_stds)
}

pub fn resolve_evaluation<S: AlarmSettings>(
    spec: &S,
    defaults: Option<&AlarmDefaults>,
) -> AlarmEvaluation {
    coalesce(spec.evaluation(), defaults.and_then(|d| d.evaluation), || {
        DEFAULT_ALARM_EVALUATION
    })
}

pub fn resolve_treat_missing_data(
    spec: &AlarmSpec,
    defaults: Option<&AlarmDefaults>,
) -> TreatMissingData {
    coalesce(
        spec.treat_missing_data,
        defaults.and_then(|d| d.treat_missing_data),
        || DEFAULT_TREAT_MISSING_DATA,
    )
}

/// Whether the alarm notifies the alarm topic.
pub fn resolve_actions_enabled<S: AlarmSettings>(
    spec: &S,
    defaults: Option<&AlarmDefaults>,
) -> bool {
    coalesce(spec.enabled(), defaults.and_then(|d| d.enabled), || {
        DEFAULT_ALARM_ACTIONS_ENABLED
    })
}

fn resolve_methods(
    methods: Option<&MethodSelection>,
    defaults: Option<&AlarmDefaults>,
) -> MethodSelection {
    coalesce(
        methods.cloned(),
        defaults.and_then(|d| d.methods.clone()),
        default_methods,
    )
}

// Only declared methods count here; the system default set has exactly five.
fn validate_latency_methods(
    spec: &AlarmSpec,
    defaults: Option<&AlarmDefaults>,
) -> Result<(), ValidationError> {
    if !spec.metric.is_latency() {
        return Ok(());
    }

    let declared = spec
        .methods
        .as_ref()
        .or_else(|| defaults.and_then(|d| d.methods.as_ref()));

    match declared {
        Some(MethodSelection::Many(methods)) if methods.len() > MAX_LATENCY_METHODS => {
            Err(ValidationError::TooManyLatencyMethods {
                count: methods.len(),
            })
        }
        _ => Ok(()),
    }
}

fn validate_latency_statistic(
    spec: &AlarmSpec,
    defaults: Option<&AlarmDefaults>,
) -> Result<(), ValidationError> {
    if spec.latency_metric_statistic.is_none() {
        return Ok(());
    }

    if !spec.metric.is_latency() {
        return Err(ValidationError::LatencyStatisticWithoutLatencyMetric {
            metric: spec.metric.to_string(),
        });
    }

    // A one-element list is still a list.
    if resolve_methods(spec.methods.as_ref(), defaults).is_many() {
        return Err(ValidationError::LatencyStatisticRequiresSingleMethod);
    }

    Ok(())
}

fn ensure_methods(resource: &str, methods: &MethodSelection) -> Result<(), ValidationError> {
    if methods.is_empty() {
        return Err(ValidationError::EmptyMethods {
            resource: resource.to_string(),
        });
    }

    if let MethodSelection::Many(list) = methods {
        let mut seen = HashSet::with_capacity(list.len());
        if let Some(method) = list.iter().find(|m| !seen.insert(**m)) {
            return Err(ValidationError::DuplicateMethod {
                resource: resource.to_string(),
                method: *method,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alarms::defaults::DEFAULT_METHODS;
    use crate::types::{LatencyStatistic, Method, MetricKind};

    fn six_methods() -> Vec<Method> {
        vec![
            Method::Delete,
            Method::Get,
            Method::Head,
            Method::Options,
            Method::Patch,
            Method::Post,
        ]
    }

    #[test]
    fn test_resolve_uses_system_defaults() {
        let resolved = resolve(&AlarmSpec::new("dummy", MetricKind::Count), None).unwrap();

        assert_eq!(resolved.statistic, Statistic::Sum);
        assert_eq!(resolved.period, 300);
        assert_eq!(
            resolved.methods,
            MethodSelection::Many(DEFAULT_METHODS.to_vec())
        );
    }

    #[test]
    fn test_resolve_latency_defaults_to_average() {
        let resolved = resolve(&AlarmSpec::new("dummy", MetricKind::Latency), None).unwrap();
        assert_eq!(resolved.statistic, Statistic::Average);
    }

    #[test]
    fn test_resolve_prefers_alarm_over_defaults() {
        let defaults = AlarmDefaults {
            methods: Some(MethodSelection::Many(vec![Method::Get])),
            period: Some(60),
            ..Default::default()
        };
        let spec = AlarmSpec::new("dummy", MetricKind::Error5xx)
            .with_methods(Method::Post)
            .with_period(120);

        let resolved = resolve(&spec, Some(&defaults)).unwrap();
        assert_eq!(resolved.methods, MethodSelection::Single(Method::Post));
        assert_eq!(resolved.period, 120);

        let resolved = resolve(&AlarmSpec::new("dummy", MetricKind::Error5xx), Some(&defaults))
            .unwrap();
        assert_eq!(resolved.methods, MethodSelection::Many(vec![Method::Get]));
        assert_eq!(resolved.period, 60);
    }

    #[test]
    fn test_fully_specified_alarm_ignores_defaults() {
        let spec = AlarmSpec::new("dummy", MetricKind::Latency)
            .with_methods(Method::Get)
            .with_period(60)
            .with_latency_statistic(LatencyStatistic::P99);
        let defaults = AlarmDefaults {
            methods: Some(MethodSelection::Many(six_methods())),
            period: Some(900),
            ..Default::default()
        };

        let without = resolve(&spec, None).unwrap();
        let with = resolve(&spec, Some(&defaults)).unwrap();
        assert_eq!(without, with);
    }

    #[test]
    fn test_latency_with_six_methods_fails() {
        let spec = AlarmSpec::new("dummy", MetricKind::Latency).with_methods(six_methods());
        assert_eq!(
            resolve(&spec, None),
            Err(ValidationError::TooManyLatencyMethods { count: 6 })
        );

        let defaults = AlarmDefaults {
            methods: Some(MethodSelection::Many(six_methods())),
            ..Default::default()
        };
        let spec = AlarmSpec::new("dummy", MetricKind::Latency)
            .with_latency_statistic(LatencyStatistic::P50);
        // the length check wins over the statistic check
        assert_eq!(
            resolve(&spec, Some(&defaults)),
            Err(ValidationError::TooManyLatencyMethods { count: 6 })
        );
    }

    #[test]
    fn test_six_methods_allowed_for_sum_metrics() {
        let spec = AlarmSpec::new("dummy", MetricKind::Count).with_methods(six_methods());
        assert!(resolve(&spec, None).is_ok());
    }

    #[test]
    fn test_latency_statistic_requires_latency_metric() {
        let spec = AlarmSpec::new("dummy", MetricKind::Error4xx)
            .with_methods(Method::Get)
            .with_latency_statistic(LatencyStatistic::P95);

        let err = resolve(&spec, None).unwrap_err();
        assert_eq!(
            err,
            ValidationError::LatencyStatisticWithoutLatencyMetric {
                metric: "4XXError".to_string()
            }
        );
        assert!(err
            .to_string()
            .contains("latency statistic override only valid for latency metric"));
    }

    #[test]
    fn test_latency_statistic_rejects_method_lists() {
        let one_element = AlarmSpec::new("dummy", MetricKind::Latency)
            .with_methods(vec![Method::Get])
            .with_latency_statistic(LatencyStatistic::P50);
        assert_eq!(
            resolve(&one_element, None),
            Err(ValidationError::LatencyStatisticRequiresSingleMethod)
        );

        // falls back to the default method list
        let no_methods = AlarmSpec::new("dummy", MetricKind::Latency)
            .with_latency_statistic(LatencyStatistic::P50);
        assert_eq!(
            resolve(&no_methods, None),
            Err(ValidationError::LatencyStatisticRequiresSingleMethod)
        );
    }

    #[test]
    fn test_latency_statistic_with_scalar_method() {
        let defaults = AlarmDefaults {
            methods: Some(MethodSelection::Many(vec![Method::Delete, Method::Get])),
            ..Default::default()
        };
        let spec = AlarmSpec::new("dummy", MetricKind::Latency)
            .with_methods(Method::Get)
            .with_latency_statistic(LatencyStatistic::P95);

        let resolved = resolve(&spec, Some(&defaults)).unwrap();
        assert_eq!(resolved.statistic, Statistic::P95);
        assert_eq!(resolved.methods, MethodSelection::Single(Method::Get));
    }

    #[test]
    fn test_empty_method_list_is_rejected() {
        let spec = AlarmSpec::new("dummy", MetricKind::Count).with_methods(Vec::new());
        assert_eq!(
            resolve(&spec, None),
            Err(ValidationError::EmptyMethods {
                resource: "dummy".to_string()
            })
        );

        let missing = MissingDataAlarmSpec::new("dummy").with_methods(Vec::new());
        assert!(resolve_missing_data(&missing, None).is_err());
    }

    #[test]
    fn test_resolve_missing_data_tiers() {
        let defaults = AlarmDefaults {
            period: Some(60),
            ..Default::default()
        };

        let resolved = resolve_missing_data(&MissingDataAlarmSpec::new("dummy"), None).unwrap();
        assert_eq!(resolved.period, 300);
        assert_eq!(resolved.methods.len(), 5);

        let resolved =
            resolve_missing_data(&MissingDataAlarmSpec::new("dummy"), Some(&defaults)).unwrap();
        assert_eq!(resolved.period, 60);

        let spec = MissingDataAlarmSpec::new("dummy")
            .with_period(120)
            .with_methods(Method::Get);
        let resolved = resolve_missing_data(&spec, Some(&defaults)).unwrap();
        assert_eq!(resolved.period, 120);
        assert_eq!(resolved.methods, MethodSelection::Single(Method::Get));
    }

    #[test]
    fn test_companion_resolvers() {
        let defaults = AlarmDefaults {
            n_stds: Some(10.0),
            evaluation: Some(AlarmEvaluation::new(2, 3)),
            treat_missing_data: Some(TreatMissingData::Breaching),
            ..Default::default()
        };
        let plain = AlarmSpec::new("dummy", MetricKind::Error5xx);
        let custom = AlarmSpec::new("dummy", MetricKind::Error5xx)
            .with_n_stds(5.0)
            .with_evaluation(AlarmEvaluation::new(4, 5))
            .with_treat_missing_data(TreatMissingData::Ignore);

        assert_eq!(resolve_n_stds(&plain, None), Ok(3.0));
        assert_eq!(resolve_n_stds(&plain, Some(&defaults)), Ok(10.0));
        assert_eq!(resolve_n_stds(&custom, Some(&defaults)), Ok(5.0));

        assert_eq!(resolve_evaluation(&plain, None), AlarmEvaluation::new(1, 1));
        assert_eq!(
            resolve_evaluation(&plain, Some(&defaults)),
            AlarmEvaluation::new(2, 3)
        );
        assert_eq!(
            resolve_evaluation(&custom, Some(&defaults)),
            AlarmEvaluation::new(4, 5)
        );

        assert_eq!(
            resolve_treat_missing_data(&plain, None),
            TreatMissingData::NotBreaching
        );
        assert_eq!(
            resolve_treat_missing_data(&plain, Some(&defaults)),
            TreatMissingData::Breaching
        );
        assert_eq!(
            resolve_treat_missing_data(&custom, Some(&defaults)),
            TreatMissingData::Ignore
        );
    }

    #[test]
    fn test_actions_enabled_tiers() {
        let plain = AlarmSpec::new("dummy", MetricKind::Count);
        let enabled_defaults = AlarmDefaults {
            enabled: Some(true),
            ..Default::default()
        };

        assert!(!resolve_actions_enabled(&plain, None));
        assert!(resolve_actions_enabled(&plain, Some(&enabled_defaults)));
        assert!(!resolve_actions_enabled(
            &plain.clone().with_enabled(false),
            Some(&enabled_defaults)
        ));
        assert!(resolve_actions_enabled(
            &MissingDataAlarmSpec::new("dummy").with_enabled(true),
            None
        ));
    }

    #[test]
    fn test_repeated_method_rejected() {
        let spec =
            AlarmSpec::new("/a", MetricKind::Count).with_methods(vec![Method::Get, Method::Get]);
        assert_eq!(
            resolve(&spec, None),
            Err(ValidationError::DuplicateMethod {
                resource: "/a".to_string(),
                method: Method::Get,
            })
        );

        let latency = AlarmSpec::new("/a", MetricKind::Latency)
            .with_methods(vec![Method::Get, Method::Post, Method::Get]);
        assert!(matches!(
            resolve(&latency, None),
            Err(ValidationError::DuplicateMethod { method: Method::Get, .. })
        ));

        let missing =
            MissingDataAlarmSpec::new("/a").with_methods(vec![Method::Put, Method::Put]);
        assert!(matches!(
            resolve_missing_data(&missing, None),
            Err(ValidationError::DuplicateMethod { method: Method::Put, .. })
        ));

        let defaults = AlarmDefaults {
            methods: Some(vec![Method::Delete, Method::Delete].into()),
            ..Default::default()
        };
        assert!(resolve(&AlarmSpec::new("/a", MetricKind::Count), Some(&defaults)).is_err());
    }

    #[test]
    fn test_n_stds_must_be_finite_and_non_negative() {
        let spec = |n: f64| AlarmSpec::new("dummy", MetricKind::Count).with_n_stds(n);

        assert!(matches!(
            resolve_n_stds(&spec(f64::NAN), None),
            Err(ValidationError::InvalidNStds { .. })
        ));
        assert!(resolve_n_stds(&spec(f64::INFINITY), None).is_err());
        assert_eq!(
            resolve_n_stds(&spec(-2.0), None),
            Err(ValidationError::InvalidNStds {
                value: "-2".to_string()
            })
        );
        assert_eq!(resolve_n_stds(&spec(0.0), None), Ok(0.0));

        let defaults = AlarmDefaults {
            n_stds: Some(f64::NAN),
            ..Default::default()
        };
        let plain = AlarmSpec::new("dummy", MetricKind::Count);
        assert!(resolve_n_stds(&plain, Some(&defaults)).is_err());
    }
}
