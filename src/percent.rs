//! Percent-metric conversion: raw overlap values divided by precalculated
//! baseline totals.

use crate::core::errors::{Error, Result};
use crate::core::types::{PercentMetric, ProtectionLevel, RawMetric};

/// Options for `to_percent_metric`
#[derive(Debug, Clone, Default)]
pub struct PercentOptions {
    /// Metric id assigned to converted metrics. Defaults to
    /// `"<metricId>Perc"`.
    pub metric_id_override: Option<String>,
}

/// Baseline metric for a class: a group-specific baseline wins when one
/// exists, otherwise the ungrouped total for the class.
fn find_baseline<'a>(
    baseline: &'a [RawMetric],
    class_id: Option<&str>,
    group_id: Option<ProtectionLevel>,
) -> Result<&'a RawMetric> {
    let class_matches: Vec<&RawMetric> = baseline
        .iter()
        .filter(|b| b.class_id.as_deref() == class_id)
        .collect();
    if let Some(&grouped) = class_matches.iter().find(|b| b.group_id == group_id) {
        return Ok(grouped);
    }
    class_matches
        .iter()
        .find(|b| b.group_id.is_none())
        .copied()
        .ok_or_else(|| Error::BaselineNotFound {
            class_id: class_id.map(str::to_string),
            group_id,
        })
}

/// Divide `value` by the matching class baseline. A zero or NaN baseline
/// yields NaN (the missing-class sentinel), never an error; an absent
/// baseline is a configuration bug and errors.
pub(crate) fn percent_of_baseline(
    value: f64,
    class_id: Option<&str>,
    group_id: Option<ProtectionLevel>,
    baseline: &[RawMetric],
) -> Result<f64> {
    let total = find_baseline(baseline, class_id, group_id)?;
    if total.value == 0.0 || total.value.is_nan() {
        return Ok(f64::NAN);
    }
    Ok(value / total.value)
}

/// Convert raw metrics to percent-of-baseline metrics.
///
/// Each output metric keeps the identity fields of its input, with `value`
/// replaced by the ratio and `metric_id` replaced per
/// `opts.metric_id_override`. Output length always equals input length;
/// order is not guaranteed, callers needing determinism re-sort.
pub fn to_percent_metric(
    metrics: &[RawMetric],
    baseline: &[RawMetric],
    opts: &PercentOptions,
) -> Result<Vec<PercentMetric>> {
    metrics
        .iter()
        .map(|m| {
            let ratio =
                percent_of_baseline(m.value, m.class_id.as_deref(), m.group_id, baseline)?;
            let metric_id = opts
                .metric_id_override
                .clone()
                .unwrap_or_else(|| format!("{}Perc", m.metric_id));
            Ok(m.to_percent(metric_id, ratio))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Metric;
    use pretty_assertions::assert_eq;

    fn baseline() -> Vec<RawMetric> {
        vec![
            Metric::new("precalc", 10_000_000.0).with_class("mangrove"),
            Metric::new("precalc", 5_000_000.0).with_class("coral"),
            Metric::new("precalc", 0.0).with_class("seagrass"),
            Metric::new("precalc", f64::NAN).with_class("saltmarsh"),
        ]
    }

    // Scenario: 1,000,000 m2 of mangrove overlap against a 10,000,000 m2
    // baseline is 10%
    #[test]
    fn converts_value_to_fraction_of_baseline() {
        let metrics = vec![Metric::new("mangroveAreaOverlap", 1_000_000.0)
            .with_class("mangrove")
            .with_sketch("sk1")];
        let percents =
            to_percent_metric(&metrics, &baseline(), &PercentOptions::default()).unwrap();
        assert_eq!(percents.len(), 1);
        assert_eq!(percents[0].value, 0.1);
        assert_eq!(percents[0].metric_id, "mangroveAreaOverlapPerc");
        assert_eq!(percents[0].class_id.as_deref(), Some("mangrove"));
        assert_eq!(percents[0].sketch_id.as_deref(), Some("sk1"));
    }

    #[test]
    fn metric_id_override_is_used() {
        let metrics = vec![Metric::new("mangroveAreaOverlap", 1_000_000.0).with_class("mangrove")];
        let opts = PercentOptions {
            metric_id_override: Some("mangrovePercent".to_string()),
        };
        let percents = to_percent_metric(&metrics, &baseline(), &opts).unwrap();
        assert_eq!(percents[0].metric_id, "mangrovePercent");
    }

    #[test]
    fn missing_baseline_is_an_error() {
        let metrics = vec![Metric::new("kelpAreaOverlap", 10.0).with_class("kelp")];
        let result = to_percent_metric(&metrics, &baseline(), &PercentOptions::default());
        assert!(matches!(result, Err(Error::BaselineNotFound { .. })));
    }

    #[test]
    fn zero_baseline_yields_nan_not_error() {
        let metrics = vec![Metric::new("seagrassAreaOverlap", 10.0).with_class("seagrass")];
        let percents =
            to_percent_metric(&metrics, &baseline(), &PercentOptions::default()).unwrap();
        assert!(percents[0].value.is_nan());
    }

    // A class absent from the current geography carries a NaN baseline and
    // must stay distinguishable from a true 0%
    #[test]
    fn nan_baseline_yields_nan_sentinel() {
        let metrics = vec![
            Metric::new("saltmarshAreaOverlap", 10.0).with_class("saltmarsh"),
            Metric::new("coralAreaOverlap", 0.0).with_class("coral"),
        ];
        let percents =
            to_percent_metric(&metrics, &baseline(), &PercentOptions::default()).unwrap();
        assert!(percents[0].is_missing_class());
        assert_eq!(percents[1].value, 0.0);
        assert!(!percents[1].is_missing_class());
    }

    #[test]
    fn grouped_metric_prefers_group_baseline_with_ungrouped_fallback() {
        use crate::core::types::ProtectionLevel::*;
        let mut totals = baseline();
        totals.push(
            Metric::new("precalc", 2_000_000.0)
                .with_class("coral")
                .with_group(HighProtection),
        );

        let metrics = vec![
            Metric::new("coralAreaOverlap", 1_000_000.0)
                .with_class("coral")
                .with_group(HighProtection),
            Metric::new("coralAreaOverlap", 1_000_000.0)
                .with_class("coral")
                .with_group(MediumProtection),
        ];
        let percents = to_percent_metric(&metrics, &totals, &PercentOptions::default()).unwrap();
        // group-specific denominator for HIGH, class total for MEDIUM
        assert_eq!(percents[0].value, 0.5);
        assert_eq!(percents[1].value, 0.2);
    }

    #[test]
    fn output_length_equals_input_length() {
        let metrics: Vec<RawMetric> = (0..5)
            .map(|i| {
                Metric::new("coralAreaOverlap", i as f64)
                    .with_class("coral")
                    .with_sketch(format!("sk{i}"))
            })
            .collect();
        let percents =
            to_percent_metric(&metrics, &baseline(), &PercentOptions::default()).unwrap();
        assert_eq!(percents.len(), metrics.len());
    }
}
