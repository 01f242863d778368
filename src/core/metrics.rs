//! Pure helpers over metric arrays: keying, ordering, filtering

use crate::core::errors::{Error, Result};
use crate::core::types::{Metric, MetricKind};
use std::collections::HashSet;

/// Assign or refresh the synthetic lookup key on each metric.
///
/// Idempotent: re-keying already-keyed metrics yields the same keys as long
/// as the identity tuple is unchanged. Values are never altered.
pub fn rekey_metrics<K: MetricKind>(metrics: Vec<Metric<K>>) -> Vec<Metric<K>> {
    metrics
        .into_iter()
        .map(|mut m| {
            m.key = Some(m.identity_key());
            m
        })
        .collect()
}

/// Deterministic total order: metric_id, class_id, group_id, sketch_id.
/// Output is reproducible across runs and diff-friendly in tests.
pub fn sort_metrics<K: MetricKind>(mut metrics: Vec<Metric<K>>) -> Vec<Metric<K>> {
    metrics.sort_by(|a, b| {
        a.metric_id
            .cmp(&b.metric_id)
            .then_with(|| a.class_id.cmp(&b.class_id))
            .then_with(|| a.group_id.cmp(&b.group_id))
            .then_with(|| a.sketch_id.cmp(&b.sketch_id))
    });
    metrics
}

/// First metric matching the predicate, or `MetricNotFound` with the given
/// description.
pub fn first_matching_metric<'a, K: MetricKind, F>(
    metrics: &'a [Metric<K>],
    predicate: F,
    description: &str,
) -> Result<&'a Metric<K>>
where
    F: Fn(&Metric<K>) -> bool,
{
    metrics
        .iter()
        .find(|m| predicate(m))
        .ok_or_else(|| Error::MetricNotFound(description.to_string()))
}

/// Metrics whose sketch_id is one of the given ids
pub fn metrics_with_sketch_id<'a, K: MetricKind>(
    metrics: &'a [Metric<K>],
    sketch_ids: &[&str],
) -> Vec<&'a Metric<K>> {
    metrics
        .iter()
        .filter(|m| {
            m.sketch_id
                .as_deref()
                .is_some_and(|id| sketch_ids.contains(&id))
        })
        .collect()
}

/// Metrics produced by one computation
pub fn metrics_for_metric_id<'a, K: MetricKind>(
    metrics: &'a [Metric<K>],
    metric_id: &str,
) -> Vec<&'a Metric<K>> {
    metrics.iter().filter(|m| m.metric_id == metric_id).collect()
}

/// Check that no two metrics share an identity tuple. Duplicates are an
/// implementer error upstream, never a displayable condition.
pub fn verify_metric_identity<K: MetricKind>(metrics: &[Metric<K>]) -> Result<()> {
    let mut seen = HashSet::with_capacity(metrics.len());
    for m in metrics {
        let key = m.identity_key();
        if !seen.insert(key.clone()) {
            return Err(Error::DuplicateMetric(key));
        }
    }
    Ok(())
}

/// NaN is the missing-class sentinel and counts as 0 in sums
pub fn nan_to_zero(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{ProtectionLevel, RawMetric};

    fn sample() -> Vec<RawMetric> {
        vec![
            Metric::new("b", 2.0).with_class("z").with_sketch("sk2"),
            Metric::new("a", 1.0).with_class("y").with_sketch("sk1"),
            Metric::new("a", 3.0)
                .with_class("y")
                .with_group(ProtectionLevel::HighProtection),
            Metric::new("a", 4.0),
        ]
    }

    #[test]
    fn rekey_is_idempotent() {
        let once = rekey_metrics(sample());
        let twice = rekey_metrics(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn rekey_does_not_alter_values() {
        let keyed = rekey_metrics(sample());
        let values: Vec<f64> = keyed.iter().map(|m| m.value).collect();
        assert_eq!(values, vec![2.0, 1.0, 3.0, 4.0]);
        assert!(keyed.iter().all(|m| m.key.is_some()));
    }

    #[test]
    fn sort_orders_by_metric_class_group_sketch() {
        let sorted = sort_metrics(sample());
        let ids: Vec<&str> = sorted.iter().map(|m| m.metric_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "a", "a", "b"]);
        // ungrouped (None) sorts before grouped within the same class
        assert_eq!(sorted[0].class_id, None);
        assert_eq!(sorted[1].group_id, None);
        assert_eq!(sorted[2].group_id, Some(ProtectionLevel::HighProtection));
    }

    #[test]
    fn sort_is_deterministic() {
        let a = sort_metrics(sample());
        let mut reversed = sample();
        reversed.reverse();
        let b = sort_metrics(reversed);
        assert_eq!(a, b);
    }

    #[test]
    fn first_matching_metric_errors_when_absent() {
        let metrics = sample();
        let found = first_matching_metric(&metrics, |m| m.metric_id == "a", "metric a");
        assert!(found.is_ok());
        let missing = first_matching_metric(&metrics, |m| m.metric_id == "nope", "metric nope");
        assert!(matches!(missing, Err(Error::MetricNotFound(_))));
    }

    #[test]
    fn metrics_with_sketch_id_filters() {
        let metrics = sample();
        let filtered = metrics_with_sketch_id(&metrics, &["sk1"]);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].sketch_id.as_deref(), Some("sk1"));
    }

    #[test]
    fn verify_metric_identity_rejects_duplicates() {
        let mut metrics = sample();
        assert!(verify_metric_identity(&metrics).is_ok());
        metrics.push(metrics[0].clone());
        assert!(matches!(
            verify_metric_identity(&metrics),
            Err(Error::DuplicateMetric(_))
        ));
    }

    #[test]
    fn nan_counts_as_zero() {
        assert_eq!(nan_to_zero(f64::NAN), 0.0);
        assert_eq!(nan_to_zero(1.5), 1.5);
    }
}
