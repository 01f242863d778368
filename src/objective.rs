//! Objective evaluation: does the summed percent overlap of the eligible
//! protection levels reach the target?

use crate::config::Objective;
use crate::core::metrics::nan_to_zero;
use crate::core::types::{GroupMetricAgg, ObjectiveAnswer, ProtectionLevel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outcome of evaluating one objective against a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectiveResult {
    pub met: ObjectiveAnswer,
    /// Sum of percent values over the groups that count
    pub perc_sum: f64,
}

/// Sum the percent values of groups counting toward the objective and
/// compare against the target. Meeting the target exactly counts as met.
/// NaN percents (missing classes) count as 0. Empty input sums to 0.
pub fn evaluate_objective(
    objective: &Objective,
    per_group: &BTreeMap<ProtectionLevel, f64>,
) -> ObjectiveResult {
    let perc_sum: f64 = per_group
        .iter()
        .filter(|(level, _)| objective.counts(**level))
        .map(|(_, perc)| nan_to_zero(*perc))
        .sum();
    let met = if perc_sum >= objective.target {
        ObjectiveAnswer::Yes
    } else {
        ObjectiveAnswer::No
    };
    ObjectiveResult { met, perc_sum }
}

/// Per-group percent values for one class, extracted from aggregator rows
pub fn group_percents(
    aggs: &[GroupMetricAgg],
    class_id: &str,
) -> BTreeMap<ProtectionLevel, f64> {
    aggs.iter()
        .filter(|agg| agg.class_id == class_id)
        .map(|agg| (agg.group_id, agg.perc_value))
        .collect()
}

/// Met / not-met sentence for display, in the style of the report cards
pub fn objective_status_msg(objective: &Objective, result: &ObjectiveResult) -> String {
    match result.met {
        ObjectiveAnswer::Yes => format!(
            "This plan meets the objective of protecting {}",
            objective.short_desc
        ),
        ObjectiveAnswer::No => format!(
            "This plan does not meet the objective of protecting {}",
            objective.short_desc
        ),
    }
}
