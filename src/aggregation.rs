//! Group-level and per-sketch flattening of overlap metrics into
//! display-ready rows.
//!
//! Union overlap within a group cannot be derived from per-sketch values
//! alone: two sketches in the same group may overlap each other, and only
//! the geometry engine holds the polygons needed to deduplicate that. The
//! engine therefore reports one collection-level union metric per
//! (group, class), carried with `sketch_id == None`, and the aggregator's
//! job is bookkeeping: joining those union values against the class list
//! and baselines.

use crate::config::{DataClass, MetricGroup};
use crate::core::errors::{Error, Result};
use crate::core::types::{GroupMetricAgg, ProtectionLevel, RawMetric, SketchClassAgg};
use crate::percent::percent_of_baseline;
use crate::sketch::{Plan, Sketch};
use std::collections::BTreeMap;

fn class_matches(metric: &RawMetric, class: &DataClass) -> bool {
    metric.class_id.as_deref() == Some(class.class_id.as_str())
}

/// One aggregate row per (group, class): union overlap value, its fraction
/// of the class baseline, and the number of sketches in the group.
///
/// Every configured (group x class) combination is represented, so
/// downstream tables never silently drop a column; a group with no
/// sketches for a class yields `value = 0, perc_value = 0`. Output is
/// ordered by group, then by the metric group's class order.
///
/// Errors with `ExpectedCollection` when the plan is a single sketch;
/// single-sketch callers use the per-sketch path instead.
pub fn flatten_by_group_all_class(
    plan: &Plan,
    group_metrics: &[RawMetric],
    baseline: &[RawMetric],
    metric_group: &MetricGroup,
    sketch_levels: &BTreeMap<String, ProtectionLevel>,
    groups: &[ProtectionLevel],
) -> Result<Vec<GroupMetricAgg>> {
    if let Plan::Sketch(sketch) = plan {
        return Err(Error::ExpectedCollection(sketch.id().to_string()));
    }

    let mut rows = Vec::with_capacity(groups.len() * metric_group.classes.len());
    for &group in groups {
        let num_sketches = sketch_levels.values().filter(|l| **l == group).count();
        for class in &metric_group.classes {
            // Collection-level union metric for this group, precomputed by
            // the geometry engine with overlapping children deduplicated
            let union = group_metrics.iter().find(|m| {
                m.sketch_id.is_none() && m.group_id == Some(group) && class_matches(m, class)
            });
            let (value, perc_value) = match union {
                Some(m) => {
                    let perc = percent_of_baseline(
                        m.value,
                        m.class_id.as_deref(),
                        None,
                        baseline,
                    )?;
                    (m.value, perc)
                }
                None => (0.0, 0.0),
            };
            rows.push(GroupMetricAgg {
                group_id: group,
                class_id: class.class_id.clone(),
                value,
                perc_value,
                num_sketches,
            });
        }
    }
    Ok(rows)
}

/// One row per child sketch with the percent overlap for every class of
/// the metric group.
///
/// Every sketch appears even when its overlap with a class is exactly 0.
/// Rows are independent; overlap between sketches is irrelevant here
/// since nothing is summed across rows.
pub fn flatten_by_sketch_all_class(
    sketches: &[Sketch],
    sketch_metrics: &[RawMetric],
    classes: &[DataClass],
    baseline: &[RawMetric],
) -> Result<Vec<SketchClassAgg>> {
    sketches
        .iter()
        .map(|sketch| {
            let mut class_values = BTreeMap::new();
            for class in classes {
                let metric = sketch_metrics.iter().find(|m| {
                    m.sketch_id.as_deref() == Some(sketch.id()) && class_matches(m, class)
                });
                let perc = match metric {
                    Some(m) => percent_of_baseline(
                        m.value,
                        m.class_id.as_deref(),
                        m.group_id,
                        baseline,
                    )?,
                    None => 0.0,
                };
                class_values.insert(class.class_id.clone(), perc);
            }
            Ok(SketchClassAgg {
                sketch_id: sketch.id().to_string(),
                sketch_name: sketch.properties.name.clone(),
                class_values,
            })
        })
        .collect()
}
