//! Report assembly: runs an overlap engine across the classes of a metric
//! group and reduces the resulting metrics to display-ready rows.

use crate::aggregation::{flatten_by_group_all_class, flatten_by_sketch_all_class};
use crate::config::{MetricGroup, ProjectConfig};
use crate::core::errors::Result;
use crate::core::metrics::{rekey_metrics, sort_metrics, verify_metric_identity};
use crate::core::types::{
    GroupMetricAgg, ObjectiveAnswer, ProtectionLevel, RawMetric, SketchClassAgg, PROTECTION_LEVELS,
};
use crate::objective::{evaluate_objective, group_percents, objective_status_msg};
use crate::overlap::OverlapEngine;
use crate::percent::percent_of_baseline;
use crate::sketch::{Plan, Sketch};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What one geoprocessing run hands to the presentation layer: the full
/// metric set, rekeyed and sorted, plus the geometry-free sketch tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResult {
    pub metrics: Vec<RawMetric>,
    pub sketch: Plan,
    pub generated_at: DateTime<Utc>,
}

/// Status of one objective for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectiveStatus {
    pub objective_id: String,
    pub target: f64,
    pub perc_sum: f64,
    pub met: ObjectiveAnswer,
    pub msg: String,
}

/// Display-ready reduction of a report result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDisplay {
    pub metric_id: String,
    pub group_rows: Vec<GroupMetricAgg>,
    pub sketch_rows: Vec<SketchClassAgg>,
    pub objectives: Vec<ObjectiveStatus>,
}

/// Drives one report computation through an overlap engine
pub struct ReportRunner<'a, E: OverlapEngine> {
    engine: &'a E,
    config: &'a ProjectConfig,
}

impl<'a, E: OverlapEngine> ReportRunner<'a, E> {
    pub fn new(engine: &'a E, config: &'a ProjectConfig) -> Self {
        Self { engine, config }
    }

    /// Compute the full metric set for one metric group: per-sketch overlap
    /// for every class, plus per-group union overlap when the plan is a
    /// collection. The result is identity-checked, rekeyed, and sorted.
    pub fn run(&self, metric_group_id: &str, plan: &Plan) -> Result<ReportResult> {
        let mg = self.config.metric_group(metric_group_id)?;
        let sketch_levels = self.config.designations.classify_plan(plan)?;

        let mut metrics: Vec<RawMetric> = Vec::new();
        for class in &mg.classes {
            let class_metrics = self.engine.class_overlap(&mg.metric_id, class, plan)?;
            // tag with the class measured, engines are per-layer and may
            // leave it unset
            metrics.extend(
                class_metrics
                    .into_iter()
                    .map(|m| m.with_class(class.class_id.clone())),
            );
            if plan.is_collection() {
                let group_metrics =
                    self.engine
                        .group_overlap(&mg.metric_id, class, plan, &sketch_levels)?;
                metrics.extend(
                    group_metrics
                        .into_iter()
                        .map(|m| m.with_class(class.class_id.clone())),
                );
            }
        }
        verify_metric_identity(&metrics)?;
        log::info!(
            "{}: {} metrics for plan {}",
            mg.metric_id,
            metrics.len(),
            plan.id()
        );

        Ok(ReportResult {
            metrics: sort_metrics(rekey_metrics(metrics)),
            sketch: plan.clone(),
            generated_at: Utc::now(),
        })
    }
}

/// Group rows for a single sketch: its own overlap counts toward its own
/// protection level, every other (group x class) cell is zero. The grouped
/// aggregator path is collections-only.
fn leaf_group_rows(
    sketch: &Sketch,
    level_metrics: &[RawMetric],
    mg: &MetricGroup,
    baseline: &[RawMetric],
    sketch_levels: &BTreeMap<String, ProtectionLevel>,
) -> Result<Vec<GroupMetricAgg>> {
    let sketch_level = sketch_levels.get(sketch.id()).copied();
    let mut rows = Vec::with_capacity(PROTECTION_LEVELS.len() * mg.classes.len());
    for &group in &PROTECTION_LEVELS {
        let in_group = sketch_level == Some(group);
        for class in &mg.classes {
            let metric = if in_group {
                level_metrics
                    .iter()
                    .find(|m| m.class_id.as_deref() == Some(class.class_id.as_str()))
            } else {
                None
            };
            let (value, perc_value) = match metric {
                Some(m) => {
                    let perc =
                        percent_of_baseline(m.value, m.class_id.as_deref(), None, baseline)?;
                    (m.value, perc)
                }
                None => (0.0, 0.0),
            };
            rows.push(GroupMetricAgg {
                group_id: group,
                class_id: class.class_id.clone(),
                value,
                perc_value,
                num_sketches: usize::from(in_group),
            });
        }
    }
    Ok(rows)
}

/// Reduce a report result to the rows and objective statuses the writers
/// render.
///
/// Objectives are evaluated for single-class metric groups (the original
/// objective cards report against one boundary class); multi-class groups
/// get tables only.
pub fn build_display(
    result: &ReportResult,
    config: &ProjectConfig,
    metric_group_id: &str,
) -> Result<ReportDisplay> {
    let mg = config.metric_group(metric_group_id)?;
    let baseline = &config.precalc;
    let sketch_levels = config.designations.classify_plan(&result.sketch)?;

    // Metrics of this computation with a protection level attached
    let level_metrics: Vec<RawMetric> = result
        .metrics
        .iter()
        .filter(|m| m.metric_id == mg.metric_id && m.group_id.is_some())
        .cloned()
        .collect();

    let group_rows = match &result.sketch {
        Plan::SketchCollection(_) => flatten_by_group_all_class(
            &result.sketch,
            &level_metrics,
            baseline,
            mg,
            &sketch_levels,
            &PROTECTION_LEVELS,
        )?,
        Plan::Sketch(sketch) => {
            // single sketch path: per-sketch metrics, no union bookkeeping
            let sketch_metrics: Vec<RawMetric> = result
                .metrics
                .iter()
                .filter(|m| m.metric_id == mg.metric_id && m.group_id.is_none())
                .cloned()
                .collect();
            leaf_group_rows(sketch, &sketch_metrics, mg, baseline, &sketch_levels)?
        }
    };

    let leaves: Vec<Sketch> = result
        .sketch
        .leaf_sketches()
        .into_iter()
        .cloned()
        .collect();
    let per_sketch_metrics: Vec<RawMetric> = result
        .metrics
        .iter()
        .filter(|m| m.metric_id == mg.metric_id && m.group_id.is_none() && m.sketch_id.is_some())
        .cloned()
        .collect();
    let sketch_rows =
        flatten_by_sketch_all_class(&leaves, &per_sketch_metrics, &mg.classes, baseline)?;

    let objectives = if let [class] = mg.classes.as_slice() {
        let percents = group_percents(&group_rows, &class.class_id);
        config
            .metric_group_objectives(mg)?
            .into_iter()
            .map(|objective| {
                let outcome = evaluate_objective(objective, &percents);
                ObjectiveStatus {
                    objective_id: objective.objective_id.clone(),
                    target: objective.target,
                    perc_sum: outcome.perc_sum,
                    msg: objective_status_msg(objective, &outcome),
                    met: outcome.met,
                }
            })
            .collect()
    } else {
        Vec::new()
    };

    Ok(ReportDisplay {
        metric_id: mg.metric_id.clone(),
        group_rows,
        sketch_rows,
        objectives,
    })
}
