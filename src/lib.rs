// Export modules for library usage
pub mod aggregation;
pub mod cli;
pub mod config;
pub mod core;
pub mod formatting;
pub mod grouping;
pub mod io;
pub mod objective;
pub mod overlap;
pub mod percent;
pub mod report;
pub mod sketch;

// Re-export commonly used types
pub use crate::core::{
    Error, GroupMetricAgg, Metric, ObjectiveAnswer, PercentMetric, ProtectionLevel, RawMetric,
    Result, SketchClassAgg, PROTECTION_LEVELS,
};

pub use crate::core::metrics::{
    first_matching_metric, metrics_for_metric_id, metrics_with_sketch_id, rekey_metrics,
    sort_metrics, verify_metric_identity,
};

pub use crate::aggregation::{flatten_by_group_all_class, flatten_by_sketch_all_class};
pub use crate::config::{DataClass, MetricGroup, Objective, ProjectConfig};
pub use crate::grouping::{DesignationMap, UnknownPolicy};
pub use crate::objective::{evaluate_objective, group_percents, ObjectiveResult};
pub use crate::overlap::{OverlapEngine, PrecomputedOverlap};
pub use crate::percent::{to_percent_metric, PercentOptions};
pub use crate::report::{build_display, ReportDisplay, ReportResult, ReportRunner};
pub use crate::sketch::{get_user_attribute, Plan, Sketch, SketchCollection, SketchProperties};
