pub mod errors;
pub mod metrics;
pub mod types;

pub use errors::{Error, Result};
pub use types::{
    GroupMetricAgg, Metric, MetricKind, ObjectiveAnswer, Percent, PercentMetric, ProtectionLevel,
    Raw, RawMetric, SketchClassAgg, PROTECTION_LEVELS,
};
