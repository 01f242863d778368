//! Common type definitions used across the codebase

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

/// Protection level a planning zone is classified into, derived from its
/// designation attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProtectionLevel {
    HighProtection,
    MediumProtection,
    /// Designation code not present in the configured lookup tables.
    /// The classifier never silently maps this to a real level; policy
    /// for unknowns is decided by the caller (see `DesignationMap`).
    Unknown,
}

impl ProtectionLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProtectionLevel::HighProtection => "HIGH_PROTECTION",
            ProtectionLevel::MediumProtection => "MEDIUM_PROTECTION",
            ProtectionLevel::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for ProtectionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The protection levels reports aggregate by. `Unknown` is excluded; it is
/// a classifier outcome, not a reporting group.
pub const PROTECTION_LEVELS: [ProtectionLevel; 2] = [
    ProtectionLevel::HighProtection,
    ProtectionLevel::MediumProtection,
];

/// Whether an objective is met
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectiveAnswer {
    Yes,
    No,
}

/// Marker for metric kinds. Raw metrics hold area/value sums; percent
/// metrics hold ratios against a baseline. The percent converter is the
/// only bridge between the two, so an already-converted metric can never
/// be divided again.
pub trait MetricKind: private::Sealed {}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Raw;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Percent;

impl MetricKind for Raw {}
impl MetricKind for Percent {}

mod private {
    pub trait Sealed {}
    impl Sealed for super::Raw {}
    impl Sealed for super::Percent {}
}

/// One measurement of overlap between a sketch (or group of sketches) and a
/// reference feature class.
///
/// The tuple (metric_id, class_id, sketch_id, group_id, geography_id)
/// uniquely identifies a metric within a result set. `value` is an area in
/// square meters or a summed attribute value for `Raw` metrics, and a ratio
/// in [0, 1] for `Percent` metrics. `NaN` is the missing-class sentinel:
/// the class has no presence in the current geography. It is treated as 0
/// for arithmetic and flagged at display time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound = "")]
pub struct Metric<K: MetricKind = Raw> {
    /// Synthetic lookup key, filled by `rekey_metrics`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub metric_id: String,
    #[serde(default)]
    pub class_id: Option<String>,
    #[serde(default)]
    pub sketch_id: Option<String>,
    #[serde(default)]
    pub group_id: Option<ProtectionLevel>,
    #[serde(default)]
    pub geography_id: Option<String>,
    pub value: f64,
    #[serde(skip)]
    kind: PhantomData<K>,
}

pub type RawMetric = Metric<Raw>;
pub type PercentMetric = Metric<Percent>;

impl RawMetric {
    pub fn new(metric_id: impl Into<String>, value: f64) -> Self {
        Self {
            key: None,
            metric_id: metric_id.into(),
            class_id: None,
            sketch_id: None,
            group_id: None,
            geography_id: None,
            value,
            kind: PhantomData,
        }
    }

    /// Bridge to a percent metric. Crate-private so that conversion only
    /// happens through the percent converter.
    pub(crate) fn to_percent(&self, metric_id: String, value: f64) -> PercentMetric {
        Metric {
            key: None,
            metric_id,
            class_id: self.class_id.clone(),
            sketch_id: self.sketch_id.clone(),
            group_id: self.group_id,
            geography_id: self.geography_id.clone(),
            value,
            kind: PhantomData,
        }
    }
}

impl<K: MetricKind> Metric<K> {
    pub fn with_class(mut self, class_id: impl Into<String>) -> Self {
        self.class_id = Some(class_id.into());
        self
    }

    pub fn with_sketch(mut self, sketch_id: impl Into<String>) -> Self {
        self.sketch_id = Some(sketch_id.into());
        self
    }

    pub fn with_group(mut self, group_id: ProtectionLevel) -> Self {
        self.group_id = Some(group_id);
        self
    }

    pub fn with_geography(mut self, geography_id: impl Into<String>) -> Self {
        self.geography_id = Some(geography_id.into());
        self
    }

    /// Stable key derived from the identity tuple
    pub fn identity_key(&self) -> String {
        fn part(v: Option<&str>) -> &str {
            v.unwrap_or("null")
        }
        format!(
            "{}:{}:{}:{}:{}",
            self.metric_id,
            part(self.class_id.as_deref()),
            part(self.sketch_id.as_deref()),
            self.group_id.map(|g| g.as_str()).unwrap_or("null"),
            part(self.geography_id.as_deref()),
        )
    }

    /// True when the value is the missing-class sentinel
    pub fn is_missing_class(&self) -> bool {
        self.value.is_nan()
    }
}

/// One aggregate cell of the group-level report: union overlap of all
/// sketches in `group_id` with `class_id`, deduplicated by the upstream
/// geometry engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMetricAgg {
    pub group_id: ProtectionLevel,
    pub class_id: String,
    /// Absolute union overlap (square meters or summed value)
    pub value: f64,
    /// `value` as a fraction of the class baseline
    pub perc_value: f64,
    /// How many sketches of the plan fall in this group
    pub num_sketches: usize,
}

/// One row of the per-sketch report table: percent overlap for each class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SketchClassAgg {
    pub sketch_id: String,
    pub sketch_name: String,
    /// class_id -> fraction of class baseline
    pub class_values: BTreeMap<String, f64>,
}
