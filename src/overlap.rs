//! Seam to the raw overlap computation.
//!
//! The geometry work (polygon clipping, raster zonal statistics, data
//! fetch) lives outside this crate. An `OverlapEngine` supplies raw
//! per-sketch metrics per class, and for collections the per-group union
//! metrics with overlapping child geometry already deduplicated.

use crate::config::DataClass;
use crate::core::errors::Result;
use crate::core::types::{ProtectionLevel, RawMetric};
use crate::sketch::Plan;
use std::collections::BTreeMap;

pub trait OverlapEngine {
    /// Raw overlap of each leaf sketch of `plan` with one reference class.
    /// Returned metrics carry the class id and the sketch id, no group.
    fn class_overlap(
        &self,
        metric_id: &str,
        class: &DataClass,
        plan: &Plan,
    ) -> Result<Vec<RawMetric>>;

    /// Union overlap per protection level for one class of a collection,
    /// one metric per group with `sketch_id == None`. Implementations must
    /// not double-count area where same-group sketches overlap.
    fn group_overlap(
        &self,
        metric_id: &str,
        class: &DataClass,
        plan: &Plan,
        sketch_levels: &BTreeMap<String, ProtectionLevel>,
    ) -> Result<Vec<RawMetric>>;
}

/// Engine backed by metrics that were already computed elsewhere (a prior
/// geoprocessing run, a fixture file). Filters the stored set down to
/// what each call asks for.
#[derive(Debug, Clone, Default)]
pub struct PrecomputedOverlap {
    metrics: Vec<RawMetric>,
}

impl PrecomputedOverlap {
    pub fn new(metrics: Vec<RawMetric>) -> Self {
        Self { metrics }
    }

    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let metrics: Vec<RawMetric> = serde_json::from_str(&raw)?;
        Ok(Self::new(metrics))
    }
}

impl OverlapEngine for PrecomputedOverlap {
    fn class_overlap(
        &self,
        metric_id: &str,
        class: &DataClass,
        plan: &Plan,
    ) -> Result<Vec<RawMetric>> {
        let leaf_ids: Vec<&str> = plan.leaf_sketches().iter().map(|s| s.id()).collect();
        Ok(self
            .metrics
            .iter()
            .filter(|m| {
                m.metric_id == metric_id
                    && m.group_id.is_none()
                    && m.class_id.as_deref() == Some(class.class_id.as_str())
                    && m.sketch_id
                        .as_deref()
                        .is_some_and(|id| leaf_ids.contains(&id))
            })
            .cloned()
            .collect())
    }

    fn group_overlap(
        &self,
        metric_id: &str,
        class: &DataClass,
        _plan: &Plan,
        _sketch_levels: &BTreeMap<String, ProtectionLevel>,
    ) -> Result<Vec<RawMetric>> {
        Ok(self
            .metrics
            .iter()
            .filter(|m| {
                m.metric_id == metric_id
                    && m.group_id.is_some()
                    && m.sketch_id.is_none()
                    && m.class_id.as_deref() == Some(class.class_id.as_str())
            })
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Metric;
    use crate::sketch::{Sketch, SketchCollection, SketchProperties};

    fn plan() -> Plan {
        Plan::SketchCollection(SketchCollection {
            properties: SketchProperties::new("coll", "Plan"),
            sketches: vec![
                Sketch::new(SketchProperties::new("sk1", "Zone 1")),
                Sketch::new(SketchProperties::new("sk2", "Zone 2")),
            ],
        })
    }

    #[test]
    fn filters_per_sketch_and_group_rows() {
        let engine = PrecomputedOverlap::new(vec![
            Metric::new("habitatAreaOverlap", 1.0)
                .with_class("coral")
                .with_sketch("sk1"),
            Metric::new("habitatAreaOverlap", 2.0)
                .with_class("coral")
                .with_sketch("other"),
            Metric::new("habitatAreaOverlap", 3.0)
                .with_class("coral")
                .with_group(ProtectionLevel::MediumProtection),
            Metric::new("otherMetric", 4.0).with_class("coral").with_sketch("sk1"),
        ]);
        let class = DataClass::new("coral", "Coral");
        let plan = plan();

        let per_sketch = engine
            .class_overlap("habitatAreaOverlap", &class, &plan)
            .unwrap();
        assert_eq!(per_sketch.len(), 1);
        assert_eq!(per_sketch[0].value, 1.0);

        let groups = engine
            .group_overlap("habitatAreaOverlap", &class, &plan, &BTreeMap::new())
            .unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].value, 3.0);
    }
}
