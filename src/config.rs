//! Project configuration: metric groups, objectives, precalculated
//! baselines, designation tables, and display settings. Loaded once per
//! report from JSON and never mutated.

use crate::core::errors::{Error, Result};
use crate::core::types::{ObjectiveAnswer, ProtectionLevel, RawMetric};
use crate::grouping::DesignationMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// One feature class within a metric group, e.g. a habitat type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataClass {
    pub class_id: String,
    /// Display label for tables and charts
    pub display: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datasource_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_id: Option<String>,
}

impl DataClass {
    pub fn new(class_id: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            class_id: class_id.into(),
            display: display.into(),
            datasource_id: None,
            layer_id: None,
        }
    }
}

/// Describes one overlap computation: its metric id and the ordered list
/// of classes it measures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricGroup {
    pub metric_id: String,
    pub classes: Vec<DataClass>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_id: Option<String>,
    /// Objectives this computation reports progress toward
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub objective_ids: Vec<String>,
}

impl MetricGroup {
    pub fn class_ids(&self) -> Vec<&str> {
        self.classes.iter().map(|c| c.class_id.as_str()).collect()
    }

    pub fn class(&self, class_id: &str) -> Option<&DataClass> {
        self.classes.iter().find(|c| c.class_id == class_id)
    }
}

/// A named target with group-eligibility rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Objective {
    pub objective_id: String,
    /// Short human-readable description, e.g. "30% of the ocean space"
    pub short_desc: String,
    /// Fraction in [0, 1] for percentage objectives
    pub target: f64,
    /// Whether overlap within each protection level counts toward the
    /// target
    pub counts_toward: BTreeMap<ProtectionLevel, ObjectiveAnswer>,
}

impl Objective {
    pub fn counts(&self, level: ProtectionLevel) -> bool {
        self.counts_toward.get(&level) == Some(&ObjectiveAnswer::Yes)
    }
}

/// Display settings for one protection level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupDisplay {
    pub color: String,
    pub display: String,
    pub display_plural: String,
}

/// Process-wide immutable display record for protection levels, injected
/// at the presentation boundary instead of being re-declared per report
/// card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupDisplayConfig(pub BTreeMap<ProtectionLevel, GroupDisplay>);

impl GroupDisplayConfig {
    pub fn get(&self, level: ProtectionLevel) -> Option<&GroupDisplay> {
        self.0.get(&level)
    }
}

impl Default for GroupDisplayConfig {
    fn default() -> Self {
        DEFAULT_GROUP_DISPLAY.clone()
    }
}

pub static DEFAULT_GROUP_DISPLAY: Lazy<GroupDisplayConfig> = Lazy::new(|| {
    let mut map = BTreeMap::new();
    map.insert(
        ProtectionLevel::HighProtection,
        GroupDisplay {
            color: "#BEE4BE".to_string(),
            display: "High Protection Biodiversity Zone".to_string(),
            display_plural: "High Protection Biodiversity Zones".to_string(),
        },
    );
    map.insert(
        ProtectionLevel::MediumProtection,
        GroupDisplay {
            color: "#FFE1A3".to_string(),
            display: "Medium Protection Biodiversity Zone".to_string(),
            display_plural: "Medium Protection Biodiversity Zones".to_string(),
        },
    );
    GroupDisplayConfig(map)
});

/// Root project configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    pub metric_groups: Vec<MetricGroup>,
    #[serde(default)]
    pub objectives: Vec<Objective>,
    /// Precalculated baseline totals, one per class (and per group where
    /// applicable), the denominators for percent conversion
    pub precalc: Vec<RawMetric>,
    #[serde(default)]
    pub designations: DesignationMap,
    #[serde(default)]
    pub display: GroupDisplayConfig,
}

impl ProjectConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: ProjectConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn metric_group(&self, metric_id: &str) -> Result<&MetricGroup> {
        self.metric_groups
            .iter()
            .find(|mg| mg.metric_id == metric_id)
            .ok_or_else(|| Error::Configuration(format!("no metric group {metric_id:?}")))
    }

    pub fn objective(&self, objective_id: &str) -> Result<&Objective> {
        self.objectives
            .iter()
            .find(|o| o.objective_id == objective_id)
            .ok_or_else(|| Error::Configuration(format!("no objective {objective_id:?}")))
    }

    /// Objectives referenced by a metric group, in declared order
    pub fn metric_group_objectives(&self, group: &MetricGroup) -> Result<Vec<&Objective>> {
        group
            .objective_ids
            .iter()
            .map(|id| self.objective(id))
            .collect()
    }

    /// Cross-check references and required baselines. Run once at load so
    /// report generation can trust the config.
    pub fn validate(&self) -> Result<()> {
        if self.metric_groups.is_empty() {
            return Err(Error::Configuration("no metric groups defined".to_string()));
        }
        for mg in &self.metric_groups {
            if mg.classes.is_empty() {
                return Err(Error::Configuration(format!(
                    "metric group {:?} has no classes",
                    mg.metric_id
                )));
            }
            for id in &mg.objective_ids {
                self.objective(id).map_err(|_| {
                    Error::Configuration(format!(
                        "metric group {:?} references missing objective {id:?}",
                        mg.metric_id
                    ))
                })?;
            }
            for class in &mg.classes {
                let has_baseline = self
                    .precalc
                    .iter()
                    .any(|m| m.class_id.as_deref() == Some(class.class_id.as_str()));
                if !has_baseline {
                    return Err(Error::Configuration(format!(
                        "no precalculated baseline for class {:?}",
                        class.class_id
                    )));
                }
            }
        }
        for o in &self.objectives {
            if !(0.0..=1.0).contains(&o.target) {
                return Err(Error::Configuration(format!(
                    "objective {:?} target {} outside [0, 1]",
                    o.objective_id, o.target
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn sample_json() -> &'static str {
        indoc! {r#"
            {
              "metricGroups": [
                {
                  "metricId": "habitatAreaOverlap",
                  "classes": [
                    { "classId": "coral", "display": "Coral" },
                    { "classId": "mangrove", "display": "Mangroves", "layerId": "lyr-1" }
                  ],
                  "objectiveIds": ["ocean_space_protected"]
                }
              ],
              "objectives": [
                {
                  "objectiveId": "ocean_space_protected",
                  "shortDesc": "30% of the ocean space",
                  "target": 0.3,
                  "countsToward": {
                    "HIGH_PROTECTION": "yes",
                    "MEDIUM_PROTECTION": "yes"
                  }
                }
              ],
              "precalc": [
                { "metricId": "precalc", "classId": "coral", "value": 5000000 },
                { "metricId": "precalc", "classId": "mangrove", "value": 10000000 }
              ]
            }
        "#}
    }

    #[test]
    fn parses_project_json() {
        let config: ProjectConfig = serde_json::from_str(sample_json()).unwrap();
        config.validate().unwrap();
        let mg = config.metric_group("habitatAreaOverlap").unwrap();
        assert_eq!(mg.class_ids(), vec!["coral", "mangrove"]);
        let objective = config.objective("ocean_space_protected").unwrap();
        assert_eq!(objective.target, 0.3);
        assert!(objective.counts(ProtectionLevel::HighProtection));
        assert!(!objective.counts(ProtectionLevel::Unknown));
    }

    #[test]
    fn missing_metric_group_is_configuration_error() {
        let config: ProjectConfig = serde_json::from_str(sample_json()).unwrap();
        assert!(matches!(
            config.metric_group("nope"),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn validate_rejects_missing_objective_reference() {
        let mut config: ProjectConfig = serde_json::from_str(sample_json()).unwrap();
        config.objectives.clear();
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));
    }

    #[test]
    fn validate_rejects_missing_baseline() {
        let mut config: ProjectConfig = serde_json::from_str(sample_json()).unwrap();
        config.precalc.retain(|m| m.class_id.as_deref() != Some("coral"));
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));
    }

    #[test]
    fn validate_rejects_target_outside_unit_interval() {
        let mut config: ProjectConfig = serde_json::from_str(sample_json()).unwrap();
        config.objectives[0].target = 1.5;
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));
    }

    #[test]
    fn default_display_config_covers_reporting_levels() {
        let display = GroupDisplayConfig::default();
        for level in crate::core::PROTECTION_LEVELS {
            assert!(display.get(level).is_some());
        }
        assert_eq!(
            display.get(ProtectionLevel::HighProtection).unwrap().color,
            "#BEE4BE"
        );
    }
}
