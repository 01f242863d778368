//! Protection-level classification of sketches from their designation
//! attribute.

use crate::core::errors::{Error, Result};
use crate::core::types::ProtectionLevel;
use crate::sketch::{get_user_attribute, Plan};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What to do with a designation code not found in the lookup tables.
///
/// The upstream reports silently treated unknown codes as medium
/// protection. Whether that was policy or a latent bug is undecided, so
/// the choice is explicit configuration here; the observed behavior is
/// the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownPolicy {
    #[default]
    DefaultMedium,
    Error,
}

/// Designation code -> protection level lookup tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DesignationMap {
    pub high: Vec<String>,
    pub medium: Vec<String>,
    pub unknown_policy: UnknownPolicy,
}

impl Default for DesignationMap {
    fn default() -> Self {
        let codes = |list: &[&str]| list.iter().map(|s| s.to_string()).collect();
        Self {
            // IUCN categories plus the level names themselves, so
            // pre-classified sketches pass through
            high: codes(&["Ia", "Ib", "II", "HIGH_PROTECTION"]),
            medium: codes(&["IV", "V", "VI", "OECM", "LMMA", "MEDIUM_PROTECTION"]),
            unknown_policy: UnknownPolicy::default(),
        }
    }
}

impl DesignationMap {
    /// Level for a single designation code. Codes outside both tables are
    /// `Unknown`; policy for those is applied in `classify_plan`.
    pub fn classify(&self, designation: &str) -> ProtectionLevel {
        if self.high.iter().any(|d| d == designation) {
            ProtectionLevel::HighProtection
        } else if self.medium.iter().any(|d| d == designation) {
            ProtectionLevel::MediumProtection
        } else {
            ProtectionLevel::Unknown
        }
    }

    /// Map every leaf sketch of the plan to its protection level from the
    /// `designation` user attribute. Total: every leaf gets an entry.
    pub fn classify_plan(&self, plan: &Plan) -> Result<BTreeMap<String, ProtectionLevel>> {
        let mut levels = BTreeMap::new();
        for sketch in plan.leaf_sketches() {
            let designation = get_user_attribute(&sketch.properties, "designation", "");
            let level = match self.classify(&designation) {
                ProtectionLevel::Unknown => match self.unknown_policy {
                    UnknownPolicy::Error => {
                        return Err(Error::UnknownDesignation {
                            sketch_id: sketch.id().to_string(),
                            designation,
                        })
                    }
                    UnknownPolicy::DefaultMedium => {
                        log::warn!(
                            "sketch {} has unknown designation {:?}, defaulting to MEDIUM_PROTECTION",
                            sketch.id(),
                            designation
                        );
                        ProtectionLevel::MediumProtection
                    }
                },
                level => level,
            };
            levels.insert(sketch.id().to_string(), level);
        }
        log::debug!("sketch protection levels: {levels:?}");
        Ok(levels)
    }
}
