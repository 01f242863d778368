//! Sketch model: user-drawn planning zones and one-level collections.
//!
//! Geometry is out of scope for this crate; sketches here are the
//! properties-only ("null sketch") form handed back alongside report
//! metrics. Collections are exactly one level deep: a collection's
//! children are always leaf sketches, which the types enforce.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Properties bag of a sketch or collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SketchProperties {
    pub id: String,
    pub name: String,
    /// Planner-assigned attributes, e.g. the protection designation code
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub user_attributes: BTreeMap<String, serde_json::Value>,
}

impl SketchProperties {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            user_attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.user_attributes
            .insert(name.into(), serde_json::Value::String(value.into()));
        self
    }
}

/// Read a planner-assigned attribute, falling back to the given default
/// when absent. Non-string JSON values are rendered with `to_string`.
pub fn get_user_attribute(properties: &SketchProperties, name: &str, default: &str) -> String {
    match properties.user_attributes.get(name) {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => default.to_string(),
    }
}

/// A single user-drawn planning zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sketch {
    pub properties: SketchProperties,
}

impl Sketch {
    pub fn new(properties: SketchProperties) -> Self {
        Self { properties }
    }

    pub fn id(&self) -> &str {
        &self.properties.id
    }
}

/// An ordered set of leaf sketches representing one overall plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SketchCollection {
    pub properties: SketchProperties,
    pub sketches: Vec<Sketch>,
}

/// What a report is run against: a single sketch or a collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Plan {
    Sketch(Sketch),
    SketchCollection(SketchCollection),
}

impl Plan {
    pub fn properties(&self) -> &SketchProperties {
        match self {
            Plan::Sketch(s) => &s.properties,
            Plan::SketchCollection(c) => &c.properties,
        }
    }

    pub fn id(&self) -> &str {
        &self.properties().id
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, Plan::SketchCollection(_))
    }

    /// Every leaf sketch of the plan. A single sketch yields itself.
    pub fn leaf_sketches(&self) -> Vec<&Sketch> {
        match self {
            Plan::Sketch(s) => vec![s],
            Plan::SketchCollection(c) => c.sketches.iter().collect(),
        }
    }

    /// Child sketches when the plan is a collection
    pub fn child_sketches(&self) -> Option<&[Sketch]> {
        match self {
            Plan::Sketch(_) => None,
            Plan::SketchCollection(c) => Some(&c.sketches),
        }
    }
}
