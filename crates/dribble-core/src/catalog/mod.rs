//! Target catalog: turns route descriptors into the ordered fetch queue.
//!
//! Routes come from an external route table. Only routes whose `location`
//! field is a non-empty string produce a target; duplicate locations collapse
//! to the first occurrence. When a priority key is configured the targets are
//! stable-sorted ascending by that route field (see [`priority::compare`]).

mod priority;
mod source;

pub use priority::{compare as compare_priority, Priority};
pub use source::{load_route_table, parse_route_table, RouteSource, StaticRoutes};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};

/// Field names that carry the template location of a route.
const LOCATION_FIELDS: [&str; 2] = ["location", "template_url"];

/// One route from the external routing table: an immutable set of named fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteDescriptor {
    fields: BTreeMap<String, Value>,
}

impl RouteDescriptor {
    /// A route with the given template location and no other fields.
    pub fn new(location: impl Into<String>) -> Self {
        Self::default().with("location", Value::String(location.into()))
    }

    pub fn from_fields(fields: BTreeMap<String, Value>) -> Self {
        Self { fields }
    }

    /// Builder-style field setter.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// The template location, if the route has one that is a non-empty string.
    pub fn location(&self) -> Option<&str> {
        LOCATION_FIELDS
            .iter()
            .filter_map(|k| self.fields.get(*k))
            .find_map(|v| v.as_str().filter(|s| !s.is_empty()))
    }
}

/// A single template eligible for prefetching.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTarget {
    pub location: String,
    pub priority: Option<Priority>,
}

/// Build the ordered target list. Pure; the sequencer calls it once per activation.
pub fn build(routes: &[RouteDescriptor], priority_key: Option<&str>) -> Vec<FetchTarget> {
    let mut seen = HashSet::new();
    let mut targets: Vec<FetchTarget> = routes
        .iter()
        .filter_map(|route| {
            let location = route.location()?;
            if !seen.insert(location.to_string()) {
                return None;
            }
            let priority = priority_key
                .and_then(|key| route.get(key))
                .and_then(Priority::from_value);
            Some(FetchTarget {
                location: location.to_string(),
                priority,
            })
        })
        .collect();

    if priority_key.is_some() {
        // Vec::sort_by is stable: equal priorities keep route order.
        targets.sort_by(|a, b| compare_priority(a.priority.as_ref(), b.priority.as_ref()));
    }

    targets
}
