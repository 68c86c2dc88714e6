//! Route sources: where the catalog reads route descriptors from.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::RouteDescriptor;

/// External routing table. Read at most once per activation, when the
/// sequencer builds its queue.
pub trait RouteSource: Send + Sync {
    fn routes(&self) -> Vec<RouteDescriptor>;
}

/// A fixed list of routes.
#[derive(Debug, Clone, Default)]
pub struct StaticRoutes(pub Vec<RouteDescriptor>);

impl RouteSource for StaticRoutes {
    fn routes(&self) -> Vec<RouteDescriptor> {
        self.0.clone()
    }
}

impl From<Vec<RouteDescriptor>> for StaticRoutes {
    fn from(routes: Vec<RouteDescriptor>) -> Self {
        Self(routes)
    }
}

#[derive(Debug, Deserialize)]
struct RouteTableFile {
    #[serde(default)]
    route: Vec<BTreeMap<String, Value>>,
}

/// Parse a TOML route table made of `[[route]]` entries.
///
/// ```toml
/// [[route]]
/// path = "/settings"
/// location = "/views/settings.html"
/// priority = 2
/// ```
pub fn parse_route_table(data: &str) -> Result<StaticRoutes> {
    let file: RouteTableFile = toml::from_str(data).context("invalid route table")?;
    Ok(StaticRoutes(
        file.route
            .into_iter()
            .map(RouteDescriptor::from_fields)
            .collect(),
    ))
}

pub fn load_route_table(path: &Path) -> Result<StaticRoutes> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read route table: {}", path.display()))?;
    parse_route_table(&data)
}
