//! `dribble plan` – show the prefetch order of a route table without fetching.

use anyhow::Result;
use dribble_core::catalog::{self, Priority, RouteSource};
use dribble_core::config::DribbleConfig;
use std::path::Path;

pub fn run_plan(cfg: &DribbleConfig, routes_path: &Path) -> Result<()> {
    let routes = catalog::load_route_table(routes_path)?.routes();
    let targets = catalog::build(&routes, cfg.priority_key.as_deref());
    if targets.is_empty() {
        println!("No templates to prefetch ({} route(s) read).", routes.len());
        return Ok(());
    }
    println!("{:<6} {:<10} {}", "ORDER", "PRIORITY", "LOCATION");
    for (i, t) in targets.iter().enumerate() {
        let priority = match &t.priority {
            Some(Priority::Number(n)) => format!("{n}"),
            Some(Priority::Text(s)) => s.clone(),
            None => "-".to_string(),
        };
        println!("{:<6} {:<10} {}", i + 1, priority, t.location);
    }
    Ok(())
}
