//! `dribble prefetch` – run one activation cycle against a base URL.

use anyhow::{Context, Result};
use dribble_core::cache::{MemoryCache, TemplateCache};
use dribble_core::catalog;
use dribble_core::config::DribbleConfig;
use dribble_core::scheduler::{self, Collaborators};
use dribble_core::transport::{HttpTransport, ObservedTransport, Transport};
use std::fs;
use std::path::Path;
use std::sync::Arc;

pub async fn run_prefetch(
    cfg: DribbleConfig,
    routes_path: &Path,
    base_url: &str,
    foreground: Option<&Path>,
) -> Result<()> {
    let routes = catalog::load_route_table(routes_path)?;
    let transport = Arc::new(
        HttpTransport::parse(base_url).with_context(|| format!("invalid base URL: {}", base_url))?,
    );
    let cache = Arc::new(MemoryCache::new());

    let prefetcher = scheduler::spawn(
        cfg,
        Collaborators {
            routes: Arc::new(routes),
            cache: Arc::clone(&cache) as Arc<dyn TemplateCache>,
            transport: Arc::clone(&transport) as Arc<dyn Transport>,
        },
    );

    if let Some(path) = foreground {
        let locations = read_locations(path)?;
        let observed = ObservedTransport::new(Arc::clone(&transport), prefetcher.handle());
        tokio::task::spawn_blocking(move || {
            for location in locations {
                match observed.fetch(&location) {
                    Ok(body) => {
                        tracing::info!(location = %location, bytes = body.len(), "foreground request")
                    }
                    Err(e) => {
                        tracing::warn!(location = %location, "foreground request failed: {}", e)
                    }
                }
            }
        })
        .await
        .context("foreground task join")?;
    }

    let report = prefetcher.join().await?;
    if report.entries.is_empty() {
        println!("No templates to prefetch.");
        return Ok(());
    }

    println!("{:<8} {:<8} {}", "STATUS", "BYTES", "LOCATION");
    for (location, _) in &report.entries {
        let (status, bytes) = match cache.get(location) {
            Some(body) => ("cached", body.len().to_string()),
            None => ("failed", "-".to_string()),
        };
        println!("{:<8} {:<8} {}", status, bytes, location);
    }
    println!(
        "{} of {} template(s) cached",
        cache.len(),
        report.entries.len()
    );
    Ok(())
}

/// One location per line; blank lines and `#` comments are skipped.
pub(crate) fn read_locations(path: &Path) -> Result<Vec<String>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read foreground list: {}", path.display()))?;
    Ok(parse_locations(&data))
}

pub(crate) fn parse_locations(data: &str) -> Vec<String> {
    data.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect()
}
