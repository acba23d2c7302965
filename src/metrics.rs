//! Prometheus recorder for scrape counters.
//!
//! A scrape is a short batch job, so nothing listens over HTTP; the run
//! renders the recorder once at the end and writes the text to a file.

use crate::error::Result;
use ::metrics::describe_counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

pub const PAGES_PROCESSED: &str = "dei_pages_processed_total";
pub const PAGES_FAILED: &str = "dei_pages_failed_total";

/// Install the global recorder. `None` if one is already installed.
pub fn init_metrics() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            describe_metrics();
            Some(handle)
        }
        Err(e) => {
            warn!("Metrics recorder not installed: {}", e);
            None
        }
    }
}

fn describe_metrics() {
    describe_counter!(PAGES_PROCESSED, "Detail pages turned into records");
    describe_counter!(PAGES_FAILED, "Detail pages skipped after a fetch or parse error");
}

/// Write the recorder's current state in Prometheus text format.
pub fn write_snapshot(handle: &PrometheusHandle, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, handle.render())?;
    info!("Wrote metrics to {}", path.display());
    Ok(())
}
