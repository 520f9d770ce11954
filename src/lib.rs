//! Country/ASN CIDR filter.
//!
//! Reads a gzipped country/ASN CSV, keeps the rows of one country and an ASN
//! allow-list, reduces their address ranges to CIDR blocks and maintains a
//! sorted snapshot file that is only rewritten when its content changes.

pub mod config;
pub mod logging;
pub mod models;
pub mod output;
pub mod processing;
pub mod source;

use config::Config;
use models::CidrError;
use processing::{aggregate_results, ChangeReport, OrderedResult};
use std::error::Error;

/// Result of one full run.
#[derive(Debug)]
pub struct RunOutcome {
    pub result: OrderedResult,
    pub changes: ChangeReport,
    /// The snapshot file was rewritten.
    pub written: bool,
}

/// Read, filter and aggregate the configured source.
///
/// An empty result is an error: it would truncate a populated snapshot.
pub fn get_sorted_cidrs(config: &Config) -> Result<OrderedResult, CidrError> {
    let rows = source::open_gz_csv(&config.input_file)?;
    let result = aggregate_results(rows, &config.row_filter())?;

    if result.is_empty() {
        log::warn!("No CIDRs were generated after processing. Check filters or input data.");
        return Err(CidrError::EmptyResult {
            country: config.country_code.clone(),
            asns: config.asns.clone(),
        });
    }
    log::info!(
        "Successfully retrieved {} unique CIDRs for {} and specified ASNs.",
        result.len(),
        config.country_code
    );
    Ok(result)
}

/// Rewrite the snapshot only when `result` differs from it.
pub fn update_snapshot(
    config: &Config,
    result: OrderedResult,
) -> Result<RunOutcome, Box<dyn Error>> {
    let existing = source::read_snapshot(&config.output_file);
    let changes = ChangeReport::compare(&existing, &result.cidrs);

    if changes.is_unchanged() {
        log::info!(
            "No changes detected in the IP list. {} is already up-to-date.",
            config.output_file.display()
        );
        return Ok(RunOutcome {
            result,
            changes,
            written: false,
        });
    }

    log::info!(
        "IP list has changed ({} added, {} removed).",
        changes.added.len(),
        changes.removed.len()
    );
    log::debug!("added={:?} removed={:?}", changes.added, changes.removed);
    source::write_snapshot(&config.output_file, &result.cidrs)?;
    log::info!(
        "Successfully wrote updates to {}",
        config.output_file.display()
    );
    Ok(RunOutcome {
        result,
        changes,
        written: true,
    })
}

/// Full pipeline: source -> aggregate -> compare -> maybe write.
pub fn run(config: &Config) -> Result<RunOutcome, Box<dyn Error>> {
    let result = get_sorted_cidrs(config)?;
    update_snapshot(config, result)
}
