//! Persisted snapshot: one CIDR per line, sorted, trailing newline.

use crate::models::Ipv4;
use std::collections::HashSet;
use std::error::Error;
use std::io::ErrorKind;
use std::path::Path;

/// Read the previous snapshot as a set of trimmed, non-empty lines.
///
/// A missing or unreadable file is an empty set, which forces a rewrite.
pub fn read_snapshot(path: &Path) -> HashSet<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => {
            let existing = parse_snapshot(&text);
            log::info!(
                "Read {} existing CIDRs from {}.",
                existing.len(),
                path.display()
            );
            existing
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::info!("{} not found. A new file will be created.", path.display());
            HashSet::new()
        }
        Err(e) => {
            log::warn!(
                "Error reading existing {}: {e}. Will overwrite if changes are detected.",
                path.display()
            );
            HashSet::new()
        }
    }
}

pub fn parse_snapshot(text: &str) -> HashSet<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Serialize in output order, newline terminated.
pub fn format_snapshot(cidrs: &[Ipv4]) -> String {
    cidrs.iter().map(|c| format!("{c}\n")).collect()
}

pub fn write_snapshot(path: &Path, cidrs: &[Ipv4]) -> Result<(), Box<dyn Error>> {
    log::info!("Writing {} unique CIDRs to {}...", cidrs.len(), path.display());
    std::fs::write(path, format_snapshot(cidrs))
        .map_err(|e| format!("Failed to write to {}: {e}", path.display()))?;
    Ok(())
}
