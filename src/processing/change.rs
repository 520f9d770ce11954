//! Change detection between the persisted snapshot and a new result.

use crate::models::Ipv4;
use itertools::Itertools;
use std::collections::HashSet;

/// Set difference between the previous snapshot and the new CIDR list.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChangeReport {
    /// In the new result but not the snapshot, sorted.
    pub added: Vec<String>,
    /// In the snapshot but not the new result, sorted.
    pub removed: Vec<String>,
}

impl ChangeReport {
    /// Compare by canonical string form.
    pub fn compare(previous: &HashSet<String>, current: &[Ipv4]) -> ChangeReport {
        let current: HashSet<String> = current.iter().map(|c| c.to_string()).collect();
        let added = current.difference(previous).cloned().sorted().collect();
        let removed = previous.difference(&current).cloned().sorted().collect();
        ChangeReport { added, removed }
    }

    pub fn is_unchanged(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cidrs(list: &[&str]) -> Vec<Ipv4> {
        list.iter().map(|c| Ipv4::new(c).unwrap()).collect()
    }

    fn snapshot(list: &[&str]) -> HashSet<String> {
        list.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_no_change() {
        let report = ChangeReport::compare(
            &snapshot(&["1.0.0.0/24", "1.0.1.0/24"]),
            &cidrs(&["1.0.1.0/24", "1.0.0.0/24"]),
        );
        assert!(report.is_unchanged());
    }

    #[test]
    fn test_added_and_removed() {
        let report = ChangeReport::compare(
            &snapshot(&["1.0.0.0/24", "2.0.0.0/24"]),
            &cidrs(&["1.0.0.0/24", "3.0.0.0/24", "4.0.0.0/24"]),
        );
        assert!(!report.is_unchanged());
        assert_eq!(report.added, vec!["3.0.0.0/24", "4.0.0.0/24"]);
        assert_eq!(report.removed, vec!["2.0.0.0/24"]);
    }

    #[test]
    fn test_empty_snapshot() {
        let report = ChangeReport::compare(&HashSet::new(), &cidrs(&["1.0.0.0/24"]));
        assert_eq!(report.added.len(), 1);
        assert!(report.removed.is_empty());
    }
}
