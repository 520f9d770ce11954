//! Row filtering and CIDR aggregation.
//!
//! Filters source rows by country and ASN, converts every matching row to
//! CIDR blocks and collects them into one de-duplicated, sorted result.

use crate::models::{CidrError, Ipv4, RowAddress, SkipReason, SourceRow};
use crate::processing::range_str_to_cidr;
use itertools::Itertools;
use std::collections::HashSet;

/// Log a progress line every this many rows.
const PROGRESS_EVERY: usize = 500_000;

/// Country + ASN allow-list predicate.
#[derive(Debug, Clone)]
pub struct RowFilter {
    country: String,
    asns: HashSet<String>,
}

impl RowFilter {
    pub fn new<I, S>(country: &str, asns: I) -> RowFilter
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RowFilter {
            country: country.to_string(),
            asns: asns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    /// Target ASNs, sorted for stable display.
    pub fn asns(&self) -> Vec<&str> {
        self.asns.iter().map(String::as_str).sorted().collect()
    }

    /// Exact match on both fields; "AS48371" does not match "AS4837".
    pub fn matches(&self, country: &str, asn: &str) -> bool {
        country == self.country && self.asns.contains(asn)
    }
}

/// Diagnostic counters for one aggregation run.
///
/// `total == matched + unmatched + skipped()`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AggregateStats {
    /// Rows seen, including the ones that failed.
    pub total: usize,
    /// Rows that passed the filter and produced CIDR blocks.
    pub matched: usize,
    /// Rows rejected by the country/ASN filter.
    pub unmatched: usize,
    pub skipped_range_order: usize,
    pub skipped_address_family: usize,
    pub skipped_malformed: usize,
}

impl AggregateStats {
    pub fn skipped(&self) -> usize {
        self.skipped_range_order + self.skipped_address_family + self.skipped_malformed
    }

    pub fn skipped_by(&self, reason: SkipReason) -> usize {
        match reason {
            SkipReason::RangeOrder => self.skipped_range_order,
            SkipReason::AddressFamily => self.skipped_address_family,
            SkipReason::Malformed => self.skipped_malformed,
        }
    }

    fn record_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::RangeOrder => self.skipped_range_order += 1,
            SkipReason::AddressFamily => self.skipped_address_family += 1,
            SkipReason::Malformed => self.skipped_malformed += 1,
        }
    }
}

/// Final, de-duplicated and sorted CIDR list plus run counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedResult {
    pub cidrs: Vec<Ipv4>,
    pub stats: AggregateStats,
}

impl OrderedResult {
    pub fn is_empty(&self) -> bool {
        self.cidrs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cidrs.len()
    }

    /// Canonical `a.b.c.d/len` strings in output order.
    pub fn to_strings(&self) -> Vec<String> {
        self.cidrs.iter().map(|c| c.to_string()).collect()
    }
}

/// Incremental aggregation state; feed rows in, then [`Aggregator::finish`].
pub struct Aggregator<'a> {
    filter: &'a RowFilter,
    cidrs: HashSet<Ipv4>,
    stats: AggregateStats,
}

impl<'a> Aggregator<'a> {
    pub fn new(filter: &'a RowFilter) -> Aggregator<'a> {
        Aggregator {
            filter,
            cidrs: HashSet::new(),
            stats: AggregateStats::default(),
        }
    }

    pub fn stats(&self) -> &AggregateStats {
        &self.stats
    }

    /// Process one row. Row-local failures are counted and logged, never returned.
    pub fn push_row(&mut self, row: &SourceRow) {
        self.stats.total += 1;
        match self.convert_row(row) {
            Ok(Some(blocks)) => {
                self.stats.matched += 1;
                self.cidrs.extend(blocks);
            }
            Ok(None) => self.stats.unmatched += 1,
            Err(e) => self.skip(&e),
        }
        self.log_progress();
    }

    /// Account for a row the source reader could not decode.
    ///
    /// Fatal errors are handed back to the caller.
    pub fn push_error(&mut self, err: CidrError) -> Result<(), CidrError> {
        if !err.is_row_local() {
            return Err(err);
        }
        self.stats.total += 1;
        self.skip(&err);
        self.log_progress();
        Ok(())
    }

    fn convert_row(&self, row: &SourceRow) -> Result<Option<Vec<Ipv4>>, CidrError> {
        let country = row.country()?;
        let asn = row.asn()?;
        if !self.filter.matches(country, asn) {
            return Ok(None);
        }
        let blocks = match row.address()? {
            RowAddress::Range { start, end } => range_str_to_cidr(start, end)?,
            RowAddress::Prefix(network) => vec![Ipv4::new(network)?],
        };
        Ok(Some(blocks))
    }

    fn skip(&mut self, err: &CidrError) {
        if let Some(reason) = err.skip_reason() {
            self.stats.record_skip(reason);
            log::warn!("Skipping row {}: {}", self.stats.total, err);
        }
    }

    fn log_progress(&self) {
        if self.stats.total % PROGRESS_EVERY == 0 {
            log::info!(
                "Processed {} rows, found {} unique CIDRs so far...",
                self.stats.total,
                self.cidrs.len()
            );
        }
    }

    /// Freeze into the sorted result: ascending address, then prefix length.
    pub fn finish(self) -> OrderedResult {
        let cidrs: Vec<Ipv4> = self.cidrs.into_iter().sorted().collect();
        log::info!(
            "Finished processing. rows={} matched={} unmatched={} skipped={} unique_cidrs={}",
            self.stats.total,
            self.stats.matched,
            self.stats.unmatched,
            self.stats.skipped(),
            cidrs.len()
        );
        OrderedResult {
            cidrs,
            stats: self.stats,
        }
    }
}

/// Aggregate already-decoded rows.
pub fn aggregate<I>(rows: I, filter: &RowFilter) -> OrderedResult
where
    I: IntoIterator<Item = SourceRow>,
{
    let mut aggregator = Aggregator::new(filter);
    for row in rows {
        aggregator.push_row(&row);
    }
    aggregator.finish()
}

/// Aggregate rows from a fallible reader.
///
/// Row-local errors are counted; the first fatal error aborts the run.
pub fn aggregate_results<I>(rows: I, filter: &RowFilter) -> Result<OrderedResult, CidrError>
where
    I: IntoIterator<Item = Result<SourceRow, CidrError>>,
{
    log::info!(
        "Filtering for country {} and ASNs: {}",
        filter.country(),
        filter.asns().join(", ")
    );
    let mut aggregator = Aggregator::new(filter);
    for row in rows {
        match row {
            Ok(row) => aggregator.push_row(&row),
            Err(e) => aggregator.push_error(e)?,
        }
    }
    Ok(aggregator.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    fn cn_filter() -> RowFilter {
        RowFilter::new("CN", ["AS4134"])
    }

    #[test]
    fn test_aggregate_single_match() {
        let rows = vec![SourceRow::range("1.0.0.0", "1.0.0.255", "CN", "AS4134")];
        let result = aggregate(rows, &cn_filter());
        assert_eq!(result.to_strings(), vec!["1.0.0.0/24"]);
        assert_eq!(result.stats.matched, 1);
    }

    #[test]
    fn test_aggregate_asn_excluded() {
        let rows = vec![SourceRow::range("1.0.0.0", "1.0.0.0", "CN", "AS9999")];
        let result = aggregate(rows, &cn_filter());
        assert!(result.is_empty());
        assert_eq!(result.stats.unmatched, 1);
        assert_eq!(result.stats.total, 1);
    }

    #[test]
    fn test_aggregate_country_excluded() {
        let rows = vec![SourceRow::range("8.8.8.0", "8.8.8.255", "US", "AS4134")];
        assert!(aggregate(rows, &cn_filter()).is_empty());
    }

    #[test]
    fn test_aggregate_unaligned_range() {
        let rows = vec![SourceRow::range("1.0.0.1", "1.0.0.3", "CN", "AS4134")];
        let result = aggregate(rows, &cn_filter());
        assert_eq!(result.to_strings(), vec!["1.0.0.1/32", "1.0.0.2/31"]);
    }

    #[test]
    fn test_asn_match_is_exact() {
        let filter = RowFilter::new("CN", ["AS4837"]);
        let rows = vec![
            SourceRow::range("1.0.0.0", "1.0.0.255", "CN", "AS48371"),
            SourceRow::range("2.0.0.0", "2.0.0.255", "CN", "AS483"),
        ];
        let result = aggregate(rows, &filter);
        assert!(result.is_empty());
        assert_eq!(result.stats.unmatched, 2);
        assert!(!filter.matches("CN", "as4837"));
        assert!(filter.matches("CN", "AS4837"));
    }

    #[test]
    fn test_bad_range_skipped_run_continues() {
        let rows = vec![
            SourceRow::range("1.0.0.9", "1.0.0.1", "CN", "AS4134"),
            SourceRow::range("1.0.1.0", "1.0.1.255", "CN", "AS4134"),
        ];
        let result = aggregate(rows, &cn_filter());
        assert_eq!(result.to_strings(), vec!["1.0.1.0/24"]);
        assert_eq!(result.stats.skipped_range_order, 1);
        assert_eq!(result.stats.skipped(), 1);
        assert_eq!(result.stats.matched, 1);
    }

    #[test]
    fn test_skip_reasons_counted() {
        let mut missing_asn = SourceRow::range("1.0.0.0", "1.0.0.255", "CN", "");
        missing_asn.asn = None;
        let rows = vec![
            SourceRow::range("240e::", "240e::ffff", "CN", "AS4134"),
            SourceRow::range("1.0.0", "1.0.0.255", "CN", "AS4134"),
            missing_asn,
            SourceRow::prefix("1.0.0.1/24", "CN", "AS4134"),
        ];
        let result = aggregate(rows, &cn_filter());
        assert!(result.is_empty());
        assert_eq!(result.stats.skipped_by(SkipReason::AddressFamily), 1);
        assert_eq!(result.stats.skipped_by(SkipReason::Malformed), 3);
        assert_eq!(result.stats.total, 4);
    }

    #[test]
    fn test_unmatched_rows_are_not_parsed() {
        // Garbage addresses on a filtered-out row are not counted as skipped.
        let rows = vec![SourceRow::range("nope", "nope", "US", "AS1")];
        let result = aggregate(rows, &cn_filter());
        assert_eq!(result.stats.unmatched, 1);
        assert_eq!(result.stats.skipped(), 0);
    }

    #[test]
    fn test_prefix_rows_added_directly() {
        let rows = vec![
            SourceRow::prefix("1.0.0.0/24", "CN", "AS4134"),
            SourceRow::prefix("1.0.1.0/24", "CN", "AS4134"),
        ];
        let result = aggregate(rows, &cn_filter());
        // Adjacent blocks from different rows are not merged.
        assert_eq!(result.to_strings(), vec!["1.0.0.0/24", "1.0.1.0/24"]);
    }

    #[test]
    fn test_dedup_and_sort() {
        let rows = vec![
            SourceRow::range("36.128.0.0", "36.129.255.255", "CN", "AS4134"),
            SourceRow::prefix("1.0.0.0/24", "CN", "AS4134"),
            SourceRow::range("1.0.0.0", "1.0.0.255", "CN", "AS4134"),
            SourceRow::range("9.0.0.0", "9.0.0.0", "CN", "AS4134"),
            SourceRow::prefix("1.0.0.0/8", "CN", "AS4134"),
        ];
        let result = aggregate(rows, &cn_filter());
        assert_eq!(
            result.to_strings(),
            vec!["1.0.0.0/8", "1.0.0.0/24", "9.0.0.0/32", "36.128.0.0/15"]
        );
        assert_eq!(result.stats.matched, 5);
    }

    #[test]
    fn test_aggregate_results_fatal_error_aborts() {
        let rows = vec![
            Ok(SourceRow::range("1.0.0.0", "1.0.0.255", "CN", "AS4134")),
            Err(CidrError::malformed("record", "bad utf8")),
            Err(CidrError::source_unavailable("in.csv.gz", "corrupt deflate stream")),
        ];
        let err = aggregate_results(rows, &cn_filter()).unwrap_err();
        assert!(!err.is_row_local());
    }

    #[test]
    fn test_aggregate_results_row_errors_counted() {
        let rows = vec![
            Ok(SourceRow::range("1.0.0.0", "1.0.0.255", "CN", "AS4134")),
            Err(CidrError::malformed("record", "bad utf8")),
        ];
        let result = aggregate_results(rows, &cn_filter()).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.stats.skipped_malformed, 1);
        assert_eq!(result.stats.total, 2);
    }

    #[quickcheck]
    fn prop_row_order_independent(ranges: Vec<(u32, u32, bool)>, rotate: usize) -> bool {
        let filter = RowFilter::new("CN", ["AS4134", "AS4837"]);
        let rows: Vec<SourceRow> = ranges
            .iter()
            .map(|&(a, b, telecom)| {
                let asn = if telecom { "AS4134" } else { "AS48371" };
                let (start, end) = (std::net::Ipv4Addr::from(a), std::net::Ipv4Addr::from(b));
                SourceRow::range(&start.to_string(), &end.to_string(), "CN", asn)
            })
            .collect();
        let mut permuted = rows.clone();
        permuted.reverse();
        if !permuted.is_empty() {
            let len = permuted.len();
            permuted.rotate_left(rotate % len);
        }
        let forward = aggregate(rows, &filter);
        let backward = aggregate(permuted, &filter);
        forward == backward && forward.cidrs.windows(2).all(|w| w[0] < w[1])
    }
}
