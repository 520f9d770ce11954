//! CIDR processing logic.
//!
//! This module contains the business logic of the filter:
//! - [`range_to_cidr`] - Address range to minimal CIDR cover
//! - [`aggregate`] - Country/ASN filtering, de-duplication and ordering
//! - [`change`] - Change detection against the persisted snapshot

mod aggregate;
mod change;
mod range_to_cidr;

// Re-export public functions
pub use aggregate::{
    aggregate, aggregate_results, AggregateStats, Aggregator, OrderedResult, RowFilter,
};
pub use change::ChangeReport;
pub use range_to_cidr::{range_str_to_cidr, range_to_cidr};
