//! Domain models for the country/ASN CIDR filter.
//!
//! This module contains the core data structures used throughout the application:
//! - [`Ipv4`] - aligned IPv4 CIDR block
//! - [`SourceRow`] - one row of the country/ASN database
//! - [`CidrError`] - error taxonomy, row-local and fatal

mod error;
mod ipv4;
mod row;

// Re-export public types
pub use error::{CidrError, SkipReason};
pub use ipv4::{block_size, get_cidr_mask, lo_mask, parse_ipv4_addr, Ipv4, MAX_LENGTH};
pub use row::{RowAddress, SourceRow};
