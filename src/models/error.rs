//! Error taxonomy for range conversion and row aggregation.
//!
//! Row-local variants ([`CidrError::RangeOrder`], [`CidrError::UnsupportedAddressFamily`],
//! [`CidrError::MalformedField`]) are counted and skipped by the aggregator.
//! [`CidrError::SourceUnavailable`] and [`CidrError::EmptyResult`] abort the run.

use std::error::Error;
use std::fmt;

/// Why a single source row was skipped.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// Start address greater than end address.
    RangeOrder,
    /// Address is not IPv4.
    AddressFamily,
    /// Required field missing or unparseable.
    Malformed,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            SkipReason::RangeOrder => "range_order",
            SkipReason::AddressFamily => "address_family",
            SkipReason::Malformed => "malformed",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CidrError {
    /// `start > end` for a given range.
    RangeOrder { start: String, end: String },
    /// Non-IPv4 input, e.g. an IPv6 literal.
    UnsupportedAddressFamily { value: String },
    /// Missing or unparseable required field.
    MalformedField { field: String, value: String },
    /// The whole row source could not be obtained or read.
    SourceUnavailable { source: String, reason: String },
    /// Zero rows produced a CIDR block.
    EmptyResult { country: String, asns: Vec<String> },
}

impl CidrError {
    pub fn malformed(field: &str, value: &str) -> CidrError {
        CidrError::MalformedField {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    pub fn source_unavailable<E: fmt::Display>(source: &str, reason: E) -> CidrError {
        CidrError::SourceUnavailable {
            source: source.to_string(),
            reason: reason.to_string(),
        }
    }

    /// The counter bucket for a row-local error, `None` for fatal errors.
    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            CidrError::RangeOrder { .. } => Some(SkipReason::RangeOrder),
            CidrError::UnsupportedAddressFamily { .. } => Some(SkipReason::AddressFamily),
            CidrError::MalformedField { .. } => Some(SkipReason::Malformed),
            CidrError::SourceUnavailable { .. } | CidrError::EmptyResult { .. } => None,
        }
    }

    pub fn is_row_local(&self) -> bool {
        self.skip_reason().is_some()
    }
}

impl fmt::Display for CidrError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CidrError::RangeOrder { start, end } => {
                write!(f, "Start IP > End IP in range: {start} - {end}")
            }
            CidrError::UnsupportedAddressFamily { value } => {
                write!(f, "Unsupported address family (IPv4 only): {value}")
            }
            CidrError::MalformedField { field, value } => {
                write!(f, "Malformed field {field}: '{value}'")
            }
            CidrError::SourceUnavailable { source, reason } => {
                write!(f, "Source unavailable {source}: {reason}")
            }
            CidrError::EmptyResult { country, asns } => write!(
                f,
                "No CIDRs generated for country {country} and ASNs {}",
                asns.join(", ")
            ),
        }
    }
}

impl Error for CidrError {}
