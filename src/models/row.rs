//! Source row data model.

use super::CidrError;
use serde::Deserialize;

/// One row from the country/ASN database, after header normalisation.
///
/// Columns are matched by name, so extra columns (`country_name`, `as_name`, ...)
/// are ignored and column order does not matter. Empty cells read as `None`.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceRow {
    /// First address of the range (range form).
    #[serde(default)]
    pub start_ip: Option<String>,
    /// Last address of the range, inclusive (range form).
    #[serde(default)]
    pub end_ip: Option<String>,
    /// CIDR prefix (prefix form).
    #[serde(default, alias = "prefix")]
    pub network: Option<String>,
    /// Two letter country code.
    #[serde(default)]
    pub country: Option<String>,
    /// ASN identifier, e.g. "AS4134".
    #[serde(default)]
    pub asn: Option<String>,
}

/// Address part of a row.
#[derive(Debug, PartialEq, Eq)]
pub enum RowAddress<'a> {
    Range { start: &'a str, end: &'a str },
    Prefix(&'a str),
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl SourceRow {
    pub fn range(start: &str, end: &str, country: &str, asn: &str) -> SourceRow {
        SourceRow {
            start_ip: Some(start.to_string()),
            end_ip: Some(end.to_string()),
            network: None,
            country: Some(country.to_string()),
            asn: Some(asn.to_string()),
        }
    }

    pub fn prefix(network: &str, country: &str, asn: &str) -> SourceRow {
        SourceRow {
            start_ip: None,
            end_ip: None,
            network: Some(network.to_string()),
            country: Some(country.to_string()),
            asn: Some(asn.to_string()),
        }
    }

    pub fn country(&self) -> Result<&str, CidrError> {
        non_empty(&self.country).ok_or_else(|| CidrError::malformed("country", ""))
    }

    pub fn asn(&self) -> Result<&str, CidrError> {
        non_empty(&self.asn).ok_or_else(|| CidrError::malformed("asn", ""))
    }

    /// Pick the address representation: a start/end pair wins over a prefix.
    pub fn address(&self) -> Result<RowAddress<'_>, CidrError> {
        match (
            non_empty(&self.start_ip),
            non_empty(&self.end_ip),
            non_empty(&self.network),
        ) {
            (Some(start), Some(end), _) => Ok(RowAddress::Range { start, end }),
            (None, None, Some(network)) => Ok(RowAddress::Prefix(network)),
            (Some(_), None, _) => Err(CidrError::malformed("end_ip", "")),
            (None, Some(_), _) => Err(CidrError::malformed("start_ip", "")),
            (None, None, None) => Err(CidrError::malformed("start_ip/end_ip/network", "")),
        }
    }
}
