//! Run configuration: input/output paths, target country and ASN allow-list.
//!
//! Built from defaults overridden by environment variables (a `.env` file is
//! loaded by `main` first).

use crate::models::CidrError;
use crate::processing::RowFilter;
use lazy_static::lazy_static;
use regex::Regex;
use std::path::PathBuf;

pub const ENV_INPUT: &str = "ASN_CIDR_INPUT";
pub const ENV_OUTPUT: &str = "ASN_CIDR_OUTPUT";
pub const ENV_COUNTRY: &str = "ASN_CIDR_COUNTRY";
pub const ENV_ASNS: &str = "ASN_CIDR_ASNS";

/// AS4134 China Telecom, AS4808 China Unicom (CNCGROUP), AS4837 China Unicom
/// backbone, AS9808 China Mobile, AS4812 China Telecom (CN2).
pub const DEFAULT_ASNS: [&str; 5] = ["AS4134", "AS4808", "AS4837", "AS9808", "AS4812"];
pub const DEFAULT_COUNTRY: &str = "CN";
pub const DEFAULT_INPUT: &str = "country_asn.csv.gz";
pub const DEFAULT_OUTPUT: &str = "china_ips.txt";

lazy_static! {
    static ref ASN_RE: Regex = Regex::new(r"^AS[0-9]+$").expect("Invalid Regex?");
    static ref COUNTRY_RE: Regex = Regex::new(r"^[A-Z]{2}$").expect("Invalid Regex?");
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub input_file: PathBuf,
    pub output_file: PathBuf,
    pub country_code: String,
    pub asns: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input_file: PathBuf::from(DEFAULT_INPUT),
            output_file: PathBuf::from(DEFAULT_OUTPUT),
            country_code: DEFAULT_COUNTRY.to_string(),
            asns: DEFAULT_ASNS.iter().map(|a| a.to_string()).collect(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Config, CidrError> {
        Config::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from defaults plus whatever `lookup` returns for each variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Config, CidrError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        let env = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(input) = env(ENV_INPUT) {
            config.input_file = PathBuf::from(input.trim());
        }
        if let Some(output) = env(ENV_OUTPUT) {
            config.output_file = PathBuf::from(output.trim());
        }
        if let Some(country) = env(ENV_COUNTRY) {
            config.country_code = normalize_country(&country)?;
        }
        if let Some(asns) = env(ENV_ASNS) {
            config.asns = asns
                .split(',')
                .filter(|a| !a.trim().is_empty())
                .map(normalize_asn)
                .collect::<Result<Vec<String>, CidrError>>()?;
            if config.asns.is_empty() {
                return Err(CidrError::malformed(ENV_ASNS, &asns));
            }
        }

        log::debug!("Config: {:?}", config);
        Ok(config)
    }

    pub fn row_filter(&self) -> RowFilter {
        RowFilter::new(&self.country_code, self.asns.iter().cloned())
    }
}

/// "as4134", " 4134 " and "AS4134" all become "AS4134".
pub fn normalize_asn(asn: &str) -> Result<String, CidrError> {
    let upper = asn.trim().to_uppercase();
    let normalized = if upper.starts_with("AS") {
        upper
    } else {
        format!("AS{upper}")
    };
    if ASN_RE.is_match(&normalized) {
        Ok(normalized)
    } else {
        Err(CidrError::malformed("asn", asn))
    }
}

pub fn normalize_country(country: &str) -> Result<String, CidrError> {
    let upper = country.trim().to_uppercase();
    if COUNTRY_RE.is_match(&upper) {
        Ok(upper)
    } else {
        Err(CidrError::malformed("country", country))
    }
}
