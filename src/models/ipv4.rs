//! IPv4 address and CIDR notation utilities.
//!
//! Provides [`Ipv4`], an aligned CIDR block, along with the mask and
//! address helpers used by the range reduction.

use super::CidrError;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// Maximum length for an IPv4 prefix (32 bits).
pub const MAX_LENGTH: u8 = 32;

/// Convert a CIDR prefix length to a subnet mask as u32.
///
/// # Examples
/// ```
/// use asn_cidr_filter::models::get_cidr_mask;
/// assert_eq!(get_cidr_mask(24).unwrap(), 0xFFFFFF00);
/// ```
pub fn get_cidr_mask(len: u8) -> Result<u32, CidrError> {
    if len > MAX_LENGTH {
        Err(CidrError::malformed("prefix_length", &len.to_string()))
    } else {
        let right_len = MAX_LENGTH - len;
        let all_bits = u32::MAX as u64;

        let mask = (all_bits >> right_len) << right_len;

        Ok(mask as u32)
    }
}

/// Number of addresses covered by a prefix length, `/0` = 2^32.
///
/// Returned as u64 so a `/0` block does not overflow.
pub fn block_size(len: u8) -> u64 {
    1u64 << (MAX_LENGTH - len.min(MAX_LENGTH))
}

/// Calculate the minimum mask for an IP address based on trailing zeros.
///
/// This is the largest block `ip` can be the network address of.
pub fn lo_mask(ip: Ipv4Addr) -> u8 {
    let trailing_zeros = u32::from(ip).trailing_zeros() as u8;
    MAX_LENGTH - trailing_zeros
}

/// Parse one dotted-quad address field.
///
/// Anything that looks like IPv6 is reported as an unsupported address
/// family rather than a malformed field.
pub fn parse_ipv4_addr(field: &str, value: &str) -> Result<Ipv4Addr, CidrError> {
    let value = value.trim();
    if value.contains(':') {
        return Err(CidrError::UnsupportedAddressFamily {
            value: value.to_string(),
        });
    }
    Ipv4Addr::from_str(value).map_err(|_| CidrError::malformed(field, value))
}

/// An aligned IPv4 CIDR block.
///
/// Ordering is by network address, then by prefix length, so the less
/// specific block sorts first when two blocks share an address.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Copy, Clone, Hash)]
pub struct Ipv4 {
    addr: Ipv4Addr,
    mask: u8,
}

impl Ipv4 {
    /// Create a new [`Ipv4`] from a CIDR string (e.g., "10.0.0.0/24").
    ///
    /// Host bits must be zero; "10.0.0.1/24" is rejected.
    pub fn new(addr_cidr: &str) -> Result<Ipv4, CidrError> {
        let addr_cidr = addr_cidr.trim();
        let (addr, mask) = addr_cidr
            .split_once('/')
            .ok_or_else(|| CidrError::malformed("network", addr_cidr))?;
        let addr = parse_ipv4_addr("network", addr)?;
        let mask: u8 = mask
            .parse()
            .map_err(|_| CidrError::malformed("network", addr_cidr))?;
        Ipv4::from_parts(addr, mask).map_err(|_| CidrError::malformed("network", addr_cidr))
    }

    /// Build a block from an address and prefix length, checking alignment.
    pub fn from_parts(addr: Ipv4Addr, mask: u8) -> Result<Ipv4, CidrError> {
        let net_mask = get_cidr_mask(mask)?;
        if u32::from(addr) & !net_mask != 0 {
            return Err(CidrError::malformed(
                "network",
                &format!("{addr}/{mask} has host bits set"),
            ));
        }
        Ok(Ipv4 { addr, mask })
    }

    /// The network (lowest) address.
    pub fn addr(&self) -> Ipv4Addr {
        self.addr
    }

    /// The prefix length (0-32).
    pub fn mask(&self) -> u8 {
        self.mask
    }

    /// Get the highest (broadcast) address in the block.
    pub fn hi(&self) -> Ipv4Addr {
        let host_bits = (block_size(self.mask) - 1) as u32;
        Ipv4Addr::from(u32::from(self.addr) | host_bits)
    }

    /// Number of addresses in the block.
    pub fn size(&self) -> u64 {
        block_size(self.mask)
    }

    pub fn contains(&self, ip: Ipv4Addr) -> bool {
        self.addr <= ip && ip <= self.hi()
    }
}

impl FromStr for Ipv4 {
    type Err = CidrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ipv4::new(s)
    }
}

impl std::fmt::Display for Ipv4 {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", self.addr, self.mask)
    }
}
