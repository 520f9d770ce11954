//! Address range to CIDR reduction.
//!
//! Splits an inclusive `[start, end]` IPv4 interval into the minimal ordered
//! list of aligned CIDR blocks that exactly cover it.

use crate::models::{block_size, lo_mask, parse_ipv4_addr, CidrError, Ipv4};
use std::net::Ipv4Addr;

/// Convert an inclusive address range to CIDR blocks.
///
/// Blocks are returned in ascending order, non-overlapping and without gaps.
///
/// # Examples
/// ```
/// use asn_cidr_filter::processing::range_to_cidr;
/// use std::net::Ipv4Addr;
/// let blocks = range_to_cidr(Ipv4Addr::new(1, 0, 0, 1), Ipv4Addr::new(1, 0, 0, 3)).unwrap();
/// let blocks: Vec<String> = blocks.iter().map(|b| b.to_string()).collect();
/// assert_eq!(blocks, vec!["1.0.0.1/32", "1.0.0.2/31"]);
/// ```
pub fn range_to_cidr(start: Ipv4Addr, end: Ipv4Addr) -> Result<Vec<Ipv4>, CidrError> {
    if start > end {
        return Err(CidrError::RangeOrder {
            start: start.to_string(),
            end: end.to_string(),
        });
    }

    // u64 so that stepping past 255.255.255.255 terminates the loop
    let end_bits = u32::from(end) as u64;
    let mut next = u32::from(start) as u64;
    let mut blocks = Vec::new();

    while next <= end_bits {
        let addr = Ipv4Addr::from(next as u32);
        let mask = find_biggest_block(addr, end_bits);
        blocks.push(Ipv4::from_parts(addr, mask)?);
        next += block_size(mask);
    }

    log::trace!("range_to_cidr({start} - {end}) -> {} blocks", blocks.len());
    Ok(blocks)
}

/// Parse both range endpoints then convert.
pub fn range_str_to_cidr(start: &str, end: &str) -> Result<Vec<Ipv4>, CidrError> {
    let start_ip = parse_ipv4_addr("start_ip", start)?;
    let end_ip = parse_ipv4_addr("end_ip", end)?;
    range_to_cidr(start_ip, end_ip)
}

/// Find the biggest block starting at `start_ip` that stays within `end_bits`.
///
/// The returned mask is constrained by:
/// 1. The IP alignment - `start_ip` must be a valid network address for the mask
/// 2. The block's broadcast address must not pass `end_bits`
fn find_biggest_block(start_ip: Ipv4Addr, end_bits: u64) -> u8 {
    let start_bits = u32::from(start_ip) as u64;
    let mut next_mask = lo_mask(start_ip);

    while start_bits + block_size(next_mask) - 1 > end_bits {
        next_mask += 1;
    }

    assert!(
        next_mask <= 32,
        "next_mask[{next_mask}] > 32 should never happen."
    );
    next_mask
}
