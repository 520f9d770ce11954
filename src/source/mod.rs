//! File I/O around the processing core.
//!
//! - [`csv_gz`] - Reading rows from the gzipped country/ASN CSV
//! - [`snapshot`] - Reading and writing the persisted CIDR list

mod csv_gz;
mod snapshot;

pub use csv_gz::{csv_from_reader, open_gz_csv, RowReader};
pub use snapshot::{format_snapshot, parse_snapshot, read_snapshot, write_snapshot};
