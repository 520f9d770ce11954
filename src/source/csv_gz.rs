//! Gzipped CSV row source.
//!
//! Reads the country/ASN database (`start_ip,end_ip,country,...,asn,...` or
//! `network,country,asn`) and yields one [`SourceRow`] per record.

use crate::models::{CidrError, SourceRow};
use csv::{ByteRecord, StringRecord};
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Lazy iterator over the rows of one CSV source.
///
/// Records are decoded lossily, so invalid UTF-8 in a column that is not read
/// does not reject the row. Undecodable records, including records whose field
/// count differs from the header, are yielded as row-local errors. An I/O failure
/// (e.g. a truncated gzip stream) is yielded once as a fatal error and ends
/// the iteration.
pub struct RowReader<R: Read> {
    source: String,
    headers: StringRecord,
    records: csv::ByteRecordsIntoIter<R>,
    failed: bool,
}

impl<R: Read> Iterator for RowReader<R> {
    type Item = Result<SourceRow, CidrError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(e) if e.is_io_error() => {
                self.failed = true;
                return Some(Err(CidrError::source_unavailable(&self.source, e)));
            }
            Err(e) => return Some(Err(CidrError::malformed("record", &e.to_string()))),
        };
        Some(decode_record(record, &self.headers))
    }
}

fn decode_record(record: ByteRecord, headers: &StringRecord) -> Result<SourceRow, CidrError> {
    StringRecord::from_byte_record_lossy(record)
        .deserialize(Some(headers))
        .map_err(|e| CidrError::malformed("record", &e.to_string()))
}

/// Open a gzipped CSV file, reading every gzip member.
pub fn open_gz_csv(path: &Path) -> Result<RowReader<MultiGzDecoder<File>>, CidrError> {
    let source = path.display().to_string();
    let file = File::open(path).map_err(|e| {
        log::error!("Input file not found: {source}");
        CidrError::source_unavailable(&source, e)
    })?;
    log::info!("Processing {source}");
    csv_from_reader(MultiGzDecoder::new(file), &source)
}

/// Read CSV rows from any reader, e.g. an already decompressed stream.
pub fn csv_from_reader<R: Read>(rdr: R, source: &str) -> Result<RowReader<R>, CidrError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(rdr);

    let headers = reader
        .byte_headers()
        .map_err(|e| CidrError::source_unavailable(source, e))?;
    let headers = StringRecord::from_byte_record_lossy(headers.clone());
    log::debug!("CSV Header: {:?}", headers);
    check_headers(&headers, source)?;

    Ok(RowReader {
        source: source.to_string(),
        headers,
        records: reader.into_byte_records(),
        failed: false,
    })
}

/// Require `country`, `asn` and either `start_ip`+`end_ip` or one of `network`/`prefix`.
fn check_headers(headers: &StringRecord, source: &str) -> Result<(), CidrError> {
    let has = |name: &str| headers.iter().any(|h| h == name);

    let missing: Vec<&str> = ["country", "asn"]
        .into_iter()
        .filter(|col| !has(*col))
        .collect();
    if !missing.is_empty() {
        return Err(CidrError::source_unavailable(
            source,
            format!("Missing expected column in CSV header: {}", missing.join(", ")),
        ));
    }

    let has_range = has("start_ip") && has("end_ip");
    if has("network") && has("prefix") {
        return Err(CidrError::source_unavailable(
            source,
            "Ambiguous CSV header: both network and prefix columns present",
        ));
    }
    let has_prefix = has("network") || has("prefix");
    if !has_range && !has_prefix {
        return Err(CidrError::source_unavailable(
            source,
            "Missing expected column in CSV header: start_ip/end_ip or network",
        ));
    }
    Ok(())
}
