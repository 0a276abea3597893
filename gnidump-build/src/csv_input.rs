//! Streaming readers for the CSV dump files.
//!
//! All dump files are UTF-8, comma-separated, RFC 4180 with a header row;
//! fields are addressed by position. Readers run on blocking threads and
//! feed a bounded channel; they stop early when the phase is canceled.

use std::fs::File;
use std::path::Path;

use csv::{Reader, ReaderBuilder, StringRecord};
use tokio::sync::mpsc::Sender;

use crate::error::{Error, Result};
use crate::pipeline::Cancel;

/// Opens a dump file and positions the reader past the header.
pub(crate) fn open_csv(dump_dir: &Path, file_name: &str) -> Result<Reader<File>> {
    let path = dump_dir.join(file_name);
    let mut reader = ReaderBuilder::new().has_headers(false).from_path(&path)?;

    let mut header = StringRecord::new();
    if !reader.read_record(&mut header)? {
        tracing::warn!(file = file_name, "dump file has no header row");
    }
    Ok(reader)
}

/// Streams records of one dump file into `tx`. Intended to run under
/// `spawn_blocking`; uses `blocking_send` so channel back-pressure throttles
/// the file read.
pub(crate) fn stream_csv(
    dump_dir: &Path,
    file_name: &str,
    tx: Sender<StringRecord>,
    cancel: Cancel,
) -> Result<()> {
    let mut reader = open_csv(dump_dir, file_name)?;
    let mut record = StringRecord::new();

    while reader.read_record(&mut record)? {
        if cancel.is_canceled() {
            return Err(Error::Canceled);
        }
        if tx.blocking_send(record.clone()).is_err() {
            return Err(Error::Canceled);
        }
    }
    Ok(())
}

/// Returns field `idx` of a record, or a bad-row error naming the file.
pub(crate) fn field<'a>(record: &'a StringRecord, idx: usize, file: &str) -> Result<&'a str> {
    record
        .get(idx)
        .ok_or_else(|| Error::bad_row(format!("{file}: missing field {idx}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, content: &str) {
        let mut f = File::create(dir.join(name)).unwrap();
        f.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn test_header_is_skipped() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "t.csv", "id,name\n1,Homo sapiens\n");
        let mut r = open_csv(tmp.path(), "t.csv").unwrap();
        let mut rec = StringRecord::new();
        assert!(r.read_record(&mut rec).unwrap());
        assert_eq!(rec.get(0), Some("1"));
        assert_eq!(rec.get(1), Some("Homo sapiens"));
        assert!(!r.read_record(&mut rec).unwrap());
    }

    #[test]
    fn test_header_only_file_yields_nothing() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "t.csv", "id,name\n");
        let mut r = open_csv(tmp.path(), "t.csv").unwrap();
        let mut rec = StringRecord::new();
        assert!(!r.read_record(&mut rec).unwrap());
    }

    #[test]
    fn test_quoted_fields() {
        let tmp = TempDir::new().unwrap();
        write_file(
            tmp.path(),
            "t.csv",
            "id,name\n7,\"Aus bus (Smith, 1900)\"\n",
        );
        let mut r = open_csv(tmp.path(), "t.csv").unwrap();
        let mut rec = StringRecord::new();
        r.read_record(&mut rec).unwrap();
        assert_eq!(rec.get(1), Some("Aus bus (Smith, 1900)"));
    }
}
