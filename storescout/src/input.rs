//! Reading uploaded CSV files into raw rows.

use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::errors::Result;
use crate::models::RawRow;

/// Parses CSV text whose first record is the header.
///
/// Rows may be ragged: missing trailing cells are absent from the row and
/// cells beyond the header are ignored. Rows whose cells are all blank are
/// dropped. Header names are trimmed.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<RawRow>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for record in csv_reader.records() {
        let record = record?;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.as_str(), v))
            .collect();
        if row.is_blank() {
            skipped += 1;
            continue;
        }
        rows.push(row);
    }

    debug!(rows = rows.len(), skipped, "Parsed CSV input");
    Ok(rows)
}

/// Opens `path` and parses it with [`read_rows`].
pub fn read_rows_from_path(path: impl AsRef<Path>) -> Result<Vec<RawRow>> {
    let file = std::fs::File::open(path)?;
    read_rows(std::io::BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ScoutError;
    use crate::verify::resolve_url;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_read_rows_by_header() {
        let rows = read_rows("name,URL\nA,https://a.io\nB,https://b.io\n".as_bytes()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("name"), Some("A"));
        assert_eq!(resolve_url(&rows[1]), Some("https://b.io"));
    }

    #[test]
    fn test_blank_rows_dropped() {
        let rows = read_rows("url,note\nhttps://a.io,x\n,\n  ,  \nhttps://b.io,\n".as_bytes())
            .unwrap();
        let urls: Vec<_> = rows.iter().filter_map(|r| r.get("url")).collect();
        assert_eq!(urls, vec!["https://a.io", "https://b.io"]);
    }

    #[test]
    fn test_ragged_rows() {
        let rows = read_rows("url,website,extra\nhttps://a.io\n,https://b.io,1,overflow\n".as_bytes())
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("website"), None);
        assert_eq!(rows[1].get("website"), Some("https://b.io"));
        assert_eq!(rows[1].get("extra"), Some("1"));
    }

    #[test]
    fn test_header_whitespace_and_bom() {
        let rows = read_rows("\u{feff} Website ,name\nhttps://w.io,W\n".as_bytes()).unwrap();
        assert_eq!(rows[0].get("Website"), Some("https://w.io"));
    }

    #[test]
    fn test_header_only() {
        let rows = read_rows("url\n".as_bytes()).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_read_rows_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "website").unwrap();
        writeln!(file, "https://file.io").unwrap();

        let rows = read_rows_from_path(file.path()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(resolve_url(&rows[0]), Some("https://file.io"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_rows_from_path(dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, ScoutError::Io(_)));
    }
}
