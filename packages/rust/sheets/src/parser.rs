//! Turns the value matrix returned by the spreadsheet service into
//! header-keyed records, and records into typed rows.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use sheetsync_shared::{Result, SheetSyncError};
use tracing::debug;

/// One data row keyed by header name.
///
/// Cells past the end of a short row are absent; [`SheetRecord::get`]
/// reports them as blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetRecord(BTreeMap<String, String>);

impl SheetRecord {
    /// Cell value for `column`, or `""` when the row has no such cell.
    pub fn get(&self, column: &str) -> &str {
        self.0.get(column).map(String::as_str).unwrap_or("")
    }

    pub fn contains(&self, column: &str) -> bool {
        self.0.contains_key(column)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decode into a typed row. Unknown columns are ignored.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        let object: serde_json::Map<String, serde_json::Value> = self
            .0
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect();

        serde_json::from_value(serde_json::Value::Object(object))
            .map_err(|e| SheetSyncError::parse(format!("row does not match expected shape: {e}")))
    }
}

/// Split a row-major value matrix into records.
///
/// The first row is the header row. Blank header cells drop their column, a
/// repeated header keeps its first column, and rows with no non-blank cell
/// are skipped.
pub fn records_from_values(values: Vec<Vec<String>>) -> Vec<SheetRecord> {
    let mut rows = values.into_iter();
    let Some(header_row) = rows.next() else {
        return Vec::new();
    };

    let headers: Vec<String> = header_row.into_iter().map(|h| h.trim().to_string()).collect();

    let mut records = Vec::new();
    for (index, row) in rows.enumerate() {
        if row.iter().all(|cell| cell.is_empty()) {
            debug!(row = index + 2, "skipping empty row");
            continue;
        }

        let mut map = BTreeMap::new();
        for (header, cell) in headers.iter().zip(row) {
            if header.is_empty() {
                continue;
            }
            map.entry(header.clone()).or_insert(cell);
        }
        records.push(SheetRecord(map));
    }

    records
}

/// Decode every record into `T`, failing on the first that does not fit.
pub fn decode_records<T: DeserializeOwned>(records: &[SheetRecord]) -> Result<Vec<T>> {
    records.iter().map(SheetRecord::decode).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetsync_shared::{SponsorRow, YoutubeRow};

    fn matrix(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn header_row_keys_each_record() {
        let records = records_from_values(matrix(&[
            &["room", "link"],
            &["R1", "https://youtu.be/1"],
            &["R2", "https://youtu.be/2"],
        ]));
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("room"), "R1");
        assert_eq!(records[1].get("link"), "https://youtu.be/2");
    }

    #[test]
    fn short_rows_leave_cells_absent() {
        let records = records_from_values(matrix(&[&["id", "image", "canPublish"], &["acme"]]));
        assert_eq!(records.len(), 1);
        assert!(records[0].contains("id"));
        assert!(!records[0].contains("image"));
        assert_eq!(records[0].get("image"), "");
    }

    #[test]
    fn empty_rows_and_blank_headers_are_dropped() {
        let records = records_from_values(matrix(&[
            &[" room ", "", "link"],
            &[],
            &["", "", ""],
            &["R1", "note", "L1"],
        ]));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].len(), 2);
        assert_eq!(records[0].get("room"), "R1");
        assert_eq!(records[0].get("link"), "L1");
    }

    #[test]
    fn repeated_header_keeps_first_column() {
        let records = records_from_values(matrix(&[&["room", "room"], &["first", "second"]]));
        assert_eq!(records[0].get("room"), "first");
    }

    #[test]
    fn no_values_means_no_records() {
        assert!(records_from_values(Vec::new()).is_empty());
        assert!(records_from_values(matrix(&[&["room", "link"]])).is_empty());
    }

    #[test]
    fn records_decode_into_typed_rows() {
        let records = records_from_values(matrix(&[
            &["id", "level", "image", "canPublish", "extra"],
            &["acme", "diamond", "https://img.example.com/a.png", "Y", "ignored"],
            &["beta"],
        ]));

        let rows: Vec<SponsorRow> = decode_records(&records).expect("decode");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].image, "https://img.example.com/a.png");
        assert!(rows[0].is_publishable());
        assert_eq!(rows[1].id, "beta");
        assert_eq!(rows[1].image, "");

        let links: Vec<YoutubeRow> = decode_records(&records).expect("decode");
        assert_eq!(links[0].room, "");
    }
}
