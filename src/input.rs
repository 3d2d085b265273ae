use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::CheckInRecord;

#[derive(Debug, Clone, Deserialize)]
pub struct CsvCheckIn {
    pub email: String,
    pub display_name: String,
    pub entry_type: String,
    pub value: f64,
    pub created_at: DateTime<Utc>,
    pub note: Option<String>,
    pub source_key: Option<String>,
}

pub fn read_csv(path: &Path) -> anyhow::Result<Vec<CsvCheckIn>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let mut rows = Vec::new();

    for (line, result) in reader.deserialize::<CsvCheckIn>().enumerate() {
        let row = result.with_context(|| format!("invalid check-in on row {}", line + 1))?;
        rows.push(row);
    }

    Ok(rows)
}

/// Reads a JSON array of check-in objects, as exported by the journaling API.
pub fn read_json(path: &Path) -> anyhow::Result<Vec<CheckInRecord>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("{} is not a check-in array", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn csv_rows_parse_with_optional_columns() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "email,display_name,entry_type,value,created_at,note,source_key\n\
             avery@example.com,Avery Lee,mood,6.5,2026-03-02T08:00:00Z,slept well,k-1\n\
             avery@example.com,Avery Lee,stress,7,2026-03-02T18:00:00Z,,"
        )
        .unwrap();

        let rows = read_csv(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].value, 6.5);
        assert_eq!(rows[0].source_key.as_deref(), Some("k-1"));
        assert!(rows[1].note.is_none());
        assert!(rows[1].source_key.is_none());
    }

    #[test]
    fn csv_reports_bad_rows() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "email,display_name,entry_type,value,created_at,note,source_key\n\
             avery@example.com,Avery Lee,mood,high,2026-03-02T08:00:00Z,,"
        )
        .unwrap();

        let err = read_csv(file.path()).unwrap_err();
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn json_records_default_missing_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id":"a1","entry_type":"mood","value":7,"created_at":"2026-03-02T08:00:00Z"}},
                {{"entry_type":"stress"}}]"#
        )
        .unwrap();

        let records = read_json(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id.as_deref(), Some("a1"));
        assert_eq!(records[1].value, 0.0);
        assert_eq!(records[1].created_at, "");
    }

    #[test]
    fn json_must_be_an_array() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"entry_type":"mood"}}"#).unwrap();
        assert!(read_json(file.path()).is_err());
    }
}
