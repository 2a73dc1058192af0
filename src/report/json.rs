//! JSON report output

use crate::flatten::FlatRecord;
use crate::report::Summary;
use serde::Serialize;
use std::io::{self, Write};

#[derive(Serialize)]
struct JsonReport<'a> {
    generated: String,
    summary: Summary,
    records: &'a [FlatRecord],
}

pub fn write<W: Write>(writer: &mut W, records: &[FlatRecord]) -> io::Result<()> {
    let report = JsonReport {
        generated: chrono::Local::now().to_rfc3339(),
        summary: Summary::from_records(records),
        records,
    };
    serde_json::to_writer_pretty(&mut *writer, &report)?;
    writeln!(writer)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================================================
    // JSON OUTPUT TESTS
    // ==========================================================================

    #[test]
    fn test_report_shape() {
        let records = vec![FlatRecord {
            first_name: Some("Jane".to_string()),
            last_name: Some("Doe".to_string()),
            question: Some("Q1".to_string()),
            eye_contact_score: Some(8.0),
            ..FlatRecord::default()
        }];

        let mut buf = Vec::new();
        write(&mut buf, &records).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert!(value["generated"].is_string());
        assert_eq!(value["summary"]["total"], 1);
        assert_eq!(value["summary"]["candidates"], 1);
        assert_eq!(value["records"][0]["firstName"], "Jane");
        assert_eq!(value["records"][0]["eye_contact_score"], 8.0);
        // Absent scores serialize as explicit nulls
        assert!(value["records"][0]["attire_score"].is_null());
    }

    #[test]
    fn test_empty_table_summary_is_null() {
        let mut buf = Vec::new();
        write(&mut buf, &[]).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["summary"]["total"], 0);
        assert!(value["summary"]["visual"].is_null());
        assert_eq!(value["records"].as_array().unwrap().len(), 0);
    }
}
