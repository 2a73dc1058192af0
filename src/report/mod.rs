//! Report generation for flattened interview tables
//!
//! This module provides output formatters for a (possibly filtered) table in
//! multiple formats:
//!
//! - **HTML**: standalone dark-themed report with D3.js charts (category
//!   radar, metric bars, full table)
//! - **JSON**: machine-readable format for programmatic consumption
//! - **CSV**: spreadsheet-compatible format for bulk analysis
//!
//! # Usage
//!
//! ```ignore
//! use screenroom::report;
//!
//! // Automatically picks format based on extension
//! report::generate("scores.html", &records)?;  // HTML
//! report::generate("scores.json", &records)?;  // JSON
//! report::generate("scores.csv", &records)?;   // CSV
//! ```

pub mod csv;
pub mod html;
pub mod json;

use crate::aggregate;
use crate::flatten::FlatRecord;
use crate::taxonomy::Category;
use serde::Serialize;
use std::collections::BTreeSet;
use std::io;
use std::path::Path;

/// Generate a report in the appropriate format based on file extension
pub fn generate<P: AsRef<Path>>(path: P, records: &[FlatRecord]) -> io::Result<()> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let mut file = std::fs::File::create(path)?;

    match ext.as_str() {
        "html" | "htm" => html::write(&mut file, records),
        "json" => json::write(&mut file, records),
        _ => csv::write(&mut file, records),
    }
}

/// Summary statistics for a table
#[derive(Debug, Clone, Default, Serialize)]
pub struct Summary {
    pub total: usize,
    pub candidates: usize,
    pub questions: usize,
    pub visual: Option<f64>,
    pub audio: Option<f64>,
    pub content: Option<f64>,
    pub irregularities: Option<f64>,
}

impl Summary {
    pub fn from_records(records: &[FlatRecord]) -> Self {
        let candidates: BTreeSet<String> = records.iter().map(|r| r.full_name()).collect();
        let questions: BTreeSet<&str> =
            records.iter().filter_map(|r| r.question.as_deref()).collect();

        Summary {
            total: records.len(),
            candidates: candidates.len(),
            questions: questions.len(),
            visual: aggregate::category_average(records, Category::Visual),
            audio: aggregate::category_average(records, Category::Audio),
            content: aggregate::category_average(records, Category::Content),
            irregularities: aggregate::category_average(records, Category::Irregularities),
        }
    }

    /// Category averages as (name, value) pairs, taxonomy order.
    pub fn categories(&self) -> [(&'static str, Option<f64>); 4] {
        [
            ("Visual", self.visual),
            ("Audio", self.audio),
            ("Content", self.content),
            ("Irregularities", self.irregularities),
        ]
    }
}
