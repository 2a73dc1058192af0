//! CSV report output

use crate::flatten::FlatRecord;
use crate::taxonomy::Category;
use std::io::{self, Write};

const IDENTITY_COLUMNS: [&str; 6] = [
    "firstName",
    "lastName",
    "email",
    "question",
    "fileName",
    "videoUrl",
];

pub fn write<W: Write>(writer: &mut W, records: &[FlatRecord]) -> io::Result<()> {
    let mut header: Vec<&str> = IDENTITY_COLUMNS.to_vec();
    for category in Category::ALL {
        header.extend(category.metrics().iter().map(|m| m.column()));
    }
    writeln!(writer, "{}", header.join(","))?;

    for record in records {
        let mut row: Vec<String> = vec![
            escape(record.first_name.as_deref()),
            escape(record.last_name.as_deref()),
            escape(record.email.as_deref()),
            escape(record.question.as_deref()),
            escape(record.file_name.as_deref()),
            escape(record.video_url.as_deref()),
        ];
        for category in Category::ALL {
            for metric in category.metrics() {
                row.push(number(record.metric(*metric)));
            }
        }
        writeln!(writer, "{}", row.join(","))?;
    }

    Ok(())
}

fn number(value: Option<f64>) -> String {
    // Null scores stay empty cells
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn escape(value: Option<&str>) -> String {
    let value = value.unwrap_or("");
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
