//! Result presentation: table, JSON and CSV

use chrono::Local;
use std::fs;
use std::path::Path;

use crate::error::{Result, SearchError};
use crate::models::ResultRecord;

const HEADERS: [&str; 7] = ["Score", "Name", "Ext", "SizeKB", "Modified", "Hit", "Path"];
const CSV_HEADERS: [&str; 8] = [
    "Score", "Name", "Extension", "SizeKB", "LastModified", "HitKind", "Path", "Snippet",
];

/// Render records as an aligned text table
pub fn render_table(records: &[ResultRecord], show_snippets: bool) -> String {
    if records.is_empty() {
        return "No results found.\n".to_string();
    }

    let rows: Vec<[String; 7]> = records.iter().map(table_row).collect();
    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &HEADERS.map(String::from), &widths);
    push_line(&mut out, &widths.map(|w| "-".repeat(w)), &widths);
    for (row, record) in rows.iter().zip(records) {
        push_line(&mut out, row, &widths);
        if show_snippets {
            if let Some(snippet) = &record.snippet {
                out.push_str("    ");
                out.push_str(&flatten_whitespace(snippet));
                out.push('\n');
            }
        }
    }
    out
}

fn table_row(record: &ResultRecord) -> [String; 7] {
    [
        record.score.to_string(),
        record.name.clone(),
        record.extension.clone(),
        format!("{:.1}", record.size_kb),
        record
            .last_modified
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string(),
        record.hit_kind.as_str().to_string(),
        record.path.clone(),
    ]
}

fn push_line(out: &mut String, cells: &[String; 7], widths: &[usize; 7]) {
    let last = cells.len() - 1;
    for (i, cell) in cells.iter().enumerate() {
        if i == last {
            out.push_str(cell);
        } else {
            let pad = widths[i] - cell.chars().count();
            out.push_str(cell);
            out.push_str(&" ".repeat(pad + 2));
        }
    }
    out.push('\n');
}

fn flatten_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Pretty JSON array of records
pub fn to_json(records: &[ResultRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// CSV document with a header row
pub fn to_csv(records: &[ResultRecord]) -> String {
    let mut out = String::new();
    push_csv_row(&mut out, &CSV_HEADERS.map(String::from));
    for record in records {
        push_csv_row(
            &mut out,
            &[
                record.score.to_string(),
                record.name.clone(),
                record.extension.clone(),
                format!("{:.1}", record.size_kb),
                record.last_modified.to_rfc3339(),
                record.hit_kind.as_str().to_string(),
                record.path.clone(),
                record.snippet.clone().unwrap_or_default(),
            ],
        );
    }
    out
}

/// Write the CSV export; failure here is fatal for the run
pub fn write_csv(path: &Path, records: &[ResultRecord]) -> Result<()> {
    fs::write(path, to_csv(records)).map_err(|source| SearchError::Export {
        path: path.to_path_buf(),
        source,
    })
}

fn push_csv_row(out: &mut String, fields: &[String]) {
    let escaped: Vec<String> = fields.iter().map(|f| escape_csv(f)).collect();
    out.push_str(&escaped.join(","));
    out.push_str("\r\n");
}

fn escape_csv(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
