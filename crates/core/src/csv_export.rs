//! CSV rendering of stored leads.
//!
//! Every cell is wrapped in double quotes with embedded quotes doubled, so
//! commas and line breaks inside free-text answers survive a round trip
//! through a spreadsheet.

use crate::lead::{FieldName, Lead};

/// Fixed header row, one column per form field plus the timestamp.
pub const CSV_HEADER: [&str; 8] = [
    "First Name",
    "Last Name",
    "Phone",
    "Email",
    "Reason",
    "Personal Relation",
    "Business Relation",
    "Timestamp",
];

/// Suggested file name for the downloaded export.
pub const CSV_FILE_NAME: &str = "contact_leads.csv";

pub const CSV_MIME_TYPE: &str = "text/csv;charset=utf-8";

/// Quote a single cell.
pub fn csv_quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Render one lead as a CSV row (no trailing newline).
pub fn render_lead_row(lead: &Lead) -> String {
    let mut cells: Vec<String> = FieldName::ALL
        .into_iter()
        .map(|name| csv_quote(lead.fields.get(name)))
        .collect();
    cells.push(csv_quote(&lead.timestamp));
    cells.join(",")
}

/// Build the full CSV document: header row, then one row per lead.
pub fn render_leads_csv(leads: &[Lead]) -> String {
    let mut lines = Vec::with_capacity(leads.len() + 1);
    lines.push(CSV_HEADER.join(","));
    lines.extend(leads.iter().map(render_lead_row));
    lines.join("\n")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
