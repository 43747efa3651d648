use std::collections::HashMap;

use anyhow::bail;
use tracing::{debug, warn};

use crate::config::{LedgerConfig, SubjectKind, SubjectSpec};
use crate::grid::{looks_numeric, Grid};

/// Marks for one subject. Components are `None` only when the ledger
/// explicitly says "Absent"; a missing or garbled cell degrades to 0.
#[derive(Debug)]
pub struct SubjectMarks {
    pub code: String,
    /// Theory/external component.
    pub first: Option<i64>,
    /// Internal component.
    pub second: Option<i64>,
    pub total: i64,
    pub result: String,
}

#[derive(Debug)]
pub struct StudentRecord {
    pub usn: String,
    pub name: String,
    /// One entry per configured subject, in output-column order.
    pub subjects: Vec<SubjectMarks>,
    pub grand_total: i64,
    pub overall_result: String,
    pub sgpa: Option<f64>,
    pub cgpa: Option<f64>,
}

/// Splits a compound mark cell like "45+10" into its components.
/// "Absent" (any case) is the explicit absence marker; anything
/// non-numeric degrades to 0. Never fails.
pub fn split_marks(raw: &str) -> (Option<i64>, Option<i64>) {
    let val = raw.trim();
    if val.eq_ignore_ascii_case("absent") {
        return (None, None);
    }
    let mut parts = val.split('+');
    let first = parse_component(parts.next().unwrap_or(""));
    let second = parts.next().map(parse_component).unwrap_or(0);
    (Some(first), Some(second))
}

fn parse_component(part: &str) -> i64 {
    let t = part.trim();
    if !t.is_empty() && t.chars().all(|c| c.is_ascii_digit()) {
        t.parse().unwrap_or(0)
    } else {
        0
    }
}

/// First row with a cell containing the header marker. The one hard
/// stop besides a missing subject column: without it no column mapping
/// is possible.
pub fn find_header_row(grid: &Grid, marker: &str) -> anyhow::Result<usize> {
    for (idx, row) in grid.rows().enumerate() {
        if row_contains(row, marker) {
            return Ok(idx);
        }
    }
    bail!("subject header row not found (no cell contains {:?})", marker)
}

/// Binds each configured subject to its column in the header row.
pub fn map_subject_columns(
    header: &[Option<String>],
    subjects: &[SubjectSpec],
) -> anyhow::Result<HashMap<String, usize>> {
    let mut columns = HashMap::new();
    for spec in subjects {
        let col = header
            .iter()
            .position(|c| c.as_deref() == Some(spec.header_label.as_str()));
        match col {
            Some(col) => {
                columns.insert(spec.code.clone(), col);
            }
            None => bail!(
                "subject column {:?} ({}) missing from header row",
                spec.header_label,
                spec.code
            ),
        }
    }
    Ok(columns)
}

struct SummaryRows<'a> {
    /// Row carrying per-subject pass/fail markers. Last match in the
    /// window wins.
    result_row: Option<&'a [Option<String>]>,
    overall_result: String,
    sgpa: Option<f64>,
    cgpa: Option<f64>,
}

/// Scans the bounded window below an identifier row for the result
/// row, the "Result:" cell, and SGPA/CGPA rows. Within a row the first
/// matching cell wins; a later row re-matching overwrites an earlier
/// one.
fn scan_summary<'a>(grid: &'a Grid, start: usize, window: usize) -> SummaryRows<'a> {
    let mut summary = SummaryRows {
        result_row: None,
        overall_result: "Pass".to_string(),
        sgpa: None,
        cgpa: None,
    };

    for k in (start + 1)..(start + window).min(grid.len()) {
        let row = grid.row(k);

        if row
            .iter()
            .flatten()
            .map(|c| c.to_lowercase())
            .any(|c| c.contains("pass") || c.contains("fail") || c.contains("absent"))
        {
            summary.result_row = Some(row);
        }

        for cell in row.iter().flatten() {
            if cell.to_lowercase().starts_with("result:") {
                let value = cell.rsplit(':').next().unwrap_or("").trim();
                summary.overall_result = capitalize(value);
                break;
            }
        }

        if row_contains_ci(row, "sgpa") {
            if let Some(v) = first_numeric_cell(row) {
                summary.sgpa = Some(v);
            }
        }
        if row_contains_ci(row, "cgpa") {
            if let Some(v) = first_numeric_cell(row) {
                summary.cgpa = Some(v);
            }
        }
    }
    summary
}

/// Walks the whole sheet and assembles one record per identifier row.
pub fn extract_students(grid: &Grid, cfg: &LedgerConfig) -> anyhow::Result<Vec<StudentRecord>> {
    let header_idx = find_header_row(grid, &cfg.header_marker)?;
    let columns = map_subject_columns(grid.row(header_idx), &cfg.subjects)?;
    let has_labs = cfg.subjects.iter().any(|s| s.kind == SubjectKind::Lab);

    let mut students = Vec::new();
    for i in 0..grid.len() {
        let row = grid.row(i);
        let Some(usn) = row
            .iter()
            .flatten()
            .find(|c| c.contains(&cfg.identifier_marker))
        else {
            continue;
        };
        let usn = usn.clone();

        // Student name sits on the row directly below the identifier.
        let name = grid
            .get_row(i + 1)
            .and_then(first_non_blank)
            .unwrap_or("")
            .to_string();

        let mut practical: Option<&[Option<String>]> = None;
        for j in (i + 1)..(i + cfg.windows.practical).min(grid.len()) {
            if row_contains(grid.row(j), &cfg.practical_marker) {
                practical = Some(grid.row(j));
                break;
            }
        }
        if practical.is_none() && has_labs {
            warn!(usn = %usn, "no practical row within window, lab marks default to 0");
        }

        let summary = scan_summary(grid, i, cfg.windows.summary);

        let mut subjects = Vec::with_capacity(cfg.subjects.len());
        let mut grand_total = 0i64;
        for spec in &cfg.subjects {
            let col = columns[spec.code.as_str()];
            let source = match spec.kind {
                SubjectKind::Theory => row,
                SubjectKind::Lab => practical.unwrap_or(&[]),
            };
            let (first, second) = split_marks(cell_str(source, col));
            let total = first.unwrap_or(0) + second.unwrap_or(0);
            grand_total += total;

            let result_cell = summary
                .result_row
                .map(|r| cell_str(r, col))
                .unwrap_or("");
            let result = if result_cell.is_empty() {
                "Pass".to_string()
            } else {
                result_cell.to_string()
            };

            subjects.push(SubjectMarks {
                code: spec.code.clone(),
                first,
                second,
                total,
                result,
            });
        }

        debug!(usn = %usn, grand_total, "scanned student block");
        students.push(StudentRecord {
            usn,
            name,
            subjects,
            grand_total,
            overall_result: summary.overall_result,
            sgpa: summary.sgpa,
            cgpa: summary.cgpa,
        });
    }
    Ok(students)
}

fn row_contains(row: &[Option<String>], needle: &str) -> bool {
    row.iter().flatten().any(|c| c.contains(needle))
}

fn row_contains_ci(row: &[Option<String>], needle: &str) -> bool {
    row.iter()
        .flatten()
        .any(|c| c.to_lowercase().contains(needle))
}

fn first_non_blank(row: &[Option<String>]) -> Option<&str> {
    row.iter().flatten().map(|c| c.as_str()).next()
}

fn first_numeric_cell(row: &[Option<String>]) -> Option<f64> {
    row.iter()
        .flatten()
        .find(|c| looks_numeric(c))
        .and_then(|c| c.parse().ok())
}

fn cell_str<'a>(row: &'a [Option<String>], col: usize) -> &'a str {
    row.get(col).and_then(|c| c.as_deref()).unwrap_or("")
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}
