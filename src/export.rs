use std::path::Path;

use anyhow::Context;
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::config::LedgerConfig;
use crate::scan::StudentRecord;

/// Output column names, derived from the subject table:
/// USN, NAME, then four columns per subject, then the summary columns.
pub fn column_names(cfg: &LedgerConfig) -> Vec<String> {
    let mut cols = vec!["USN".to_string(), "NAME".to_string()];
    for spec in &cfg.subjects {
        let p = &spec.column_prefix;
        cols.push(format!("{}({})", p, spec.kind.first_component_label()));
        cols.push(format!("{}(INTERNAL)", p));
        cols.push(format!("{}(TOTAL)", p));
        cols.push(format!("{}_RESULT", p));
    }
    cols.push("GRAND_TOTAL".to_string());
    cols.push("OVERALL_RESULT".to_string());
    cols.push("SGPA".to_string());
    cols.push("CGPA".to_string());
    cols
}

/// Writes the flattened per-student table to an xlsx file. Absent mark
/// components and missing grade points stay blank, not 0.
pub fn write_table(
    path: &Path,
    cfg: &LedgerConfig,
    students: &[StudentRecord],
) -> anyhow::Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, name) in column_names(cfg).iter().enumerate() {
        sheet.write_string(0, col as u16, name)?;
    }

    for (idx, student) in students.iter().enumerate() {
        let row = (idx + 1) as u32;
        let mut col: u16 = 0;

        sheet.write_string(row, col, &student.usn)?;
        col += 1;
        sheet.write_string(row, col, &student.name)?;
        col += 1;

        for marks in &student.subjects {
            write_opt_int(sheet, row, col, marks.first)?;
            col += 1;
            write_opt_int(sheet, row, col, marks.second)?;
            col += 1;
            sheet.write_number(row, col, marks.total as f64)?;
            col += 1;
            sheet.write_string(row, col, &marks.result)?;
            col += 1;
        }

        sheet.write_number(row, col, student.grand_total as f64)?;
        col += 1;
        sheet.write_string(row, col, &student.overall_result)?;
        col += 1;
        if let Some(v) = student.sgpa {
            sheet.write_number(row, col, v)?;
        }
        col += 1;
        if let Some(v) = student.cgpa {
            sheet.write_number(row, col, v)?;
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("write results table {}", path.display()))?;
    Ok(())
}

fn write_opt_int(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: Option<i64>,
) -> anyhow::Result<()> {
    if let Some(v) = value {
        sheet.write_number(row, col, v as f64)?;
    }
    Ok(())
}
