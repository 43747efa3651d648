use std::path::Path;

use anyhow::Context;
use calamine::{open_workbook_auto, Data, Reader};

/// Raw ledger sheet. Blank cells are `None`; every other cell is kept
/// as trimmed text so the row heuristics can substring-match freely.
pub struct Grid {
    rows: Vec<Vec<Option<String>>>,
}

impl Grid {
    pub fn from_rows(rows: Vec<Vec<Option<String>>>) -> Grid {
        Grid { rows }
    }

    /// Reads the first worksheet of an xlsx/xls file as a raw grid.
    /// No header row is assumed.
    pub fn load(path: &Path) -> anyhow::Result<Grid> {
        let mut workbook = open_workbook_auto(path)
            .with_context(|| format!("open workbook {}", path.display()))?;
        let range = workbook
            .worksheet_range_at(0)
            .context("workbook has no worksheets")?
            .context("read first worksheet")?;

        let rows = range
            .rows()
            .map(|row| row.iter().map(cell_text).collect())
            .collect();
        Ok(Grid { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, idx: usize) -> &[Option<String>] {
        &self.rows[idx]
    }

    pub fn get_row(&self, idx: usize) -> Option<&[Option<String>]> {
        self.rows.get(idx).map(|r| r.as_slice())
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Option<String>]> + '_ {
        self.rows.iter().map(|r| r.as_slice())
    }
}

/// Ledger cells mix text and numbers. Integral floats render without a
/// trailing `.0` so a numeric `45` still parses as a mark component;
/// fractional values keep their decimal point.
fn cell_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty => return None,
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        Data::Error(e) => format!("{:?}", e),
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Matches the ledger's idea of "a number": ASCII digits with at most
/// one decimal point. Rejects signs, exponents, and free text, so cells
/// like "SGPA" or "nan" never parse as grade points.
pub fn looks_numeric(s: &str) -> bool {
    let digits = s.replacen('.', "", 1);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_text_normalizes_numbers_and_blanks() {
        assert_eq!(cell_text(&Data::Empty), None);
        assert_eq!(cell_text(&Data::String("   ".into())), None);
        assert_eq!(cell_text(&Data::String(" 45+10 ".into())), Some("45+10".into()));
        assert_eq!(cell_text(&Data::Float(45.0)), Some("45".into()));
        assert_eq!(cell_text(&Data::Float(8.15)), Some("8.15".into()));
        assert_eq!(cell_text(&Data::Int(7)), Some("7".into()));
    }

    #[test]
    fn looks_numeric_allows_one_decimal_point() {
        assert!(looks_numeric("8"));
        assert!(looks_numeric("8.15"));
        assert!(looks_numeric(".5"));
        assert!(!looks_numeric(""));
        assert!(!looks_numeric("."));
        assert!(!looks_numeric("-3"));
        assert!(!looks_numeric("8.1.5"));
        assert!(!looks_numeric("SGPA"));
        assert!(!looks_numeric("nan"));
    }
}
