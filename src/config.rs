use std::path::Path;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

/// Theory subjects take their marks from the identifier row; lab
/// subjects take theirs from the nearby practical row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectKind {
    Theory,
    Lab,
}

impl SubjectKind {
    /// Output label for the first mark component.
    pub fn first_component_label(self) -> &'static str {
        match self {
            SubjectKind::Theory => "THEORY",
            SubjectKind::Lab => "EXTERNAL",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectSpec {
    /// Short code used in errors and logs, e.g. "ENG".
    pub code: String,
    /// Exact header cell text in the ledger, e.g. "SC2ENG".
    pub header_label: String,
    /// Prefix for the output columns, e.g. "ENG" or "DS LAB".
    pub column_prefix: String,
    pub kind: SubjectKind,
}

/// Bounded forward-search windows below an identifier row, counted in
/// rows including the identifier row itself (a window of 10 scans the
/// 9 rows beneath it).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScanWindows {
    /// Window searched for the practical marks row.
    pub practical: usize,
    /// Window searched for result / overall / SGPA / CGPA rows.
    pub summary: usize,
}

impl Default for ScanWindows {
    fn default() -> Self {
        ScanWindows {
            practical: 10,
            summary: 15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Substring marking the subject header row.
    #[serde(default = "default_header_marker")]
    pub header_marker: String,
    /// Substring identifying a registration-number cell.
    #[serde(default = "default_identifier_marker")]
    pub identifier_marker: String,
    /// Substring identifying the practical marks row.
    #[serde(default = "default_practical_marker")]
    pub practical_marker: String,
    #[serde(default)]
    pub windows: ScanWindows,
    /// Subjects in output-column order.
    pub subjects: Vec<SubjectSpec>,
}

fn default_header_marker() -> String {
    "Sub".to_string()
}

fn default_identifier_marker() -> String {
    "U03".to_string()
}

fn default_practical_marker() -> String {
    "Pr".to_string()
}

impl Default for LedgerConfig {
    /// The BCA second-semester ledger this tool was written for.
    fn default() -> Self {
        LedgerConfig {
            header_marker: default_header_marker(),
            identifier_marker: default_identifier_marker(),
            practical_marker: default_practical_marker(),
            windows: ScanWindows::default(),
            subjects: vec![
                subject("ENG", "SC2ENG", "ENG", SubjectKind::Theory),
                subject("KAN", "BCAKN2", "KAN", SubjectKind::Theory),
                subject("DSL", "BCA21P", "DS LAB", SubjectKind::Lab),
                subject("OOPL", "BCA22P", "OOP LAB", SubjectKind::Lab),
                subject("LNX", "BCA23P", "LINUX LAB", SubjectKind::Lab),
                subject("CA", "SECCA1", "CA", SubjectKind::Theory),
                subject("JAVA", "BCA22T", "JAVA", SubjectKind::Theory),
                subject("DS", "BCA21T", "DS", SubjectKind::Theory),
                subject("OS", "BCA23T", "OS", SubjectKind::Theory),
            ],
        }
    }
}

fn subject(code: &str, header_label: &str, column_prefix: &str, kind: SubjectKind) -> SubjectSpec {
    SubjectSpec {
        code: code.to_string(),
        header_label: header_label.to_string(),
        column_prefix: column_prefix.to_string(),
        kind,
    }
}

impl LedgerConfig {
    /// Loads a subject table from JSON, replacing the built-in one.
    pub fn from_json_file(path: &Path) -> anyhow::Result<LedgerConfig> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read subject table {}", path.display()))?;
        let cfg: LedgerConfig = serde_json::from_str(&text)
            .with_context(|| format!("parse subject table {}", path.display()))?;
        if cfg.subjects.is_empty() {
            bail!("subject table {} lists no subjects", path.display());
        }
        Ok(cfg)
    }
}
