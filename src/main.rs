use std::path::PathBuf;

use anyhow::{bail, Result};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use resultsheet::config::LedgerConfig;
use resultsheet::export;
use resultsheet::grid::Grid;
use resultsheet::scan;

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let mut args = std::env::args_os().skip(1);
    let (Some(input), Some(output)) = (args.next(), args.next()) else {
        bail!("usage: resultsheet <ledger.xlsx> <output.xlsx> [subjects.json]");
    };
    let input = PathBuf::from(input);
    let output = PathBuf::from(output);
    let cfg = match args.next() {
        Some(p) => LedgerConfig::from_json_file(&PathBuf::from(p))?,
        None => LedgerConfig::default(),
    };

    let grid = Grid::load(&input)?;
    info!(rows = grid.len(), input = %input.display(), "loaded ledger");

    let students = scan::extract_students(&grid, &cfg)?;
    info!(students = students.len(), "extracted student records");

    export::write_table(&output, &cfg, &students)?;
    info!(output = %output.display(), "wrote results table");
    Ok(())
}
