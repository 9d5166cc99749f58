//! Analyze log files

use std::path::PathBuf;

use faultline::adapters::text::TimestampParser;
use faultline::engine::Analyzer;
use faultline::output::{AnalysisReport, OutputMode};

use super::Overrides;

/// Read every file, merge the lines by time, run the engine once and render the report
pub fn analyze(
    files: &[PathBuf],
    overrides: &Overrides,
    year: Option<i32>,
    mode: OutputMode,
) -> anyhow::Result<()> {
    let config = overrides.resolve()?;
    let analyzer = Analyzer::from_config(config)?;
    let parser = year.map_or_else(TimestampParser::default, TimestampParser::new);

    let lines = parser.read_files(files)?;
    let sources = files
        .iter()
        .map(|file| {
            file.file_stem().map_or_else(
                || file.display().to_string(),
                |s| s.to_string_lossy().into_owned(),
            )
        })
        .collect();

    let result = analyzer.analyze(&lines)?;
    log::info!(
        "{} error(s), {} chain(s) in {} line(s)",
        result.errors.len(),
        result.chains.len(),
        result.total_lines
    );

    AnalysisReport { sources, result }.render(mode);
    Ok(())
}
