//! Classify a single line

use faultline::adapters::text::TimestampParser;
use faultline::engine::Analyzer;
use faultline::output::{ClassifyResult, OutputMode};

use super::Overrides;

/// Classify `text` as if it came from `source`
pub fn classify(text: &str, source: &str, overrides: &Overrides, mode: OutputMode) -> anyhow::Result<()> {
    let analyzer = Analyzer::from_config(overrides.resolve()?)?;
    let line = TimestampParser::default().parse_line(source, text);
    let classification = analyzer.classify(&line);
    ClassifyResult::from(&classification).render(mode);
    Ok(())
}
