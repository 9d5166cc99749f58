//! List catalog rules

use std::path::PathBuf;

use faultline::adapters::toml::TomlRuleSource;
use faultline::core::models::Domain;
use faultline::core::services::PatternCatalog;
use faultline::output::{OutputMode, RuleInfo, RuleListResult};

/// List rules, optionally for one domain
pub fn rules(domain: Option<Domain>, catalog: Option<PathBuf>, mode: OutputMode) -> anyhow::Result<()> {
    let source = catalog.map_or_else(TomlRuleSource::builtin, TomlRuleSource::file);
    let catalog = PatternCatalog::load(&source)?;

    let rules = catalog
        .rules()
        .iter()
        .filter(|r| domain.is_none_or(|d| r.domain == d))
        .map(RuleInfo::from)
        .collect();

    RuleListResult {
        catalog_version: catalog.version().to_string(),
        rules,
    }
    .render(mode);
    Ok(())
}
