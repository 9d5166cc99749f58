//! Output formatting for human and JSON modes
//!
//! Every command result can be rendered either as human-readable text or as
//! machine-parseable JSON.

use serde::Serialize;

use crate::core::models::{AnalysisResult, CausalChain, Classification, Domain, Rule};
use crate::core::services::excerpt;

/// Output mode for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output (machine-readable)
    Json,
}

impl OutputMode {
    /// Pick the mode from a `--json` flag
    #[must_use]
    pub const fn from_json_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Human }
    }
}

/// Result of an `analyze` run
#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    /// Source tags of the analyzed inputs
    pub sources: Vec<String>,
    /// The engine's result
    #[serde(flatten)]
    pub result: AnalysisResult,
}

/// Result of classifying a single line
#[derive(Debug, Serialize)]
pub struct ClassifyResult {
    /// Text that was classified
    pub text: String,
    /// Source tag used for rule restrictions
    pub source: String,
    /// Winning rule
    pub rule_id: Option<String>,
    /// Domain of the winning rule
    pub domain: Option<Domain>,
    /// Scored severity
    pub severity: f64,
    /// Whether a success marker matched
    pub success: bool,
    /// Matched portion of the text
    pub matched: Option<String>,
}

impl From<&Classification> for ClassifyResult {
    fn from(c: &Classification) -> Self {
        Self {
            text: c.line.text.clone(),
            source: c.line.source_tag.clone(),
            rule_id: c.rule_id.clone(),
            domain: c.domain,
            severity: c.severity.value(),
            success: c.is_success,
            matched: c.matched_text().map(String::from),
        }
    }
}

/// Result of listing the catalog
#[derive(Debug, Serialize)]
pub struct RuleListResult {
    /// Catalog version
    pub catalog_version: String,
    /// Listed rules
    pub rules: Vec<RuleInfo>,
}

/// One catalog rule
#[derive(Debug, Serialize)]
pub struct RuleInfo {
    /// Rule id
    pub id: String,
    /// Rule domain
    pub domain: Domain,
    /// Base severity, zero for success markers
    pub severity: f64,
    /// Whether this is a success marker
    pub success: bool,
    /// Evaluation priority
    pub priority: u32,
    /// Regex pattern
    pub pattern: String,
}

impl From<&Rule> for RuleInfo {
    fn from(rule: &Rule) -> Self {
        Self {
            id: rule.id.clone(),
            domain: rule.domain,
            severity: rule.base_severity,
            success: rule.is_success_marker,
            priority: rule.priority,
            pattern: rule.pattern.clone(),
        }
    }
}

impl AnalysisReport {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => self.render_human(),
            OutputMode::Json => self.render_json(),
        }
    }

    fn render_human(&self) {
        let r = &self.result;
        println!(
            "Analyzed {} line(s) from {} (catalog {})",
            r.total_lines,
            self.sources.join(", "),
            r.catalog_version
        );

        let health = &r.summary.health;
        println!(
            "Health: {} ({:.1}% error rate)",
            health.status, health.error_rate_percent
        );

        if r.is_clean() {
            println!("\nNo errors found.");
            return;
        }

        let dist = &r.summary.severity_distribution;
        println!(
            "{} error(s): {} critical, {} high, {} medium, {} low ({:.1} per 1000 lines)",
            r.errors.len(),
            dist.critical,
            dist.high,
            dist.medium,
            dist.low,
            r.summary.errors_per_1000_lines
        );

        let ranked = r.ranked_chains();
        if ranked.is_empty() {
            println!("\nNo causal chains; {} isolated error(s).", r.summary.isolated_errors);
        } else {
            println!("\nRoot-cause hypotheses:");
            for chain in ranked {
                render_chain(chain);
            }
            println!("{} isolated error(s).", r.summary.isolated_errors);
        }

        if !r.summary.hypotheses.is_empty() {
            println!("\nBy domain:");
            for h in &r.summary.hypotheses {
                println!(
                    "  {:<11} {:>4} error(s), max [{}], confidence {:.2}",
                    h.domain.as_str(),
                    h.count,
                    h.max_severity,
                    h.confidence
                );
            }
        }

        if !r.timeline.is_empty() {
            println!("\nTimeline:");
            for entry in &r.timeline {
                println!(
                    "  {}  [{}] {:<11} {:<4} {}",
                    entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    entry.severity,
                    entry.domain.map_or("-", Domain::as_str),
                    entry.chain_id.as_deref().unwrap_or("-"),
                    entry.excerpt
                );
            }
        }
    }

    fn render_json(&self) {
        println!("{}", serde_json::to_string_pretty(self).unwrap_or_default());
    }
}

fn render_chain(chain: &CausalChain) {
    println!(
        "  #{} [{}] {} ({}), confidence {:.2}",
        chain.rank,
        chain.id,
        chain.label,
        chain.domain_path(),
        chain.confidence
    );
    println!(
        "       {} -> {}",
        chain.started_at.format("%Y-%m-%d %H:%M:%S"),
        chain.ended_at.format("%Y-%m-%d %H:%M:%S")
    );
    for member in &chain.members {
        println!("       [{}] {}", member.severity, excerpt(&member.line.text, 100));
    }
    for rec in &chain.recommendations {
        println!("       - {rec}");
    }
    println!();
}

impl ClassifyResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => self.render_human(),
            OutputMode::Json => self.render_json(),
        }
    }

    fn render_human(&self) {
        match (&self.rule_id, self.domain) {
            (Some(rule), Some(domain)) if self.success => {
                println!("success ({domain}, rule {rule})");
            },
            (Some(rule), Some(domain)) => {
                println!("error: severity {:.1} ({domain}, rule {rule})", self.severity);
            },
            _ => println!("no match: not an error"),
        }
        if let Some(matched) = &self.matched {
            println!("matched: {matched}");
        }
    }

    fn render_json(&self) {
        println!("{}", serde_json::to_string_pretty(self).unwrap_or_default());
    }
}

impl RuleListResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => self.render_human(),
            OutputMode::Json => self.render_json(),
        }
    }

    fn render_human(&self) {
        if self.rules.is_empty() {
            println!("No rules found.");
            return;
        }

        println!("Catalog {} ({} rules):\n", self.catalog_version, self.rules.len());
        for rule in &self.rules {
            let kind = if rule.success {
                "success".to_string()
            } else {
                format!("{:.1}", rule.severity)
            };
            println!("  {:<28} {:<11} {:>7}  p{}", rule.id, rule.domain.as_str(), kind, rule.priority);
        }
    }

    fn render_json(&self) {
        println!("{}", serde_json::to_string_pretty(self).unwrap_or_default());
    }
}
