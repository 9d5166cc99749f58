//! Pattern catalog - compiled rule table and match resolution
//!
//! The catalog compiles every rule once into a single [`RegexSet`] so a line
//! is scanned in one pass, then resolves the winner among all matching rules:
//!
//! 1. A success marker always beats an error rule, whatever the severities.
//! 2. Otherwise the lower `priority` wins (specific rules before generic ones).
//! 3. Among error rules of equal priority, the higher base severity wins.
//! 4. Remaining ties go to catalog order.

use std::collections::HashSet;

use regex::{Regex, RegexSet};

use crate::core::models::{CatalogError, MatchSpan, RawLine, Rule, RuleSet, Severity};
use crate::core::ports::RuleSource;

/// A rule that matched a line, with the matched byte range
#[derive(Debug, Clone, Copy)]
pub struct CatalogMatch<'a> {
    /// The winning rule
    pub rule: &'a Rule,
    /// Where it matched
    pub span: MatchSpan,
}

/// Read-only, versioned rule table
///
/// Safe to share by reference across classifier workers.
#[derive(Debug)]
pub struct PatternCatalog {
    version: String,
    rules: Vec<Rule>,
    set: RegexSet,
    regexes: Vec<Regex>,
}

impl PatternCatalog {
    /// Load and compile rules from a source
    pub fn load(source: &dyn RuleSource) -> Result<Self, CatalogError> {
        let rule_set = source.load()?;
        let catalog = Self::from_rule_set(rule_set)?;
        log::debug!(
            "loaded {} rules from {} (catalog {})",
            catalog.len(),
            source.describe(),
            catalog.version
        );
        Ok(catalog)
    }

    /// Validate and compile a rule set
    pub fn from_rule_set(rule_set: RuleSet) -> Result<Self, CatalogError> {
        let RuleSet { version, mut rules } = rule_set;

        if rules.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for rule in &rules {
            if !seen.insert(rule.id.as_str()) {
                return Err(CatalogError::DuplicateId(rule.id.clone()));
            }
            if !rule.base_severity.is_finite()
                || !(0.0..=Severity::MAX).contains(&rule.base_severity)
            {
                return Err(CatalogError::InvalidSeverity {
                    id: rule.id.clone(),
                    value: rule.base_severity,
                });
            }
        }

        // Stable: catalog order is kept within a priority tier
        rules.sort_by_key(|r| r.priority);

        let mut regexes = Vec::with_capacity(rules.len());
        for rule in &rules {
            let regex = Regex::new(&rule.regex_source()).map_err(|source| {
                CatalogError::InvalidPattern {
                    id: rule.id.clone(),
                    source,
                }
            })?;
            regexes.push(regex);
        }
        let set = RegexSet::new(rules.iter().map(Rule::regex_source))?;

        Ok(Self {
            version,
            rules,
            set,
            regexes,
        })
    }

    /// Catalog version
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Rules in evaluation order
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Number of rules
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the catalog is empty (never true for a loaded catalog)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Find a rule by id
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    /// Match text against every rule, ignoring source restrictions
    #[must_use]
    pub fn match_text(&self, text: &str) -> Option<CatalogMatch<'_>> {
        self.resolve(text, None)
    }

    /// Match a line, honoring per-rule source restrictions
    #[must_use]
    pub fn match_line(&self, line: &RawLine) -> Option<CatalogMatch<'_>> {
        self.resolve(&line.text, Some(&line.source_tag))
    }

    fn resolve(&self, text: &str, source_tag: Option<&str>) -> Option<CatalogMatch<'_>> {
        let matched = self.set.matches(text);
        if !matched.matched_any() {
            return None;
        }

        let mut best: Option<usize> = None;
        for idx in matched.iter() {
            let rule = &self.rules[idx];
            if source_tag.is_some_and(|tag| !rule.applies_to(tag)) {
                continue;
            }
            best = match best {
                Some(current) if !outranks(rule, &self.rules[current]) => Some(current),
                _ => Some(idx),
            };
        }

        let idx = best?;
        let span = self.regexes[idx].find(text).map_or(
            MatchSpan { start: 0, end: 0 },
            |m| MatchSpan {
                start: m.start(),
                end: m.end(),
            },
        );
        Some(CatalogMatch {
            rule: &self.rules[idx],
            span,
        })
    }
}

/// Whether `candidate` should replace `current` as the winning rule
fn outranks(candidate: &Rule, current: &Rule) -> bool {
    if candidate.is_success_marker != current.is_success_marker {
        return candidate.is_success_marker;
    }
    if candidate.priority != current.priority {
        return candidate.priority < current.priority;
    }
    if candidate.is_success_marker {
        return false;
    }
    candidate.base_severity > current.base_severity
}
