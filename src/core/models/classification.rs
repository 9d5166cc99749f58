//! Classification model
//!
//! One classification is produced per input line. It records which rule (if
//! any) matched, the domain, the scored severity and whether the line was
//! recognized as a successful operation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Domain, RawLine, Severity};

/// Byte range of the rule match within the line text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSpan {
    /// Start byte offset
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

/// The verdict for a single line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Position of the line in the input sequence
    pub sequence: usize,

    /// The original line
    pub line: RawLine,

    /// Effective timestamp used for ordering
    pub timestamp: DateTime<Utc>,

    /// True when `timestamp` was synthesized because the line had none
    pub ordering_assumed: bool,

    /// Id of the winning rule, if any matched
    pub rule_id: Option<String>,

    /// Domain of the winning rule
    pub domain: Option<Domain>,

    /// Scored severity; always zero for successes and unmatched lines
    pub severity: Severity,

    /// Whether a success marker matched
    pub is_success: bool,

    /// Where the winning rule matched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<MatchSpan>,
}

impl Classification {
    /// A line no rule recognized
    #[must_use]
    pub fn unmatched(
        sequence: usize,
        line: RawLine,
        timestamp: DateTime<Utc>,
        ordering_assumed: bool,
    ) -> Self {
        Self {
            sequence,
            line,
            timestamp,
            ordering_assumed,
            rule_id: None,
            domain: None,
            severity: Severity::ZERO,
            is_success: false,
            span: None,
        }
    }

    /// Mark this classification as a success; severity is forced to zero
    #[must_use]
    pub fn into_success(mut self) -> Self {
        self.is_success = true;
        self.severity = Severity::ZERO;
        self
    }

    /// Whether this line is a genuine error
    #[must_use]
    pub fn is_error(&self) -> bool {
        !self.is_success && self.severity.is_error()
    }

    /// Tie-break rank for events sharing a timestamp
    #[must_use]
    pub fn domain_rank(&self) -> u8 {
        self.domain.map_or(u8::MAX, Domain::priority)
    }

    /// The matched portion of the text
    #[must_use]
    pub fn matched_text(&self) -> Option<&str> {
        self.span.and_then(|s| self.line.text.get(s.start..s.end))
    }
}
