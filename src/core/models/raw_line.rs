//! Raw input lines
//!
//! A `RawLine` is what the ingestion layer hands the engine: one log line,
//! the source it came from and the timestamp it carried, if one could be read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One timestamped log line, consumed read-only by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLine {
    /// When the line was emitted; `None` when the timestamp could not be parsed
    pub timestamp: Option<DateTime<Utc>>,

    /// Where the line came from (file stem, subsystem tag, BMC channel...)
    pub source_tag: String,

    /// The untrimmed line text
    pub text: String,
}

impl RawLine {
    /// Create a line with a known timestamp
    #[must_use]
    pub fn new(timestamp: DateTime<Utc>, source_tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            timestamp: Some(timestamp),
            source_tag: source_tag.into(),
            text: text.into(),
        }
    }

    /// Create a line whose timestamp could not be parsed
    #[must_use]
    pub fn untimed(source_tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            timestamp: None,
            source_tag: source_tag.into(),
            text: text.into(),
        }
    }
}
