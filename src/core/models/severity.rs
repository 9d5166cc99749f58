//! Severity scores
//!
//! A severity is a score on the closed range 0.0–10.0 where 0.0 means
//! "not an error". Successful operations always carry 0.0.

use serde::{Deserialize, Serialize};

/// Error severity, clamped to `0.0..=10.0`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Severity(f64);

impl Severity {
    /// Not an error
    pub const ZERO: Self = Self(0.0);

    /// Upper bound of the scale
    pub const MAX: f64 = 10.0;

    /// Create a severity, clamping into range. Non-finite input becomes zero.
    #[must_use]
    pub fn new(value: f64) -> Self {
        if !value.is_finite() {
            return Self::ZERO;
        }
        Self(value.clamp(0.0, Self::MAX))
    }

    /// Raw score
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Whether this severity marks a genuine error
    #[must_use]
    pub fn is_error(self) -> bool {
        self.0 > 0.0
    }

    /// Scale by `factor`, never exceeding `ceiling`
    #[must_use]
    pub fn scaled(self, factor: f64, ceiling: f64) -> Self {
        Self::new((self.0 * factor).min(ceiling))
    }

    /// Reporting band for this score
    #[must_use]
    pub fn band(self) -> SeverityBand {
        SeverityBand::of(self)
    }

    /// Total order for sorting; the value is never NaN
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl From<f64> for Severity {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Severity> for f64 {
    fn from(severity: Severity) -> Self {
        severity.0
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: f64 = s
            .trim()
            .parse()
            .map_err(|_| format!("Invalid severity: {s}. Use a number from 0 to 10"))?;
        if !(0.0..=Self::MAX).contains(&value) {
            return Err(format!("Invalid severity: {s}. Use a number from 0 to 10"));
        }
        Ok(Self(value))
    }
}

/// Coarse reporting bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityBand {
    /// Below 5.0
    Low,
    /// 5.0 up to 7.0
    Medium,
    /// 7.0 up to 9.0
    High,
    /// 9.0 and above
    Critical,
}

impl SeverityBand {
    /// Band a severity falls into
    #[must_use]
    pub fn of(severity: Severity) -> Self {
        match severity.value() {
            v if v >= 9.0 => Self::Critical,
            v if v >= 7.0 => Self::High,
            v if v >= 5.0 => Self::Medium,
            _ => Self::Low,
        }
    }
}

impl std::fmt::Display for SeverityBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::Critical => write!(f, "critical"),
        }
    }
}
