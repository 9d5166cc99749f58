//! Plain-text log ingestion
//!
//! Turns log files into [`RawLine`]s. The timestamp is searched anywhere in
//! the line; formats are tried in a fixed order and the first one that both
//! matches and parses wins. Lines without a recognizable timestamp are kept
//! with `timestamp = None` so the engine can order them by position.

use std::fs;
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Datelike, FixedOffset, NaiveDateTime, TimeZone, Utc};
use regex::{Captures, Regex};

use crate::core::models::RawLine;

/// Timestamp layouts recognized in log text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampFormat {
    /// `2024-03-01T12:00:00.123+02:00`, `T` or space, fraction and offset optional
    Iso8601,
    /// `03/01/2024 12:00:00`
    UsDateTime,
    /// `Mar  1 12:00:00`, year supplied by the parser
    Syslog,
    /// `01-Mar-2024 12:00:00`
    DayMonthYear,
}

impl TimestampFormat {
    /// All formats, in the order they are tried
    pub const ALL: [Self; 4] = [Self::Iso8601, Self::UsDateTime, Self::Syslog, Self::DayMonthYear];

    const fn pattern(self) -> &'static str {
        match self {
            Self::Iso8601 => {
                r"(\d{4}-\d{2}-\d{2})[T ](\d{2}:\d{2}:\d{2})(\.\d{1,9})?(Z|[+-]\d{2}:?\d{2})?"
            },
            Self::UsDateTime => r"(\d{2}/\d{2}/\d{4} \d{2}:\d{2}:\d{2})",
            Self::Syslog => r"\b([A-Z][a-z]{2}) +(\d{1,2}) (\d{2}:\d{2}:\d{2})\b",
            Self::DayMonthYear => r"(\d{2}-[A-Z][a-z]{2}-\d{4} \d{2}:\d{2}:\d{2})",
        }
    }
}

/// Extracts timestamps from log lines
#[derive(Debug, Clone)]
pub struct TimestampParser {
    year: i32,
    formats: Vec<(TimestampFormat, Regex)>,
}

impl Default for TimestampParser {
    fn default() -> Self {
        Self::new(Utc::now().year())
    }
}

impl TimestampParser {
    /// Create a parser; `year` fills in syslog timestamps
    #[must_use]
    pub fn new(year: i32) -> Self {
        let formats = TimestampFormat::ALL
            .into_iter()
            .filter_map(|f| Regex::new(f.pattern()).ok().map(|re| (f, re)))
            .collect();
        Self { year, formats }
    }

    /// Formats this parser can recognize
    pub fn formats(&self) -> impl Iterator<Item = TimestampFormat> + '_ {
        self.formats.iter().map(|(f, _)| *f)
    }

    /// Find and parse the first recognizable timestamp in `text`
    #[must_use]
    pub fn parse(&self, text: &str) -> Option<DateTime<Utc>> {
        self.formats.iter().find_map(|(format, re)| {
            re.captures(text).and_then(|caps| self.convert(*format, &caps))
        })
    }

    /// Build a `RawLine`, extracting its timestamp
    #[must_use]
    pub fn parse_line(&self, source_tag: &str, text: &str) -> RawLine {
        RawLine {
            timestamp: self.parse(text),
            source_tag: source_tag.to_string(),
            text: text.to_string(),
        }
    }

    /// Split text into lines, skipping blank ones
    #[must_use]
    pub fn read_str(&self, source_tag: &str, content: &str) -> Vec<RawLine> {
        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| self.parse_line(source_tag, line))
            .collect()
    }

    /// Read a log file; the source tag is the file stem
    pub fn read_file(&self, path: &Path) -> anyhow::Result<Vec<RawLine>> {
        let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        let content = String::from_utf8_lossy(&bytes);
        let tag = path
            .file_stem()
            .map_or_else(|| "input".to_string(), |s| s.to_string_lossy().into_owned());
        let lines = self.read_str(&tag, &content);
        log::debug!("read {} line(s) from {}", lines.len(), path.display());
        Ok(lines)
    }

    /// Read several log files and interleave them with [`merge_by_time`]
    pub fn read_files(&self, paths: &[impl AsRef<Path>]) -> anyhow::Result<Vec<RawLine>> {
        let files = paths
            .iter()
            .map(|p| self.read_file(p.as_ref()))
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(merge_by_time(files))
    }

    fn convert(&self, format: TimestampFormat, caps: &Captures<'_>) -> Option<DateTime<Utc>> {
        match format {
            TimestampFormat::Iso8601 => {
                let date = caps.get(1)?.as_str();
                let time = caps.get(2)?.as_str();
                let naive = match caps.get(3) {
                    Some(frac) => NaiveDateTime::parse_from_str(
                        &format!("{date} {time}{}", frac.as_str()),
                        "%Y-%m-%d %H:%M:%S%.f",
                    ),
                    None => NaiveDateTime::parse_from_str(&format!("{date} {time}"), "%Y-%m-%d %H:%M:%S"),
                }
                .ok()?;
                match caps.get(4).map(|m| m.as_str()) {
                    None | Some("Z") => Some(naive.and_utc()),
                    Some(offset) => {
                        let offset = parse_offset(offset)?;
                        offset
                            .from_local_datetime(&naive)
                            .single()
                            .map(|dt| dt.with_timezone(&Utc))
                    },
                }
            },
            TimestampFormat::UsDateTime => {
                NaiveDateTime::parse_from_str(caps.get(1)?.as_str(), "%m/%d/%Y %H:%M:%S")
                    .ok()
                    .map(|n| n.and_utc())
            },
            TimestampFormat::Syslog => {
                let stamp = format!(
                    "{} {} {} {}",
                    self.year,
                    caps.get(1)?.as_str(),
                    caps.get(2)?.as_str(),
                    caps.get(3)?.as_str()
                );
                NaiveDateTime::parse_from_str(&stamp, "%Y %b %d %H:%M:%S")
                    .ok()
                    .map(|n| n.and_utc())
            },
            TimestampFormat::DayMonthYear => {
                NaiveDateTime::parse_from_str(caps.get(1)?.as_str(), "%d-%b-%Y %H:%M:%S")
                    .ok()
                    .map(|n| n.and_utc())
            },
        }
    }
}

/// `+02:00`, `-0530` → fixed offset
fn parse_offset(text: &str) -> Option<FixedOffset> {
    let (sign, rest) = match text.as_bytes().first()? {
        b'+' => (1, &text[1..]),
        b'-' => (-1, &text[1..]),
        _ => return None,
    };
    let digits: String = rest.chars().filter(char::is_ascii_digit).collect();
    if digits.len() != 4 {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Interleave lines from several files by timestamp
///
/// An untimed line stays behind the timed line before it in its own file;
/// leading untimed lines go with the file's first timestamp. Files with no
/// timestamp at all come last. Ties keep file order.
#[must_use]
pub fn merge_by_time(files: Vec<Vec<RawLine>>) -> Vec<RawLine> {
    let mut keyed: Vec<(Option<DateTime<Utc>>, RawLine)> =
        Vec::with_capacity(files.iter().map(Vec::len).sum());
    for lines in files {
        let mut anchor = lines.iter().find_map(|l| l.timestamp);
        for line in lines {
            if line.timestamp.is_some() {
                anchor = line.timestamp;
            }
            keyed.push((anchor, line));
        }
    }
    keyed.sort_by_key(|(anchor, _)| (anchor.is_none(), *anchor));
    keyed.into_iter().map(|(_, line)| line).collect()
}
