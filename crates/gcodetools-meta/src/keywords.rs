//! Keyword matcher engine
//!
//! A matcher detects one semantic event in slicer comments. It is built from
//! a [`MatcherRow`]: a primary pattern, an optional confirmation pattern that
//! must follow within the window, an optional forbidding pattern that must
//! not appear before the confirmation, and a reporting offset.
//!
//! Matching line `i` walks backwards over the window. At each candidate
//! line the matchers are tried in table order and the first primary hit
//! decides: it is accepted, rejected outright (forbidding pattern seen), or
//! skipped so the next matcher gets its turn (confirmation never seen).

use crate::error::MatcherError;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Reporting offset that places the event on the confirmation line
pub const AT_CONFIRMATION: i64 = -1;

/// One matcher as table data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatcherRow {
    /// Pattern searched in the candidate line
    pub pattern: String,
    /// Pattern that must appear after the candidate line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirm: Option<String>,
    /// Pattern that invalidates the match when seen before any confirmation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forbid: Option<String>,
    /// Lines between the candidate and the reported line, or -1 to report
    /// at the confirmation line
    #[serde(default)]
    pub offset: i64,
}

impl MatcherRow {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            confirm: None,
            forbid: None,
            offset: 0,
        }
    }

    pub fn confirm(mut self, pattern: impl Into<String>) -> Self {
        self.confirm = Some(pattern.into());
        self
    }

    pub fn forbid(mut self, pattern: impl Into<String>) -> Self {
        self.forbid = Some(pattern.into());
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    /// Report the event on the confirmation line
    pub fn at_confirmation(self) -> Self {
        self.offset(AT_CONFIRMATION)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Report {
    /// Event lands `lag` lines after the primary line
    Primary { lag: usize },
    /// Event lands on the first confirmation line
    Confirmation,
}

enum Verdict {
    Accept,
    Reject,
    Skip,
}

/// Compiled matcher
#[derive(Debug, Clone)]
pub struct Matcher {
    pattern: Regex,
    confirm: Option<Regex>,
    forbid: Option<Regex>,
    report: Report,
}

impl Matcher {
    /// Compile a table row; `event` names the row in error messages
    pub fn compile(event: &str, row: &MatcherRow) -> Result<Self, MatcherError> {
        let regex = |pattern: &str| {
            Regex::new(pattern).map_err(|source| MatcherError::InvalidPattern {
                event: event.to_string(),
                pattern: pattern.to_string(),
                source,
            })
        };

        let report = match row.offset {
            AT_CONFIRMATION if row.confirm.is_some() => Report::Confirmation,
            offset if offset >= 0 => Report::Primary {
                lag: offset as usize,
            },
            offset => {
                return Err(MatcherError::InvalidOffset {
                    event: event.to_string(),
                    offset,
                })
            }
        };

        Ok(Self {
            pattern: regex(&row.pattern)?,
            confirm: row.confirm.as_deref().map(regex).transpose()?,
            forbid: row.forbid.as_deref().map(regex).transpose()?,
            report,
        })
    }

    fn applies_at(&self, back: usize) -> bool {
        match self.report {
            Report::Primary { lag } => lag == back,
            Report::Confirmation => back > 0,
        }
    }

    /// Furthest look-behind this matcher needs
    fn reach(&self, window: usize) -> usize {
        match self.report {
            Report::Primary { lag } => lag + 1,
            Report::Confirmation => window,
        }
    }

    fn verify(&self, lines: &[&str], source: usize, index: usize, window: usize) -> Verdict {
        if self.confirm.is_none() && self.forbid.is_none() {
            return Verdict::Accept;
        }

        let last = match self.report {
            Report::Confirmation => index,
            Report::Primary { .. } => (source + window).min(lines.len() - 1),
        };
        for (j, text) in lines.iter().enumerate().take(last + 1).skip(source + 1) {
            if self.forbid.as_ref().is_some_and(|re| re.is_match(text)) {
                return Verdict::Reject;
            }
            if self.confirm.as_ref().is_some_and(|re| re.is_match(text)) {
                return match self.report {
                    Report::Confirmation if j != index => Verdict::Skip,
                    _ => Verdict::Accept,
                };
            }
        }

        if self.confirm.is_none() {
            Verdict::Accept
        } else {
            Verdict::Skip
        }
    }
}

/// Text after a marker, up to any trailing `;` comment
fn argument_text(rest: &str) -> &str {
    rest.split(';').next().unwrap_or(rest).trim_end()
}

/// Event detected at a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordMatch<'t> {
    /// Line the event applies to
    pub line: usize,
    /// Line holding the primary pattern
    pub source: usize,
    /// Text of the source line after the primary pattern, without any
    /// trailing comment
    pub argument: &'t str,
}

/// Ordered matchers for one event
#[derive(Debug, Clone, Default)]
pub struct MatcherSet {
    matchers: Vec<Matcher>,
}

impl MatcherSet {
    pub fn compile(event: &str, rows: &[MatcherRow]) -> Result<Self, MatcherError> {
        let matchers = rows
            .iter()
            .map(|row| Matcher::compile(event, row))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { matchers })
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// Find the event at `lines[index]`, looking `window` lines around it
    pub fn find<'t>(&self, lines: &[&'t str], index: usize, window: usize) -> Option<KeywordMatch<'t>> {
        if index >= lines.len() {
            return None;
        }

        let reach = self
            .matchers
            .iter()
            .map(|m| m.reach(window))
            .max()
            .unwrap_or(0)
            .min(window);

        for back in 0..reach {
            let Some(source) = index.checked_sub(back) else {
                break;
            };
            let text = lines[source];
            for matcher in &self.matchers {
                if !matcher.applies_at(back) {
                    continue;
                }
                let Some(hit) = matcher.pattern.find(text) else {
                    continue;
                };
                match matcher.verify(lines, source, index, window) {
                    Verdict::Accept => {
                        return Some(KeywordMatch {
                            line: index,
                            source,
                            argument: argument_text(&text[hit.end()..]),
                        })
                    }
                    Verdict::Reject => return None,
                    Verdict::Skip => {}
                }
            }
        }
        None
    }

    pub fn is_match(&self, lines: &[&str], index: usize, window: usize) -> bool {
        self.find(lines, index, window).is_some()
    }
}
