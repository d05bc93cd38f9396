//! Slicer dialect tables
//!
//! Each [`Event`] owns an ordered list of [`MatcherRow`]s. Tables are plain
//! data and can be loaded from TOML or JSON, so a new slicer is supported by
//! adding rows:
//!
//! ```toml
//! [[object_start]]
//! pattern = "^; printing object"
//! forbid = "^EXCLUDE_OBJECT_START NAME="
//!
//! [[layer_change]]
//! pattern = "^;LAYER:"
//! confirm = "^;TYPE:"
//! ```

use crate::error::MatcherError;
use crate::keywords::{KeywordMatch, MatcherRow, MatcherSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

/// Semantic event detected in slicer comments
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    ConfigStart,
    ConfigEnd,
    HeaderStart,
    HeaderEnd,
    ExecutableStart,
    ExecutableEnd,
    LayerChange,
    FeatureChange,
    PrintStart,
    PrintEnd,
    ObjectStart,
    ObjectEnd,
}

impl Event {
    pub const ALL: [Event; 12] = [
        Event::ConfigStart,
        Event::ConfigEnd,
        Event::HeaderStart,
        Event::HeaderEnd,
        Event::ExecutableStart,
        Event::ExecutableEnd,
        Event::LayerChange,
        Event::FeatureChange,
        Event::PrintStart,
        Event::PrintEnd,
        Event::ObjectStart,
        Event::ObjectEnd,
    ];

    /// Table key of the event
    pub fn key(self) -> &'static str {
        match self {
            Event::ConfigStart => "config_start",
            Event::ConfigEnd => "config_end",
            Event::HeaderStart => "header_start",
            Event::HeaderEnd => "header_end",
            Event::ExecutableStart => "executable_start",
            Event::ExecutableEnd => "executable_end",
            Event::LayerChange => "layer_change",
            Event::FeatureChange => "feature_change",
            Event::PrintStart => "print_start",
            Event::PrintEnd => "print_end",
            Event::ObjectStart => "object_start",
            Event::ObjectEnd => "object_end",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Matcher rows per event, as data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DialectTable {
    rows: BTreeMap<Event, Vec<MatcherRow>>,
}

impl DialectTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows for PrusaSlicer, SuperSlicer, OrcaSlicer, BambuStudio, Cura,
    /// Simplify3D and Klipper exclude-object output
    pub fn builtin() -> Self {
        let mut table = Self::new();

        table.extend_rows(
            Event::ConfigStart,
            [
                MatcherRow::new("^; CONFIG_BLOCK_START"),
                MatcherRow::new("_config = begin"),
                MatcherRow::new("^; Settings Summary"),
                MatcherRow::new("^; total filament cost =").forbid("_config = begin"),
            ],
        );
        table.extend_rows(
            Event::ConfigEnd,
            [
                MatcherRow::new("^; CONFIG_BLOCK_END"),
                MatcherRow::new("_config = end"),
                MatcherRow::new("^G"),
                MatcherRow::new("^M"),
            ],
        );

        table.push_row(Event::HeaderStart, MatcherRow::new("^; HEADER_BLOCK_START"));
        table.push_row(Event::HeaderEnd, MatcherRow::new("^; HEADER_BLOCK_END"));

        table.extend_rows(
            Event::ExecutableStart,
            [
                MatcherRow::new("^; EXECUTABLE_BLOCK_START"),
                MatcherRow::new("^;TYPE:"),
                MatcherRow::new("^;Generated with Cura_SteamEngine"),
            ],
        );
        table.push_row(Event::ExecutableEnd, MatcherRow::new("^; EXECUTABLE_BLOCK_END"));

        table.extend_rows(
            Event::LayerChange,
            [
                MatcherRow::new("^;LAYER_CHANGE"),
                MatcherRow::new("^;LAYER:").confirm("^;TYPE:"),
                MatcherRow::new("^; CHANGE_LAYER"),
                MatcherRow::new(r"^; layer \d+,"),
            ],
        );
        table.extend_rows(
            Event::FeatureChange,
            [
                MatcherRow::new("^;TYPE:"),
                MatcherRow::new("^; FEATURE: ?"),
                MatcherRow::new("^; feature "),
            ],
        );

        table.extend_rows(
            Event::PrintStart,
            [
                MatcherRow::new("^;TYPE:"),
                MatcherRow::new("^; FEATURE:"),
                MatcherRow::new("^;Generated with Cura_SteamEngine"),
            ],
        );
        table.extend_rows(
            Event::PrintEnd,
            [
                MatcherRow::new("^EXCLUDE_OBJECT_END").confirm("^; EXECUTABLE_BLOCK_END"),
                MatcherRow::new("^;TIME_ELAPSED:")
                    .confirm("^;End of Gcode")
                    .forbid("^;TIME_ELAPSED:"),
                MatcherRow::new("^;TYPE:Custom").confirm("^; filament used"),
            ],
        );

        table.extend_rows(
            Event::ObjectStart,
            [
                MatcherRow::new("^; printing object ?").forbid("^EXCLUDE_OBJECT_START NAME="),
                MatcherRow::new("^EXCLUDE_OBJECT_START NAME=")
                    .confirm("^;WIDTH:")
                    .at_confirmation(),
                MatcherRow::new("^EXCLUDE_OBJECT_START NAME=")
                    .confirm("^G1.*E")
                    .at_confirmation(),
                MatcherRow::new("^;MESH:"),
                MatcherRow::new("^M486 S"),
                MatcherRow::new("^M624 "),
            ],
        );
        table.extend_rows(
            Event::ObjectEnd,
            [
                MatcherRow::new("^; stop printing object").forbid("^EXCLUDE_OBJECT_END"),
                MatcherRow::new("^EXCLUDE_OBJECT_END"),
                MatcherRow::new("^;MESH:NONMESH"),
                MatcherRow::new("^M486 S-1"),
                MatcherRow::new("^M625"),
            ],
        );

        table
    }

    pub fn from_toml_str(text: &str) -> Result<Self, MatcherError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self, MatcherError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Rows of one event, in matching order
    pub fn rows(&self, event: Event) -> &[MatcherRow] {
        self.rows.get(&event).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Append a row after the existing rows of `event`
    pub fn push_row(&mut self, event: Event, row: MatcherRow) {
        self.rows.entry(event).or_default().push(row);
    }

    pub fn extend_rows(&mut self, event: Event, rows: impl IntoIterator<Item = MatcherRow>) {
        self.rows.entry(event).or_default().extend(rows);
    }

    /// Append every row of `other`, keeping this table's rows first
    pub fn merge(&mut self, other: &DialectTable) {
        for (event, rows) in &other.rows {
            self.extend_rows(*event, rows.iter().cloned());
        }
    }

    /// Compile every row
    pub fn compile(&self) -> Result<Dialect, MatcherError> {
        let mut sets = BTreeMap::new();
        for (event, rows) in &self.rows {
            sets.insert(*event, MatcherSet::compile(event.key(), rows)?);
        }
        Ok(Dialect { sets })
    }
}

/// Compiled dialect table
#[derive(Debug, Clone, Default)]
pub struct Dialect {
    sets: BTreeMap<Event, MatcherSet>,
}

impl Dialect {
    /// The compiled built-in table, shared process-wide
    pub fn builtin() -> &'static Dialect {
        static BUILTIN: OnceLock<Dialect> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            DialectTable::builtin()
                .compile()
                .expect("invalid built-in dialect pattern")
        })
    }

    pub fn matchers(&self, event: Event) -> Option<&MatcherSet> {
        self.sets.get(&event)
    }

    /// Find `event` at `lines[index]`
    pub fn find<'t>(
        &self,
        event: Event,
        lines: &[&'t str],
        index: usize,
        window: usize,
    ) -> Option<KeywordMatch<'t>> {
        self.sets.get(&event)?.find(lines, index, window)
    }

    pub fn is_match(&self, event: Event, lines: &[&str], index: usize, window: usize) -> bool {
        self.find(event, lines, index, window).is_some()
    }

    /// First line in `range` where `event` is found
    pub fn first_match(
        &self,
        event: Event,
        lines: &[&str],
        mut range: std::ops::Range<usize>,
        window: usize,
    ) -> Option<usize> {
        range.find(|&i| self.is_match(event, lines, i, window))
    }
}
