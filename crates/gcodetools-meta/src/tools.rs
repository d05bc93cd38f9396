//! Sequence tools built on filled metadata
//!
//! Every tool returns a new [`Gcode`]; inputs are never modified.

use crate::dialects::{Dialect, Event};
use gcodetools_core::{Config, Vector};
use gcodetools_parser::{Block, Gcode, MoveType};
use std::collections::BTreeMap;

/// Lines searched for the slicer signature
const SIGNATURE_LINES: usize = 20;
/// Longest settings block accepted; longer spans are false positives
const MAX_CONFIG_LINES: usize = 1000;
/// Canonical layer marker
pub const LAYER_TAG: &str = ";LAYER_CHANGE";

/// Slicer name and version from the file signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlicerInfo {
    pub name: String,
    pub version: String,
}

/// Detect the slicer from the first lines of the program
pub fn slicer_info(gcode: &Gcode) -> Option<SlicerInfo> {
    gcode
        .iter()
        .take(SIGNATURE_LINES)
        .find_map(|block| parse_signature(block.command()))
}

fn parse_signature(line: &str) -> Option<SlicerInfo> {
    let lower = line.to_lowercase();
    if let Some(at) = lower.find("bambustudio") {
        let version = line.get(at + "bambustudio".len()..)?.trim();
        return Some(SlicerInfo {
            name: "BambuStudio".to_string(),
            version: version.to_string(),
        });
    }
    if !lower.contains("generated") {
        return None;
    }

    let tail = line.rsplit("by").next()?.rsplit("with").next()?;
    let tail = tail.replace("Version", "").replace("(R)", "");
    let mut words = tail.split_whitespace();
    Some(SlicerInfo {
        name: words.next()?.to_string(),
        version: words.next()?.to_string(),
    })
}

/// Settings embedded by the slicer, as key/value pairs
///
/// Entries are `; key = value` or `; key, value` lines between the config
/// block bounds. Returns `None` when no settings block is found.
pub fn read_config(gcode: &Gcode, config: &Config) -> Option<BTreeMap<String, String>> {
    read_config_with(gcode, config, Dialect::builtin())
}

pub fn read_config_with(
    gcode: &Gcode,
    config: &Config,
    dialect: &Dialect,
) -> Option<BTreeMap<String, String>> {
    let lines: Vec<&str> = gcode.iter().map(Block::command).collect();
    let window = config.keyword_window;

    let start = dialect.first_match(Event::ConfigStart, &lines, 0..lines.len(), window)?;
    let end = dialect
        .first_match(Event::ConfigEnd, &lines, start + 1..lines.len(), window)
        .unwrap_or(lines.len());
    if end - start > MAX_CONFIG_LINES {
        tracing::debug!("Ignoring settings block spanning {} lines", end - start);
        return None;
    }

    let settings: BTreeMap<String, String> = lines[start + 1..end]
        .iter()
        .filter_map(|line| parse_setting(line))
        .collect();
    tracing::debug!("Read {} settings (lines {}..{})", settings.len(), start, end);
    Some(settings)
}

fn parse_setting(line: &str) -> Option<(String, String)> {
    let body = line.strip_prefix(';').unwrap_or(line);
    let (key, value) = body.split_once('=').or_else(|| body.split_once(','))?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), value.trim().to_string()))
}

/// Sequence divided by print phase and by object
#[derive(Debug, Clone, Default)]
pub struct Split {
    /// Blocks tagged as print start
    pub start: Gcode,
    /// Everything between print start and print end
    pub body: Gcode,
    /// Blocks tagged as print end
    pub end: Gcode,
    /// One sequence per registered object, by registry index
    pub objects: Vec<Gcode>,
    /// Blocks outside any object
    pub unassigned: Gcode,
}

/// Divide a sequence into start, body and end, and into per-object parts
pub fn split(gcode: &Gcode) -> Split {
    let mut parts = Split {
        start: gcode.empty_like(),
        body: gcode.empty_like(),
        end: gcode.empty_like(),
        objects: gcode.objects().iter().map(|_| gcode.empty_like()).collect(),
        unassigned: gcode.empty_like(),
    };

    for block in gcode {
        let meta = block.meta();
        match meta.move_type {
            Some(MoveType::PrintStart) => parts.start.push(block.clone()),
            Some(MoveType::PrintEnd) => parts.end.push(block.clone()),
            _ => parts.body.push(block.clone()),
        }
        match meta.object.and_then(|i| parts.objects.get_mut(i)) {
            Some(part) => part.push(block.clone()),
            None => parts.unassigned.push(block.clone()),
        }
    }
    parts
}

/// Keep only the blocks that move an axis or extrude, with raw commands removed
///
/// Commands the library does not model are dropped, so the result may lack
/// lines the printer needs.
pub fn trim(gcode: &Gcode) -> Gcode {
    let mut trimmed = gcode.empty_like();
    let mut last: Option<Vector> = None;
    for block in gcode {
        let position = block.position();
        let extrudes = position.e.is_some_and(|e| e != 0.0);
        if extrudes || last.map(|p| p.xyz()) != Some(position.xyz()) {
            trimmed.push(block.without_command());
        }
        last = Some(position);
    }
    trimmed
}

/// Copy with a `;LAYER_CHANGE` comment wherever the layer number changes
pub fn add_layer_tags(gcode: &Gcode) -> Gcode {
    insert_tags(gcode, |prev, block| {
        let layer = block.meta().layer;
        let prev_layer = prev.map_or(0, |p| p.meta().layer);
        (layer != prev_layer).then(|| LAYER_TAG.to_string())
    })
}

/// Copy with a canonical `;TYPE:` comment wherever the feature type changes
pub fn add_move_type_tags(gcode: &Gcode) -> Gcode {
    insert_tags(gcode, |prev, block| {
        let move_type = block.meta().move_type;
        let prev_type = prev.and_then(|p| p.meta().move_type);
        (move_type != prev_type).then(|| move_type.unwrap_or(MoveType::Custom).tag())
    })
}

fn insert_tags(gcode: &Gcode, tag_for: impl Fn(Option<&Block>, &Block) -> Option<String>) -> Gcode {
    let mut tagged = gcode.empty_like();
    for (prev, block) in gcode.pairs() {
        if let Some(tag) = tag_for(prev, block) {
            if block.command() != tag {
                let comment = match prev {
                    Some(prev) => Block::comment_after(prev, tag),
                    None => Block::comment_before(block, tag),
                };
                tagged.push(comment.with_meta(*block.meta()));
            }
        }
        tagged.push(block.clone());
    }
    tagged
}
