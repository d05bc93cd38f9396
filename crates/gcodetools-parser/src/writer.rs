//! G-code writer
//!
//! Serializes a [`Gcode`] by diffing each block against the previous one
//! and writing only what changed. Output always uses absolute XYZ with
//! relative extrusion, announced in a leading state dump.

use crate::block::{Block, BlockData, MoveType};
use crate::gcode::Gcode;
use crate::mnemonic::Mnemonic;
use gcodetools_core::{ArcPlane, Axis, Config, Vector};
use serde::Serialize;
use std::io::{self, Write};

/// Format a number with at most `precision` decimals, trailing zeros trimmed
pub fn format_number(value: f64, precision: usize) -> String {
    let text = format!("{:.*}", precision, value);
    let text = if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text.as_str()
    };
    match text {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}

/// Start of the comment written by verbose mode
const META_COMMENT: &str = "; {\"object\":";

/// Drop a verbose metadata comment left by an earlier write
fn strip_meta_comment(command: &str) -> &str {
    match command.find(META_COMMENT) {
        Some(at) => command[..at].trim_end(),
        None => command,
    }
}

/// What the output stream has declared so far
struct Emitted {
    position: Vector,
    data: BlockData,
    plane: ArcPlane,
}

#[derive(Serialize)]
struct VerboseMeta<'a> {
    object: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    object_name: Option<&'a str>,
    move_type: Option<MoveType>,
    layer: u32,
}

/// Minimal-diff G-code writer
pub struct Writer<'a> {
    config: &'a Config,
    verbose: bool,
}

impl<'a> Writer<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            verbose: false,
        }
    }

    /// Append a metadata comment to every written block
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn write_str(&self, gcode: &Gcode) -> String {
        self.write_str_with_progress(gcode, |_, _| {})
    }

    /// Serialize, reporting `(current_block, total_blocks)`
    pub fn write_str_with_progress(&self, gcode: &Gcode, mut progress: impl FnMut(usize, usize)) -> String {
        let mut out = String::new();
        let mut state = self.initial_state();
        out.push_str(&self.state_dump());
        let total = gcode.len();
        for (index, block) in gcode.iter().enumerate() {
            self.write_block(&mut state, block, gcode, &mut out);
            progress(index + 1, total);
        }
        out
    }

    /// Stream the serialized program into `writer`
    pub fn write_to<W: Write>(&self, gcode: &Gcode, writer: &mut W) -> io::Result<()> {
        let mut state = self.initial_state();
        writer.write_all(self.state_dump().as_bytes())?;
        let mut line = String::new();
        for block in gcode {
            line.clear();
            self.write_block(&mut state, block, gcode, &mut line);
            writer.write_all(line.as_bytes())?;
        }
        writer.flush()
    }

    fn initial_state(&self) -> Emitted {
        Emitted {
            position: Vector::from_values(0.0, 0.0, 0.0, 0.0, self.config.default_speed),
            data: BlockData::default(),
            plane: ArcPlane::XY,
        }
    }

    fn state_dump(&self) -> String {
        format!("G90\nM83\n{}\n", ArcPlane::XY.code())
    }

    fn fmt(&self, value: f64) -> String {
        format_number(value, self.config.precision)
    }

    fn changed(&self, old: Option<f64>, new: Option<f64>) -> Option<String> {
        let new = self.fmt(new?);
        match old {
            Some(old) if self.fmt(old) == new => None,
            _ => Some(new),
        }
    }

    fn write_block(&self, state: &mut Emitted, block: &Block, gcode: &Gcode, out: &mut String) {
        let mut lines: Vec<String> = Vec::new();

        if block.arc_plane() != state.plane {
            lines.push(block.arc_plane().code().to_string());
            state.plane = block.arc_plane();
        }

        let data = block.data();
        if let Some(temp) = data.e_temp {
            if data.e_wait {
                lines.push(format!("M109 S{}", self.fmt(temp)));
            } else if let Some(t) = self.changed(state.data.e_temp, Some(temp)) {
                lines.push(format!("M104 S{}", t));
            }
        }
        if let Some(temp) = data.bed_temp {
            if data.bed_wait {
                lines.push(format!("M190 S{}", self.fmt(temp)));
            } else if let Some(t) = self.changed(state.data.bed_temp, Some(temp)) {
                lines.push(format!("M140 S{}", t));
            }
        }
        if let Some(fan) = self.changed(state.data.fan, data.fan) {
            if fan == "0" {
                lines.push("M107".to_string());
            } else {
                lines.push(format!("M106 S{}", fan));
            }
        }
        if let Some(tool) = data.tool {
            if state.data.tool != Some(tool) {
                lines.push(format!("T{}", tool));
            }
        }
        state.data = *data;

        let position = block.position();
        let homed = block.mnemonic() == Mnemonic::Home && !block.command().is_empty();
        if !homed {
            if let Some(motion) = self.motion(&state.position, &position) {
                lines.push(motion);
            }
        }
        state.position = position;

        if block.emit_command() {
            let command = strip_meta_comment(block.command());
            if !command.is_empty() {
                lines.push(self.passthrough(command));
            }
        }

        // Blocks that write nothing get no comment
        if self.verbose {
            if let Some(last) = lines.last_mut() {
                last.push_str(" ; ");
                last.push_str(&self.meta_comment(block, gcode));
            }
        }

        for line in lines {
            out.push_str(&line);
            out.push('\n');
        }
    }

    fn motion(&self, prev: &Vector, next: &Vector) -> Option<String> {
        let mut words = Vec::new();
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            if let Some(v) = self.changed(prev.get(axis), next.get(axis)) {
                words.push(format!("{}{}", axis.letter(), v));
            }
        }
        let e = self.fmt(next.e.unwrap_or(0.0));
        if e != "0" {
            words.push(format!("E{}", e));
        }
        if let Some(v) = self.changed(prev.f, next.f) {
            words.push(format!("F{}", v));
        }

        if words.is_empty() {
            None
        } else {
            Some(format!("G1 {}", words.join(" ")))
        }
    }

    fn passthrough(&self, command: &str) -> String {
        let upper = command.trim_start().to_ascii_uppercase();
        let is_marker = upper.starts_with("EXCLUDE_OBJECT") || upper.starts_with("M486");
        if is_marker && !self.config.enable_exclude_object {
            format!("; {}", command)
        } else {
            command.to_string()
        }
    }

    fn meta_comment(&self, block: &Block, gcode: &Gcode) -> String {
        let meta = block.meta();
        let verbose = VerboseMeta {
            object: meta.object.map_or(-1, |i| i as i64),
            object_name: meta.object.and_then(|i| gcode.object_name(i)),
            move_type: meta.move_type,
            layer: meta.layer,
        };
        serde_json::to_string(&verbose).unwrap_or_default()
    }
}
