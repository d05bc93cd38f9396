//! G-code parser
//!
//! Turns text into a [`Gcode`] block sequence, one line at a time, while
//! driving the [`CoordSystem`] state machine. Arc moves are decomposed into
//! linear segments so every block holds a plain resolved position.

use crate::block::{Block, BlockData, BlockMeta};
use crate::gcode::Gcode;
use crate::mnemonic::{Mnemonic, Motion};
use crate::tokenizer::{ParamValue, Statement};
use gcodetools_core::{Arc, Axis, Config, CoordSystem, GcodeError, Modes, Vector};
use std::fmt;

/// Recoverable problem found on one line
///
/// The offending parameter is ignored and parsing continues.
#[derive(Debug, Clone, PartialEq)]
pub struct LineIssue {
    pub line_number: usize,
    pub param: String,
    pub value: String,
    pub line: String,
}

impl LineIssue {
    pub fn to_error(&self) -> GcodeError {
        GcodeError::InvalidParameter {
            line_number: self.line_number,
            param: self.param.clone(),
            value: self.value.clone(),
            line: self.line.clone(),
        }
    }
}

impl fmt::Display for LineIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_error())
    }
}

impl From<LineIssue> for GcodeError {
    fn from(issue: LineIssue) -> Self {
        issue.to_error()
    }
}

/// Line parser with modal state
pub struct Parser<'a> {
    config: &'a Config,
    coords: CoordSystem,
    data: BlockData,
    meta: BlockMeta,
    issues: Vec<LineIssue>,
}

impl<'a> Parser<'a> {
    /// Parser at program start
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            coords: CoordSystem::new(config),
            data: BlockData::default(),
            meta: BlockMeta::default(),
            issues: Vec::new(),
        }
    }

    /// Parser continuing from an existing block's state
    ///
    /// New blocks inherit the block's data and metadata.
    pub fn resume(config: &'a Config, prev: &Block) -> Self {
        Self {
            config,
            coords: CoordSystem::restore(prev.modes(), prev.position()),
            data: prev.data().cleared_wait(),
            meta: *prev.meta(),
            issues: Vec::new(),
        }
    }

    /// Parser continuing from an explicit modal snapshot
    pub fn with_state(config: &'a Config, modes: Modes, position: Vector, data: BlockData) -> Self {
        Self {
            config,
            coords: CoordSystem::restore(modes, position),
            data: data.cleared_wait(),
            meta: BlockMeta::default(),
            issues: Vec::new(),
        }
    }

    pub fn coords(&self) -> &CoordSystem {
        &self.coords
    }

    /// Problems recorded so far
    pub fn issues(&self) -> &[LineIssue] {
        &self.issues
    }

    pub fn take_issues(&mut self) -> Vec<LineIssue> {
        std::mem::take(&mut self.issues)
    }

    /// Parse a whole program
    pub fn parse_str(&mut self, text: &str) -> Result<Gcode, GcodeError> {
        self.parse_str_with_progress(text, |_, _| {})
    }

    /// Parse a whole program, reporting `(current_line, total_lines)`
    pub fn parse_str_with_progress(
        &mut self,
        text: &str,
        mut progress: impl FnMut(usize, usize),
    ) -> Result<Gcode, GcodeError> {
        let total = text.lines().count();
        let mut gcode = Gcode::new();

        for (index, line) in text.lines().enumerate() {
            for block in self.parse_line(line, index + 1)? {
                gcode.push(block);
            }
            progress(index + 1, total);
        }

        tracing::debug!(
            "Parsed {} lines into {} blocks ({} issues)",
            total,
            gcode.len(),
            self.issues.len()
        );
        Ok(gcode)
    }

    /// Parse one line into zero or more blocks
    ///
    /// Blank lines yield nothing; arc moves yield one block per segment.
    pub fn parse_line(&mut self, line: &str, line_number: usize) -> Result<Vec<Block>, GcodeError> {
        let raw = line.trim();
        if raw.is_empty() {
            return Ok(Vec::new());
        }

        self.data = self.data.cleared_wait();

        let stmt = Statement::parse(raw);
        let mnemonic = Mnemonic::from_code(&stmt.code);
        tracing::trace!("line {}: {:?} {:?}", line_number, mnemonic, stmt.params);

        let mut emit_command = false;
        match mnemonic {
            Mnemonic::Move(motion) => {
                return self.parse_move(motion, &stmt, raw, line_number);
            }
            Mnemonic::AbsoluteCoords => self.coords.set_abs_xyz(true),
            Mnemonic::RelativeCoords => self.coords.set_abs_xyz(false),
            Mnemonic::AbsoluteExtruder => self.coords.set_abs_e(true),
            Mnemonic::RelativeExtruder => self.coords.set_abs_e(false),
            Mnemonic::SetPosition => {
                let values = self.axis_words(&stmt, &[Axis::X, Axis::Y, Axis::Z, Axis::E], raw, line_number);
                self.coords.set_offset(&values);
            }
            Mnemonic::ArcPlane(plane) => self.coords.set_arc_plane(plane),
            Mnemonic::FanSpeed => {
                self.data.fan = match stmt.params.get("S") {
                    None => Some(255.0),
                    Some(v) => self.number("S", v, raw, line_number).or(self.data.fan),
                };
            }
            Mnemonic::FanOff => self.data.fan = Some(0.0),
            // Without a usable S target (e.g. `M109 R200`) the line is kept verbatim
            Mnemonic::ExtruderTemp { wait } => match self.target(&stmt, raw, line_number) {
                Some(temp) => {
                    self.data.e_temp = Some(temp);
                    self.data.e_wait = wait;
                }
                None => emit_command = true,
            },
            Mnemonic::BedTemp { wait } => match self.target(&stmt, raw, line_number) {
                Some(temp) => {
                    self.data.bed_temp = Some(temp);
                    self.data.bed_wait = wait;
                }
                None => emit_command = true,
            },
            Mnemonic::ToolChange(tool) => self.data.tool = Some(tool),
            Mnemonic::Home => {
                let axes: Vec<Axis> = Axis::XYZ
                    .into_iter()
                    .filter(|a| stmt.params.contains(&a.letter().to_string()))
                    .collect();
                self.coords.home(&axes);
                emit_command = true;
            }
            Mnemonic::Passthrough => emit_command = true,
        }

        Ok(vec![self.block(raw, emit_command, mnemonic, self.coords.position())])
    }

    fn parse_move(
        &mut self,
        motion: Motion,
        stmt: &Statement,
        raw: &str,
        line_number: usize,
    ) -> Result<Vec<Block>, GcodeError> {
        let mnemonic = Mnemonic::Move(motion);
        let Some(direction) = motion.arc_direction() else {
            let words = self.axis_words(stmt, &Axis::ALL, raw, line_number);
            let position = self.coords.apply_move(&words);
            return Ok(vec![self.block(raw, false, mnemonic, position)]);
        };

        if stmt.params.contains("R") {
            return Err(GcodeError::UnsupportedArc {
                line_number,
                line: raw.to_string(),
            });
        }

        let plane = self.coords.arc_plane();
        let (a, b, _) = plane.axes();
        let center = self.center_words(stmt, raw, line_number);
        if center.get(a).is_none() && center.get(b).is_none() {
            return Err(GcodeError::MissingArcCenter {
                line_number,
                line: raw.to_string(),
            });
        }

        let start = self.coords.position();
        let words = self.axis_words(stmt, &Axis::ALL, raw, line_number);
        let end = self.coords.apply_move(&words);
        let segments = Arc::new(start, direction, center, plane).subdivide(&end, self.config.step);

        let last = segments.len().saturating_sub(1);
        Ok(segments
            .into_iter()
            .enumerate()
            .map(|(i, segment)| {
                let command = if i == last { raw } else { "" };
                self.block(command, false, mnemonic, segment)
            })
            .collect())
    }

    fn block(&self, command: &str, emit_command: bool, mnemonic: Mnemonic, position: Vector) -> Block {
        Block::new(command, emit_command, mnemonic, position, self.data, self.coords.modes()).with_meta(self.meta)
    }

    /// Read the numeric axis words listed in `axes`
    fn axis_words(&mut self, stmt: &Statement, axes: &[Axis], raw: &str, line_number: usize) -> Vector {
        let mut words = Vector::new();
        for &axis in axes {
            let key = axis.letter().to_string();
            if let Some(value) = stmt.params.get(&key) {
                words.set(axis, self.number(&key, value, raw, line_number));
            }
        }
        words
    }

    /// Read I/J/K into the x/y/z slots
    fn center_words(&mut self, stmt: &Statement, raw: &str, line_number: usize) -> Vector {
        let mut center = Vector::new();
        for (key, axis) in [("I", Axis::X), ("J", Axis::Y), ("K", Axis::Z)] {
            if let Some(value) = stmt.params.get(key) {
                center.set(axis, self.number(key, value, raw, line_number));
            }
        }
        center
    }

    /// Temperature target from the S word
    fn target(&mut self, stmt: &Statement, raw: &str, line_number: usize) -> Option<f64> {
        let value = stmt.params.get("S")?;
        self.number("S", value, raw, line_number)
    }

    fn number(&mut self, key: &str, value: &ParamValue, raw: &str, line_number: usize) -> Option<f64> {
        let number = value.as_f64();
        if number.is_none() {
            let issue = LineIssue {
                line_number,
                param: key.to_string(),
                value: value.to_string(),
                line: raw.to_string(),
            };
            tracing::warn!("{}", issue);
            self.issues.push(issue);
        }
        number
    }
}
