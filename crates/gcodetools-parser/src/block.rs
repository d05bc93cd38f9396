//! Block model
//!
//! A [`Block`] is one resolved program step: the raw line it came from, the
//! machine position after it, the printer data in effect (temperatures, fan,
//! tool) and inferred metadata (object, feature type, layer).
//!
//! Blocks are value objects. Only the metadata may change after creation,
//! through [`crate::Gcode::annotate`].

use crate::mnemonic::Mnemonic;
use gcodetools_core::{ArcPlane, Axis, Modes, Vector};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Slicer feature category of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveType {
    /// Everything before the first printed feature
    PrintStart,
    /// Everything after the last printed feature
    PrintEnd,
    Skirt,
    ExternalPerimeter,
    InternalPerimeter,
    OverhangPerimeter,
    SolidInfill,
    TopSolidInfill,
    SparseInfill,
    Bridge,
    Support,
    Custom,
}

impl MoveType {
    /// Human-readable feature name as written in `;TYPE:` tags
    pub fn name(self) -> &'static str {
        match self {
            MoveType::InternalPerimeter => "Perimeter",
            MoveType::ExternalPerimeter => "External perimeter",
            MoveType::Skirt => "Skirt/Brim",
            MoveType::SolidInfill => "Solid infill",
            MoveType::SparseInfill => "Internal infill",
            MoveType::Bridge => "Bridge infill",
            MoveType::TopSolidInfill => "Top solid infill",
            MoveType::OverhangPerimeter => "Overhang perimeter",
            MoveType::Support => "Support material",
            MoveType::PrintStart | MoveType::PrintEnd | MoveType::Custom => "Custom",
        }
    }

    /// Canonical feature tag comment
    pub fn tag(self) -> String {
        format!(";TYPE:{}", self.name())
    }
}

impl fmt::Display for MoveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Printer state carried by a block
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockData {
    /// Extruder target temperature
    pub e_temp: Option<f64>,
    /// Set on the block of an M109 line only
    pub e_wait: bool,
    /// Bed target temperature
    pub bed_temp: Option<f64>,
    /// Set on the block of an M190 line only
    pub bed_wait: bool,
    /// Fan speed, 0 to 255
    pub fan: Option<f64>,
    /// Active tool
    pub tool: Option<u32>,
}

impl BlockData {
    /// Copy without the one-line wait flags
    pub fn cleared_wait(&self) -> Self {
        Self {
            e_wait: false,
            bed_wait: false,
            ..*self
        }
    }
}

/// Inferred metadata of a block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockMeta {
    /// Index into the owning sequence's object registry
    pub object: Option<usize>,
    pub move_type: Option<MoveType>,
    pub layer: u32,
}

/// One resolved program step
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    command: String,
    emit_command: bool,
    mnemonic: Mnemonic,
    position: Vector,
    data: BlockData,
    modes: Modes,
    meta: BlockMeta,
}

impl Block {
    pub fn new(
        command: impl Into<String>,
        emit_command: bool,
        mnemonic: Mnemonic,
        position: Vector,
        data: BlockData,
        modes: Modes,
    ) -> Self {
        Self {
            command: command.into(),
            emit_command,
            mnemonic,
            position,
            data,
            modes,
            meta: BlockMeta::default(),
        }
    }

    /// Pass-through comment placed after `prev`, sharing its state
    pub fn comment_after(prev: &Block, text: impl Into<String>) -> Self {
        Self {
            command: text.into(),
            emit_command: true,
            mnemonic: Mnemonic::Passthrough,
            position: prev.position.with(Axis::E, 0.0),
            data: prev.data.cleared_wait(),
            modes: prev.modes,
            meta: prev.meta,
        }
    }

    /// Pass-through comment placed before `next`, at `next`'s position
    pub fn comment_before(next: &Block, text: impl Into<String>) -> Self {
        Self {
            command: text.into(),
            emit_command: true,
            mnemonic: Mnemonic::Passthrough,
            position: next.position.with(Axis::E, 0.0),
            data: next.data.cleared_wait(),
            modes: next.modes,
            meta: next.meta,
        }
    }

    /// Raw source line (empty for synthesized arc segments)
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Whether the raw line is written verbatim
    pub fn emit_command(&self) -> bool {
        self.emit_command
    }

    pub fn mnemonic(&self) -> Mnemonic {
        self.mnemonic
    }

    /// Resolved position; `e` is this block's extrusion delta
    pub fn position(&self) -> Vector {
        self.position
    }

    /// Motion that moves without extruding
    pub fn is_travel(&self) -> bool {
        self.mnemonic.is_motion() && self.position.e.map_or(true, |e| e == 0.0)
    }

    /// Flowrate of the move from `prev` to this block
    pub fn flowrate(&self, prev: &Block) -> Option<f64> {
        let displacement = prev.position.distance(&self.position);
        displacement.with(Axis::E, self.position.e?).flowrate()
    }

    pub fn data(&self) -> &BlockData {
        &self.data
    }

    /// Modal state after this block
    pub fn modes(&self) -> Modes {
        self.modes
    }

    pub fn arc_plane(&self) -> ArcPlane {
        self.modes.arc_plane
    }

    pub fn meta(&self) -> &BlockMeta {
        &self.meta
    }

    pub fn with_meta(mut self, meta: BlockMeta) -> Self {
        self.meta = meta;
        self
    }

    /// Copy with the raw command removed
    pub fn without_command(&self) -> Self {
        Self {
            command: String::new(),
            emit_command: false,
            ..self.clone()
        }
    }

    pub(crate) fn set_meta(&mut self, meta: BlockMeta) {
        self.meta = meta;
    }
}
