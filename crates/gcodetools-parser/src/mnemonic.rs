//! Mnemonic classification
//!
//! Every recognised command maps to one [`Mnemonic`] variant; everything
//! else is [`Mnemonic::Passthrough`] and is written back verbatim.

use gcodetools_core::{ArcDirection, ArcPlane};
use serde::{Deserialize, Serialize};

/// Motion command kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Motion {
    /// G0
    Rapid,
    /// G1
    Linear,
    /// G2
    ArcCw,
    /// G3
    ArcCcw,
}

impl Motion {
    pub fn arc_direction(self) -> Option<ArcDirection> {
        match self {
            Motion::ArcCw => Some(ArcDirection::Clockwise),
            Motion::ArcCcw => Some(ArcDirection::CounterClockwise),
            Motion::Rapid | Motion::Linear => None,
        }
    }
}

/// Command category of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mnemonic {
    /// G0 / G1 / G2 / G3
    Move(Motion),
    /// G90
    AbsoluteCoords,
    /// G91
    RelativeCoords,
    /// M82
    AbsoluteExtruder,
    /// M83
    RelativeExtruder,
    /// G92
    SetPosition,
    /// G17 / G18 / G19
    ArcPlane(ArcPlane),
    /// M106
    FanSpeed,
    /// M107
    FanOff,
    /// M104, or M109 when `wait`
    ExtruderTemp { wait: bool },
    /// M140, or M190 when `wait`
    BedTemp { wait: bool },
    /// T<n>
    ToolChange(u32),
    /// G28
    Home,
    /// Anything else, including comment-only lines
    Passthrough,
}

impl Mnemonic {
    /// Classify a normalised mnemonic (`G1`, `M104`, `T0`...)
    pub fn from_code(code: &str) -> Self {
        match code {
            "G0" => Mnemonic::Move(Motion::Rapid),
            "G1" => Mnemonic::Move(Motion::Linear),
            "G2" => Mnemonic::Move(Motion::ArcCw),
            "G3" => Mnemonic::Move(Motion::ArcCcw),
            "G90" => Mnemonic::AbsoluteCoords,
            "G91" => Mnemonic::RelativeCoords,
            "M82" => Mnemonic::AbsoluteExtruder,
            "M83" => Mnemonic::RelativeExtruder,
            "G92" => Mnemonic::SetPosition,
            "G17" => Mnemonic::ArcPlane(ArcPlane::XY),
            "G18" => Mnemonic::ArcPlane(ArcPlane::XZ),
            "G19" => Mnemonic::ArcPlane(ArcPlane::YZ),
            "M106" => Mnemonic::FanSpeed,
            "M107" => Mnemonic::FanOff,
            "M104" => Mnemonic::ExtruderTemp { wait: false },
            "M109" => Mnemonic::ExtruderTemp { wait: true },
            "M140" => Mnemonic::BedTemp { wait: false },
            "M190" => Mnemonic::BedTemp { wait: true },
            "G28" => Mnemonic::Home,
            _ => code
                .strip_prefix('T')
                .filter(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
                .and_then(|n| n.parse().ok())
                .map_or(Mnemonic::Passthrough, Mnemonic::ToolChange),
        }
    }

    pub fn is_motion(&self) -> bool {
        matches!(self, Mnemonic::Move(_))
    }

    pub fn is_passthrough(&self) -> bool {
        matches!(self, Mnemonic::Passthrough)
    }
}
