//! Modal coordinate state machine
//!
//! [`CoordSystem`] tracks what a firmware interpreter would track while
//! executing G-code line by line: positioning modes, arc plane, the G92
//! offset and the resolved machine position.
//!
//! XYZ and E have separate absolute/relative toggles (G90/G91 vs M82/M83).
//! The extruder is additionally tracked through an absolute accumulator so
//! that files mixing absolute extrusion with `G92 E0` resets still yield the
//! correct per-line extrusion delta.

use crate::config::Config;
use crate::vector::{Axis, Vector};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Plane used by circular moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ArcPlane {
    /// G17
    #[default]
    XY,
    /// G18
    XZ,
    /// G19
    YZ,
}

impl ArcPlane {
    /// Plane select command
    pub fn code(self) -> &'static str {
        match self {
            ArcPlane::XY => "G17",
            ArcPlane::XZ => "G18",
            ArcPlane::YZ => "G19",
        }
    }

    /// In-plane axes (first, second) and the linear axis
    ///
    /// Angles are measured from the first axis towards the second, so G18
    /// works in Z-X order.
    pub fn axes(self) -> (Axis, Axis, Axis) {
        match self {
            ArcPlane::XY => (Axis::X, Axis::Y, Axis::Z),
            ArcPlane::XZ => (Axis::Z, Axis::X, Axis::Y),
            ArcPlane::YZ => (Axis::Y, Axis::Z, Axis::X),
        }
    }
}

impl fmt::Display for ArcPlane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Snapshot of the modal part of a [`CoordSystem`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Modes {
    /// Absolute XYZ positioning (G90) when true, relative (G91) otherwise
    pub abs_xyz: bool,
    /// Absolute extrusion (M82) when true, relative (M83) otherwise
    pub abs_e: bool,
    pub arc_plane: ArcPlane,
    /// G92 offset; `e` holds the last extruder offset
    pub offset: Vector,
    /// Absolute extruder accumulator
    pub e_total: f64,
}

impl Default for Modes {
    fn default() -> Self {
        Self {
            abs_xyz: true,
            abs_e: true,
            arc_plane: ArcPlane::XY,
            offset: Vector::from_values(0.0, 0.0, 0.0, 0.0, 0.0),
            e_total: 0.0,
        }
    }
}

/// Modal coordinate state
#[derive(Debug, Clone, PartialEq)]
pub struct CoordSystem {
    modes: Modes,
    /// Resolved machine position; `e` is kept at zero between moves
    position: Vector,
}

impl CoordSystem {
    /// State at program start: absolute modes, XY plane, origin, configured speed
    pub fn new(config: &Config) -> Self {
        Self::with_speed(config.default_speed)
    }

    pub fn with_speed(speed: f64) -> Self {
        Self {
            modes: Modes::default(),
            position: Vector::from_values(0.0, 0.0, 0.0, 0.0, speed),
        }
    }

    /// Rebuild a state from a snapshot and a resolved position
    pub fn restore(modes: Modes, position: Vector) -> Self {
        let mut position = Vector::zero().merge(&position);
        position.e = Some(0.0);
        Self { modes, position }
    }

    pub fn modes(&self) -> Modes {
        self.modes
    }

    pub fn abs_xyz(&self) -> bool {
        self.modes.abs_xyz
    }

    pub fn set_abs_xyz(&mut self, abs: bool) {
        self.modes.abs_xyz = abs;
    }

    pub fn abs_e(&self) -> bool {
        self.modes.abs_e
    }

    pub fn set_abs_e(&mut self, abs: bool) {
        self.modes.abs_e = abs;
    }

    pub fn arc_plane(&self) -> ArcPlane {
        self.modes.arc_plane
    }

    pub fn set_arc_plane(&mut self, plane: ArcPlane) {
        self.modes.arc_plane = plane;
    }

    /// Current resolved position, with zero extrusion
    pub fn position(&self) -> Vector {
        self.position
    }

    pub fn offset(&self) -> Vector {
        self.modes.offset
    }

    /// Absolute extruder position as the firmware sees it
    pub fn e_total(&self) -> f64 {
        self.modes.e_total
    }

    /// Apply the axis words of one motion line
    ///
    /// Returns the resolved position after the move. Its `e` component is
    /// the extrusion delta of this line, not the absolute extruder position.
    pub fn apply_move(&mut self, params: &Vector) -> Vector {
        if let Some(f) = params.f {
            self.position.f = Some(f);
        }

        for axis in Axis::XYZ {
            let Some(value) = params.get(axis) else {
                continue;
            };
            let next = if self.modes.abs_xyz {
                value + self.modes.offset.get(axis).unwrap_or(0.0)
            } else {
                self.position.get(axis).unwrap_or(0.0) + value
            };
            self.position.set(axis, Some(next));
        }

        let delta = match params.e {
            Some(e) if self.modes.abs_e => {
                let delta = e - self.modes.e_total;
                self.modes.e_total = e;
                delta
            }
            Some(e) => {
                self.modes.e_total += e;
                e
            }
            None => 0.0,
        };

        self.position.with(Axis::E, delta)
    }

    /// G92: declare the current position to have the given coordinates
    pub fn set_offset(&mut self, values: &Vector) {
        for axis in Axis::XYZ {
            if let Some(value) = values.get(axis) {
                let current = self.position.get(axis).unwrap_or(0.0);
                self.modes.offset.set(axis, Some(current - value));
            }
        }
        if let Some(e) = values.e {
            let offset_e = self.modes.e_total - e;
            self.modes.offset.e = Some(offset_e);
            self.modes.e_total -= offset_e;
        }
    }

    /// G28: move the listed axes to the origin (all XYZ when empty)
    ///
    /// Homing also clears the G92 offset of every homed axis.
    pub fn home(&mut self, axes: &[Axis]) {
        let axes: &[Axis] = if axes.is_empty() { &Axis::XYZ } else { axes };
        for &axis in axes.iter().filter(|a| Axis::XYZ.contains(a)) {
            self.position.set(axis, Some(0.0));
            self.modes.offset.set(axis, Some(0.0));
        }
    }
}
