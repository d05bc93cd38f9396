//! Nullable per-axis vector
//!
//! A [`Vector`] carries five independently optional axes (X, Y, Z, E, F).
//! An absent axis means "not specified", which is different from zero: a
//! G-code line such as `G1 X10` says nothing about Y.
//!
//! Arithmetic is defined per axis. How absent operands combine is selected by
//! an [`AbsentPolicy`]; the operator impls use [`AbsentPolicy::PassThrough`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Axis selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
    E,
    F,
}

impl Axis {
    /// All axes in canonical G-code order
    pub const ALL: [Axis; 5] = [Axis::X, Axis::Y, Axis::Z, Axis::E, Axis::F];

    /// The positional axes
    pub const XYZ: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// G-code letter of this axis
    pub fn letter(self) -> char {
        match self {
            Axis::X => 'X',
            Axis::Y => 'Y',
            Axis::Z => 'Z',
            Axis::E => 'E',
            Axis::F => 'F',
        }
    }

    /// Axis for a G-code letter (case-insensitive)
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'X' => Some(Axis::X),
            'Y' => Some(Axis::Y),
            'Z' => Some(Axis::Z),
            'E' => Some(Axis::E),
            'F' => Some(Axis::F),
            _ => None,
        }
    }
}

/// How an operation treats axes that are absent on one or both operands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbsentPolicy {
    /// absent op v = v, v op absent = v, absent op absent = absent
    PassThrough,
    /// Absent operands count as zero; the result is always present
    AsZero,
    /// The result is absent when either operand is absent
    Propagate,
}

impl AbsentPolicy {
    fn apply(self, a: Option<f64>, b: Option<f64>, op: impl Fn(f64, f64) -> f64) -> Option<f64> {
        match self {
            AbsentPolicy::PassThrough => match (a, b) {
                (Some(a), Some(b)) => Some(op(a, b)),
                (Some(a), None) => Some(a),
                // the right-hand value passes through unchanged, so `absent - v` is `v`
                (None, Some(b)) => Some(b),
                (None, None) => None,
            },
            AbsentPolicy::AsZero => Some(op(a.unwrap_or(0.0), b.unwrap_or(0.0))),
            AbsentPolicy::Propagate => match (a, b) {
                (Some(a), Some(b)) => Some(op(a, b)),
                _ => None,
            },
        }
    }
}

/// Five-axis vector with independently optional components
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    pub e: Option<f64>,
    pub f: Option<f64>,
}

impl Vector {
    /// Vector with every axis absent
    pub fn new() -> Self {
        Self::default()
    }

    /// Vector with every axis present and zero
    pub fn zero() -> Self {
        Self::from_values(0.0, 0.0, 0.0, 0.0, 0.0)
    }

    /// Fully specified vector
    pub fn from_values(x: f64, y: f64, z: f64, e: f64, f: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            z: Some(z),
            e: Some(e),
            f: Some(f),
        }
    }

    /// Vector with only X, Y and Z present
    pub fn xyz_values(x: f64, y: f64, z: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            z: Some(z),
            ..Self::default()
        }
    }

    /// Vector with the same value on every axis
    pub fn splat(value: f64) -> Self {
        Self::from_values(value, value, value, value, value)
    }

    pub fn get(&self, axis: Axis) -> Option<f64> {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
            Axis::E => self.e,
            Axis::F => self.f,
        }
    }

    pub fn set(&mut self, axis: Axis, value: Option<f64>) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
            Axis::Z => self.z = value,
            Axis::E => self.e = value,
            Axis::F => self.f = value,
        }
    }

    /// Builder-style single axis setter
    pub fn with(mut self, axis: Axis, value: f64) -> Self {
        self.set(axis, Some(value));
        self
    }

    /// Combine two vectors axis by axis
    pub fn combine(
        &self,
        other: &Vector,
        policy: AbsentPolicy,
        op: impl Fn(f64, f64) -> f64,
    ) -> Vector {
        let mut out = Vector::new();
        for axis in Axis::ALL {
            out.set(axis, policy.apply(self.get(axis), other.get(axis), &op));
        }
        out
    }

    /// Apply a function to every present axis
    pub fn map(&self, op: impl Fn(f64) -> f64) -> Vector {
        let mut out = *self;
        for axis in Axis::ALL {
            out.set(axis, self.get(axis).map(&op));
        }
        out
    }

    /// Overwrite axes with the present axes of `other`
    pub fn merge(&self, other: &Vector) -> Vector {
        let mut out = *self;
        for axis in Axis::ALL {
            if let Some(v) = other.get(axis) {
                out.set(axis, Some(v));
            }
        }
        out
    }

    /// Keep only the axes that are present in `mask`
    pub fn mask(&self, mask: &Vector) -> Vector {
        self.combine(mask, AbsentPolicy::Propagate, |a, _| a)
    }

    /// Per-axis difference `other - self`, absent axes treated as zero
    pub fn distance(&self, other: &Vector) -> Vector {
        self.combine(other, AbsentPolicy::AsZero, |a, b| b - a)
    }

    /// Euclidean length of the XYZ part, absent axes treated as zero
    pub fn magnitude(&self) -> f64 {
        let x = self.x.unwrap_or(0.0);
        let y = self.y.unwrap_or(0.0);
        let z = self.z.unwrap_or(0.0);
        (x * x + y * y + z * z).sqrt()
    }

    /// Extruder travel per unit of XYZ travel for a displacement
    ///
    /// `None` when E is absent or the displacement has no XYZ length.
    pub fn flowrate(&self) -> Option<f64> {
        let length = self.magnitude();
        if length == 0.0 {
            return None;
        }
        Some(self.e? / length)
    }

    pub fn dot(&self, other: &Vector) -> f64 {
        Axis::XYZ
            .iter()
            .map(|&a| self.get(a).unwrap_or(0.0) * other.get(a).unwrap_or(0.0))
            .sum()
    }

    pub fn cross(&self, other: &Vector) -> Vector {
        let (ax, ay, az) = self.xyz_or_zero();
        let (bx, by, bz) = other.xyz_or_zero();
        Vector::xyz_values(ay * bz - az * by, az * bx - ax * bz, ax * by - ay * bx)
    }

    /// Unit-length XYZ direction, or the zero vector when the length is zero
    pub fn normalized(&self) -> Vector {
        let len = self.magnitude();
        if len == 0.0 {
            return Vector::xyz_values(0.0, 0.0, 0.0);
        }
        self.xyz() / len
    }

    pub fn xyz(&self) -> Vector {
        Vector {
            x: self.x,
            y: self.y,
            z: self.z,
            ..Vector::default()
        }
    }

    pub fn xy(&self) -> Vector {
        Vector {
            x: self.x,
            y: self.y,
            ..Vector::default()
        }
    }

    pub fn e_only(&self) -> Vector {
        Vector {
            e: self.e,
            ..Vector::default()
        }
    }

    pub fn f_only(&self) -> Vector {
        Vector {
            f: self.f,
            ..Vector::default()
        }
    }

    /// Whether every axis is present
    pub fn is_resolved(&self) -> bool {
        Axis::ALL.iter().all(|&a| self.get(a).is_some())
    }

    /// Whether every axis is absent
    pub fn is_empty(&self) -> bool {
        Axis::ALL.iter().all(|&a| self.get(a).is_none())
    }

    fn xyz_or_zero(&self) -> (f64, f64, f64) {
        (
            self.x.unwrap_or(0.0),
            self.y.unwrap_or(0.0),
            self.z.unwrap_or(0.0),
        )
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, rhs: Vector) -> Vector {
        self.combine(&rhs, AbsentPolicy::PassThrough, |a, b| a + b)
    }
}

impl Sub for Vector {
    type Output = Vector;

    fn sub(self, rhs: Vector) -> Vector {
        self.combine(&rhs, AbsentPolicy::PassThrough, |a, b| a - b)
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;

    fn mul(self, rhs: f64) -> Vector {
        self.map(|v| v * rhs)
    }
}

impl Mul<Vector> for Vector {
    type Output = Vector;

    fn mul(self, rhs: Vector) -> Vector {
        self.combine(&rhs, AbsentPolicy::PassThrough, |a, b| a * b)
    }
}

impl Div<f64> for Vector {
    type Output = Vector;

    fn div(self, rhs: f64) -> Vector {
        self.map(|v| v / rhs)
    }
}

impl Div<Vector> for Vector {
    type Output = Vector;

    fn div(self, rhs: Vector) -> Vector {
        self.combine(&rhs, AbsentPolicy::PassThrough, |a, b| a / b)
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        self.map(|v| -v)
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for axis in Axis::ALL {
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            match self.get(axis) {
                Some(v) => write!(f, "{}={}", axis.letter(), v)?,
                None => write!(f, "{}=None", axis.letter())?,
            }
        }
        Ok(())
    }
}
