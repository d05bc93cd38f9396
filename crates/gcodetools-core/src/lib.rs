//! # GcodeTools Core
//!
//! Core types shared by the GcodeTools parser, writer and metadata engine:
//! - [`Vector`]: nullable per-axis tuple (X, Y, Z, E, F)
//! - [`CoordSystem`]: the modal coordinate / extruder state machine
//! - [`Arc`]: G2/G3 decomposition into linear segments
//! - [`Config`]: the configuration value passed to every entry point
//! - Error types used across the workspace

pub mod arc;
pub mod config;
pub mod coord_system;
pub mod error;
pub mod vector;

pub use arc::{Arc, ArcDirection, MIN_ARC_SEGMENTS, MAX_ARC_SEGMENTS};
pub use config::Config;
pub use coord_system::{ArcPlane, CoordSystem, Modes};
pub use error::{ConfigError, Error, GcodeError, Result};
pub use vector::{AbsentPolicy, Axis, Vector};
