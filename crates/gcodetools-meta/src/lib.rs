//! # GcodeTools Meta
//!
//! Infers slicer metadata for a parsed [`gcodetools_parser::Gcode`]:
//! which object, feature type and layer each block belongs to.
//!
//! Detection is driven by keyword matcher tables ([`DialectTable`]) that are
//! plain data; the built-in table covers the common slicers and more rows
//! can be loaded from TOML or JSON.

pub mod dialects;
pub mod error;
pub mod fill;
pub mod keywords;
pub mod move_type;
pub mod tools;

pub use dialects::{Dialect, DialectTable, Event};
pub use error::MatcherError;
pub use fill::{fill_meta, sanitize_object_name, MetaFiller};
pub use keywords::{KeywordMatch, Matcher, MatcherRow, MatcherSet, AT_CONFIRMATION};
pub use move_type::classify;
pub use tools::{
    add_layer_tags, add_move_type_tags, read_config, read_config_with, slicer_info, split, trim,
    SlicerInfo, Split, LAYER_TAG,
};
