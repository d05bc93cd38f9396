//! # GcodeTools
//!
//! Parse, model, annotate and rewrite 3D-printer G-code.
//!
//! ## Architecture
//!
//! GcodeTools is organized as a workspace with multiple crates:
//!
//! 1. **gcodetools-core** - Vectors, modal coordinate state, arcs, configuration, errors
//! 2. **gcodetools-parser** - Blocks, the block container, parser and writer
//! 3. **gcodetools-meta** - Slicer dialect tables and object/feature/layer inference
//! 4. **gcodetools** - This facade: file helpers, batch loading, logging
//!
//! ## Example
//!
//! ```no_run
//! use gcodetools::{load_file, save_file, Config};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::default();
//! let gcode = load_file("benchy.gcode", &config)?;
//! for layer in gcode.layers() {
//!     println!("{} blocks", layer.len());
//! }
//! save_file(&gcode, "benchy.out.gcode", &config, false)?;
//! # Ok(())
//! # }
//! ```

pub mod batch;

pub use batch::load_files;

pub use gcodetools_core::{
    AbsentPolicy, Arc, ArcDirection, ArcPlane, Axis, Config, ConfigError, CoordSystem, Error,
    GcodeError, Modes, Result, Vector,
};

pub use gcodetools_parser::{
    format_number, Block, BlockData, BlockMeta, Gcode, LineIssue, Mnemonic, Motion, MoveType,
    Parser, Writer,
};

pub use gcodetools_meta::{
    add_layer_tags, add_move_type_tags, fill_meta, read_config, slicer_info, split, trim, Dialect,
    DialectTable, Event, MatcherError, MatcherRow, MetaFiller, SlicerInfo, Split,
};

use anyhow::Context;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with target, level, thread ids and line numbers
/// - RUST_LOG environment variable support, INFO otherwise
///
/// Returns an error, without panicking, when a global subscriber is
/// already installed.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to install the tracing subscriber")?;

    Ok(())
}

/// Parse G-code text and fill its metadata
pub fn load_str(text: &str, config: &Config) -> Result<Gcode> {
    load_str_with_issues(text, config).map(|(gcode, _)| gcode)
}

/// Like [`load_str`], also returning the lines whose invalid parameters
/// were skipped
pub fn load_str_with_issues(text: &str, config: &Config) -> Result<(Gcode, Vec<LineIssue>)> {
    config.validate()?;
    let mut parser = Parser::new(config);
    let mut gcode = parser.parse_str(text)?;
    fill_meta(&mut gcode, config)?;
    Ok((gcode, parser.take_issues()))
}

/// Read, parse and annotate a G-code file
pub fn load_file(path: impl AsRef<Path>, config: &Config) -> anyhow::Result<Gcode> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let gcode = load_str(&text, config).with_context(|| format!("Failed to parse {}", path.display()))?;
    tracing::info!("Loaded {} ({} blocks)", path.display(), gcode.len());
    Ok(gcode)
}

/// Serialize a sequence into a file
///
/// With `verbose`, every block carries a JSON metadata comment.
pub fn save_file(
    gcode: &Gcode,
    path: impl AsRef<Path>,
    config: &Config,
    verbose: bool,
) -> anyhow::Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    Writer::new(config)
        .verbose(verbose)
        .write_to(gcode, &mut writer)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Saved {} ({} blocks)", path.display(), gcode.len());
    Ok(())
}
