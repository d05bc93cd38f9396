//! Metadata fill pass
//!
//! Walks a parsed sequence once, left to right, and assigns every block its
//! object, feature type and layer. The three values are running state: a
//! line without a match inherits what the line before it had.

use crate::dialects::{Dialect, Event};
use crate::move_type::classify;
use gcodetools_core::{Config, GcodeError};
use gcodetools_parser::{Block, BlockMeta, Gcode, MoveType};

/// Replace every non-alphanumeric character with `_`, trimming underscores
/// at both ends
pub fn sanitize_object_name(name: &str) -> String {
    let name: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    name.trim_matches('_').to_string()
}

/// Object event at one line
enum ObjectEvent {
    End,
    Start(String),
}

/// Metadata inference over a block sequence
pub struct MetaFiller<'a> {
    config: &'a Config,
    dialect: &'a Dialect,
}

impl<'a> MetaFiller<'a> {
    /// Filler using the built-in dialect table
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            dialect: Dialect::builtin(),
        }
    }

    pub fn with_dialect(config: &'a Config, dialect: &'a Dialect) -> Self {
        Self { config, dialect }
    }

    pub fn fill(&self, gcode: &mut Gcode) -> Result<(), GcodeError> {
        self.fill_with_progress(gcode, |_, _| {})
    }

    /// Fill metadata, reporting `(current_block, total_blocks)`
    pub fn fill_with_progress(
        &self,
        gcode: &mut Gcode,
        mut progress: impl FnMut(usize, usize),
    ) -> Result<(), GcodeError> {
        let (metas, registry) = {
            let lines: Vec<&str> = gcode.iter().map(Block::command).collect();
            self.infer(&lines, gcode.objects().to_vec(), &mut progress)
        };

        for name in registry {
            gcode.register_object(name);
        }
        for (index, meta) in metas.into_iter().enumerate() {
            gcode.annotate(index, meta)?;
        }

        tracing::debug!(
            "Filled metadata for {} blocks: {} objects, {} layers",
            gcode.len(),
            gcode.objects().len(),
            gcode.last().map_or(0, |b| b.meta().layer)
        );
        Ok(())
    }

    fn infer(
        &self,
        lines: &[&str],
        mut registry: Vec<String>,
        progress: &mut impl FnMut(usize, usize),
    ) -> (Vec<BlockMeta>, Vec<String>) {
        let window = self.config.keyword_window;
        let total = lines.len();
        let print_start = self
            .dialect
            .first_match(Event::PrintStart, lines, 0..total, window);

        let mut metas = Vec::with_capacity(total);
        let mut object: Option<usize> = None;
        let mut move_type: Option<MoveType> = None;
        let mut layer = 0u32;

        for index in 0..total {
            match self.object_event(lines, index) {
                Some(ObjectEvent::End) => object = None,
                Some(ObjectEvent::Start(name)) => {
                    object = Some(match registry.iter().position(|n| *n == name) {
                        Some(i) => i,
                        None => {
                            tracing::trace!("line {}: new object '{}'", index, name);
                            registry.push(name);
                            registry.len() - 1
                        }
                    });
                }
                None => {}
            }

            if self.dialect.is_match(Event::LayerChange, lines, index, window) {
                layer += 1;
            }

            move_type = match print_start {
                Some(start) if index < start => Some(MoveType::PrintStart),
                _ if move_type == Some(MoveType::PrintEnd) => move_type,
                _ if self.dialect.is_match(Event::PrintEnd, lines, index, window) => {
                    Some(MoveType::PrintEnd)
                }
                _ => {
                    let inherited = move_type.filter(|t| *t != MoveType::PrintStart);
                    self.dialect
                        .find(Event::FeatureChange, lines, index, window)
                        .map(|found| classify(found.argument))
                        .or(inherited)
                }
            };

            metas.push(BlockMeta {
                object,
                move_type,
                layer,
            });
            progress(index + 1, total);
        }

        (metas, registry)
    }

    /// Object end wins over object start on the same line
    fn object_event(&self, lines: &[&str], index: usize) -> Option<ObjectEvent> {
        let window = self.config.keyword_window;
        if self.dialect.is_match(Event::ObjectEnd, lines, index, window) {
            return Some(ObjectEvent::End);
        }
        let found = self.dialect.find(Event::ObjectStart, lines, index, window)?;
        let name = sanitize_object_name(found.argument);
        if name.is_empty() {
            None
        } else {
            Some(ObjectEvent::Start(name))
        }
    }
}

/// Fill metadata using the built-in dialect table
pub fn fill_meta(gcode: &mut Gcode, config: &Config) -> Result<(), GcodeError> {
    MetaFiller::new(config).fill(gcode)
}
