//! Block sequence container
//!
//! [`Gcode`] owns an ordered list of [`Block`]s together with the registry
//! of object names the blocks' metadata refers to. Order is execution order
//! and is never changed by any operation here.

use crate::block::{Block, BlockMeta};
use crate::parser::Parser;
use gcodetools_core::{Config, GcodeError};
use std::collections::HashMap;
use std::ops::Range;

/// Ordered block sequence with an object registry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Gcode {
    blocks: Vec<Block>,
    objects: Vec<String>,
}

impl Gcode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty sequence sharing this sequence's object registry
    pub fn empty_like(&self) -> Self {
        Self {
            blocks: Vec::new(),
            objects: self.objects.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub fn first(&self) -> Option<&Block> {
        self.blocks.first()
    }

    pub fn last(&self) -> Option<&Block> {
        self.blocks.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Each block paired with the block before it
    pub fn pairs(&self) -> impl Iterator<Item = (Option<&Block>, &Block)> {
        let prevs = std::iter::once(None).chain(self.blocks.iter().map(Some));
        prevs.zip(self.blocks.iter())
    }

    /// Append a block
    ///
    /// An object index the registry does not know is dropped.
    pub fn push(&mut self, block: Block) {
        let block = self.checked(block);
        self.blocks.push(block);
    }

    /// Insert a block at `index`
    pub fn insert(&mut self, index: usize, block: Block) -> Result<(), GcodeError> {
        if index > self.blocks.len() {
            return Err(GcodeError::IndexOutOfBounds {
                index,
                len: self.blocks.len(),
            });
        }
        let block = self.checked(block);
        self.blocks.insert(index, block);
        Ok(())
    }

    /// Parse `text` and append the resulting blocks
    pub fn push_str(&mut self, text: &str, config: &Config) -> Result<(), GcodeError> {
        self.insert_str(self.blocks.len(), text, config).map(|_| ())
    }

    /// Parse `text` in the modal state of the block before `index` and insert the result
    ///
    /// Returns the number of blocks inserted.
    pub fn insert_str(&mut self, index: usize, text: &str, config: &Config) -> Result<usize, GcodeError> {
        if index > self.blocks.len() {
            return Err(GcodeError::IndexOutOfBounds {
                index,
                len: self.blocks.len(),
            });
        }

        let mut parser = match index.checked_sub(1).and_then(|i| self.blocks.get(i)) {
            Some(prev) => Parser::resume(config, prev),
            None => Parser::new(config),
        };
        let parsed = parser.parse_str(text)?;

        let count = parsed.len();
        let tail = self.blocks.split_off(index);
        for block in parsed.blocks {
            self.push(block);
        }
        self.blocks.extend(tail);
        Ok(count)
    }

    /// Independent copy of a range of blocks
    pub fn slice(&self, range: Range<usize>) -> Result<Gcode, GcodeError> {
        let blocks = self.blocks.get(range.clone()).ok_or(GcodeError::IndexOutOfBounds {
            index: range.end,
            len: self.blocks.len(),
        })?;
        Ok(Gcode {
            blocks: blocks.to_vec(),
            objects: self.objects.clone(),
        })
    }

    /// Blocks grouped by layer, in encounter order
    pub fn layers(&self) -> Vec<Gcode> {
        let mut order: Vec<u32> = Vec::new();
        let mut groups: HashMap<u32, Gcode> = HashMap::new();
        for block in &self.blocks {
            let layer = block.meta().layer;
            let group = groups.entry(layer).or_insert_with(|| {
                order.push(layer);
                self.empty_like()
            });
            group.blocks.push(block.clone());
        }
        order
            .into_iter()
            .filter_map(|layer| groups.remove(&layer))
            .collect()
    }

    /// Registered object names, index-addressed
    pub fn objects(&self) -> &[String] {
        &self.objects
    }

    pub fn object_name(&self, index: usize) -> Option<&str> {
        self.objects.get(index).map(String::as_str)
    }

    pub fn object_index(&self, name: &str) -> Option<usize> {
        self.objects.iter().position(|n| n == name)
    }

    /// Register an object name, returning its index
    pub fn register_object(&mut self, name: impl Into<String>) -> usize {
        let name = name.into();
        match self.object_index(&name) {
            Some(index) => index,
            None => {
                self.objects.push(name);
                self.objects.len() - 1
            }
        }
    }

    /// Replace the metadata of one block
    pub fn annotate(&mut self, index: usize, meta: BlockMeta) -> Result<(), GcodeError> {
        if let Some(object) = meta.object {
            if object >= self.objects.len() {
                return Err(GcodeError::UnknownObject {
                    index: object,
                    registered: self.objects.len(),
                });
            }
        }
        let len = self.blocks.len();
        let block = self
            .blocks
            .get_mut(index)
            .ok_or(GcodeError::IndexOutOfBounds { index, len })?;
        block.set_meta(meta);
        Ok(())
    }

    /// Append copies of another sequence's blocks
    ///
    /// Object indices are remapped into this sequence's registry.
    pub fn append_gcode(&mut self, other: &Gcode) {
        let remap: Vec<usize> = other
            .objects
            .iter()
            .map(|name| self.register_object(name.clone()))
            .collect();
        for block in &other.blocks {
            let mut meta = *block.meta();
            meta.object = meta.object.and_then(|i| remap.get(i).copied());
            self.blocks.push(block.clone().with_meta(meta));
        }
    }

    /// Fresh sequence whose registry holds only referenced objects, in first-use order
    pub fn resolve(&self) -> Gcode {
        let mut resolved = Gcode::new();
        let mut remap: HashMap<usize, usize> = HashMap::new();
        for block in &self.blocks {
            let mut meta = *block.meta();
            meta.object = meta.object.and_then(|old| {
                if let Some(&new) = remap.get(&old) {
                    return Some(new);
                }
                let name = self.objects.get(old)?;
                let new = resolved.register_object(name.clone());
                remap.insert(old, new);
                Some(new)
            });
            resolved.blocks.push(block.clone().with_meta(meta));
        }
        resolved
    }

    fn checked(&self, block: Block) -> Block {
        match block.meta().object {
            Some(object) if object >= self.objects.len() => {
                tracing::warn!(
                    "Dropping unknown object index {} ({} registered)",
                    object,
                    self.objects.len()
                );
                let meta = BlockMeta {
                    object: None,
                    ..*block.meta()
                };
                block.with_meta(meta)
            }
            _ => block,
        }
    }
}

impl<'a> IntoIterator for &'a Gcode {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

impl std::ops::Index<usize> for Gcode {
    type Output = Block;

    fn index(&self, index: usize) -> &Block {
        &self.blocks[index]
    }
}
