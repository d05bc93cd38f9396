//! G-code block model, parser and writer
//!
//! This crate provides:
//! - [`Block`] and the [`Gcode`] block sequence
//! - Line tokenizing and mnemonic classification
//! - [`Parser`]: text to blocks, driving the modal state machine
//! - [`Writer`]: blocks to text, emitting only what changed

pub mod block;
pub mod gcode;
pub mod mnemonic;
pub mod parser;
pub mod tokenizer;
pub mod writer;

pub use block::{Block, BlockData, BlockMeta, MoveType};
pub use gcode::Gcode;
pub use mnemonic::{Mnemonic, Motion};
pub use parser::{LineIssue, Parser};
pub use tokenizer::{ParamValue, Params, Statement};
pub use writer::{format_number, Writer};
