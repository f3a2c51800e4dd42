//! JSGF-style speech grammar expansion trees with dictation splitting.
//!
//! The core type is [`Expansion`], a handle to a node in a grammar tree.
//! Trees are compiled to JSGF text, matched against spoken text, and split
//! by [`SequenceRule`] into alternating fixed-vocabulary and free-dictation
//! stages so a hybrid recognizer can interleave grammar and dictation
//! matching over one utterance.

#![warn(clippy::pedantic, rust_2018_idioms)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

pub mod expansion;
mod matcher;
pub mod rule;
pub mod sequence;
pub mod traverse;

pub use self::{
    expansion::{Expansion, Kind},
    rule::Rule,
    sequence::{SequenceRule, StageKind},
    traverse::{
        JointTreeContext, MappedExpansion, TraversalOrder, filter_expansion, find_expansion,
        flat_map_expansion, map_expansion,
    },
};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// An expansion's dictation and fixed-vocabulary parts cannot be cleanly
    /// partitioned into matching stages.
    #[error("cannot partition expansion into stages: {0}")]
    Grammar(String),

    /// `set_next` was called with no stage remaining in the sequence.
    #[error("no stage remaining after index {0}")]
    SequenceOverrun(usize),
}

pub type Result<T> = std::result::Result<T, Error>;
