//! Backend-agnostic model of a parsed condition
//!
//! A condition is a tree of [`ValuesGroup`]s. Every group maps field names to a
//! [`ValuesBag`] holding the values given for that field, and may contain
//! subgroups. Values of one bag are alternatives; fields and subgroups of a
//! group are combined using the group's [`Logical`].

mod bag;
mod entities;
mod group;

pub use bag::ValuesBag;
pub use entities::*;
pub use group::{Logical, ValuesGroup};
