//! Filter query parsing
//!
//! This module turns a textual filter query into a [`ValuesGroup`] tree.
//! Field names are resolved against a [`FieldRegistry`], which also decides
//! which kinds of values a field accepts.
//!
//! # Syntax
//!
//! ```text
//! field: value, value2;         Values of one field (alternatives)
//! field: !value                 Exclude a value
//! field: 1-10                   Range, both bounds inclusive
//! field: ]1-10[                 Range, both bounds exclusive
//! field: [1-10[                 Range, upper bound exclusive
//! field: !1-10                  Exclude a range
//! field: >5, >=5, <5, <=5, <>5  Comparisons
//! field: ~*foo                  Pattern match: contains
//! field: ~>foo, ~<foo, ~?regex  Starts with, ends with, regex
//! field: ~!*foo                 Negated pattern match
//! field: ~i*foo                 Case-insensitive pattern match
//! (field: 1; other: 2)          Subgroup, AND-ed into its parent
//! *(field: 1; other: 2)         Subgroup whose fields are OR-ed
//! ```
//!
//! Values containing whitespace or one of `( ) [ ] * - , ; : ! < > = ~ ?`
//! must be quoted: `"foo, bar"`. A quote inside a quoted value is doubled:
//! `"say ""hi"""`. Values starting with `-` must always be quoted.
//!
//! # Examples
//!
//! ```text
//! id: 1-10, 20; status: active           Ids 1 to 10 or 20, and active
//! date: >=01.01.2010, !15.03.2010         From 2010, except one day
//! name: ~i>john; *(id: 5; id: 6)          Names starting with john, id 5 or 6
//! ```
//!
//! [`ValuesGroup`]: crate::value::ValuesGroup
//! [`FieldRegistry`]: crate::field::FieldRegistry

pub mod error;
pub mod lexer;
pub mod parser;
pub mod token;

pub use error::QueryError;
pub use lexer::{Lexer, TokenStream, tokenize};
pub use parser::{ParseOptions, QueryParser, parse_query};
pub use token::{Token, TokenKind};
