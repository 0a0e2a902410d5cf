//! Domain layer: the cheatsheet tree, parser, merge and range queries
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod entities;
pub mod error;
pub mod merge;
pub mod parser;
pub mod query;

pub use entities::*;
pub use error::{ParseError, ParseResult};
pub use merge::{merge, merge_with_stats, MergeStats};
pub use parser::{parse, Grammar, ParsedDocument, Parser};
pub use query::{collect_up_to, formatted_up_to, single_unit, units_up_to, SEPARATOR};
