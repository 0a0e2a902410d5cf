//! Cheatsheet tree: parse free-form study notes into Course → Module → Unit,
//! merge them into a persisted tree and query cumulative slices of it.
//!
//! Layers:
//! - [`domain`]: tree entities, parser, merge engine, range queries (pure)
//! - [`application`]: services running load → parse/merge/query → save
//! - [`infrastructure`]: I/O traits, JSON file store, service container
//! - [`cli`]: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use domain::{
    collect_up_to, merge, parse, single_unit, units_up_to, Course, Module, ParseError, Selection,
    Tree, Unit, UnitRecord,
};
