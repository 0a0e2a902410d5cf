//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (TreeStore, FileSystem)
//! but are themselves concrete structs, not traits.

mod cheatsheet;

pub use cheatsheet::{AddSummary, CheatsheetService, Collected, Scope};
