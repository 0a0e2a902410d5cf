//! Cheatsheet service
//!
//! Runs the load → parse/merge → save cycle against a tree store and answers
//! range queries over the stored tree. One load per query, one load and one
//! save per mutation; concurrent writers are not coordinated here.

use std::sync::Arc;

use tracing::{debug, info};

use crate::application::ApplicationResult;
use crate::domain::{self, Grammar, Parser, Selection, Tree, UnitRecord};
use crate::infrastructure::traits::TreeStore;

/// Outcome of adding parsed notes to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddSummary {
    pub grammar: Grammar,
    pub courses: usize,
    pub modules: usize,
    pub units: usize,
    /// Units that were new to the store
    pub added: usize,
    /// Units whose existing content was replaced
    pub overwritten: usize,
}

/// Which slice of a course to collect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Everything from the start of the course through the selected unit.
    Cumulative,
    /// Only the selected unit.
    Single,
}

/// Collected content plus the number of units it covers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Collected {
    pub content: String,
    pub unit_count: usize,
}

impl Collected {
    /// True when the selection did not resolve to any unit.
    pub fn is_empty(&self) -> bool {
        self.unit_count == 0
    }
}

/// Service for adding notes to and querying the stored cheatsheet tree.
pub struct CheatsheetService {
    store: Arc<dyn TreeStore>,
    parser: Parser,
}

impl CheatsheetService {
    /// Create a new cheatsheet service.
    pub fn new(store: Arc<dyn TreeStore>) -> Self {
        Self {
            store,
            parser: Parser::new(),
        }
    }

    /// Parse notes without touching the store.
    pub fn preview(&self, text: &str) -> ApplicationResult<domain::ParsedDocument> {
        Ok(self.parser.parse_document(text)?)
    }

    /// Parse notes and merge them into the stored tree.
    ///
    /// Parsing happens before the store is read, so invalid input never costs a load.
    pub fn add_text(&self, text: &str) -> ApplicationResult<AddSummary> {
        let parsed = self.parser.parse_document(text)?;
        let (courses, modules, units) = (
            parsed.tree.courses.len(),
            parsed.tree.module_count(),
            parsed.tree.unit_count(),
        );

        let existing = self.store.load()?;
        let (merged, stats) = domain::merge_with_stats(existing, parsed.tree);
        self.store.save(&merged)?;

        info!(
            "add_text: {} units added, {} overwritten",
            stats.added, stats.overwritten
        );
        Ok(AddSummary {
            grammar: parsed.grammar,
            courses,
            modules,
            units,
            added: stats.added,
            overwritten: stats.overwritten,
        })
    }

    /// Merge an externally supplied tree (e.g. a JSON export) into the store.
    pub fn import(&self, incoming: Tree) -> ApplicationResult<domain::MergeStats> {
        let existing = self.store.load()?;
        let (merged, stats) = domain::merge_with_stats(existing, incoming);
        self.store.save(&merged)?;
        debug!("import: {:?}", stats);
        Ok(stats)
    }

    /// The stored tree.
    pub fn tree(&self) -> ApplicationResult<Tree> {
        self.store.load()
    }

    /// The stored tree, for writing out as JSON.
    pub fn export(&self) -> ApplicationResult<Tree> {
        let tree = self.store.load()?;
        debug!("export: {} courses", tree.courses.len());
        Ok(tree)
    }

    /// Replace the stored tree with an empty one.
    pub fn clear(&self) -> ApplicationResult<()> {
        info!("clear: wiping stored tree");
        self.store.save(&Tree::default())
    }

    /// Collect content for a selection.
    pub fn collect(&self, sel: &Selection, scope: Scope) -> ApplicationResult<Collected> {
        let tree = self.store.load()?;
        let collected = match scope {
            Scope::Cumulative => {
                let records = domain::units_up_to(&tree, sel);
                Collected {
                    content: domain::collect_up_to(&tree, sel),
                    unit_count: records.len(),
                }
            }
            Scope::Single => {
                let content = domain::single_unit(&tree, sel);
                let unit_count = usize::from(!content.is_empty());
                Collected {
                    content,
                    unit_count,
                }
            }
        };
        debug!(
            "collect: {:?} {:?} -> {} units",
            sel, scope, collected.unit_count
        );
        Ok(collected)
    }

    /// Records of every unit from the start of the course through the selection.
    pub fn units(&self, sel: &Selection) -> ApplicationResult<Vec<UnitRecord>> {
        let tree = self.store.load()?;
        Ok(domain::units_up_to(&tree, sel))
    }

    /// Cumulative content with a `[module - unit]` header before each piece.
    pub fn formatted(&self, sel: &Selection) -> ApplicationResult<Collected> {
        let tree = self.store.load()?;
        Ok(Collected {
            content: domain::formatted_up_to(&tree, sel),
            unit_count: domain::units_up_to(&tree, sel).len(),
        })
    }
}
