//! Name-keyed merge of an incoming tree into an existing one.
//!
//! Union by name at every level. Incoming unit content replaces existing
//! content for the same (course, module, unit); nothing is ever removed or
//! reordered, new entries are appended to the end of their parent.

use tracing::{debug, trace};

use crate::domain::entities::{Course, Module, Tree};

/// What a merge changed, counted at unit granularity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Units that did not exist before.
    pub added: usize,
    /// Existing units whose content was replaced (even by identical content).
    pub overwritten: usize,
}

/// Merge `incoming` into `existing`, consuming both.
pub fn merge(existing: Tree, incoming: Tree) -> Tree {
    merge_with_stats(existing, incoming).0
}

/// Like [`merge`], also reporting how many units were added vs. overwritten.
///
/// New courses and modules are unioned entry by entry like known ones, so a
/// name repeated inside `incoming` collapses into one entry holding the later
/// content. For incoming trees without repeated names, merging into an empty
/// tree yields `incoming` unchanged.
pub fn merge_with_stats(mut existing: Tree, incoming: Tree) -> (Tree, MergeStats) {
    let mut stats = MergeStats::default();
    for course in incoming.courses {
        let idx = match existing.courses.iter().position(|c| c.name == course.name) {
            Some(idx) => idx,
            None => {
                trace!("merge: new course {}", course.name);
                existing.courses.push(Course::new(course.name.clone()));
                existing.courses.len() - 1
            }
        };
        merge_course(&mut existing.courses[idx], course, &mut stats);
    }
    debug!(
        "merge: {} units added, {} overwritten",
        stats.added, stats.overwritten
    );
    (existing, stats)
}

fn merge_course(target: &mut Course, incoming: Course, stats: &mut MergeStats) {
    for module in incoming.modules {
        let idx = match target.modules.iter().position(|m| m.name == module.name) {
            Some(idx) => idx,
            None => {
                trace!("merge: new module {}/{}", target.name, module.name);
                target.modules.push(Module::new(module.name.clone()));
                target.modules.len() - 1
            }
        };
        merge_module(&mut target.modules[idx], module, stats);
    }
}

fn merge_module(target: &mut Module, incoming: Module, stats: &mut MergeStats) {
    for unit in incoming.units {
        match target.units.iter_mut().find(|u| u.name == unit.name) {
            Some(existing) => {
                trace!("merge: overwrite unit {}/{}", target.name, unit.name);
                existing.content = unit.content;
                stats.overwritten += 1;
            }
            None => {
                stats.added += 1;
                target.units.push(unit);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Unit;

    fn tree(course: &str, module: &str, units: &[(&str, &str)]) -> Tree {
        let mut m = Module::new(module);
        m.units = units.iter().map(|(n, c)| Unit::new(*n, *c)).collect();
        let mut c = Course::new(course);
        c.modules.push(m);
        Tree::new(vec![c])
    }

    #[test]
    fn given_empty_existing_when_merging_then_returns_incoming() {
        let incoming = tree("C", "M", &[("U1", "a"), ("U2", "b")]);

        let (merged, stats) = merge_with_stats(Tree::default(), incoming.clone());

        assert_eq!(merged, incoming);
        assert_eq!(stats, MergeStats { added: 2, overwritten: 0 });
    }

    #[test]
    fn given_same_unit_when_merging_then_content_is_replaced_in_place() {
        let existing = tree("C", "M", &[("U1", "old"), ("U2", "keep")]);
        let incoming = tree("C", "M", &[("U1", "new"), ("U3", "added")]);

        let (merged, stats) = merge_with_stats(existing, incoming);

        let units = &merged.courses[0].modules[0].units;
        assert_eq!(
            units,
            &vec![
                Unit::new("U1", "new"),
                Unit::new("U2", "keep"),
                Unit::new("U3", "added"),
            ]
        );
        assert_eq!(stats, MergeStats { added: 1, overwritten: 1 });
    }

    #[test]
    fn given_new_module_in_known_course_when_merging_then_module_is_appended() {
        let existing = tree("C", "M1", &[("U", "a")]);
        let incoming = tree("C", "M2", &[("U", "b")]);

        let merged = merge(existing, incoming);

        assert_eq!(merged.courses.len(), 1);
        let names: Vec<_> = merged.courses[0].modules.iter().map(|m| &m.name).collect();
        assert_eq!(names, vec!["M1", "M2"]);
    }
}
