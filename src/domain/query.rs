//! Read-only range queries over a tree.
//!
//! A cumulative query walks a course's units in document order up to and
//! including the selected unit. A selection that is never reached yields an
//! empty result rather than an error: half-finished selections are normal.

use tracing::trace;

use crate::domain::entities::{Course, Selection, Tree, UnitRecord};

/// Separator placed between collected cheatsheets.
pub const SEPARATOR: &str = "\n\n---\n\n";

/// Walk the selected course in order and return the visited units, ending with
/// the selected one. `None` if the course is unknown or the walk never reaches
/// the selection.
fn walk_up_to<'a>(tree: &'a Tree, sel: &Selection) -> Option<Vec<(&'a str, &'a str, &'a str)>> {
    let course = tree.course(&sel.course)?;
    let mut visited = Vec::new();
    for module in &course.modules {
        for unit in &module.units {
            visited.push((
                module.name.as_str(),
                unit.name.as_str(),
                unit.content.as_str(),
            ));
            if module.name == sel.module && unit.name == sel.unit {
                trace!("walk_up_to: reached {:?} after {} units", sel, visited.len());
                return Some(visited);
            }
        }
    }
    trace!("walk_up_to: {:?} not reachable", sel);
    None
}

/// Cheatsheets from the start of the course through the selected unit, joined by [`SEPARATOR`].
pub fn collect_up_to(tree: &Tree, sel: &Selection) -> String {
    walk_up_to(tree, sel)
        .map(|units| {
            units
                .iter()
                .map(|(_, _, content)| *content)
                .collect::<Vec<_>>()
                .join(SEPARATOR)
        })
        .unwrap_or_default()
}

/// Per-unit records from the start of the course through the selected unit.
pub fn units_up_to(tree: &Tree, sel: &Selection) -> Vec<UnitRecord> {
    walk_up_to(tree, sel)
        .map(|units| {
            units
                .into_iter()
                .map(|(module, unit, content)| UnitRecord {
                    module: module.to_string(),
                    unit: unit.to_string(),
                    content: content.to_string(),
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Like [`collect_up_to`], with a `[<module> - <unit>]` header line before each cheatsheet.
pub fn formatted_up_to(tree: &Tree, sel: &Selection) -> String {
    walk_up_to(tree, sel)
        .map(|units| {
            units
                .iter()
                .map(|(module, unit, content)| format!("[{module} - {unit}]\n{content}"))
                .collect::<Vec<_>>()
                .join(SEPARATOR)
        })
        .unwrap_or_default()
}

/// Content of exactly the selected unit, found by direct lookup.
pub fn single_unit(tree: &Tree, sel: &Selection) -> String {
    tree.course(&sel.course)
        .and_then(|c| c.module(&sel.module))
        .and_then(|m| m.unit(&sel.unit))
        .map(|u| u.content.clone())
        .unwrap_or_default()
}

pub fn course_names(tree: &Tree) -> Vec<&str> {
    tree.courses.iter().map(|c| c.name.as_str()).collect()
}

pub fn module_names<'a>(tree: &'a Tree, course: &str) -> Vec<&'a str> {
    tree.course(course)
        .map(|c| c.modules.iter().map(|m| m.name.as_str()).collect())
        .unwrap_or_default()
}

pub fn unit_names<'a>(tree: &'a Tree, course: &str, module: &str) -> Vec<&'a str> {
    tree.course(course)
        .and_then(|c: &Course| c.module(module))
        .map(|m| m.units.iter().map(|u| u.name.as_str()).collect())
        .unwrap_or_default()
}
