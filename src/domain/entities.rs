//! Domain entities: the Course → Module → Unit tree

use serde::{Deserialize, Serialize};

/// A single cheatsheet entry inside a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub name: String,
    /// Cheatsheet text. Persisted as `cheatsheet` for compatibility with stored data.
    #[serde(rename = "cheatsheet", default)]
    pub content: String,
}

impl Unit {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Ordered group of units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    #[serde(default)]
    pub units: Vec<Unit>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            units: Vec::new(),
        }
    }

    /// First unit with exactly this name.
    pub fn unit(&self, name: &str) -> Option<&Unit> {
        self.units.iter().find(|u| u.name == name)
    }
}

/// Ordered group of modules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub name: String,
    #[serde(default)]
    pub modules: Vec<Module>,
}

impl Course {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modules: Vec::new(),
        }
    }

    /// First module with exactly this name.
    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.name == name)
    }

    pub fn unit_count(&self) -> usize {
        self.modules.iter().map(|m| m.units.len()).sum()
    }
}

/// The complete persisted hierarchy.
///
/// Serialized shape: `{ "courses": [ { "name", "modules": [ { "name", "units": [ { "name", "cheatsheet" } ] } ] } ] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tree {
    #[serde(default)]
    pub courses: Vec<Course>,
}

impl Tree {
    pub fn new(courses: Vec<Course>) -> Self {
        Self { courses }
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// First course with exactly this name.
    pub fn course(&self, name: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.name == name)
    }

    pub fn module_count(&self) -> usize {
        self.courses.iter().map(|c| c.modules.len()).sum()
    }

    pub fn unit_count(&self) -> usize {
        self.courses.iter().map(Course::unit_count).sum()
    }
}

/// A (course, module, unit) triple naming one unit of a tree.
///
/// Selections are not validated on construction: an unknown triple is a normal
/// state and simply yields empty query results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub course: String,
    pub module: String,
    pub unit: String,
}

impl Selection {
    pub fn new(
        course: impl Into<String>,
        module: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            course: course.into(),
            module: module.into(),
            unit: unit.into(),
        }
    }
}

/// One unit visited by a range query, with its enclosing module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitRecord {
    pub module: String,
    pub unit: String,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_tree_when_serialized_then_uses_persisted_field_names() {
        let tree = Tree::new(vec![Course {
            name: "C1".into(),
            modules: vec![Module {
                name: "M1".into(),
                units: vec![Unit::new("U1", "Hello")],
            }],
        }]);

        let json = serde_json::to_string(&tree).unwrap();

        assert_eq!(
            json,
            r#"{"courses":[{"name":"C1","modules":[{"name":"M1","units":[{"name":"U1","cheatsheet":"Hello"}]}]}]}"#
        );
    }

    #[test]
    fn given_sparse_json_when_deserialized_then_missing_fields_default() {
        let json = r#"{"courses":[{"name":"C1","modules":[{"name":"M1","units":[{"name":"U1"}]}]},{"name":"C2"}]}"#;

        let tree: Tree = serde_json::from_str(json).unwrap();

        assert_eq!(tree.courses[0].modules[0].units[0].content, "");
        assert!(tree.courses[1].modules.is_empty());
        assert!(serde_json::from_str::<Tree>("{}").unwrap().is_empty());
    }

    #[test]
    fn given_tree_when_counting_then_sums_all_levels() {
        let mut m1 = Module::new("M1");
        m1.units.push(Unit::new("U1", "a"));
        m1.units.push(Unit::new("U2", "b"));
        let mut m2 = Module::new("M2");
        m2.units.push(Unit::new("U3", "c"));
        let mut c = Course::new("C");
        c.modules = vec![m1, m2];
        let tree = Tree::new(vec![c]);

        assert_eq!(tree.module_count(), 2);
        assert_eq!(tree.unit_count(), 3);
        assert!(tree.course("C").and_then(|c| c.module("M2")).is_some());
        assert!(tree.course("c").is_none());
    }
}
