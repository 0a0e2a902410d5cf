//! Tests for merging incoming trees into the stored tree

use rstest::rstest;

use cheatsheets::domain::{
    collect_up_to, merge, merge_with_stats, parse, single_unit, MergeStats, Selection, Tree, Unit,
};
use cheatsheets::util::testing;

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

/// Build a tree from explicit-format notes.
fn notes(text: &str) -> Tree {
    parse(text).unwrap()
}

fn unit_names(tree: &Tree, course: &str, module: &str) -> Vec<String> {
    tree.course(course)
        .and_then(|c| c.module(module))
        .map(|m| m.units.iter().map(|u| u.name.clone()).collect())
        .unwrap_or_default()
}

#[test]
fn given_empty_store_when_merging_then_incoming_is_taken_as_is() {
    // Arrange
    let incoming = notes("course name: C\nmodule name: M\nunit name: U1\na\nunit name: U2\nb");

    // Act
    let (merged, stats) = merge_with_stats(Tree::default(), incoming.clone());

    // Assert
    assert_eq!(merged, incoming);
    assert_eq!(
        stats,
        MergeStats {
            added: 2,
            overwritten: 0
        }
    );
}

#[test]
fn given_same_unit_when_merging_then_content_is_overwritten_in_place() {
    // Arrange
    let existing = notes("course name: C\nmodule name: M\nunit name: U1\nold\nunit name: U2\nkeep");
    let incoming = notes("course name: C\nmodule name: M\nunit name: U1\nnew");

    // Act
    let (merged, stats) = merge_with_stats(existing, incoming);

    // Assert: position unchanged, content replaced
    let module = merged.course("C").unwrap().module("M").unwrap();
    assert_eq!(
        module.units,
        vec![Unit::new("U1", "new"), Unit::new("U2", "keep")]
    );
    assert_eq!(stats.overwritten, 1);
    assert_eq!(stats.added, 0);
}

#[test]
fn given_new_names_at_every_level_when_merging_then_appended_to_parent_end() {
    // Arrange
    let existing = notes("course name: C1\nmodule name: M1\nunit name: U1\nx");
    let incoming = notes(
        "course name: C1\nmodule name: M1\nunit name: U0\ny\nmodule name: M0\nunit name: U9\nz\n\
         course name: C0\nmodule name: M\nunit name: U\nw",
    );

    // Act
    let merged = merge(existing, incoming);

    // Assert
    let courses: Vec<_> = merged.courses.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(courses, vec!["C1", "C0"]);
    let modules: Vec<_> = merged.courses[0]
        .modules
        .iter()
        .map(|m| m.name.as_str())
        .collect();
    assert_eq!(modules, vec!["M1", "M0"]);
    assert_eq!(unit_names(&merged, "C1", "M1"), vec!["U1", "U0"]);
}

#[test]
fn given_unrelated_courses_when_merging_then_nothing_is_removed() {
    // Arrange
    let existing = notes(
        "course name: A\nmodule name: M\nunit name: U\na\n\
         course name: B\nmodule name: M\nunit name: U\nb",
    );
    let incoming = notes("course name: B\nmodule name: M2\nunit name: V\nv");

    // Act
    let merged = merge(existing.clone(), incoming);

    // Assert: every (course, module, unit) of the existing tree survives
    for course in &existing.courses {
        for module in &course.modules {
            for unit in &module.units {
                assert!(
                    merged
                        .course(&course.name)
                        .and_then(|c| c.module(&module.name))
                        .and_then(|m| m.unit(&unit.name))
                        .is_some(),
                    "{}/{}/{} should survive",
                    course.name,
                    module.name,
                    unit.name
                );
            }
        }
    }
    assert_eq!(merged.unit_count(), 3);
}

#[test]
fn given_same_notes_twice_when_merging_then_second_merge_changes_nothing() {
    // Arrange
    let text = "course name: Rust\nmodule name1: Basics\nunit name 1: Vars\nlet x = 1;\nunit name 2: Loops\nfor i in 0..3 {}";
    let first = merge(Tree::default(), parse(text).unwrap());

    // Act
    let (second, stats) = merge_with_stats(first.clone(), parse(text).unwrap());

    // Assert
    assert_eq!(second, first);
    assert_eq!(stats.added, 0);
    assert_eq!(stats.overwritten, 2);
}

#[test]
fn given_incremental_notes_when_merging_then_course_grows_in_submission_order() {
    // Arrange
    let day1 = parse("course name: C\nmodule name1: M1\nunit name1: U1\none").unwrap();
    let day2 = parse("course name: C\nmodule name1: M1\nunit name2: U2\ntwo\nmodule name2: M2\nunit name1: U3\nthree").unwrap();

    // Act
    let merged = merge(merge(Tree::default(), day1), day2);

    // Assert
    assert_eq!(unit_names(&merged, "C", "M1"), vec!["U1", "U2"]);
    assert_eq!(unit_names(&merged, "C", "M2"), vec!["U3"]);
}

#[rstest]
#[case::into_empty_store("")]
#[case::into_other_course("course name: Other\nmodule name: X\nunit name: Y\ny")]
fn given_repeated_module_and_unit_in_one_input_when_merging_then_later_content_kept_once(
    #[case] existing: &str,
) {
    // Arrange
    let existing = if existing.is_empty() {
        Tree::default()
    } else {
        notes(existing)
    };
    let incoming = notes(
        "course name: C\nmodule name: M\nunit name: U\nfirst\n\
         module name: M\nunit name: U\nsecond",
    );

    // Act
    let merged = merge(existing, incoming);

    // Assert
    let course = merged.course("C").unwrap();
    assert_eq!(course.modules.len(), 1);
    assert_eq!(course.modules[0].units, vec![Unit::new("U", "second")]);
    let sel = Selection::new("C", "M", "U");
    assert_eq!(single_unit(&merged, &sel), "second");
    assert_eq!(collect_up_to(&merged, &sel), "second");
}

#[test]
fn given_repeated_unit_in_new_module_when_merging_into_known_course_then_collapsed() {
    let existing = notes("course name: C\nmodule name: A\nunit name: U\na");
    let incoming = notes(
        "course name: C\nmodule name: B\nunit name: U\nfirst\n\
         unit name: U\nsecond",
    );

    let (merged, stats) = merge_with_stats(existing, incoming);

    assert_eq!(unit_names(&merged, "C", "B"), vec!["U"]);
    assert_eq!(
        single_unit(&merged, &Selection::new("C", "B", "U")),
        "second"
    );
    assert_eq!((stats.added, stats.overwritten), (1, 1));
}
