//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Parse failures: the input could not be turned into a complete tree.
///
/// Every structural variant names the offending course/module/unit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("text content is empty")]
    EmptyInput,

    #[error(
        "no course found: start with \"course name: <Course Name>\" or use markdown headers (##)"
    )]
    NoCourseFound,

    #[error("course \"{course}\" has no modules")]
    CourseWithoutModules { course: String },

    #[error("module \"{module}\" in course \"{course}\" has no units")]
    EmptyModule { course: String, module: String },

    #[error("unit \"{unit}\" in module \"{module}\" (course \"{course}\") has no cheatsheet content")]
    EmptyUnit {
        course: String,
        module: String,
        unit: String,
    },

    #[error("unit \"{unit}\" in course \"{course}\" appears before any module")]
    UnitOutsideModule { course: String, unit: String },
}

/// Result type for parse operations.
pub type ParseResult<T> = Result<T, ParseError>;
