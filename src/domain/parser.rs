//! Text-to-tree parser for free-form study notes.
//!
//! Two input grammars are recognized, and exactly one is used per document:
//!
//! Explicit:
//! ```text
//! course name: <Course>
//! module name1: <Module>
//! unit name 1: <Unit>
//! <cheatsheet lines until the next marker>
//! ```
//!
//! Markdown (optionally wrapped in `<Section>`...`</Section>`):
//! ```text
//! ## <Unit>
//! <cheatsheet lines, ### and #### headers included>
//! ```
//!
//! The first structurally significant line locks the grammar for the rest of
//! the input. Markdown documents are placed under a synthetic
//! "Default Course" / "Default Module".

use regex::Regex;
use tracing::{debug, trace};

use crate::domain::entities::{Course, Module, Tree, Unit};
use crate::domain::error::{ParseError, ParseResult};

pub const DEFAULT_COURSE: &str = "Default Course";
pub const DEFAULT_MODULE: &str = "Default Module";
/// Unit holding explicit-grammar content that precedes the first unit marker of a module.
pub const DEFAULT_UNIT: &str = "Default Unit";
/// Unit holding markdown content that precedes the first `##` header.
pub const INTRODUCTION_UNIT: &str = "Introduction";

/// Input grammar of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    /// No structural line seen yet.
    Undetermined,
    /// `course name:` / `module name:` / `unit name:` markers.
    Explicit,
    /// `##` headers, optionally inside `<Section>`.
    Markdown,
}

impl std::fmt::Display for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Grammar::Undetermined => write!(f, "undetermined"),
            Grammar::Explicit => write!(f, "explicit"),
            Grammar::Markdown => write!(f, "markdown"),
        }
    }
}

/// Successfully parsed input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDocument {
    pub tree: Tree,
    pub grammar: Grammar,
}

/// Classified input line. Which variants can appear depends on the grammar.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Blank,
    Course(&'a str),
    Module(&'a str),
    Unit(&'a str),
    SectionStart,
    SectionEnd,
    Header(&'a str),
    Content,
}

/// Parse notes into a tree.
pub fn parse(text: &str) -> ParseResult<Tree> {
    Parser::new().parse(text)
}

/// Compiled line patterns.
pub struct Parser {
    course: Regex,
    module: Regex,
    unit: Regex,
    section_start: Regex,
    section_end: Regex,
    header: Regex,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Self {
            course: Regex::new(r"(?i)^course\s+name\s*:\s*(.+)$").unwrap(),
            module: Regex::new(r"(?i)^module\s+name\s*(\d+)?\s*:\s*(.+)$").unwrap(),
            unit: Regex::new(r"(?i)^unit\s+name\s*(\d+)?\s*:\s*(.+)$").unwrap(),
            section_start: Regex::new(r"(?i)^<Section>").unwrap(),
            section_end: Regex::new(r"(?i)^</Section>").unwrap(),
            header: Regex::new(r"^##\s+(.+)$").unwrap(),
        }
    }

    pub fn parse(&self, text: &str) -> ParseResult<Tree> {
        self.parse_document(text).map(|doc| doc.tree)
    }

    /// Parse notes and report which grammar was used.
    pub fn parse_document(&self, text: &str) -> ParseResult<ParsedDocument> {
        if text.trim().is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let mut grammar = Grammar::Undetermined;
        let mut builder = Builder::default();

        for (lineno, raw) in text.lines().enumerate() {
            let line = self.classify(raw.trim(), grammar);

            // Single transition point: the first structural line locks the grammar.
            if grammar == Grammar::Undetermined {
                grammar = match line {
                    Line::Course(_) | Line::Module(_) | Line::Unit(_) => Grammar::Explicit,
                    Line::SectionStart | Line::Header(_) => Grammar::Markdown,
                    _ => Grammar::Undetermined,
                };
                if grammar != Grammar::Undetermined {
                    debug!("parse: line {} selects {} grammar", lineno + 1, grammar);
                }
            }

            match line {
                Line::Blank => builder.push_blank(),
                Line::Course(name) => builder.open_course(name),
                Line::Module(name) => builder.open_module(name)?,
                Line::Unit(name) => builder.open_unit(name)?,
                Line::SectionStart => builder.ensure_default_module(),
                Line::SectionEnd => trace!("parse: line {}: end of section", lineno + 1),
                Line::Header(name) => {
                    builder.ensure_default_module();
                    builder.open_unit(name)?;
                }
                Line::Content => match grammar {
                    Grammar::Explicit => builder.push_explicit_content(raw),
                    Grammar::Markdown => builder.push_markdown_content(raw),
                    Grammar::Undetermined => return Err(ParseError::NoCourseFound),
                },
            }
        }

        let tree = Tree::new(builder.finish());
        validate(&tree, grammar)?;
        debug!(
            "parse: {} grammar, {} courses, {} modules, {} units",
            grammar,
            tree.courses.len(),
            tree.module_count(),
            tree.unit_count()
        );
        Ok(ParsedDocument { tree, grammar })
    }

    fn classify<'a>(&self, line: &'a str, grammar: Grammar) -> Line<'a> {
        if line.is_empty() {
            return Line::Blank;
        }
        let explicit = grammar != Grammar::Markdown;
        let markdown = grammar != Grammar::Explicit;

        if markdown {
            if self.section_start.is_match(line) {
                return Line::SectionStart;
            }
            if self.section_end.is_match(line) {
                return Line::SectionEnd;
            }
            if let Some(name) = capture(&self.header, line, 1) {
                return Line::Header(name);
            }
        }
        if explicit {
            if let Some(name) = capture(&self.course, line, 1) {
                return Line::Course(name);
            }
            if let Some(name) = capture(&self.module, line, 2) {
                return Line::Module(name);
            }
            if let Some(name) = capture(&self.unit, line, 2) {
                return Line::Unit(name);
            }
        }
        Line::Content
    }
}

fn capture<'a>(re: &Regex, line: &'a str, group: usize) -> Option<&'a str> {
    re.captures(line)
        .and_then(|caps| caps.get(group))
        .map(|m| m.as_str().trim())
}

struct OpenUnit {
    name: String,
    lines: Vec<String>,
}

impl OpenUnit {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            lines: Vec::new(),
        }
    }

    fn close(self) -> Unit {
        let content = self.lines.join("\n").trim().to_string();
        Unit::new(self.name, content)
    }
}

struct OpenModule {
    module: Module,
    unit: Option<OpenUnit>,
}

impl OpenModule {
    fn new(name: &str) -> Self {
        Self {
            module: Module::new(name),
            unit: None,
        }
    }

    fn close_unit(&mut self) {
        if let Some(unit) = self.unit.take() {
            self.module.units.push(unit.close());
        }
    }

    fn close(mut self) -> Module {
        self.close_unit();
        self.module
    }
}

struct OpenCourse {
    course: Course,
    module: Option<OpenModule>,
}

impl OpenCourse {
    fn new(name: &str) -> Self {
        Self {
            course: Course::new(name),
            module: None,
        }
    }

    fn close_module(&mut self) {
        if let Some(module) = self.module.take() {
            self.course.modules.push(module.close());
        }
    }

    fn close(mut self) -> Course {
        self.close_module();
        self.course
    }
}

/// Nested parse state. An open unit lives inside its open module, which lives
/// inside its open course, so closing an outer level always closes the inner ones.
#[derive(Default)]
struct Builder {
    courses: Vec<Course>,
    course: Option<OpenCourse>,
}

impl Builder {
    fn open_unit_mut(&mut self) -> Option<&mut OpenUnit> {
        self.course
            .as_mut()
            .and_then(|c| c.module.as_mut())
            .and_then(|m| m.unit.as_mut())
    }

    fn open_course(&mut self, name: &str) {
        trace!("open course: {}", name);
        if let Some(course) = self.course.take() {
            self.courses.push(course.close());
        }
        self.course = Some(OpenCourse::new(name));
    }

    fn open_module(&mut self, name: &str) -> ParseResult<()> {
        trace!("open module: {}", name);
        let course = self.course.as_mut().ok_or(ParseError::NoCourseFound)?;
        course.close_module();
        course.module = Some(OpenModule::new(name));
        Ok(())
    }

    fn open_unit(&mut self, name: &str) -> ParseResult<()> {
        trace!("open unit: {}", name);
        let course = self.course.as_mut().ok_or(ParseError::NoCourseFound)?;
        let course_name = &course.course.name;
        let module = course
            .module
            .as_mut()
            .ok_or_else(|| ParseError::UnitOutsideModule {
                course: course_name.clone(),
                unit: name.to_string(),
            })?;
        module.close_unit();
        module.unit = Some(OpenUnit::new(name));
        Ok(())
    }

    /// Make sure a course and module are open, creating the synthetic defaults if not.
    fn ensure_default_module(&mut self) {
        let course = self
            .course
            .get_or_insert_with(|| OpenCourse::new(DEFAULT_COURSE));
        if course.module.is_none() {
            course.module = Some(OpenModule::new(DEFAULT_MODULE));
        }
    }

    fn push_blank(&mut self) {
        if let Some(unit) = self.open_unit_mut() {
            unit.lines.push(String::new());
        }
    }

    fn push_explicit_content(&mut self, raw: &str) {
        let Some(course) = self.course.as_mut() else {
            return;
        };
        let Some(module) = course.module.as_mut() else {
            debug!("parse: ignoring content outside a module: {:?}", raw);
            return;
        };
        module
            .unit
            .get_or_insert_with(|| OpenUnit::new(DEFAULT_UNIT))
            .lines
            .push(raw.to_string());
    }

    fn push_markdown_content(&mut self, raw: &str) {
        self.ensure_default_module();
        if let Some(module) = self.course.as_mut().and_then(|c| c.module.as_mut()) {
            module
                .unit
                .get_or_insert_with(|| OpenUnit::new(INTRODUCTION_UNIT))
                .lines
                .push(raw.to_string());
        }
    }

    /// Close every open level. Consumes the builder, so nothing is inserted twice.
    fn finish(mut self) -> Vec<Course> {
        if let Some(course) = self.course.take() {
            self.courses.push(course.close());
        }
        self.courses
    }
}

/// Structural checks applied after parsing, failing on the first violation.
fn validate(tree: &Tree, grammar: Grammar) -> ParseResult<()> {
    if tree.courses.is_empty() {
        return Err(ParseError::NoCourseFound);
    }
    for course in &tree.courses {
        if course.modules.is_empty() && grammar != Grammar::Markdown {
            return Err(ParseError::CourseWithoutModules {
                course: course.name.clone(),
            });
        }
        for module in &course.modules {
            if module.units.is_empty() {
                return Err(ParseError::EmptyModule {
                    course: course.name.clone(),
                    module: module.name.clone(),
                });
            }
            for unit in &module.units {
                if unit.content.trim().is_empty() {
                    return Err(ParseError::EmptyUnit {
                        course: course.name.clone(),
                        module: module.name.clone(),
                        unit: unit.name.clone(),
                    });
                }
            }
        }
    }
    Ok(())
}

/// Example input showing both accepted formats.
pub fn example_format() -> &'static str {
    r#"Format 1 (Explicit):
course name: Build Your Own Static Website
module name1: Introduction to HTML
unit name 1: Introduction to GenAI in Frontend Development
This is the cheatsheet content for the first unit.
It can span multiple lines.
You can include any text here.

unit name 2: Introduction to HTML
This is the cheatsheet content for the second unit.
More content here.

module name2: Introduction to CSS
unit name 1: Leveraging Gen AI for accelerated learning
Cheatsheet content for CSS unit 1.

---

Format 2 (Markdown):
<Section>
## Introduction
AI is revolutionizing the way we build websites...

## 1. Introduction to GenAI in Frontend Development
### 1.1. Static Website
A static website is an application that contains fixed content...

### 1.2. Developing a Web Application
Content about web development...

## 2. More Examples
Below are exercises where you can use AI tools...
</Section>"#
}
