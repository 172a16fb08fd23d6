//! Best-effort rewriting of GDScript code between Godot versions.
//!
//! A [`RenameTable`] is an ordered list of literal substring substitutions for
//! one version step. Forward migration applies the rules in order; reverse
//! migration applies them last to first with old and new swapped.
//!
//! Reverse is not a true inverse. Substring replacement is not injective, so
//! a token produced by one rule can match another rule's pattern, and text
//! that already contained a rule's output is rewritten as if it were produced
//! by that rule.

mod tables;

pub use tables::GODOT_TABLES;

use crate::transpiler::errors::MigrationError;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reverse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameTable {
    from_version: u32,
    to_version: u32,
    rules: Vec<(String, String)>,
}

impl RenameTable {
    pub fn new<I, S>(from_version: u32, to_version: u32, rules: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        Self {
            from_version,
            to_version,
            rules: rules
                .into_iter()
                .map(|(old, new)| (old.into(), new.into()))
                .collect(),
        }
    }

    pub fn from_version(&self) -> u32 {
        self.from_version
    }

    pub fn to_version(&self) -> u32 {
        self.to_version
    }

    pub fn rules(&self) -> &[(String, String)] {
        &self.rules
    }

    pub fn forward(&self, text: &str) -> String {
        self.rules
            .iter()
            .fold(text.to_string(), |text, (old, new)| substitute(text, old, new))
    }

    pub fn reverse(&self, text: &str) -> String {
        self.rules
            .iter()
            .rev()
            .fold(text.to_string(), |text, (old, new)| substitute(text, new, old))
    }

    pub fn apply(&self, text: &str, direction: Direction) -> String {
        match direction {
            Direction::Forward => self.forward(text),
            Direction::Reverse => self.reverse(text),
        }
    }
}

fn substitute(text: String, pattern: &str, replacement: &str) -> String {
    if pattern.is_empty() || !text.contains(pattern) {
        return text;
    }
    text.replace(pattern, replacement)
}

/// The tables to run, in order, to get from one version to another.
#[derive(Debug, Clone)]
pub struct MigrationPlan<'a> {
    steps: Vec<(&'a RenameTable, Direction)>,
}

impl MigrationPlan<'_> {
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn apply(&self, text: &str) -> String {
        self.steps
            .iter()
            .fold(text.to_string(), |text, (table, direction)| {
                table.apply(&text, *direction)
            })
    }
}

/// Chains rename tables across several version steps.
#[derive(Debug, Clone, Copy)]
pub struct Migrator<'a> {
    tables: &'a [RenameTable],
}

impl<'a> Migrator<'a> {
    pub fn new(tables: &'a [RenameTable]) -> Self {
        Self { tables }
    }

    pub fn plan(&self, from: u32, to: u32) -> Result<MigrationPlan<'a>, MigrationError> {
        let mut steps = Vec::new();

        if from <= to {
            for version in from..to {
                let table = self
                    .find(version, version + 1)
                    .ok_or(MigrationError::UnsupportedStep {
                        from: version,
                        to: version + 1,
                    })?;
                steps.push((table, Direction::Forward));
            }
        } else {
            for version in (to + 1..=from).rev() {
                let table = self
                    .find(version - 1, version)
                    .ok_or(MigrationError::UnsupportedStep {
                        from: version,
                        to: version - 1,
                    })?;
                steps.push((table, Direction::Reverse));
            }
        }

        debug!(from, to, steps = steps.len(), "planned migration");
        Ok(MigrationPlan { steps })
    }

    pub fn migrate_line(&self, line: &str, from: u32, to: u32) -> Result<String, MigrationError> {
        Ok(self.plan(from, to)?.apply(line))
    }

    /// Migrates line by line, keeping the original line endings.
    pub fn migrate_text(&self, text: &str, from: u32, to: u32) -> Result<String, MigrationError> {
        let plan = self.plan(from, to)?;
        Ok(text
            .split_inclusive('\n')
            .map(|chunk| {
                let body = chunk.trim_end_matches(['\r', '\n']);
                let ending = &chunk[body.len()..];
                format!("{}{}", plan.apply(body), ending)
            })
            .collect())
    }

    fn find(&self, from: u32, to: u32) -> Option<&'a RenameTable> {
        let tables: &'a [RenameTable] = self.tables;
        tables
            .iter()
            .find(|table| table.from_version == from && table.to_version == to)
    }
}

impl Migrator<'static> {
    /// Godot 2 → 3 → 4.
    pub fn godot() -> Self {
        Self::new(GODOT_TABLES.as_slice())
    }
}

impl Default for Migrator<'static> {
    fn default() -> Self {
        Self::godot()
    }
}
