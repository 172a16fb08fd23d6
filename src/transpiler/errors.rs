use crate::script::document::EntityKind;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal: nothing is generated when the document cannot be loaded.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read script file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse script description: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Script description must be a JSON object, found {found}")]
    NotAnObject { found: String },

    #[error("Settings must be a JSON object, found {found}")]
    InvalidSettings { found: String },
}

/// Recoverable conditions. Each one is logged and collected; generation continues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    #[error("Skipped {entity} {at}: missing required field '{field}'")]
    MissingRequiredField {
        entity: EntityKind,
        field: &'static str,
        at: String,
    },

    #[error("Variable '{variable}' asks for a generated default but has no value")]
    MissingDefaultValue { variable: String },

    #[error("Unknown option group '{group}', falling back to global defaults")]
    UnknownConfigGroup { group: String },

    #[error("Option '{key}' expects {expected}, using the built-in value")]
    InvalidOption { key: String, expected: &'static str },

    #[error("Variable '{variable}' uses setget, which Godot {version} does not support; omitted")]
    UnsupportedSetget { variable: String, version: u32 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MigrationError {
    #[error("No rename table migrates Godot {from} to Godot {to}")]
    UnsupportedStep { from: u32, to: u32 },
}
