use crate::script::document::Document;
use crate::transpiler::errors::LoadError;
use mockall::automock;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Key holding per-document option overrides.
pub const SETTINGS_KEY: &str = "settings";

/// A parsed document plus the option overrides it carried.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedDocument {
    pub document: Document,
    pub settings: Option<Value>,
}

/// Supplies the document to generate from. A failure here aborts the whole run.
#[automock]
pub trait DocumentLoader {
    fn load(&self) -> Result<LoadedDocument, LoadError>;
}

/// Reads a JSON script description from disk.
#[derive(Debug, Clone)]
pub struct JsonFileLoader {
    path: PathBuf,
}

impl JsonFileLoader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl DocumentLoader for JsonFileLoader {
    fn load(&self) -> Result<LoadedDocument, LoadError> {
        let source = fs::read_to_string(&self.path).map_err(|source| LoadError::Read {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), bytes = source.len(), "read script description");
        parse_document(&source)
    }
}

/// Parses a JSON script description held in memory.
#[derive(Debug, Clone)]
pub struct JsonStrLoader<'a> {
    source: &'a str,
}

impl<'a> JsonStrLoader<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }
}

impl DocumentLoader for JsonStrLoader<'_> {
    fn load(&self) -> Result<LoadedDocument, LoadError> {
        parse_document(self.source)
    }
}

pub fn parse_document(source: &str) -> Result<LoadedDocument, LoadError> {
    let mut root: Value = serde_json::from_str(source)?;
    let Value::Object(ref mut object) = root else {
        return Err(LoadError::NotAnObject {
            found: value_kind(&root).to_string(),
        });
    };
    let settings = object.remove(SETTINGS_KEY).filter(|s| !s.is_null());
    let document: Document = serde_json::from_value(root)?;

    debug!(
        constants = document.constants.len(),
        variables = document.variables.len(),
        functions = document.functions.len(),
        "parsed script description"
    );

    Ok(LoadedDocument { document, settings })
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Array(_) => "an array",
        Value::String(_) => "a string",
        Value::Number(_) => "a number",
        Value::Bool(_) => "a boolean",
        Value::Null => "null",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_settings_are_split_from_the_document() -> Result<()> {
        let loaded = parse_document(
            r#"{"settings": {"target_version": 3}, "variables": [{"name": "hp"}]}"#,
        )?;
        assert_eq!(loaded.document.variables.len(), 1);
        assert_eq!(loaded.settings, Some(serde_json::json!({"target_version": 3})));
        Ok(())
    }

    #[test]
    fn test_file_loader_reads_from_disk() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(file, r#"{{"constants": [{{"name": "max_hp", "value": 10}}]}}"#)?;

        let loaded = JsonFileLoader::new(file.path()).load()?;
        assert_eq!(loaded.document.constants[0].value.as_deref(), Some("10"));
        assert!(loaded.settings.is_none());
        Ok(())
    }

    #[test]
    fn test_missing_file_is_a_load_failure() {
        let result = JsonFileLoader::new("/definitely/not/here.json").load();
        assert!(matches!(result, Err(LoadError::Read { .. })));
    }

    #[test]
    fn test_non_object_root_is_rejected() {
        let result = parse_document("[1, 2]");
        let error = result.unwrap_err();
        assert!(error.to_string().contains("an array"), "got: {}", error);
    }
}
