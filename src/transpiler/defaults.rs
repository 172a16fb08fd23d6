use crate::script::loader::value_kind;
use crate::transpiler::diagnostics::Diagnostics;
use crate::transpiler::errors::{Diagnostic, LoadError};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use tracing::debug;

pub type OptionMap = Map<String, Value>;

pub const COMMENT_GROUP: &str = "comment";
pub const CONSTANT_GROUP: &str = "constant";
pub const FUNCTION_GROUP: &str = "function";

/// Appended to a group name that is not found before giving up on it.
pub const GROUP_SUFFIX: &str = "_defaults";

/// Godot 4 replaced `export(type)` with the `@export` annotation.
pub const ANNOTATION_EXPORT_VERSION: u32 = 4;

/// Global options plus named groups that override a subset of them.
#[derive(Debug, Clone, PartialEq)]
pub struct Defaults {
    global: OptionMap,
    groups: BTreeMap<String, OptionMap>,
}

impl Defaults {
    pub fn new(global: OptionMap) -> Self {
        Self {
            global,
            groups: BTreeMap::new(),
        }
    }

    pub fn with_group(mut self, name: impl Into<String>, options: OptionMap) -> Self {
        self.groups.insert(name.into(), options);
        self
    }

    pub fn builtin() -> Self {
        Self::new(object(json!({
            "prefer_multiline": true,
            "comment_char": "#",
            "comments_char": "\"\"\"",
            "end_line": "\n",
            "export_variable": false,
            "target_version": 4,
            "code_version": null,
            "print_header_constants": true,
            "print_header_variables": true,
            "print_header_functions": true,
            "print_header_methods": true,
            "header_constants": "Script Constant(s) / Default(s)",
            "header_variables": "Script Variable(s) / Exported Variable(s)",
            "header_functions": "Script Function(s)",
            "header_methods": "Script Method(s)",
        })))
        .with_group(
            COMMENT_GROUP,
            object(json!({
                "padding_char": " ",
                "header_padding": 1,
                "comment_padding": 1,
            })),
        )
        .with_group(
            CONSTANT_GROUP,
            object(json!({
                "constant_prefix": "DEFAULT_",
                "constant_suffix": "",
                "generate_constant": false,
            })),
        )
        .with_group(
            FUNCTION_GROUP,
            object(json!({
                "return_type": null,
                "parameters": [],
                "code": ["pass"],
                "indent": "\t",
            })),
        )
    }

    pub fn global(&self) -> &OptionMap {
        &self.global
    }

    pub fn group(&self, name: &str) -> Option<&OptionMap> {
        self.groups.get(name)
    }

    /// Sets a global option.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.global.insert(key.into(), value);
    }

    /// Layers a JSON settings object on top of the current options.
    ///
    /// Object values override the group of the same name key by key. Scalar
    /// values go to the group that already defines the key, or to the global map.
    pub fn merge(&mut self, overrides: &Value) -> Result<(), LoadError> {
        let Value::Object(entries) = overrides else {
            return Err(LoadError::InvalidSettings {
                found: value_kind(overrides).to_string(),
            });
        };

        for (key, value) in entries {
            match value {
                Value::Object(group_entries) => {
                    let group = self.groups.entry(key.clone()).or_default();
                    for (group_key, group_value) in group_entries {
                        group.insert(group_key.clone(), group_value.clone());
                    }
                }
                _ => {
                    let owner = self
                        .groups
                        .values_mut()
                        .find(|group| group.contains_key(key));
                    match owner {
                        Some(group) => group.insert(key.clone(), value.clone()),
                        None => self.global.insert(key.clone(), value.clone()),
                    };
                }
            }
        }

        Ok(())
    }

    /// Global options overlaid with `group`. See [`Defaults::resolve_into`].
    pub fn resolve(&self, group: &str) -> ResolvedOptions {
        self.resolve_into(group, &mut Diagnostics::new())
    }

    /// An empty group yields the global map. An unknown group is retried with
    /// [`GROUP_SUFFIX`] and then falls back to the global map with a warning.
    pub fn resolve_into(&self, group: &str, diagnostics: &mut Diagnostics) -> ResolvedOptions {
        let mut values = self.global.clone();
        if group.is_empty() {
            return ResolvedOptions { values };
        }

        let overrides = self
            .groups
            .get(group)
            .or_else(|| self.groups.get(&format!("{}{}", group, GROUP_SUFFIX)));

        match overrides {
            Some(overrides) => {
                for (key, value) in overrides {
                    values.insert(key.clone(), value.clone());
                }
                debug!(group, keys = overrides.len(), "resolved option group");
            }
            None => diagnostics.push(Diagnostic::UnknownConfigGroup {
                group: group.to_string(),
            }),
        }

        ResolvedOptions { values }
    }
}

impl Default for Defaults {
    fn default() -> Self {
        Self::builtin()
    }
}

fn object(value: Value) -> OptionMap {
    match value {
        Value::Object(map) => map,
        _ => OptionMap::new(),
    }
}

/// A flat option map produced by [`Defaults::resolve`]. Read once into the typed views below.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOptions {
    values: OptionMap,
}

impl ResolvedOptions {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn as_map(&self) -> &OptionMap {
        &self.values
    }

    fn string(&self, key: &str, fallback: &str, diagnostics: &mut Diagnostics) -> String {
        match self.values.get(key) {
            Some(Value::String(text)) => text.clone(),
            None | Some(Value::Null) => fallback.to_string(),
            Some(_) => invalid(key, "a string", fallback.to_string(), diagnostics),
        }
    }

    fn optional_string(&self, key: &str, diagnostics: &mut Diagnostics) -> Option<String> {
        match self.values.get(key) {
            Some(Value::String(text)) if !text.is_empty() => Some(text.clone()),
            None | Some(Value::Null) | Some(Value::String(_)) => None,
            Some(_) => invalid(key, "a string", None, diagnostics),
        }
    }

    fn boolean(&self, key: &str, fallback: bool, diagnostics: &mut Diagnostics) -> bool {
        match self.values.get(key) {
            Some(Value::Bool(flag)) => *flag,
            None | Some(Value::Null) => fallback,
            Some(_) => invalid(key, "a boolean", fallback, diagnostics),
        }
    }

    /// A non-negative integer that fits `T`. Anything else is reported and treated as unset.
    fn optional_count<T: TryFrom<u64>>(&self, key: &str, diagnostics: &mut Diagnostics) -> Option<T> {
        match self.values.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::Number(number)) => match number.as_u64().map(T::try_from) {
                Some(Ok(count)) => Some(count),
                _ => invalid(key, "a non-negative integer in range", None, diagnostics),
            },
            Some(_) => invalid(key, "a non-negative integer", None, diagnostics),
        }
    }

    fn count<T: TryFrom<u64>>(&self, key: &str, fallback: T, diagnostics: &mut Diagnostics) -> T {
        self.optional_count(key, diagnostics).unwrap_or(fallback)
    }

    fn string_list(&self, key: &str, fallback: &[&str], diagnostics: &mut Diagnostics) -> Vec<String> {
        let owned = || fallback.iter().map(|s| s.to_string()).collect();
        match self.values.get(key) {
            Some(Value::Array(items)) if items.iter().all(Value::is_string) => items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
            Some(Value::String(single)) => vec![single.clone()],
            None | Some(Value::Null) => owned(),
            Some(_) => invalid(key, "a list of strings", owned(), diagnostics),
        }
    }
}

fn invalid<T>(key: &str, expected: &'static str, fallback: T, diagnostics: &mut Diagnostics) -> T {
    diagnostics.push(Diagnostic::InvalidOption {
        key: key.to_string(),
        expected,
    });
    fallback
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentStyle {
    pub prefer_multiline: bool,
    pub comment_char: String,
    pub comments_char: String,
    pub padding_char: String,
    pub header_padding: usize,
    pub comment_padding: usize,
    pub end_line: String,
}

impl CommentStyle {
    pub fn from_resolved(options: &ResolvedOptions, diagnostics: &mut Diagnostics) -> Self {
        Self {
            prefer_multiline: options.boolean("prefer_multiline", true, diagnostics),
            comment_char: options.string("comment_char", "#", diagnostics),
            comments_char: options.string("comments_char", "\"\"\"", diagnostics),
            padding_char: options.string("padding_char", " ", diagnostics),
            header_padding: options.count("header_padding", 1, diagnostics),
            comment_padding: options.count("comment_padding", 1, diagnostics),
            end_line: options.string("end_line", "\n", diagnostics),
        }
    }

    /// Marker for documentation comments, shown as tooltips by the editor (`## `).
    pub fn doc_marker(&self) -> String {
        format!("{0}{0} ", self.comment_char)
    }

    pub fn plain_marker(&self) -> String {
        format!("{} ", self.comment_char)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantNaming {
    pub prefix: String,
    pub suffix: String,
    /// Synthesize a default constant for every variable with a value.
    pub generate_constant: bool,
}

impl ConstantNaming {
    pub fn from_resolved(options: &ResolvedOptions, diagnostics: &mut Diagnostics) -> Self {
        Self {
            prefix: options.string("constant_prefix", "DEFAULT_", diagnostics),
            suffix: options.string("constant_suffix", "", diagnostics),
            generate_constant: options.boolean("generate_constant", false, diagnostics),
        }
    }

    pub fn synthesized_name(&self, variable: &str) -> String {
        format!("{}{}{}", self.prefix, variable, self.suffix)
    }

    /// The identifier a variable uses to refer to its synthesized constant.
    pub fn reference(&self, variable: &str) -> String {
        self.synthesized_name(variable).to_uppercase()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallableDefaults {
    pub return_type: Option<String>,
    pub parameters: Vec<String>,
    pub placeholder: Vec<String>,
    pub indent: String,
    pub end_line: String,
}

impl CallableDefaults {
    pub fn from_resolved(options: &ResolvedOptions, diagnostics: &mut Diagnostics) -> Self {
        Self {
            return_type: options.optional_string("return_type", diagnostics),
            parameters: options.string_list("parameters", &[], diagnostics),
            placeholder: options.string_list("code", &["pass"], diagnostics),
            indent: options.string("indent", "\t", diagnostics),
            end_line: options.string("end_line", "\n", diagnostics),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionHeader {
    pub print: bool,
    pub title: String,
}

impl SectionHeader {
    fn from_resolved(
        options: &ResolvedOptions,
        section: &str,
        title: &str,
        diagnostics: &mut Diagnostics,
    ) -> Self {
        Self {
            print: options.boolean(&format!("print_header_{}", section), true, diagnostics),
            title: options.string(&format!("header_{}", section), title, diagnostics),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    pub end_line: String,
    /// Export every variable regardless of its own flag.
    pub export_variable: bool,
    pub target_version: u32,
    /// Godot version callable code is written for. Migrated to `target_version` when set.
    pub code_version: Option<u32>,
    pub constants: SectionHeader,
    pub variables: SectionHeader,
    pub functions: SectionHeader,
    pub methods: SectionHeader,
}

impl EmitOptions {
    pub fn from_resolved(options: &ResolvedOptions, diagnostics: &mut Diagnostics) -> Self {
        Self {
            end_line: options.string("end_line", "\n", diagnostics),
            export_variable: options.boolean("export_variable", false, diagnostics),
            target_version: options.count("target_version", 4, diagnostics),
            code_version: options.optional_count("code_version", diagnostics),
            constants: SectionHeader::from_resolved(
                options,
                "constants",
                "Script Constant(s) / Default(s)",
                diagnostics,
            ),
            variables: SectionHeader::from_resolved(
                options,
                "variables",
                "Script Variable(s) / Exported Variable(s)",
                diagnostics,
            ),
            functions: SectionHeader::from_resolved(
                options,
                "functions",
                "Script Function(s)",
                diagnostics,
            ),
            methods: SectionHeader::from_resolved(
                options,
                "methods",
                "Script Method(s)",
                diagnostics,
            ),
        }
    }

    pub fn uses_export_annotation(&self) -> bool {
        self.target_version >= ANNOTATION_EXPORT_VERSION
    }
}

/// Every option the pipeline and the emitter read, resolved once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub comment: CommentStyle,
    pub constant: ConstantNaming,
    pub callable: CallableDefaults,
    pub emit: EmitOptions,
}

impl Options {
    pub fn resolve(defaults: &Defaults, diagnostics: &mut Diagnostics) -> Self {
        let comment = defaults.resolve_into(COMMENT_GROUP, diagnostics);
        let constant = defaults.resolve_into(CONSTANT_GROUP, diagnostics);
        let callable = defaults.resolve_into(FUNCTION_GROUP, diagnostics);
        let global = defaults.resolve_into("", diagnostics);

        Self {
            comment: CommentStyle::from_resolved(&comment, diagnostics),
            constant: ConstantNaming::from_resolved(&constant, diagnostics),
            callable: CallableDefaults::from_resolved(&callable, diagnostics),
            emit: EmitOptions::from_resolved(&global, diagnostics),
        }
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::resolve(&Defaults::builtin(), &mut Diagnostics::new())
    }
}
