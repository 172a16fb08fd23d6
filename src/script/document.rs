use serde::de::Error as _;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Text that may be nested arbitrarily deep, as found in tooltips and header comments.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TextTree {
    Line(String),
    Nested(Vec<TextTree>),
}

impl TextTree {
    /// Depth-first list of every line in the tree.
    pub fn flatten(&self) -> Vec<String> {
        let mut lines = Vec::new();
        self.flatten_into(&mut lines);
        lines
    }

    fn flatten_into(&self, lines: &mut Vec<String>) {
        match self {
            TextTree::Line(line) => lines.push(line.clone()),
            TextTree::Nested(children) => {
                for child in children {
                    child.flatten_into(lines);
                }
            }
        }
    }

    /// Recursively joins the tree with `separator`. An empty list joins to "".
    pub fn join(&self, separator: &str) -> String {
        match self {
            TextTree::Line(line) => line.clone(),
            TextTree::Nested(children) => children
                .iter()
                .map(|child| child.join(separator))
                .collect::<Vec<_>>()
                .join(separator),
        }
    }
}

impl From<&str> for TextTree {
    fn from(line: &str) -> Self {
        TextTree::Line(line.to_string())
    }
}

/// A single comment line attached to a constant or variable.
///
/// Comments read from the document carry no marker or padding; those come from
/// the comment group at render time. Lowered tooltips fix both.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub struct Comment {
    pub marker: Option<String>,
    pub padding: Option<usize>,
    pub text: String,
}

impl Comment {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            marker: None,
            padding: None,
            text: text.into(),
        }
    }

    pub fn marked(marker: impl Into<String>, padding: usize, text: impl Into<String>) -> Self {
        Self {
            marker: Some(marker.into()),
            padding: Some(padding),
            text: text.into(),
        }
    }
}

impl From<String> for Comment {
    fn from(text: String) -> Self {
        Comment::plain(text)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Constant {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub type_hint: Option<String>,
    #[serde(deserialize_with = "literal")]
    pub value: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub comments: Vec<Comment>,
    /// Trailing comment printed on the declaration line.
    pub comment: Option<String>,
    pub tooltip: Option<TextTree>,
    #[serde(skip)]
    pub spacer: bool,
}

impl Constant {
    pub fn new(name: impl Into<String>, type_hint: Option<String>, value: Option<String>) -> Self {
        Self {
            name: Some(name.into()),
            type_hint,
            value,
            ..Default::default()
        }
    }

    pub fn declared_name(&self) -> Option<&str> {
        non_empty(&self.name)
    }

    pub fn declared_value(&self) -> Option<&str> {
        non_empty(&self.value)
    }
}

impl Spacer for Constant {
    fn spacer() -> Self {
        Self {
            spacer: true,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Variable {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub type_hint: Option<String>,
    #[serde(deserialize_with = "literal")]
    pub value: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub export: bool,
    #[serde(deserialize_with = "nullable")]
    pub generate_default: bool,
    pub setget: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub comments: Vec<Comment>,
    pub comment: Option<String>,
    /// Removed by tooltip lowering.
    pub tooltip: Option<TextTree>,
    #[serde(skip)]
    pub spacer: bool,
}

impl Variable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn declared_name(&self) -> Option<&str> {
        non_empty(&self.name)
    }

    pub fn declared_value(&self) -> Option<&str> {
        non_empty(&self.value)
    }
}

impl Spacer for Variable {
    fn spacer() -> Self {
        Self {
            spacer: true,
            ..Default::default()
        }
    }
}

/// Source lines of a callable body, either listed one per entry or pre-joined.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Code {
    Lines(Vec<String>),
    Block(String),
}

impl Default for Code {
    fn default() -> Self {
        Code::Lines(Vec::new())
    }
}

impl Code {
    pub fn lines(&self) -> Vec<&str> {
        match self {
            Code::Lines(lines) => lines.iter().map(String::as_str).collect(),
            Code::Block(block) => block.lines().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines().is_empty()
    }

    /// Rewrites every line through `f`, keeping the list/block shape.
    pub fn map_lines<F>(&mut self, mut f: F)
    where
        F: FnMut(&str) -> String,
    {
        *self = match self {
            Code::Lines(lines) => Code::Lines(lines.iter().map(|line| f(line)).collect()),
            Code::Block(block) => {
                Code::Block(block.lines().map(|line| f(line)).collect::<Vec<_>>().join("\n"))
            }
        };
    }
}

/// A `func` entry. Whether it lands in `functions` or `methods` is decided by classification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Callable {
    pub name: Option<String>,
    #[serde(rename = "type", alias = "return_type")]
    pub return_type: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub parameters: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub code: Code,
    /// Indented, joined body text. Set by classification.
    #[serde(skip)]
    pub body: Option<String>,
    #[serde(skip)]
    pub spacer: bool,
}

impl Callable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_code<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.code = Code::Lines(lines.into_iter().map(Into::into).collect());
        self
    }

    pub fn declared_name(&self) -> Option<&str> {
        non_empty(&self.name)
    }
}

impl Spacer for Callable {
    fn spacer() -> Self {
        Self {
            spacer: true,
            ..Default::default()
        }
    }
}

/// An entity that can stand in for a blank line.
///
/// A `null` or `{}` entry in an entity list is read as a spacer and renders as
/// one empty line, so documents can group declarations by hand.
pub trait Spacer {
    fn spacer() -> Self;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Document {
    #[serde(deserialize_with = "nullable")]
    pub header_comments: Vec<TextTree>,
    #[serde(deserialize_with = "entries")]
    pub constants: Vec<Constant>,
    #[serde(deserialize_with = "entries")]
    pub variables: Vec<Variable>,
    #[serde(deserialize_with = "entries")]
    pub functions: Vec<Callable>,
    #[serde(skip)]
    pub methods: Vec<Callable>,
}

impl Document {
    pub fn is_empty(&self) -> bool {
        self.header_comments.is_empty()
            && self.constants.is_empty()
            && self.variables.is_empty()
            && self.functions.is_empty()
            && self.methods.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Constant,
    Variable,
    Function,
    Method,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        let label = match self {
            EntityKind::Constant => "constant",
            EntityKind::Variable => "variable",
            EntityKind::Function => "function",
            EntityKind::Method => "method",
        };
        write!(f, "{}", label)
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|text| !text.trim().is_empty())
}

/// Treats an explicit `null` the same as an absent key.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Entity list where `null` and `{}` entries become spacers.
fn entries<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Spacer,
{
    let Some(values) = Option::<Vec<Value>>::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    values
        .into_iter()
        .map(|value| match value {
            Value::Null => Ok(T::spacer()),
            Value::Object(map) if map.is_empty() => Ok(T::spacer()),
            value => T::deserialize(value).map_err(D::Error::custom),
        })
        .collect()
}

/// Values are opaque source text; numbers and booleans keep their JSON spelling.
fn literal<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(Value::Number(number)) => Ok(Some(number.to_string())),
        Some(Value::Bool(flag)) => Ok(Some(flag.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected a literal value, found {}",
            other
        ))),
    }
}
