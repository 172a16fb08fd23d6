use crate::script::document::{Callable, Document};
use crate::transpiler::defaults::CallableDefaults;
use crate::transpiler::text::indent_block;
use once_cell::sync::Lazy;
use regex::Regex;

/// Return type marking a callable that produces no value.
pub const NO_RETURN_TYPE: &str = "void";

/// A line ending in `return <identifier>`.
static RETURN_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\breturn\s+[A-Za-z_][A-Za-z0-9_]*\s*;?\s*$").expect("return pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallableKind {
    /// Produces a value.
    Function,
    /// Runs for its side effects.
    Method,
}

/// Decides whether a callable without an explicit return type is a function or a method.
pub trait ClassificationStrategy {
    fn classify(&self, callable: &Callable) -> CallableKind;
}

/// An explicit return type settles the question: `void` is a method, anything else a function.
pub fn kind_from_return_type(callable: &Callable) -> Option<CallableKind> {
    let return_type = callable.return_type.as_deref().map(str::trim)?;
    match return_type {
        "" => None,
        NO_RETURN_TYPE => Some(CallableKind::Method),
        _ => Some(CallableKind::Function),
    }
}

/// Default strategy: a callable with any line ending in `return <identifier>`
/// is a function.
///
/// Returns of computed expressions (`return a + b`, `return self.x`) are not
/// recognised and classify as methods.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReturnStatementHeuristic;

impl ClassificationStrategy for ReturnStatementHeuristic {
    fn classify(&self, callable: &Callable) -> CallableKind {
        if callable
            .code
            .lines()
            .iter()
            .any(|line| RETURN_VALUE.is_match(line))
        {
            CallableKind::Function
        } else {
            CallableKind::Method
        }
    }
}

/// Moves every callable into `functions` or `methods` and joins its body.
///
/// An explicit return type decides first; `strategy` only sees callables
/// without one. Spacers stay with the callable before them, or in the list
/// they came from when nothing precedes them. Callables already sorted by an
/// earlier run are classified again, so the stage can be repeated.
pub fn classify_callables(
    document: &mut Document,
    strategy: &dyn ClassificationStrategy,
    defaults: &CallableDefaults,
) {
    let functions: Vec<Callable> = document.functions.drain(..).collect();
    let methods: Vec<Callable> = document.methods.drain(..).collect();

    for (origin, callables) in [
        (CallableKind::Function, functions),
        (CallableKind::Method, methods),
    ] {
        let mut previous = origin;
        for mut callable in callables {
            let kind = if callable.spacer {
                previous
            } else {
                callable.body = Some(join_body(&callable, defaults));
                kind_from_return_type(&callable).unwrap_or_else(|| strategy.classify(&callable))
            };
            previous = kind;
            match kind {
                CallableKind::Function => document.functions.push(callable),
                CallableKind::Method => document.methods.push(callable),
            }
        }
    }
}

/// Indented body text, or the placeholder body when there is no code.
pub fn join_body(callable: &Callable, defaults: &CallableDefaults) -> String {
    let lines = callable.code.lines();
    if lines.is_empty() {
        let placeholder: Vec<&str> = defaults.placeholder.iter().map(String::as_str).collect();
        return indent_block(&placeholder, &defaults.indent, &defaults.end_line);
    }
    indent_block(&lines, &defaults.indent, &defaults.end_line)
}
