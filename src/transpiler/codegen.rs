use crate::script::document::{Callable, Constant, Document, EntityKind, TextTree, Variable};
use crate::transpiler::defaults::{Options, SectionHeader};
use crate::transpiler::diagnostics::Diagnostics;
use crate::transpiler::errors::Diagnostic;
use crate::transpiler::preprocess::join_body;
use crate::transpiler::text::{banner, inline_comment, render_comment, render_comment_entry};
use tracing::debug;

/// Renders a preprocessed [`Document`] to GDScript.
///
/// Sections come out in a fixed order (header comments, constants, variables,
/// functions, methods), separated by one blank line. Sections with nothing in
/// them are left out entirely, so an empty document renders to "".
pub struct GdScriptGenerator<'a> {
    options: &'a Options,
}

impl<'a> GdScriptGenerator<'a> {
    pub fn new(options: &'a Options) -> Self {
        Self { options }
    }

    pub fn generate(&self, document: &Document, diagnostics: &mut Diagnostics) -> String {
        let emit = &self.options.emit;
        let mut sections = Vec::new();

        if !document.header_comments.is_empty() {
            sections.push(self.generate_header_comments(&document.header_comments));
        }

        if !document.constants.is_empty() {
            let body = document
                .constants
                .iter()
                .enumerate()
                .filter_map(|(index, constant)| self.generate_constant(constant, index, diagnostics))
                .collect::<String>();
            sections.push(self.generate_section(&emit.constants, body));
        }

        if !document.variables.is_empty() {
            let body = document
                .variables
                .iter()
                .enumerate()
                .filter_map(|(index, variable)| self.generate_variable(variable, index, diagnostics))
                .collect::<String>();
            sections.push(self.generate_section(&emit.variables, body));
        }

        if !document.functions.is_empty() {
            let body = self.generate_callables(&document.functions, EntityKind::Function, diagnostics);
            sections.push(self.generate_section(&emit.functions, body));
        }

        if !document.methods.is_empty() {
            let body = self.generate_callables(&document.methods, EntityKind::Method, diagnostics);
            sections.push(self.generate_section(&emit.methods, body));
        }

        sections.retain(|section| !section.is_empty());
        debug!(sections = sections.len(), "rendered script sections");

        sections.join(&emit.end_line)
    }

    fn generate_header_comments(&self, comments: &[TextTree]) -> String {
        let style = &self.options.comment;
        comments
            .iter()
            .map(|comment| render_comment(&comment.join(&style.end_line), style, style.comment_padding))
            .collect()
    }

    fn generate_section(&self, header: &SectionHeader, body: String) -> String {
        if !header.print {
            return body;
        }
        let mut code = banner(&header.title, &self.options.comment);
        code.push_str(&body);
        code
    }

    fn generate_constant(
        &self,
        constant: &Constant,
        index: usize,
        diagnostics: &mut Diagnostics,
    ) -> Option<String> {
        if constant.spacer {
            return Some(self.options.emit.end_line.clone());
        }
        let Some(name) = constant.declared_name() else {
            diagnostics.push(missing(EntityKind::Constant, "name", format!("#{}", index)));
            return None;
        };
        let Some(value) = constant.declared_value() else {
            diagnostics.push(missing(EntityKind::Constant, "value", format!("'{}'", name)));
            return None;
        };

        let style = &self.options.comment;
        let mut code: String = constant
            .comments
            .iter()
            .map(|comment| render_comment_entry(comment, style))
            .collect();

        code.push_str(&format!("const {}", name.to_uppercase()));
        push_type(&mut code, constant.type_hint.as_deref());
        code.push_str(&format!(" = {}", value));
        if let Some(comment) = &constant.comment {
            code.push_str(&inline_comment(comment, style));
        }
        code.push_str(&style.end_line);

        Some(code)
    }

    fn generate_variable(
        &self,
        variable: &Variable,
        index: usize,
        diagnostics: &mut Diagnostics,
    ) -> Option<String> {
        if variable.spacer {
            return Some(self.options.emit.end_line.clone());
        }
        let Some(name) = variable.declared_name() else {
            diagnostics.push(missing(EntityKind::Variable, "name", format!("#{}", index)));
            return None;
        };

        let emit = &self.options.emit;
        let style = &self.options.comment;
        let mut code: String = variable
            .comments
            .iter()
            .map(|comment| render_comment_entry(comment, style))
            .collect();

        if variable.export {
            code.push_str(&self.export_marker(variable.type_hint.as_deref()));
        }

        code.push_str(&format!("var {}", name));
        push_type(&mut code, variable.type_hint.as_deref());

        if let Some(value) = variable.declared_value() {
            if variable.generate_default {
                code.push_str(&format!(" = {}", self.options.constant.reference(name)));
            } else {
                code.push_str(&format!(" = {}", value));
            }
        }

        if let Some(setget) = variable.setget.as_deref().filter(|s| !s.trim().is_empty()) {
            if emit.uses_export_annotation() {
                diagnostics.push(Diagnostic::UnsupportedSetget {
                    variable: name.to_string(),
                    version: emit.target_version,
                });
            } else {
                code.push_str(&format!(" setget {}", setget));
            }
        }

        if let Some(comment) = &variable.comment {
            code.push_str(&inline_comment(comment, style));
        }
        code.push_str(&style.end_line);

        Some(code)
    }

    /// `@export ` for Godot 4 and later, `export(<type>) ` before that.
    fn export_marker(&self, type_hint: Option<&str>) -> String {
        if self.options.emit.uses_export_annotation() {
            return "@export ".to_string();
        }
        match type_hint.filter(|t| !t.trim().is_empty()) {
            Some(type_hint) => format!("export({}) ", type_hint),
            None => "export ".to_string(),
        }
    }

    fn generate_callables(
        &self,
        callables: &[Callable],
        kind: EntityKind,
        diagnostics: &mut Diagnostics,
    ) -> String {
        callables
            .iter()
            .enumerate()
            .filter_map(|(index, callable)| self.generate_callable(callable, kind, index, diagnostics))
            .collect()
    }

    fn generate_callable(
        &self,
        callable: &Callable,
        kind: EntityKind,
        index: usize,
        diagnostics: &mut Diagnostics,
    ) -> Option<String> {
        if callable.spacer {
            return Some(self.options.emit.end_line.clone());
        }
        let Some(name) = callable.declared_name() else {
            diagnostics.push(missing(kind, "name", format!("#{}", index)));
            return None;
        };

        let eol = &self.options.emit.end_line;
        let mut code = format!("func {}({})", name, callable.parameters.join(", "));
        if let Some(return_type) = callable.return_type.as_deref().filter(|t| !t.trim().is_empty()) {
            code.push_str(&format!(" -> {}", return_type));
        }
        code.push(':');
        code.push_str(eol);

        match &callable.body {
            Some(body) => code.push_str(body),
            None => code.push_str(&join_body(callable, &self.options.callable)),
        }
        code.push_str(eol);

        Some(code)
    }
}

fn push_type(code: &mut String, type_hint: Option<&str>) {
    if let Some(type_hint) = type_hint.filter(|t| !t.trim().is_empty()) {
        code.push_str(&format!(":{}", type_hint));
    }
}

fn missing(entity: EntityKind, field: &'static str, at: String) -> Diagnostic {
    Diagnostic::MissingRequiredField { entity, field, at }
}
