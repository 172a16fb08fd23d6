mod classify;
mod constants;
mod tests;
mod tooltips;

pub use classify::{
    CallableKind, ClassificationStrategy, NO_RETURN_TYPE, ReturnStatementHeuristic,
    classify_callables, join_body, kind_from_return_type,
};
pub use constants::synthesize_constants;
pub use tooltips::lower_tooltips;

use crate::script::document::Document;
use crate::transpiler::defaults::Options;
use crate::transpiler::diagnostics::Diagnostics;
use tracing::debug;

/// Fills per-entity fields from the configured defaults so later stages and
/// the emitter read them directly.
pub fn apply_entity_defaults(document: &mut Document, options: &Options) {
    for variable in &mut document.variables {
        if options.emit.export_variable {
            variable.export = true;
        }
        if options.constant.generate_constant && variable.declared_value().is_some() {
            variable.generate_default = true;
        }
    }

    let callable = &options.callable;
    for entry in document.functions.iter_mut().chain(document.methods.iter_mut()) {
        if entry.return_type.is_none() {
            entry.return_type = callable.return_type.clone();
        }
        if entry.parameters.is_empty() && !callable.parameters.is_empty() {
            entry.parameters = callable.parameters.clone();
        }
    }
}

/// Runs the document-mutating stages in order: defaults, constant synthesis,
/// tooltip lowering, callable classification.
pub struct Preprocessor<'a> {
    options: &'a Options,
    strategy: Box<dyn ClassificationStrategy + 'a>,
}

impl<'a> Preprocessor<'a> {
    pub fn new(options: &'a Options) -> Self {
        Self {
            options,
            strategy: Box::new(ReturnStatementHeuristic),
        }
    }

    pub fn with_strategy(mut self, strategy: impl ClassificationStrategy + 'a) -> Self {
        self.strategy = Box::new(strategy);
        self
    }

    pub fn run(&self, document: &mut Document, diagnostics: &mut Diagnostics) {
        apply_entity_defaults(document, self.options);

        let added = synthesize_constants(document, &self.options.constant, diagnostics);
        debug!(added, "synthesized default constants");

        lower_tooltips(document, &self.options.comment);

        classify_callables(document, self.strategy.as_ref(), &self.options.callable);
        debug!(
            functions = document.functions.len(),
            methods = document.methods.len(),
            "classified callables"
        );
    }
}
