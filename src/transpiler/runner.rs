use crate::script::document::Document;
use crate::script::loader::DocumentLoader;
use crate::transpiler::codegen::GdScriptGenerator;
use crate::transpiler::defaults::{Defaults, Options};
use crate::transpiler::diagnostics::Diagnostics;
use crate::transpiler::migration::Migrator;
use crate::transpiler::preprocess::Preprocessor;
use anyhow::{Context, Result};
use serde_json::Value;
use std::io::Write;
use tracing::{debug, info};

/// The generated script and every warning raised while producing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub script: String,
    pub diagnostics: Diagnostics,
}

/// Load → preprocess → emit.
///
/// Options are layered as: base defaults, then the document's own `settings`,
/// then `overrides` (typically command-line flags).
pub struct Runner<L> {
    loader: L,
    defaults: Defaults,
    overrides: Option<Value>,
    migrator: Migrator<'static>,
}

impl<L: DocumentLoader> Runner<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            defaults: Defaults::builtin(),
            overrides: None,
            migrator: Migrator::godot(),
        }
    }

    pub fn with_defaults(mut self, defaults: Defaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_overrides(mut self, overrides: Value) -> Self {
        self.overrides = Some(overrides);
        self
    }

    pub fn with_migrator(mut self, migrator: Migrator<'static>) -> Self {
        self.migrator = migrator;
        self
    }

    /// Generates the script in memory.
    ///
    /// Fails when the document cannot be loaded, when its settings or the
    /// overrides are not JSON objects, or when no rename table covers the step
    /// from `code_version` to `target_version`. Skipped entities are reported
    /// as diagnostics instead.
    pub fn generate(&self) -> Result<GenerationReport> {
        let loaded = self
            .loader
            .load()
            .context("Failed to load script description")?;

        let mut defaults = self.defaults.clone();
        if let Some(settings) = &loaded.settings {
            defaults.merge(settings).context("Invalid document settings")?;
        }
        if let Some(overrides) = &self.overrides {
            defaults.merge(overrides).context("Invalid option overrides")?;
        }

        let mut diagnostics = Diagnostics::new();
        let options = Options::resolve(&defaults, &mut diagnostics);

        let mut document = loaded.document;
        self.migrate_code(&mut document, &options)?;

        Preprocessor::new(&options).run(&mut document, &mut diagnostics);
        let script = GdScriptGenerator::new(&options).generate(&document, &mut diagnostics);

        info!(
            bytes = script.len(),
            warnings = diagnostics.len(),
            "generated script"
        );
        Ok(GenerationReport {
            script,
            diagnostics,
        })
    }

    /// Generates the script and writes it to `sink`. Nothing is written if loading fails.
    pub fn run<W: Write>(&self, sink: &mut W) -> Result<GenerationReport> {
        let report = self.generate()?;
        sink.write_all(report.script.as_bytes())
            .context("Failed to write generated script")?;
        sink.flush().context("Failed to flush generated script")?;
        Ok(report)
    }

    /// Rewrites callable code written for `code_version` to the target version.
    fn migrate_code(&self, document: &mut Document, options: &Options) -> Result<()> {
        let Some(code_version) = options.emit.code_version else {
            return Ok(());
        };
        let target = options.emit.target_version;
        let plan = self
            .migrator
            .plan(code_version, target)
            .context("Cannot migrate callable code")?;
        if plan.is_empty() {
            return Ok(());
        }

        debug!(from = code_version, to = target, "migrating callable code");
        for callable in document.functions.iter_mut().chain(document.methods.iter_mut()) {
            callable.code.map_lines(|line| plan.apply(line));
        }
        Ok(())
    }
}
