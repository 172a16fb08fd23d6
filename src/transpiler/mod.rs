pub mod codegen;
pub mod defaults;
pub mod diagnostics;
pub mod errors;
pub mod migration;
pub mod preprocess;
pub mod runner;
pub mod text;

pub use codegen::GdScriptGenerator;
pub use defaults::{Defaults, Options};
pub use diagnostics::Diagnostics;
pub use migration::{Migrator, RenameTable};
pub use runner::{GenerationReport, Runner};

use crate::script::loader::JsonStrLoader;
use anyhow::Result;

/// Convenience function to turn a JSON script description directly into GDScript
/// using the built-in options.
pub fn transpile(source: &str) -> Result<String> {
    let report = Runner::new(JsonStrLoader::new(source)).generate()?;
    Ok(report.script)
}
