pub mod cli;
pub mod logging;
pub mod script;
pub mod transpiler;

// Re-export commonly used types
pub use script::{Callable, Constant, Document, Variable};
pub use transpiler::{GdScriptGenerator, Options, Runner, transpile};
