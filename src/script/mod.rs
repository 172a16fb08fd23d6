pub mod document;
pub mod loader;

pub use document::{Callable, Code, Comment, Constant, Document, EntityKind, Spacer, TextTree, Variable};
pub use loader::{DocumentLoader, JsonFileLoader, JsonStrLoader, LoadedDocument};
