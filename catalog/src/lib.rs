//!
//! Data model for the package catalog: the static description of every
//! pipeline module, the packages that can implement it, the dependency
//! edges between modules, and the extra parameters some packages need.
//!
//! The catalog is loaded once per invocation and treated as read-only by
//! everything downstream.

/// Catalog sections and loading
mod model;
pub use model::{Catalog, Module, ParamSpec, ParamType};

/// String-keyed map that keeps its JSON object order
mod ordered;
pub use ordered::OrderedMap;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("can't read catalog file")]
    Io(#[from] std::io::Error),
    #[error("can't parse catalog file")]
    Parse(#[from] serde_json::Error),
    #[error("catalog order names unknown module \"{0}\"")]
    UnknownModuleInOrder(String),
    #[error("catalog graph names unknown module \"{0}\"")]
    UnknownModuleInGraph(String),
    #[error("module \"{0}\" is missing from the catalog order")]
    ModuleNotInOrder(String),
}
