//! # DTK Engine - Design Token Expression Engine
//!
//! Function catalog, color math, expression evaluation and tree resolution on top of
//! the `dtk_core` tree model, parser and reference resolver.
//!
//! ```no_run
//! use dtk_engine::TokenEngine;
//! use dtk_core::TokenTree;
//!
//! let tree = TokenTree::parse(r##"{ "color": { "brand": { "value": "#6366f1" } } }"##)?;
//! let engine = TokenEngine::new();
//! let value = engine.resolve_one(&"tint({color.brand}, 80%)".into(), &tree);
//! # Ok::<(), dtk_core::TreeError>(())
//! ```

pub mod catalog;
pub mod color;
pub mod engine;
pub mod functions;
pub mod processor;
pub mod report;
pub mod walker;

pub use catalog::{
    CatalogError, FunctionCatalog, FunctionContext, FunctionError, FunctionFamily, FunctionInfo,
    FunctionResult, TokenFunction,
};
pub use engine::TokenEngine;
pub use processor::ExpressionProcessor;
pub use report::ResolutionReport;
pub use walker::{TreeWalker, WalkStats};

pub mod prelude {
    pub use crate::catalog::{FunctionCatalog, FunctionContext, FunctionError, FunctionFamily};
    pub use crate::engine::TokenEngine;
    pub use crate::report::ResolutionReport;
    pub use dtk_core::config::EngineConfig;
    pub use dtk_core::tree::{Token, TokenTree};
}
