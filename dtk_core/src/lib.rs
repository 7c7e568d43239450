// Internal modules
pub mod config;
#[macro_use]
pub mod logging;
pub mod parser;
pub mod references;
pub mod tree;

// Re-export key types for library consumers
pub use config::{ConfigError, EngineConfig};
pub use logging::{DiagnosticCollector, LogEvent};
pub use parser::{Dimension, FunctionCall};
pub use references::ReferenceResolver;
pub use tree::{Token, TokenGroup, TokenNode, TokenTree, TreeError};
