//! Built-in function families
//!
//! Every function takes already-resolved string arguments and returns a literal
//! string. Typed parsing happens inside each function through [`args::Args`].

pub mod args;
pub mod color;
pub mod contrast;
pub mod math;
pub mod typography;

use crate::catalog::FunctionCatalog;

/// Install the color, contrast, typography and math families
pub(crate) fn register_builtins(catalog: &mut FunctionCatalog) {
    color::register(catalog);
    contrast::register(catalog);
    typography::register(catalog);
    math::register(catalog);
}
