#![deny(clippy::all)]

/**
 * Template Compiler CLI
 *
 * Project configuration, parallel compilation and output writing for `tplc`.
 */
pub use template_compiler as compiler;

pub mod compile;
pub mod config;
pub mod logging;
pub mod perform_compile;

/// CLI version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
