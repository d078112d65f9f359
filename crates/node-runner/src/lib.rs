//! node process runner for the Vue template toolchain.
//!
//! Template compilation, pug rendering and render function normalization are
//! done by the project's own `vue-template-compiler`, `pug` and
//! `vue-template-es2015-compiler` packages, resolved from the project root.

mod runner;

pub use runner::{NodeCompiledTemplate, NodeError, NodeRunner};
