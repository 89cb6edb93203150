//! # pycpp-core — Python-to-C++ translation engine
//!
//! Translates a constrained, annotation-friendly subset of Python into a
//! compile-ready C++ draft. The engine is a single syntax-directed pass
//! over the Python AST: statements append indented lines, expressions
//! return fragments, and recognized library idioms rewrite to their C++
//! equivalents while accumulating the include directives the output
//! depends on.
//!
//! ## Example
//!
//! ```rust
//! use pycpp_core::TranspilePipeline;
//!
//! let pipeline = TranspilePipeline::new();
//! let python = "def add(a: int, b: int) -> int:\n    return a + b\n";
//!
//! let cpp = pipeline.transpile(python).unwrap();
//! assert!(cpp.contains("int add(int a, int b)"));
//! ```
//!
//! ## Architecture
//!
//! 1. **Parsing** ([`python_parser`]) — the external front end; a thin
//!    facade over `rustpython_parser`.
//! 2. **Code generation** ([`cpp_gen`]) — the tree walker: statement and
//!    expression dispatch, recognized-call rewriting, class and coroutine
//!    emission, include accumulation.
//! 3. **Type selection** ([`type_infer`]) — right-hand-side shape rules
//!    applied at variable introduction sites.
//! 4. **Tables** ([`module_mapper`], [`exceptions`]) — import→include and
//!    exception-name mappings.

pub mod cpp_gen;
pub mod error;
pub mod exceptions;
pub mod module_mapper;
pub mod python_parser;
pub mod type_infer;

use std::path::Path;

use anyhow::Result;
use rustpython_ast as ast;
use serde::{Deserialize, Serialize};

pub use cpp_gen::CppCodegen;
pub use error::{ErrorKind, TranspileError};
pub use type_infer::TypeFallback;

/// Configuration for one translation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranspileOptions {
    /// Type used for bindings whose right-hand side carries no cue.
    #[serde(default)]
    pub type_fallback: TypeFallback,
}

/// The main entry point for translating Python sources.
///
/// A pipeline is cheap to construct and holds only configuration; every
/// translation builds a fresh generator, so a pipeline may be reused (or
/// shared) freely.
///
/// ```rust
/// use pycpp_core::{TranspileOptions, TranspilePipeline, TypeFallback};
///
/// let pipeline = TranspilePipeline::new().with_options(TranspileOptions {
///     type_fallback: TypeFallback::Auto,
/// });
/// let cpp = pipeline.transpile("x = compute()\n").unwrap();
/// assert_eq!(cpp, "auto x = compute();");
/// ```
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TranspilePipeline {
    options: TranspileOptions,
}

impl TranspilePipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, options: TranspileOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &TranspileOptions {
        &self.options
    }

    /// Translate Python source text into C++ source text.
    pub fn transpile(&self, source: &str) -> Result<String> {
        let module = python_parser::parse_module(source, "<input>")?;
        self.generate(&module)
    }

    /// Read, parse, and translate a Python file.
    pub fn transpile_file(&self, path: &Path) -> Result<String> {
        let module = python_parser::parse_file(path)?;
        self.generate(&module)
    }

    fn generate(&self, module: &ast::Mod) -> Result<String> {
        tracing::debug!(options = ?self.options, "starting code generation");
        CppCodegen::new(self.options).generate(module)
    }
}

/// Translate an already-parsed module with default options.
pub fn generate_cpp(module: &ast::Mod) -> Result<String> {
    CppCodegen::new(TranspileOptions::default()).generate(module)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_roundtrip() {
        let pipeline = TranspilePipeline::new();
        let cpp = pipeline
            .transpile("def add(a: int, b: int) -> int:\n    return a + b\n")
            .unwrap();
        assert_eq!(cpp, "int add(int a, int b) {\n    return a + b;\n}");
    }

    #[test]
    fn test_generate_cpp_from_parsed_module() {
        let module = python_parser::parse_module("x = 1\n", "<test>").unwrap();
        assert_eq!(generate_cpp(&module).unwrap(), "int x = 1;");
    }

    #[test]
    fn test_auto_fallback_option() {
        let pipeline = TranspilePipeline::new().with_options(TranspileOptions {
            type_fallback: TypeFallback::Auto,
        });
        assert_eq!(pipeline.transpile("x = f()\n").unwrap(), "auto x = f();");
    }

    #[test]
    fn test_parse_error_propagates() {
        let pipeline = TranspilePipeline::new();
        assert!(pipeline.transpile("def f(:\n").is_err());
    }
}
