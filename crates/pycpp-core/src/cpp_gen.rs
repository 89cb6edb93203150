//! The C++ code generator.
//!
//! A single depth-first pass over the Python module AST with two dispatch
//! entry points: [`CppCodegen::emit_stmt`] appends indented source lines to
//! the line buffer, while [`CppCodegen::convert_expr`] returns a C++
//! fragment without touching it. Include directives accumulate as a side
//! effect of traversal and are flushed, sorted, ahead of the emitted lines.
//!
//! One generator services exactly one module; all state below is owned by
//! the invocation and discarded with it.

mod call_gen;
mod class_gen;
mod expr_gen;
mod func_gen;
mod headers;
mod stmt_gen;

use std::collections::HashSet;

use anyhow::Result;
use fnv::FnvHashMap;
use indexmap::IndexMap;
use rustpython_ast::{self as ast};

use crate::error::{ErrorKind, TranspileError};
use crate::TranspileOptions;
use self::headers::HeaderSet;

/// Generates C++ source text from a parsed Python module.
pub struct CppCodegen {
    options: TranspileOptions,
    /// Emitted source lines, in traversal order.
    lines: Vec<String>,
    /// Current block nesting depth; every emitted line is prefixed with
    /// four spaces per level.
    indent: usize,
    headers: HeaderSet,
    /// Rendered types of parameters, consulted for loop-element and lambda
    /// parameter typing.
    var_types: FnvHashMap<String, String>,
    /// Name of the class whose body is being emitted, if any.
    current_class: Option<String>,
    /// Per-class member declarations in first-seen order.
    class_members: FnvHashMap<String, IndexMap<String, String>>,
    /// Names of async function definitions seen so far.
    async_functions: HashSet<String>,
    /// True while the body of an async definition is being emitted.
    in_async_fn: bool,
    /// Names the numeric-array module is known under in this source.
    array_aliases: HashSet<String>,
}

impl CppCodegen {
    pub fn new(options: TranspileOptions) -> Self {
        let array_aliases = ["numpy", "np"].iter().map(ToString::to_string).collect();
        Self {
            options,
            lines: Vec::new(),
            indent: 0,
            headers: HeaderSet::default(),
            var_types: FnvHashMap::default(),
            current_class: None,
            class_members: FnvHashMap::default(),
            async_functions: HashSet::new(),
            in_async_fn: false,
            array_aliases,
        }
    }

    /// Translate a module AST, consuming the generator.
    pub fn generate(mut self, module: &ast::Mod) -> Result<String> {
        let ast::Mod::Module(m) = module else {
            return Err(unsupported("non-module input"));
        };
        for stmt in &m.body {
            self.emit_stmt(stmt)?;
        }
        tracing::debug!(
            lines = self.lines.len(),
            includes = self.headers.len(),
            "module translated"
        );
        Ok(self.finish())
    }

    fn finish(self) -> String {
        let includes = self.headers.flush();
        let body = self.lines.join("\n");
        if includes.is_empty() {
            body
        } else {
            format!("{}\n\n{}", includes.join("\n"), body)
        }
    }

    /// Append a line at the current indentation.
    fn emit(&mut self, text: impl AsRef<str>) {
        self.lines
            .push(format!("{}{}", "    ".repeat(self.indent), text.as_ref()));
    }

    /// Append an empty separator line.
    fn emit_blank(&mut self) {
        self.lines.push(String::new());
    }

    /// Emit a statement list one level deeper than the current block.
    fn emit_block(&mut self, body: &[ast::Stmt]) -> Result<()> {
        self.indent += 1;
        for stmt in body {
            self.emit_stmt(stmt)?;
        }
        self.indent -= 1;
        Ok(())
    }

    /// Statement dispatch. Appends lines; returns nothing.
    pub(crate) fn emit_stmt(&mut self, stmt: &ast::Stmt) -> Result<()> {
        match stmt {
            ast::Stmt::FunctionDef(f) => self.emit_function(f),
            ast::Stmt::AsyncFunctionDef(f) => self.emit_async_function(f),
            ast::Stmt::ClassDef(c) => self.emit_class(c),
            ast::Stmt::Import(i) => self.emit_import(i),
            ast::Stmt::ImportFrom(i) => self.emit_import_from(i),
            ast::Stmt::Assign(a) => self.emit_assign(a),
            ast::Stmt::AugAssign(a) => self.emit_aug_assign(a),
            ast::Stmt::Return(r) => self.emit_return(r),
            ast::Stmt::Expr(e) => self.emit_expr_stmt(e),
            ast::Stmt::If(i) => self.emit_if(i),
            ast::Stmt::While(w) => self.emit_while(w),
            ast::Stmt::For(f) => self.emit_for(f),
            ast::Stmt::With(w) => self.emit_with(w),
            ast::Stmt::Try(t) => self.emit_try(t),
            ast::Stmt::Raise(r) => self.emit_raise(r),
            ast::Stmt::Break(_) => {
                self.emit("break;");
                Ok(())
            }
            ast::Stmt::Continue(_) => {
                self.emit("continue;");
                Ok(())
            }
            ast::Stmt::Pass(_) => Ok(()),
            other => Err(unsupported(stmt_kind(other))),
        }
    }
}

/// Build the fatal error for a construct outside the supported subset.
fn unsupported(what: &str) -> anyhow::Error {
    TranspileError::new(ErrorKind::UnsupportedConstruct(what.to_string())).into()
}

fn stmt_kind(stmt: &ast::Stmt) -> &'static str {
    match stmt {
        ast::Stmt::Delete(_) => "del statement",
        ast::Stmt::AnnAssign(_) => "annotated assignment",
        ast::Stmt::AsyncFor(_) => "async for loop",
        ast::Stmt::AsyncWith(_) => "async with block",
        ast::Stmt::Match(_) => "match statement",
        ast::Stmt::Assert(_) => "assert statement",
        ast::Stmt::Global(_) => "global declaration",
        ast::Stmt::Nonlocal(_) => "nonlocal declaration",
        _ => "statement",
    }
}

fn expr_kind(expr: &ast::Expr) -> &'static str {
    match expr {
        ast::Expr::NamedExpr(_) => "assignment expression",
        ast::Expr::IfExp(_) => "conditional expression",
        ast::Expr::Set(_) => "set literal",
        ast::Expr::SetComp(_) => "set comprehension",
        ast::Expr::DictComp(_) => "dict comprehension",
        ast::Expr::GeneratorExp(_) => "generator expression",
        ast::Expr::Yield(_) | ast::Expr::YieldFrom(_) => "yield expression",
        ast::Expr::Starred(_) => "starred expression",
        ast::Expr::Slice(_) => "slice expression",
        _ => "expression",
    }
}
