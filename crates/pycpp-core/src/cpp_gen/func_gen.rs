//! Function, method, and coroutine emission.

use anyhow::Result;
use rustpython_ast::{self as ast};

use super::CppCodegen;

impl CppCodegen {
    pub(super) fn emit_function(&mut self, func: &ast::StmtFunctionDef) -> Result<()> {
        let is_method = self.current_class.is_some();
        let is_constructor = is_method && func.name.as_str() == "__init__";
        let params = self.render_params(&func.args, is_method)?;

        if is_constructor {
            let class_name = self.current_class.clone().unwrap_or_default();
            self.emit(format!("{class_name}({params}) {{"));
        } else {
            let return_type = if returns_tuple(&func.body) {
                self.headers.add("<tuple>");
                "auto".to_string()
            } else if let Some(returns) = &func.returns {
                self.render_annotation(returns)?
            } else {
                "void".to_string()
            };
            self.emit(format!("{return_type} {}({params}) {{", func.name.as_str()));
        }

        self.emit_block(&func.body)?;
        self.emit("}");
        Ok(())
    }

    /// Async definitions become coroutines returning `Task<T>`; the body is
    /// emitted with the async flag set so `return` renders as `co_return`.
    /// The flag is scoped: it restores whatever was in effect on exit.
    pub(super) fn emit_async_function(&mut self, func: &ast::StmtAsyncFunctionDef) -> Result<()> {
        self.headers.add_all(&["<coroutine>", "\"task.hpp\""]);

        let is_method = self.current_class.is_some();
        let params = self.render_params(&func.args, is_method)?;
        let return_type = match &func.returns {
            Some(returns) => self.render_annotation(returns)?,
            None => "void".to_string(),
        };

        self.async_functions.insert(func.name.to_string());
        let was_async = std::mem::replace(&mut self.in_async_fn, true);

        self.emit(format!(
            "Task<{return_type}> {}({params}) {{",
            func.name.as_str()
        ));
        let result = self.emit_block(&func.body);
        self.emit("}");

        self.in_async_fn = was_async;
        result
    }

    /// Render a parameter list, eliding the receiver for methods. Each
    /// parameter's rendered type is recorded for later lookups.
    fn render_params(&mut self, args: &ast::Arguments, skip_receiver: bool) -> Result<String> {
        let skip = usize::from(skip_receiver);
        let mut rendered = Vec::new();
        for arg in args.args.iter().skip(skip) {
            rendered.push(self.render_param(&arg.def)?);
        }
        Ok(rendered.join(", "))
    }

    fn render_param(&mut self, arg: &ast::Arg) -> Result<String> {
        let ty = match &arg.annotation {
            Some(annotation) => self.render_annotation(annotation)?,
            None => "auto".to_string(),
        };
        self.var_types.insert(arg.arg.to_string(), ty.clone());
        Ok(format!("{ty} {}", arg.arg.as_str()))
    }
}

/// Whether any `return` in the subtree yields a tuple literal. Mirrors a
/// full-tree walk, so nested definitions count too.
fn returns_tuple(body: &[ast::Stmt]) -> bool {
    body.iter().any(stmt_returns_tuple)
}

fn stmt_returns_tuple(stmt: &ast::Stmt) -> bool {
    match stmt {
        ast::Stmt::Return(r) => {
            matches!(r.value.as_deref(), Some(ast::Expr::Tuple(_)))
        }
        ast::Stmt::If(i) => returns_tuple(&i.body) || returns_tuple(&i.orelse),
        ast::Stmt::While(w) => returns_tuple(&w.body) || returns_tuple(&w.orelse),
        ast::Stmt::For(f) => returns_tuple(&f.body) || returns_tuple(&f.orelse),
        ast::Stmt::With(w) => returns_tuple(&w.body),
        ast::Stmt::Try(t) => {
            returns_tuple(&t.body)
                || t.handlers.iter().any(|handler| match handler {
                    ast::ExceptHandler::ExceptHandler(h) => returns_tuple(&h.body),
                })
                || returns_tuple(&t.orelse)
                || returns_tuple(&t.finalbody)
        }
        ast::Stmt::FunctionDef(f) => returns_tuple(&f.body),
        ast::Stmt::AsyncFunctionDef(f) => returns_tuple(&f.body),
        _ => false,
    }
}
