//! Statement handlers. Every handler appends complete lines at the
//! current indentation and leaves the depth where it found it.

use anyhow::Result;
use rustpython_ast::{self as ast};

use super::expr_gen::binop_symbol;
use super::{unsupported, CppCodegen};
use crate::{exceptions, module_mapper, type_infer};

impl CppCodegen {
    pub(super) fn emit_import(&mut self, import: &ast::StmtImport) -> Result<()> {
        for alias in &import.names {
            let name = alias.name.as_str();
            if let Some(includes) = module_mapper::includes_for_import(name) {
                self.headers.add_all(includes);
            }
            if name == module_mapper::ARRAY_MODULE {
                let bound = alias
                    .asname
                    .as_ref()
                    .map_or_else(|| name.to_string(), ToString::to_string);
                self.array_aliases.insert(bound);
            }
        }
        Ok(())
    }

    pub(super) fn emit_import_from(&mut self, import: &ast::StmtImportFrom) -> Result<()> {
        if let Some(module) = &import.module {
            if let Some(includes) = module_mapper::includes_for_import_from(module.as_str()) {
                self.headers.add_all(includes);
            }
        }
        Ok(())
    }

    pub(super) fn emit_assign(&mut self, assign: &ast::StmtAssign) -> Result<()> {
        if assign.targets.len() != 1 {
            return Err(unsupported("chained assignment"));
        }
        let target_node = &assign.targets[0];

        if let ast::Expr::Tuple(t) = target_node {
            self.headers.add("<tuple>");
            let vars = self.convert_each(&t.elts)?.join(", ");
            let value = self.convert_expr(&assign.value)?;
            self.emit(format!("auto [{vars}] = {value};"));
            return Ok(());
        }

        let target = self.convert_expr(target_node)?;
        let value = self.convert_expr(&assign.value)?;

        if let Some(member) = self_attribute_name(target_node) {
            // Members assigned outside the initializer pre-scan are still
            // declared at the top of the class.
            self.note_class_member(member, &assign.value, &value);
            self.emit(format!("{target} = {value};"));
            return Ok(());
        }

        let ty = type_infer::assign_type(&assign.value, &value, self.options.type_fallback);
        self.emit(format!("{ty} {target} = {value};"));
        Ok(())
    }

    fn note_class_member(&mut self, member: &str, value: &ast::Expr, rendered: &str) {
        let Some(class) = self.current_class.clone() else {
            return;
        };
        let already_declared = self
            .class_members
            .get(&class)
            .is_some_and(|members| members.contains_key(member));
        if already_declared {
            return;
        }
        let ty = if rendered.contains("requests::get") {
            "cpr::Response".to_string()
        } else {
            match value {
                ast::Expr::Constant(c) => match &c.value {
                    ast::Constant::Str(_) => "std::string".to_string(),
                    ast::Constant::Int(_) => "int".to_string(),
                    _ => "auto".to_string(),
                },
                ast::Expr::Name(n) => self
                    .var_types
                    .get(n.id.as_str())
                    .cloned()
                    .unwrap_or_else(|| "auto".to_string()),
                _ => "auto".to_string(),
            }
        };
        self.class_members
            .entry(class)
            .or_default()
            .insert(member.to_string(), ty);
    }

    pub(super) fn emit_aug_assign(&mut self, assign: &ast::StmtAugAssign) -> Result<()> {
        let target = self.convert_expr(&assign.target)?;
        let value = self.convert_expr(&assign.value)?;
        if matches!(assign.op, ast::Operator::Pow) {
            // `x **= n` has no C++ operator form.
            self.headers.add("<cmath>");
            self.emit(format!("{target} = std::pow({target}, {value});"));
            return Ok(());
        }
        let op = binop_symbol(&assign.op)?;
        self.emit(format!("{target} {op}= {value};"));
        Ok(())
    }

    pub(super) fn emit_return(&mut self, ret: &ast::StmtReturn) -> Result<()> {
        let keyword = if self.in_async_fn { "co_return" } else { "return" };
        let Some(value) = &ret.value else {
            self.emit(format!("{keyword};"));
            return Ok(());
        };
        let rendered = if let ast::Expr::Tuple(t) = value.as_ref() {
            self.headers.add("<tuple>");
            let elements = self.convert_each(&t.elts)?.join(", ");
            format!("std::make_tuple({elements})")
        } else {
            self.convert_expr(value)?
        };
        self.emit(format!("{keyword} {rendered};"));
        Ok(())
    }

    pub(super) fn emit_expr_stmt(&mut self, stmt: &ast::StmtExpr) -> Result<()> {
        let value = self.convert_expr(&stmt.value)?;
        self.emit(format!("{value};"));
        Ok(())
    }

    pub(super) fn emit_if(&mut self, stmt: &ast::StmtIf) -> Result<()> {
        let test = self.convert_expr(&stmt.test)?;
        self.emit(format!("if ({test}) {{"));
        self.emit_block(&stmt.body)?;
        if stmt.orelse.is_empty() {
            self.emit("}");
        } else {
            self.emit("} else {");
            self.emit_block(&stmt.orelse)?;
            self.emit("}");
        }
        Ok(())
    }

    pub(super) fn emit_while(&mut self, stmt: &ast::StmtWhile) -> Result<()> {
        let test = self.convert_expr(&stmt.test)?;
        self.emit(format!("while ({test}) {{"));
        self.emit_block(&stmt.body)?;
        self.emit("}");
        Ok(())
    }

    /// Three loop shapes: dict `.items()` unpacks through a structured
    /// binding, `.keys()`/`.values()` iterate pairs and bind the wanted
    /// half on the first body line, everything else is a range-for whose
    /// element type comes from the recorded iterator type when known.
    pub(super) fn emit_for(&mut self, stmt: &ast::StmtFor) -> Result<()> {
        if let ast::Expr::Call(call) = stmt.iter.as_ref() {
            if let ast::Expr::Attribute(att) = call.func.as_ref() {
                match att.attr.as_str() {
                    "items" => {
                        let dict = self.convert_expr(&att.value)?;
                        if let ast::Expr::Tuple(t) = stmt.target.as_ref() {
                            let vars = self.convert_each(&t.elts)?.join(", ");
                            self.emit(format!("for (auto& [{vars}] : {dict}) {{"));
                        } else {
                            let target = self.convert_expr(&stmt.target)?;
                            self.emit(format!("for (auto& {target} : {dict}) {{"));
                        }
                    }
                    "keys" | "values" => {
                        let dict = self.convert_expr(&att.value)?;
                        let target = self.convert_expr(&stmt.target)?;
                        let half = if att.attr.as_str() == "keys" {
                            "first"
                        } else {
                            "second"
                        };
                        self.emit(format!("for (auto& _pair : {dict}) {{"));
                        self.indent += 1;
                        self.emit(format!("auto {target} = _pair.{half};"));
                        self.indent -= 1;
                    }
                    _ => {
                        let target = self.convert_expr(&stmt.target)?;
                        let iter = self.convert_expr(&stmt.iter)?;
                        self.emit(format!("for (auto {target} : {iter}) {{"));
                    }
                }
                self.emit_block(&stmt.body)?;
                self.emit("}");
                return Ok(());
            }
        }

        let target = self.convert_expr(&stmt.target)?;
        let iter = self.convert_expr(&stmt.iter)?;
        let elem_ty = self
            .var_types
            .get(&iter)
            .and_then(|ty| type_infer::vector_element_type(ty))
            .unwrap_or("auto")
            .to_string();
        self.emit(format!("for ({elem_ty} {target} : {iter}) {{"));
        self.emit_block(&stmt.body)?;
        self.emit("}");
        Ok(())
    }

    /// Only the file form of `with` is specialized: the stream lives in an
    /// explicit block scope and closes when the scope exits.
    pub(super) fn emit_with(&mut self, stmt: &ast::StmtWith) -> Result<()> {
        self.headers.add_all(&["<fstream>", "<string>"]);
        let Some(item) = stmt.items.first() else {
            return Err(unsupported("with block without context manager"));
        };

        let open_call = match &item.context_expr {
            ast::Expr::Call(call) => match call.func.as_ref() {
                ast::Expr::Name(n) if n.id.as_str() == "open" => Some(call),
                _ => None,
            },
            _ => None,
        };
        let Some(call) = open_call else {
            self.emit("// Unsupported context manager");
            for body_stmt in &stmt.body {
                self.emit_stmt(body_stmt)?;
            }
            return Ok(());
        };

        let file_name = match call.args.first() {
            Some(arg) => self.convert_expr(arg)?,
            None => "\"\"".to_string(),
        };
        let mode = match call.args.get(1) {
            Some(ast::Expr::Constant(c)) => match &c.value {
                ast::Constant::Str(s) => s.to_string(),
                _ => "r".to_string(),
            },
            _ => "r".to_string(),
        };
        let stream = match &item.optional_vars {
            Some(vars) => self.convert_expr(vars)?,
            None => "_file".to_string(),
        };

        self.emit("{");
        self.indent += 1;
        if mode.contains('w') || mode.contains('a') {
            let mut flags = "std::ios::out".to_string();
            if mode.contains('a') {
                flags.push_str(" | std::ios::app");
            }
            self.emit(format!("std::ofstream {stream}({file_name}, {flags});"));
        } else {
            self.emit(format!("std::ifstream {stream}({file_name});"));
        }
        for body_stmt in &stmt.body {
            self.emit_stmt(body_stmt)?;
        }
        self.indent -= 1;
        self.emit(format!("}}  // {stream} closes automatically"));
        Ok(())
    }

    /// `finally` bodies run after the catch handlers; they do not run on
    /// uncaught exceptions.
    pub(super) fn emit_try(&mut self, stmt: &ast::StmtTry) -> Result<()> {
        self.headers.add("<stdexcept>");
        self.emit("try {");
        self.emit_block(&stmt.body)?;
        self.emit("}");

        for handler in &stmt.handlers {
            match handler {
                ast::ExceptHandler::ExceptHandler(h) => {
                    if let Some(exc_type) = &h.type_ {
                        let name = self.convert_expr(exc_type)?;
                        let cpp_type = exceptions::map_exception_type(&name);
                        match &h.name {
                            Some(bound) => {
                                let bound = bound.as_str();
                                self.emit(format!("catch (const {cpp_type}& {bound}) {{"));
                            }
                            None => self.emit(format!("catch (const {cpp_type}&) {{")),
                        }
                    } else {
                        self.emit("catch (...) {");
                    }
                    self.emit_block(&h.body)?;
                    self.emit("}");
                }
            }
        }

        for final_stmt in &stmt.finalbody {
            self.emit_stmt(final_stmt)?;
        }
        Ok(())
    }

    pub(super) fn emit_raise(&mut self, stmt: &ast::StmtRaise) -> Result<()> {
        self.headers.add("<stdexcept>");
        let Some(exc) = &stmt.exc else {
            self.emit("throw;");
            return Ok(());
        };

        let (exc_name, message) = match exc.as_ref() {
            ast::Expr::Call(call) => {
                let name = self.convert_expr(&call.func)?;
                let message = match call.args.first() {
                    Some(arg) => Some(self.convert_expr(arg)?),
                    None => None,
                };
                (Some(name), message)
            }
            ast::Expr::Name(n) => (Some(n.id.to_string()), None),
            _ => (None, None),
        };

        let cpp_type = exc_name
            .as_deref()
            .map_or("std::runtime_error", exceptions::map_exception_type);
        match message {
            Some(message) => self.emit(format!("throw {cpp_type}({message});")),
            None => self.emit(format!("throw {cpp_type}(\"Exception\");")),
        }
        Ok(())
    }
}

/// `self.<name>` assignment target, if that is what `expr` is.
pub(super) fn self_attribute_name(expr: &ast::Expr) -> Option<&str> {
    let ast::Expr::Attribute(att) = expr else {
        return None;
    };
    let ast::Expr::Name(base) = att.value.as_ref() else {
        return None;
    };
    if base.id.as_str() == "self" {
        Some(att.attr.as_str())
    } else {
        None
    }
}
