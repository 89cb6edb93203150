//! Class emission.
//!
//! Two phases: a pre-scan over the initializer collects member
//! declarations (without emitting anything), then the class is emitted
//! with the member list at the top of its public section followed by the
//! methods. Members discovered later, in assignments outside the
//! initializer, extend the same table.

use anyhow::Result;
use rustpython_ast::{self as ast};

use super::CppCodegen;

impl CppCodegen {
    pub(super) fn emit_class(&mut self, class: &ast::StmtClassDef) -> Result<()> {
        let class_name = class.name.to_string();
        self.current_class = Some(class_name.clone());
        self.class_members.entry(class_name.clone()).or_default();

        self.collect_initializer_members(&class_name, &class.body)?;

        self.emit(format!("class {class_name} {{"));
        self.emit("public:");
        self.indent += 1;

        let members: Vec<(String, String)> = self
            .class_members
            .get(&class_name)
            .map(|m| {
                m.iter()
                    .map(|(name, ty)| (name.clone(), ty.clone()))
                    .collect()
            })
            .unwrap_or_default();
        for (name, ty) in &members {
            self.emit(format!("{ty} {name};"));
        }
        if !members.is_empty() {
            self.emit_blank();
        }

        for item in &class.body {
            self.emit_stmt(item)?;
        }

        self.indent -= 1;
        self.emit("};");
        self.current_class = None;
        Ok(())
    }

    /// Phase one: walk `__init__` for `self.<name> = <value>` assignments
    /// and record `(name, type)` pairs in first-seen order. Types come
    /// from parameter annotations (passthrough assignments) or literal
    /// shapes; anything else is deferred to the emission phase.
    fn collect_initializer_members(
        &mut self,
        class_name: &str,
        body: &[ast::Stmt],
    ) -> Result<()> {
        let Some(init) = find_initializer(body) else {
            return Ok(());
        };

        for stmt in &init.body {
            let ast::Stmt::Assign(assign) = stmt else {
                continue;
            };
            let Some(member) = assign
                .targets
                .first()
                .and_then(super::stmt_gen::self_attribute_name)
            else {
                continue;
            };

            let inferred = match assign.value.as_ref() {
                ast::Expr::Name(n) => {
                    // Parameter passthrough: adopt the annotation of the
                    // matching initializer parameter (receiver excluded).
                    let mut found = None;
                    for arg in init.args.args.iter().skip(1) {
                        if arg.def.arg.as_str() == n.id.as_str() {
                            found = Some(match &arg.def.annotation {
                                Some(annotation) => self.render_annotation(annotation)?,
                                None => "auto".to_string(),
                            });
                            break;
                        }
                    }
                    found
                }
                ast::Expr::Constant(c) => match &c.value {
                    ast::Constant::Str(_) => Some("std::string".to_string()),
                    ast::Constant::Int(_) => Some("int".to_string()),
                    _ => None,
                },
                _ => None,
            };

            if let Some(ty) = inferred {
                let members = self
                    .class_members
                    .entry(class_name.to_string())
                    .or_default();
                if !members.contains_key(member) {
                    members.insert(member.to_string(), ty);
                }
            }
        }
        Ok(())
    }
}

fn find_initializer(body: &[ast::Stmt]) -> Option<&ast::StmtFunctionDef> {
    body.iter().find_map(|stmt| match stmt {
        ast::Stmt::FunctionDef(f) if f.name.as_str() == "__init__" => Some(f),
        _ => None,
    })
}
