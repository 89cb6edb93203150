//! Expression handlers. Each returns a C++ fragment; include-set side
//! effects happen during conversion whether or not the fragment is used.

use anyhow::Result;
use rustpython_ast::{self as ast};

use super::{expr_kind, unsupported, CppCodegen};

impl CppCodegen {
    /// Expression dispatch. Returns a fragment; never appends lines.
    pub(crate) fn convert_expr(&mut self, expr: &ast::Expr) -> Result<String> {
        match expr {
            ast::Expr::Constant(c) => self.convert_constant(c),
            ast::Expr::Name(n) => Ok(self.convert_name(n.id.as_str())),
            ast::Expr::Attribute(a) => self.convert_attribute(a),
            ast::Expr::Subscript(s) => self.convert_subscript(s),
            ast::Expr::Call(c) => self.convert_call(c),
            ast::Expr::BinOp(b) => self.convert_binop(b),
            ast::Expr::UnaryOp(u) => self.convert_unaryop(u),
            ast::Expr::BoolOp(b) => self.convert_boolop(b),
            ast::Expr::Compare(c) => self.convert_compare(c),
            ast::Expr::Lambda(l) => self.convert_lambda(l),
            ast::Expr::JoinedStr(j) => self.convert_joined_str(j),
            ast::Expr::FormattedValue(v) => self.convert_expr(&v.value),
            ast::Expr::Await(a) => {
                let value = self.convert_expr(&a.value)?;
                Ok(format!("co_await {value}"))
            }
            ast::Expr::List(l) => self.convert_elements(&l.elts),
            ast::Expr::Tuple(t) => self.convert_elements(&t.elts),
            ast::Expr::Dict(d) => self.convert_dict(d),
            ast::Expr::ListComp(c) => self.convert_list_comp(c),
            other => Err(unsupported(expr_kind(other))),
        }
    }

    pub(crate) fn convert_each(&mut self, exprs: &[ast::Expr]) -> Result<Vec<String>> {
        exprs.iter().map(|e| self.convert_expr(e)).collect()
    }

    fn convert_constant(&mut self, c: &ast::ExprConstant) -> Result<String> {
        match &c.value {
            ast::Constant::Str(s) => Ok(format!("\"{s}\"")),
            ast::Constant::Int(i) => Ok(i.to_string()),
            ast::Constant::Float(f) => Ok(render_float(*f)),
            ast::Constant::Bool(b) => Ok(if *b { "true" } else { "false" }.to_string()),
            ast::Constant::None => Ok("nullptr".to_string()),
            _ => Err(unsupported("constant literal")),
        }
    }

    /// Identifiers. Recognized type names are remapped and may pull in
    /// their header; anything else passes through verbatim.
    pub(crate) fn convert_name(&mut self, id: &str) -> String {
        match id {
            "int" => "int".to_string(),
            "str" => {
                self.headers.add("<string>");
                "std::string".to_string()
            }
            "dict" => {
                self.headers.add(super::headers::JSON_HEADER);
                "nlohmann::json".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Annotation position: `None` means "no value", i.e. `void`.
    pub(crate) fn render_annotation(&mut self, annotation: &ast::Expr) -> Result<String> {
        if let ast::Expr::Constant(c) = annotation {
            if matches!(c.value, ast::Constant::None) {
                return Ok("void".to_string());
            }
        }
        self.convert_expr(annotation)
    }

    fn convert_attribute(&mut self, a: &ast::ExprAttribute) -> Result<String> {
        let value = self.convert_expr(&a.value)?;
        if value == "self" {
            return Ok(a.attr.to_string());
        }
        // Array properties that are methods on the C++ side.
        Ok(match a.attr.as_str() {
            "shape" => format!("{value}.shape()"),
            "size" => format!("{value}.size()"),
            "T" => format!("{value}.transpose()"),
            attr => format!("{value}.{attr}"),
        })
    }

    fn convert_subscript(&mut self, s: &ast::ExprSubscript) -> Result<String> {
        let value = self.convert_expr(&s.value)?;
        if let ast::Expr::Tuple(t) = s.slice.as_ref() {
            // Multi-dimensional array access uses call syntax.
            let indices = self.convert_each(&t.elts)?.join(", ");
            return Ok(format!("{value}({indices})"));
        }
        let index = self.convert_expr(&s.slice)?;
        if value == "list" {
            self.headers.add("<vector>");
            return Ok(format!("std::vector<{index}>"));
        }
        Ok(format!("{value}[{index}]"))
    }

    fn convert_binop(&mut self, b: &ast::ExprBinOp) -> Result<String> {
        let left = self.convert_expr(&b.left)?;
        let right = self.convert_expr(&b.right)?;
        if matches!(b.op, ast::Operator::Pow) {
            self.headers.add("<cmath>");
            return Ok(format!("std::pow({left}, {right})"));
        }
        let op = binop_symbol(&b.op)?;
        Ok(format!("{left} {op} {right}"))
    }

    fn convert_unaryop(&mut self, u: &ast::ExprUnaryOp) -> Result<String> {
        let op = match u.op {
            ast::UnaryOp::UAdd => "+",
            ast::UnaryOp::USub => "-",
            ast::UnaryOp::Not => "!",
            ast::UnaryOp::Invert => return Err(unsupported("bitwise complement")),
        };
        let operand = self.convert_expr(&u.operand)?;
        // Compound operands keep their own precedence.
        if matches!(
            u.operand.as_ref(),
            ast::Expr::BinOp(_) | ast::Expr::Compare(_) | ast::Expr::BoolOp(_)
        ) {
            Ok(format!("{op}({operand})"))
        } else {
            Ok(format!("{op}{operand}"))
        }
    }

    fn convert_boolop(&mut self, b: &ast::ExprBoolOp) -> Result<String> {
        let op = match b.op {
            ast::BoolOp::And => "&&",
            ast::BoolOp::Or => "||",
        };
        let values = self.convert_each(&b.values)?;
        Ok(values.join(&format!(" {op} ")))
    }

    fn convert_compare(&mut self, c: &ast::ExprCompare) -> Result<String> {
        // Only the first operator/comparator pair; chains are out of scope.
        let (Some(op), Some(comparator)) = (c.ops.first(), c.comparators.first()) else {
            return Err(unsupported("empty comparison"));
        };
        let left = self.convert_expr(&c.left)?;
        let op = cmpop_symbol(op)?;
        let right = self.convert_expr(comparator)?;
        Ok(format!("{left} {op} {right}"))
    }

    fn convert_lambda(&mut self, l: &ast::ExprLambda) -> Result<String> {
        let mut params = Vec::new();
        for arg in &l.args.args {
            let name = arg.def.arg.as_str();
            let ty = self
                .var_types
                .get(name)
                .cloned()
                .unwrap_or_else(|| "auto".to_string());
            params.push(format!("{ty} {name}"));
        }
        let body = self.convert_expr(&l.body)?;
        Ok(format!("[]({}) {{ return {body}; }}", params.join(", ")))
    }

    fn convert_joined_str(&mut self, j: &ast::ExprJoinedStr) -> Result<String> {
        let pieces = self.convert_each(&j.values)?;
        Ok(pieces.join(" + "))
    }

    fn convert_elements(&mut self, elts: &[ast::Expr]) -> Result<String> {
        let elements = self.convert_each(elts)?;
        Ok(format!("{{{}}}", elements.join(", ")))
    }

    fn convert_dict(&mut self, d: &ast::ExprDict) -> Result<String> {
        self.headers.add("<map>");
        let mut pairs = Vec::with_capacity(d.keys.len());
        for (key, value) in d.keys.iter().zip(&d.values) {
            let Some(key) = key else {
                return Err(unsupported("dict unpacking"));
            };
            let k = self.convert_expr(key)?;
            let v = self.convert_expr(value)?;
            pairs.push(format!("{{{k}, {v}}}"));
        }
        Ok(format!("{{{}}}", pairs.join(", ")))
    }

    /// List comprehensions become immediately-invoked lambdas that fill an
    /// accumulator: generators nest left-to-right, filters nest inside
    /// their generator, and the push happens at the innermost depth.
    fn convert_list_comp(&mut self, comp: &ast::ExprListComp) -> Result<String> {
        self.headers.add("<vector>");
        let mut lines = vec!["[]() {".to_string()];
        let mut depth = 1usize;
        lines.push(format!("{}std::vector<int> _result;", pad(depth)));
        for generator in &comp.generators {
            let target = self.convert_expr(&generator.target)?;
            let iter = self.convert_expr(&generator.iter)?;
            lines.push(format!("{}for (auto {target} : {iter}) {{", pad(depth)));
            depth += 1;
            for condition in &generator.ifs {
                let test = self.convert_expr(condition)?;
                lines.push(format!("{}if ({test}) {{", pad(depth)));
                depth += 1;
            }
        }
        let element = self.convert_expr(&comp.elt)?;
        lines.push(format!("{}_result.push_back({element});", pad(depth)));
        for generator in comp.generators.iter().rev() {
            for _ in 0..=generator.ifs.len() {
                depth -= 1;
                lines.push(format!("{}}}", pad(depth)));
            }
        }
        lines.push(format!("{}return _result;", pad(1)));
        lines.push("}()".to_string());
        Ok(lines.join("\n"))
    }
}

fn pad(depth: usize) -> String {
    "    ".repeat(depth)
}

fn render_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 {
        format!("{f:.1}")
    } else {
        f.to_string()
    }
}

pub(super) fn binop_symbol(op: &ast::Operator) -> Result<&'static str> {
    Ok(match op {
        ast::Operator::Add => "+",
        ast::Operator::Sub => "-",
        ast::Operator::Mult => "*",
        ast::Operator::Div => "/",
        ast::Operator::Mod => "%",
        _ => return Err(unsupported("binary operator")),
    })
}

fn cmpop_symbol(op: &ast::CmpOp) -> Result<&'static str> {
    Ok(match op {
        ast::CmpOp::Gt => ">",
        ast::CmpOp::Lt => "<",
        ast::CmpOp::Eq => "==",
        ast::CmpOp::NotEq => "!=",
        ast::CmpOp::GtE => ">=",
        ast::CmpOp::LtE => "<=",
        _ => return Err(unsupported("comparison operator")),
    })
}
