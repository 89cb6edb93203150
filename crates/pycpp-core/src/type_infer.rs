//! Type selection at variable introduction sites.
//!
//! The generator only needs a type when a binding is first declared. The
//! rules here look at the shape of the right-hand side and at the rendered
//! fragment for recognized library patterns; anything without a cue falls
//! back to the configured policy.

use rustpython_ast::{self as ast};
use serde::{Deserialize, Serialize};

/// Fallback type for assignments whose right-hand side carries no
/// structural or library cue.
///
/// `Int` reproduces the historical behavior and keeps simple numeric
/// scripts readable; `Auto` is the stricter policy that never guesses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeFallback {
    #[default]
    Int,
    Auto,
}

impl TypeFallback {
    fn as_type(self) -> &'static str {
        match self {
            TypeFallback::Int => "int",
            TypeFallback::Auto => "auto",
        }
    }
}

/// Pick the declared type for a plain `target = value` binding.
///
/// `rendered` is the already-converted C++ fragment for the value; the
/// recognized-library checks match on it so that a pattern anywhere in the
/// expression (not only at the top call) selects the type.
pub(crate) fn assign_type(value: &ast::Expr, rendered: &str, fallback: TypeFallback) -> String {
    let ty = if matches!(
        value,
        ast::Expr::Dict(_) | ast::Expr::List(_) | ast::Expr::ListComp(_) | ast::Expr::Lambda(_)
    ) {
        "auto"
    } else if rendered.contains("requests::get") {
        "cpr::Response"
    } else if rendered.contains("nc::")
        || rendered.contains(".reshape(")
        || rendered.contains(".transpose(")
    {
        "auto"
    } else if rendered.contains("std::thread") {
        "std::thread"
    } else if rendered.contains("std::mutex") {
        "std::mutex"
    } else if rendered.contains("string_utils::") {
        "auto"
    } else if rendered.contains("std::istreambuf_iterator")
        || rendered.contains("std::getline")
        || rendered.contains("_lines")
    {
        "auto"
    } else {
        fallback.as_type()
    };
    ty.to_string()
}

/// Element type for an emitted `nc::NdArray<T>` literal: any float (or
/// non-integer) constant among the elements promotes to `double`.
pub(crate) fn array_literal_dtype(value: &ast::Expr) -> &'static str {
    let elts = match value {
        ast::Expr::List(l) => &l.elts,
        ast::Expr::Tuple(t) => &t.elts,
        _ => return "double",
    };
    let mut has_float = false;
    for elt in elts {
        if let ast::Expr::Constant(c) = elt {
            match &c.value {
                ast::Constant::Float(_) => has_float = true,
                ast::Constant::Int(_) => {}
                _ => return "double",
            }
        }
    }
    if has_float {
        "double"
    } else {
        "int"
    }
}

/// Extract `T` from a recorded `std::vector<T>` variable type.
pub(crate) fn vector_element_type(ty: &str) -> Option<&str> {
    ty.strip_prefix("std::vector<")?.strip_suffix('>')
}
