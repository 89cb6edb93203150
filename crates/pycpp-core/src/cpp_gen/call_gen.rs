//! Recognized-call rewriting.
//!
//! A closed table of Python builtins, module functions, and method names
//! translates to C++ calls with include-set side effects. Recognition is
//! structural: free functions match on the callee name, module functions on
//! a `module.attr` path, and methods on the final attribute hop. Anything
//! unrecognized renders verbatim as `callee(args)`.

use anyhow::Result;
use rustpython_ast::{self as ast};
use smallvec::SmallVec;

use super::headers::{JSON_HEADER, REQUESTS_HEADER};
use super::CppCodegen;
use crate::type_infer;

const THREADING_HEADERS: [&str; 4] = ["<thread>", "<future>", "<vector>", "<mutex>"];

type Args = SmallVec<[String; 4]>;

impl CppCodegen {
    pub(crate) fn convert_call(&mut self, call: &ast::ExprCall) -> Result<String> {
        let args: Args = call
            .args
            .iter()
            .map(|a| self.convert_expr(a))
            .collect::<Result<_>>()?;

        match call.func.as_ref() {
            ast::Expr::Name(n) => self.convert_free_call(n.id.as_str(), call, &args),
            ast::Expr::Attribute(att) => self.convert_method_call(att, call, &args),
            other => {
                let callee = self.convert_expr(other)?;
                Ok(format!("{callee}({})", args.join(", ")))
            }
        }
    }

    fn convert_free_call(
        &mut self,
        name: &str,
        call: &ast::ExprCall,
        args: &Args,
    ) -> Result<String> {
        match name {
            "print" => {
                self.headers.add("<iostream>");
                if args.is_empty() {
                    Ok("std::cout << std::endl".to_string())
                } else {
                    Ok(format!(
                        "std::cout << {} << std::endl",
                        args.join(" << \" \" << ")
                    ))
                }
            }
            "len" if args.len() == 1 => Ok(format!("{}.size()", args[0])),
            "str" if args.len() == 1 => {
                self.headers.add("<string>");
                Ok(format!("std::to_string({})", args[0]))
            }
            "int" if args.len() == 1 => Ok(format!("std::stoi({})", args[0])),
            "range" => {
                self.headers.add("<vector>");
                Ok(render_range(args))
            }
            "Process" => {
                self.headers.add_all(&THREADING_HEADERS);
                self.convert_process_call(call)
            }
            "Pool" => {
                let workers = args.first().map_or("4", String::as_str);
                Ok(format!("/* Pool with {workers} workers */"))
            }
            "Lock" => {
                self.headers.add_all(&THREADING_HEADERS);
                Ok("std::mutex()".to_string())
            }
            _ => {
                // Render through the name mapper so recognized type names
                // keep their remapping (e.g. `dict(...)`).
                let callee = self.convert_name(name);
                Ok(format!("{callee}({})", args.join(", ")))
            }
        }
    }

    /// `Process(target=f, args=(a, b))` becomes a thread constructor. A
    /// missing target degrades to a default-constructed thread so the
    /// surrounding output stays usable.
    fn convert_process_call(&mut self, call: &ast::ExprCall) -> Result<String> {
        let mut target = None;
        let mut thread_args = Vec::new();
        for keyword in &call.keywords {
            match keyword.arg.as_ref().map(ast::Identifier::as_str) {
                Some("target") => target = Some(self.convert_expr(&keyword.value)?),
                Some("args") => {
                    if let ast::Expr::Tuple(t) = &keyword.value {
                        thread_args = self.convert_each(&t.elts)?;
                    }
                }
                _ => {}
            }
        }
        match target {
            Some(target) if thread_args.is_empty() => Ok(format!("std::thread({target})")),
            Some(target) => Ok(format!("std::thread({target}, {})", thread_args.join(", "))),
            None => Ok("std::thread()".to_string()),
        }
    }

    fn convert_method_call(
        &mut self,
        att: &ast::ExprAttribute,
        call: &ast::ExprCall,
        args: &Args,
    ) -> Result<String> {
        // Module-level paths first: math.*, json.*, requests.get, and the
        // numeric-array namespaces.
        if let ast::Expr::Name(base) = att.value.as_ref() {
            match base.id.as_str() {
                "math" => {
                    self.headers.add("<cmath>");
                    return Ok(format!("std::{}({})", att.attr.as_str(), args.join(", ")));
                }
                "json" if att.attr.as_str() == "loads" => {
                    if !self.headers.contains(REQUESTS_HEADER) {
                        self.headers.add(JSON_HEADER);
                    }
                    return Ok(format!("nlohmann::json::parse({})", args.join(", ")));
                }
                "json" if att.attr.as_str() == "dumps" && args.len() == 1 => {
                    if !self.headers.contains(REQUESTS_HEADER) {
                        self.headers.add(JSON_HEADER);
                    }
                    return Ok(format!("{}.dump()", args[0]));
                }
                "requests" if att.attr.as_str() == "get" => {
                    self.headers.add(REQUESTS_HEADER);
                    return Ok(format!("requests::get({})", args.join(", ")));
                }
                name if self.array_aliases.contains(name) => {
                    if let Some(rendered) = self.convert_array_call(att.attr.as_str(), call, args) {
                        return Ok(rendered);
                    }
                }
                _ => {}
            }
        }

        // Two-hop array namespaces: np.random.* and np.linalg.*.
        if let ast::Expr::Attribute(inner) = att.value.as_ref() {
            if let ast::Expr::Name(base) = inner.value.as_ref() {
                if self.array_aliases.contains(base.id.as_str()) {
                    if let Some(rendered) =
                        self.convert_array_namespace_call(inner.attr.as_str(), att.attr.as_str(), args)
                    {
                        return Ok(rendered);
                    }
                }
            }
        }

        self.convert_method_idiom(att, args)
    }

    /// Single-hop numeric-array calls (`np.sum`, `np.zeros`, ...).
    fn convert_array_call(
        &mut self,
        attr: &str,
        call: &ast::ExprCall,
        args: &Args,
    ) -> Option<String> {
        let joined = args.join(", ");
        let rendered = match attr {
            "array" => {
                let dtype = call
                    .args
                    .first()
                    .map_or("double", type_infer::array_literal_dtype);
                match args.first() {
                    Some(arg) => format!("nc::NdArray<{dtype}>({arg})"),
                    None => format!("nc::NdArray<{dtype}>()"),
                }
            }
            "zeros" => format!("nc::zeros<double>({joined})"),
            "ones" => format!("nc::ones<double>({joined})"),
            "arange" => format!("nc::arange<double>({joined})"),
            "linspace" => format!("nc::linspace<double>({joined})"),
            "eye" => format!("nc::eye<double>({joined})"),
            "std" => format!("nc::stdev({joined})"),
            "sum" | "mean" | "min" | "max" | "dot" | "sqrt" | "exp" | "log" | "abs" | "matmul"
            | "argmax" | "argmin" | "where" | "concatenate" | "vstack" | "hstack" | "stack" => {
                format!("nc::{attr}({joined})")
            }
            _ => return None,
        };
        self.headers.add("\"NumCpp.hpp\"");
        Some(rendered)
    }

    /// `np.random.*` and `np.linalg.*`.
    fn convert_array_namespace_call(
        &mut self,
        namespace: &str,
        attr: &str,
        args: &Args,
    ) -> Option<String> {
        let joined = args.join(", ");
        let rendered = match (namespace, attr) {
            ("random", "rand") => format!("nc::random::rand<double>(nc::Shape({joined}))"),
            ("random", "randn") => {
                format!("nc::random::standardNormal<double>(nc::Shape({joined}))")
            }
            ("linalg", "det" | "inv" | "eig" | "solve" | "svd" | "norm") => {
                format!("nc::linalg::{attr}({joined})")
            }
            _ => return None,
        };
        self.headers.add("\"NumCpp.hpp\"");
        Some(rendered)
    }

    /// Method idioms keyed on the final attribute hop.
    fn convert_method_idiom(&mut self, att: &ast::ExprAttribute, args: &Args) -> Result<String> {
        let obj = self.convert_expr(&att.value)?;
        let joined = args.join(", ");
        let rendered = match (att.attr.as_str(), args.len()) {
            ("json", 0) => {
                // The HTTP client response already bundles the JSON type.
                if !self.headers.contains(REQUESTS_HEADER) {
                    self.headers.add(JSON_HEADER);
                }
                format!("nlohmann::json::parse({obj}.text)")
            }
            ("upper", _) => {
                self.headers.add_all(&["<algorithm>", "<cctype>"]);
                format!("std::transform({obj}.begin(), {obj}.end(), {obj}.begin(), ::toupper), {obj}")
            }
            ("lower", _) => {
                self.headers.add_all(&["<algorithm>", "<cctype>"]);
                format!("std::transform({obj}.begin(), {obj}.end(), {obj}.begin(), ::tolower), {obj}")
            }
            ("split", 0) => {
                self.headers.add("\"string_utils.hpp\"");
                format!("string_utils::split({obj})")
            }
            ("split", _) => {
                self.headers.add("\"string_utils.hpp\"");
                format!("string_utils::split({obj}, {})", args[0])
            }
            ("strip" | "lstrip" | "rstrip", _) => {
                self.headers.add("\"string_utils.hpp\"");
                format!("string_utils::{}({obj})", att.attr.as_str())
            }
            // One argument separates the string idiom from a thread join.
            ("join", 1) => {
                self.headers.add("\"string_utils.hpp\"");
                format!("string_utils::join({obj}, {})", args[0])
            }
            ("join", 0) => format!("{obj}.join()"),
            ("replace", _) => {
                self.headers.add("\"string_utils.hpp\"");
                format!("string_utils::replace({obj}, {joined})")
            }
            ("startswith" | "endswith", 1) => {
                self.headers.add("\"string_utils.hpp\"");
                format!("string_utils::{}({obj}, {})", att.attr.as_str(), args[0])
            }
            ("append", _) => format!("{obj}.push_back({joined})"),
            ("pop", 0) => format!("{obj}.pop_back()"),
            ("pop", _) => format!("{obj}.erase({obj}.begin() + {})", args[0]),
            ("extend", 1) => {
                self.headers.add("<algorithm>");
                format!(
                    "{obj}.insert({obj}.end(), {arg}.begin(), {arg}.end())",
                    arg = args[0]
                )
            }
            ("insert", 2) => {
                format!("{obj}.insert({obj}.begin() + {}, {})", args[0], args[1])
            }
            ("remove", 1) => {
                self.headers.add("<algorithm>");
                format!(
                    "{obj}.erase(std::remove({obj}.begin(), {obj}.end(), {arg}), {obj}.end())",
                    arg = args[0]
                )
            }
            ("index", 1) => {
                self.headers.add("<algorithm>");
                format!(
                    "std::distance({obj}.begin(), std::find({obj}.begin(), {obj}.end(), {arg}))",
                    arg = args[0]
                )
            }
            ("count", 1) => {
                self.headers.add("<algorithm>");
                format!("std::count({obj}.begin(), {obj}.end(), {})", args[0])
            }
            ("reshape", _) => format!("{obj}.reshape({joined})"),
            ("transpose", 0) => format!("{obj}.transpose()"),
            ("start", 0) => format!("/* {obj} starts automatically */"),
            ("read", 0) => {
                self.headers.add_all(&["<sstream>", "<iterator>"]);
                format!(
                    "std::string((std::istreambuf_iterator<char>({obj})), std::istreambuf_iterator<char>())"
                )
            }
            ("readline", 0) => {
                format!("[&](){{ std::string _line; std::getline({obj}, _line); return _line; }}()")
            }
            ("readlines", 0) => {
                self.headers.add("<vector>");
                format!(
                    "[&](){{ std::vector<std::string> _lines; std::string _line; while(std::getline({obj}, _line)) _lines.push_back(_line); return _lines; }}()"
                )
            }
            ("write", 1) => format!("{obj} << {}", args[0]),
            _ => format!("{obj}.{}({joined})", att.attr.as_str()),
        };
        Ok(rendered)
    }
}

/// `range(...)` materializes its sequence through an immediately-invoked
/// lambda; other arities degrade to an empty vector.
fn render_range(args: &Args) -> String {
    match args.len() {
        1 => format!(
            "[&](){{ std::vector<int> _r; for(int _i=0; _i<{}; _i++) _r.push_back(_i); return _r; }}()",
            args[0]
        ),
        2 => format!(
            "[&](){{ std::vector<int> _r; for(int _i={}; _i<{}; _i++) _r.push_back(_i); return _r; }}()",
            args[0], args[1]
        ),
        3 => format!(
            "[&](){{ std::vector<int> _r; for(int _i={}; _i<{}; _i+={}) _r.push_back(_i); return _r; }}()",
            args[0], args[1], args[2]
        ),
        _ => "std::vector<int>()".to_string(),
    }
}
