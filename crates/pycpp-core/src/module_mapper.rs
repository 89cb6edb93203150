//! Mapping from recognized Python imports to C++ include directives.
//!
//! Imports never emit statement lines; a recognized module only mutates the
//! include set. Unrecognized modules are ignored so that partially
//! translatable sources still produce useful output.

/// The module whose import establishes a numeric-array alias.
pub const ARRAY_MODULE: &str = "numpy";

/// Includes contributed by a plain `import <name>` statement.
///
/// Returns `None` for unrecognized modules. A recognized module may
/// contribute no includes at all (`sys` is handled case-by-case at call
/// sites and has no dedicated header).
pub fn includes_for_import(module: &str) -> Option<&'static [&'static str]> {
    match module {
        "requests" => Some(&["\"requests.hpp\""]),
        "json" => Some(&["\"nlohmann/json.hpp\""]),
        "math" => Some(&["<cmath>"]),
        "os" => Some(&["<filesystem>"]),
        "sys" => Some(&[]),
        "numpy" => Some(&["\"NumCpp.hpp\""]),
        "multiprocessing" => Some(&["<thread>", "<future>", "<vector>", "<mutex>"]),
        _ => None,
    }
}

/// Includes contributed by a `from <module> import ...` statement.
pub fn includes_for_import_from(module: &str) -> Option<&'static [&'static str]> {
    match module {
        "multiprocessing" => Some(&["<thread>", "<future>", "<vector>", "<mutex>"]),
        "asyncio" => Some(&["<coroutine>", "\"task.hpp\"", "<vector>"]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognized_imports() {
        assert_eq!(
            includes_for_import("requests"),
            Some(&["\"requests.hpp\""][..])
        );
        assert_eq!(includes_for_import("math"), Some(&["<cmath>"][..]));
        assert_eq!(includes_for_import("os"), Some(&["<filesystem>"][..]));
        assert_eq!(
            includes_for_import("multiprocessing"),
            Some(&["<thread>", "<future>", "<vector>", "<mutex>"][..])
        );
    }

    #[test]
    fn test_sys_is_recognized_but_contributes_nothing() {
        assert_eq!(includes_for_import("sys"), Some(&[][..]));
    }

    #[test]
    fn test_unrecognized_import_is_ignored() {
        assert_eq!(includes_for_import("collections"), None);
        assert_eq!(includes_for_import_from("itertools"), None);
    }

    #[test]
    fn test_import_from() {
        assert_eq!(
            includes_for_import_from("asyncio"),
            Some(&["<coroutine>", "\"task.hpp\"", "<vector>"][..])
        );
        assert_eq!(
            includes_for_import_from("multiprocessing"),
            includes_for_import("multiprocessing")
        );
    }
}
