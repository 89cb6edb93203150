//! Mapping from Python exception names to C++ standard exception types.

/// Map a Python exception name to the C++ exception type thrown or caught
/// in its place. Unknown names fall back to `std::exception`.
pub fn map_exception_type(python_name: &str) -> &'static str {
    match python_name {
        "Exception" => "std::exception",
        "ValueError" | "TypeError" => "std::invalid_argument",
        "RuntimeError" => "std::runtime_error",
        "KeyError" | "IndexError" => "std::out_of_range",
        "ZeroDivisionError" => "std::overflow_error",
        "FileNotFoundError" | "IOError" => "std::runtime_error",
        _ => "std::exception",
    }
}
