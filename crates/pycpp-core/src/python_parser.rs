//! Facade over the external Python parser.
//!
//! The generator treats parsing as a pure `source -> AST` function; this
//! module wraps `rustpython_parser` and converts its errors into
//! [`TranspileError`]s carrying a line/column location.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rustpython_ast as ast;
use rustpython_parser::{parse, Mode};

use crate::error::{ErrorKind, SourceLocation, TranspileError, TranspileResult};

/// Parse Python source text into a module AST.
pub fn parse_module(source: &str, file_name: &str) -> TranspileResult<ast::Mod> {
    parse(source, Mode::Module, file_name).map_err(|e| {
        let offset = usize::from(e.offset);
        TranspileError::new(ErrorKind::ParseError(e.error.to_string()))
            .with_location(SourceLocation::from_offset(file_name, source, offset))
    })
}

/// Read and parse a Python file.
pub fn parse_file(path: &Path) -> Result<ast::Mod> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let file_name = path.display().to_string();
    tracing::debug!(file = %file_name, bytes = source.len(), "parsing input");
    Ok(parse_module(&source, &file_name)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_module_ok() {
        let module = parse_module("def f():\n    return 1\n", "<test>").unwrap();
        let ast::Mod::Module(m) = module else {
            panic!("expected a module");
        };
        assert_eq!(m.body.len(), 1);
    }

    #[test]
    fn test_parse_module_error_has_location() {
        let err = parse_module("def f(:\n", "<test>").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::ParseError(_)));
        assert!(err.location.is_some());
    }

    #[test]
    fn test_parse_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "x = 1").unwrap();
        let module = parse_file(tmp.path()).unwrap();
        assert!(matches!(module, ast::Mod::Module(_)));
    }

    #[test]
    fn test_parse_file_missing() {
        assert!(parse_file(Path::new("/nonexistent/file.py")).is_err());
    }
}
