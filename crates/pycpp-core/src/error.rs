use std::fmt;
use thiserror::Error;

/// Source location information for error reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: String,
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    /// Compute a location from a byte offset into `source`.
    ///
    /// Lines and columns are 1-based. Offsets past the end of the source
    /// clamp to the final position.
    pub fn from_offset(file: impl Into<String>, source: &str, offset: usize) -> Self {
        let mut offset = offset.min(source.len());
        while offset > 0 && !source.is_char_boundary(offset) {
            offset -= 1;
        }
        let prefix = &source[..offset];
        let line = prefix.bytes().filter(|&b| b == b'\n').count() + 1;
        let column = prefix
            .rfind('\n')
            .map_or(offset + 1, |nl| offset - nl);
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Types of translation errors
#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("Python parse error: {0}")]
    ParseError(String),

    #[error("Unsupported Python construct: {0}")]
    UnsupportedConstruct(String),

    #[error("Code generation error: {0}")]
    CodeGenerationError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Context-aware translation error
#[derive(Debug, Error)]
pub struct TranspileError {
    pub kind: ErrorKind,
    pub location: Option<SourceLocation>,
    pub context: Vec<String>,
}

impl TranspileError {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            location: None,
            context: Vec::new(),
        }
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }
}

impl fmt::Display for TranspileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        if let Some(loc) = &self.location {
            write!(f, " at {loc}")?;
        }

        for ctx in &self.context {
            write!(f, "\n  while {ctx}")?;
        }

        Ok(())
    }
}

/// Result type alias for translation operations
pub type TranspileResult<T> = Result<T, TranspileError>;

impl From<anyhow::Error> for TranspileError {
    fn from(err: anyhow::Error) -> Self {
        TranspileError::new(ErrorKind::InternalError(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = TranspileError::new(ErrorKind::UnsupportedConstruct("match".to_string()));
        assert!(matches!(err.kind, ErrorKind::UnsupportedConstruct(_)));
        assert!(err.location.is_none());
        assert!(err.context.is_empty());
    }

    #[test]
    fn test_location_from_offset() {
        let source = "def f():\n    return 1\n";
        let loc = SourceLocation::from_offset("test.py", source, 13);
        assert_eq!(loc.line, 2);
        assert_eq!(loc.column, 5);

        let start = SourceLocation::from_offset("test.py", source, 0);
        assert_eq!(start.line, 1);
        assert_eq!(start.column, 1);
    }

    #[test]
    fn test_error_display() {
        let loc = SourceLocation {
            file: "example.py".to_string(),
            line: 25,
            column: 10,
        };

        let err = TranspileError::new(ErrorKind::ParseError("unexpected indent".to_string()))
            .with_location(loc)
            .with_context("parsing example.py");

        let display = format!("{err}");
        assert!(display.contains("Python parse error"));
        assert!(display.contains("example.py:25:10"));
        assert!(display.contains("while parsing example.py"));
    }
}
