//! Semantic error reporting.
//!
//! Binding never aborts on ordinary language errors: it records a
//! [`Diagnostic`] in the caller-supplied [`DiagnosticCollector`] and continues
//! with an error-typed placeholder.

use std::sync::Arc;

use crate::base::{FileId, LineCol, LineIndex, Location, TextRange};

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

/// A diagnostic message with location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// The file containing this diagnostic.
    pub file: FileId,
    /// Byte range of the offending syntax.
    pub range: TextRange,
    /// Severity level.
    pub severity: Severity,
    /// Code from [`codes`].
    pub code: &'static str,
    /// The diagnostic message.
    pub message: Arc<str>,
    /// Declarations the message refers to.
    pub related: Vec<RelatedInfo>,
}

/// Related information for a diagnostic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelatedInfo {
    pub location: Location,
    pub message: Arc<str>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(file: FileId, range: TextRange, code: &'static str, message: impl Into<Arc<str>>) -> Self {
        Self {
            file,
            range,
            severity: Severity::Error,
            code,
            message: message.into(),
            related: Vec::new(),
        }
    }

    /// Create a new warning diagnostic.
    pub fn warning(file: FileId, range: TextRange, code: &'static str, message: impl Into<Arc<str>>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(file, range, code, message)
        }
    }

    /// Add related information.
    pub fn with_related(mut self, location: Location, message: impl Into<Arc<str>>) -> Self {
        self.related.push(RelatedInfo {
            location,
            message: message.into(),
        });
        self
    }

    /// Render as `line:col: error[code]: message` against the file's text.
    pub fn render(&self, index: &LineIndex) -> String {
        let start: LineCol = index.line_col(self.range.start());
        let severity = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        format!("{start}: {severity}[{}]: {}", self.code, self.message)
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Diagnostic codes reported by the binder.
pub mod codes {
    /// Name not found in the scope it was looked up in.
    pub const UNRESOLVED: &str = "E0001";
    /// Generic arity does not match the number of type arguments.
    pub const WRONG_ARITY: &str = "E0002";
    /// Member exists but its accessibility forbids the access.
    pub const INACCESSIBLE: &str = "E0003";
    /// A non-method member used like a method.
    pub const NOT_INVOCABLE: &str = "E0004";
    /// Two non-methods of the same name are both visible.
    pub const AMBIGUOUS_SAME_SCOPE: &str = "E0005";
    /// A method and a non-method of the same name are both visible.
    pub const AMBIGUOUS_METHOD_VS_NON_METHOD: &str = "E0006";
    /// Named argument in an array index.
    pub const NAMED_ARGUMENT_ON_ARRAY_INDEX: &str = "E0007";
    /// Index count does not match array rank or pointer indexing.
    pub const BAD_INDEX_COUNT: &str = "E0008";
    /// No implicit conversion between two types.
    pub const NO_CONVERSION: &str = "E0009";
    /// Member access on a type parameter used as a type.
    pub const TYPE_PARAMETER_MEMBER_LOOKUP: &str = "E0010";
    /// Nested type referenced through an expression.
    pub const TYPE_THROUGH_EXPRESSION: &str = "E0011";
    /// Member access on a method group.
    pub const METHOD_GROUP_MEMBER_ACCESS: &str = "E0012";
    /// Instance member referenced through a type name.
    pub const STATIC_INSTANCE_MISMATCH: &str = "E0013";
    /// Indexing a value that has no indexer.
    pub const BAD_INDEXER: &str = "E0014";
    /// Pointer operation outside an unsafe context.
    pub const UNSAFE_NEEDED: &str = "E0015";
    /// Indexing a `void*`.
    pub const VOID_POINTER_INDEX: &str = "E0016";
    /// Construct recognized but not supported by this binder.
    pub const UNSUPPORTED: &str = "E0017";
    /// `break` or `continue` outside of a loop.
    pub const NO_ENCLOSING_LOOP: &str = "E0018";
    /// Local declared twice in one method body.
    pub const DUPLICATE_LOCAL: &str = "E0019";

    /// `if (c);` with an empty embedded statement.
    pub const POSSIBLE_MISTAKEN_EMPTY_STATEMENT: &str = "W0001";
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Collects diagnostics during binding.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        tracing::debug!("{}: {}", diagnostic.code, diagnostic.message);
        self.diagnostics.push(diagnostic);
    }

    /// All diagnostics, in report order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Get diagnostics for a specific file.
    pub fn diagnostics_for_file(&self, file: FileId) -> Vec<&Diagnostic> {
        self.diagnostics.iter().filter(|d| d.file == file).collect()
    }

    /// Codes of all diagnostics, in report order.
    pub fn codes(&self) -> Vec<&'static str> {
        self.diagnostics.iter().map(|d| d.code).collect()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Count errors.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    /// Count warnings.
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Take all diagnostics, leaving the collector empty.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Clear all diagnostics.
    pub fn clear(&mut self) {
        self.diagnostics.clear();
    }
}
