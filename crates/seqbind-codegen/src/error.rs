//! Error types and batch error reporting for binder generation
//!
//! This module provides:
//! - Standard error types for generation failures
//! - Batch error collection so one run reports every broken member at once

use std::collections::BTreeMap;
use std::fmt;

use seqbind_core::{Code, Descriptor, NamedRef, TypeShape};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodegenError {
    #[error("Format error: {0}")]
    Fmt(#[from] std::fmt::Error),

    #[error("Batch errors ({count} total):\n{summary}")]
    Batch { count: usize, summary: String },
}

/// Location context for where an error occurred
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorLocation {
    /// Package name (e.g., "counter")
    pub package: Option<String>,
    /// Declaration name (e.g., "Counter")
    pub type_name: Option<String>,
    /// Field or method name (e.g., "Inc")
    pub member: Option<String>,
}

impl ErrorLocation {
    pub fn new() -> Self {
        Self::default()
    }
}

impl fmt::Display for ErrorLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.package, &self.type_name, &self.member) {
            (Some(p), Some(t), Some(m)) => write!(f, "{}.{}.{}", p, t, m),
            (Some(p), Some(t), None) => write!(f, "{}.{}", p, t),
            (Some(p), None, Some(m)) => write!(f, "{}::{}", p, m),
            (Some(p), None, None) => write!(f, "{}", p),
            (None, Some(t), Some(m)) => write!(f, "{}.{}", t, m),
            (None, Some(t), None) => write!(f, "{}", t),
            (None, None, Some(m)) => write!(f, "::{}", m),
            (None, None, None) => write!(f, "<unknown location>"),
        }
    }
}

/// Diagnostic taxonomy of a generation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorCategory {
    /// Type shape has no wire encoding
    UnsupportedType,
    /// Named type declared outside the bound package
    CrossPackageType,
    /// Callable returns something other than (), T, error or (T, error)
    SignatureArity,
    /// Declaration kind the walker does not handle
    UnsupportedDeclaration,
    /// Nothing to bind; terminates the run
    NoExportedMembers,
    /// Two entry points claimed the same (descriptor, code)
    DuplicateCode,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::UnsupportedType => write!(f, "UNSUPPORTED_TYPE"),
            ErrorCategory::CrossPackageType => write!(f, "CROSS_PACKAGE_TYPE"),
            ErrorCategory::SignatureArity => write!(f, "SIGNATURE_ARITY"),
            ErrorCategory::UnsupportedDeclaration => write!(f, "UNSUPPORTED_DECLARATION"),
            ErrorCategory::NoExportedMembers => write!(f, "NO_EXPORTED_MEMBERS"),
            ErrorCategory::DuplicateCode => write!(f, "DUPLICATE_CODE"),
        }
    }
}

/// A single error entry in the batch
#[derive(Debug, Clone)]
pub struct ErrorEntry {
    pub category: ErrorCategory,
    pub location: ErrorLocation,
    pub message: String,
    /// Optional suggestion for fixing
    pub suggestion: Option<String>,
}

impl ErrorEntry {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            location: ErrorLocation::new(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn unsupported_type(shape: &TypeShape, reason: &str) -> Self {
        Self::new(
            ErrorCategory::UnsupportedType,
            format!("unsupported type {}: {}", shape, reason),
        )
    }

    pub fn cross_package(named: &NamedRef, package: &str) -> Self {
        Self::new(
            ErrorCategory::CrossPackageType,
            format!("type {} not defined in package {}", named, package),
        )
        .with_suggestion(format!("bind package {} separately", named.package))
    }

    pub fn signature_arity(callable: &str, results: usize) -> Self {
        Self::new(
            ErrorCategory::SignatureArity,
            format!(
                "{} returns {} values; functions and methods must return either zero or one values, and optionally an error",
                callable, results
            ),
        )
    }

    pub fn unsupported_declaration(name: &str, description: &str) -> Self {
        Self::new(
            ErrorCategory::UnsupportedDeclaration,
            format!("not yet supported, declaration {} ({})", name, description),
        )
    }

    pub fn no_exported_members(path: &str) -> Self {
        Self::new(
            ErrorCategory::NoExportedMembers,
            format!("no exported names in the package {:?}", path),
        )
    }

    pub fn duplicate_code(descriptor: &Descriptor, code: Code) -> Self {
        Self::new(
            ErrorCategory::DuplicateCode,
            format!("code {:#x} registered twice for descriptor {}", code, descriptor),
        )
    }
}

impl fmt::Display for ErrorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] at {}: {}", self.category, self.location, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}

/// Batch error collector for accumulating errors during generation
///
/// Append-only: entries are kept in the order they were recorded. Nothing
/// here aborts a run; the walker decides the outcome from the final state.
///
/// ## Usage
///
/// ```ignore
/// let mut errors = BatchErrors::new();
///
/// // While generating a member...
/// errors.add(ErrorEntry::unsupported_type(&shape, "maps have no wire encoding"));
///
/// // At the end of the run...
/// if errors.has_errors() {
///     return Err(errors.into());
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct BatchErrors {
    entries: Vec<ErrorEntry>,
    package_context: Option<String>,
    type_context: Option<String>,
    member_context: Option<String>,
}

impl BatchErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current package context for subsequent errors
    pub fn set_package_context(&mut self, package: impl Into<String>) {
        self.package_context = Some(package.into());
    }

    /// Set the current declaration context for subsequent errors
    pub fn set_type_context(&mut self, type_name: impl Into<String>) {
        self.type_context = Some(type_name.into());
        self.member_context = None;
    }

    pub fn set_member_context(&mut self, member: impl Into<String>) {
        self.member_context = Some(member.into());
    }

    pub fn clear_member_context(&mut self) {
        self.member_context = None;
    }

    /// Clear the declaration context (usually when moving to the next declaration)
    pub fn clear_type_context(&mut self) {
        self.type_context = None;
        self.member_context = None;
    }

    /// Add an error with the current context
    pub fn add(&mut self, mut entry: ErrorEntry) {
        // Apply context if location is not already set
        if entry.location.package.is_none() {
            entry.location.package = self.package_context.clone();
        }
        if entry.location.type_name.is_none() {
            entry.location.type_name = self.type_context.clone();
        }
        if entry.location.member.is_none() {
            entry.location.member = self.member_context.clone();
        }
        self.entries.push(entry);
    }

    pub fn has_errors(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[ErrorEntry] {
        &self.entries
    }

    pub fn by_category(&self, category: ErrorCategory) -> impl Iterator<Item = &ErrorEntry> {
        self.entries.iter().filter(move |e| e.category == category)
    }

    /// Format errors as a summary report, grouped by category
    pub fn format_summary(&self) -> String {
        if self.entries.is_empty() {
            return "No errors".to_string();
        }

        let mut by_category: BTreeMap<ErrorCategory, Vec<&ErrorEntry>> = BTreeMap::new();
        for entry in &self.entries {
            by_category.entry(entry.category).or_default().push(entry);
        }

        let mut lines = Vec::new();
        lines.push(format!("Found {} error(s):", self.entries.len()));
        lines.push(String::new());

        for (category, entries) in by_category {
            lines.push(format!("## {} ({} errors):", category, entries.len()));
            for entry in entries.iter().take(10) {
                lines.push(format!("  - {}", entry));
            }
            if entries.len() > 10 {
                lines.push(format!("  ... and {} more", entries.len() - 10));
            }
            lines.push(String::new());
        }

        lines.join("\n")
    }
}

impl From<BatchErrors> for CodegenError {
    fn from(errors: BatchErrors) -> Self {
        CodegenError::Batch {
            count: errors.count(),
            summary: errors.format_summary(),
        }
    }
}

impl fmt::Display for BatchErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_summary())
    }
}
