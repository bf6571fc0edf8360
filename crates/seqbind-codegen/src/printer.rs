//! Indenting text sink used by the generators.

use crate::error::BatchErrors;
use std::fmt;

/// Render one member into a printer of its own.
///
/// Returns `None` when rendering recorded any diagnostic, so the member's
/// partial output never reaches the artifact.
pub fn render_member<F>(errors: &mut BatchErrors, render: F) -> Result<Option<Printer>, fmt::Error>
where
    F: FnOnce(&mut Printer, &mut BatchErrors) -> fmt::Result,
{
    let before = errors.count();
    let mut p = Printer::new();
    render(&mut p, errors)?;
    Ok((errors.count() == before).then_some(p))
}

/// Tab-indents every line written through `write!`/`writeln!`
#[derive(Debug)]
pub struct Printer {
    buf: String,
    indent: usize,
    at_line_start: bool,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

impl Printer {
    pub fn new() -> Self {
        Self {
            buf: String::new(),
            indent: 0,
            at_line_start: true,
        }
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn outdent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    /// Splice in text rendered by another printer
    pub fn append(&mut self, other: Printer) {
        self.buf.push_str(&other.buf);
        self.at_line_start = self.buf.is_empty() || self.buf.ends_with('\n');
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}

impl fmt::Write for Printer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for ch in s.chars() {
            if ch == '\n' {
                self.at_line_start = true;
            } else if self.at_line_start {
                for _ in 0..self.indent {
                    self.buf.push('\t');
                }
                self.at_line_start = false;
            }
            self.buf.push(ch);
        }
        Ok(())
    }
}
