//! Line-oriented code fragments.
//!
//! Every piece of output is built as a [`Fragment`]: a list of lines whose
//! indentation is relative to the fragment's first line. Nesting a fragment
//! inside an object literal is then a matter of [`Fragment::indented`].
//!
//! Lines that start inside a template literal are marked verbatim. Their
//! leading whitespace is part of a string value, so nesting never touches it.

use std::fmt;

/// A single output line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    /// The line continues a template literal and must not be re-indented.
    pub verbatim: bool,
}

impl Line {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            verbatim: false,
        }
    }

    #[cfg(test)]
    pub fn verbatim(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            verbatim: true,
        }
    }
}

/// A block of code lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    lines: Vec<Line>,
}

impl Fragment {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fragment holding one line.
    pub fn line(text: impl Into<String>) -> Self {
        Self {
            lines: vec![Line::new(text)],
        }
    }

    /// Splits `text` on `\n`. No line is verbatim.
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.split('\n').map(Line::new).collect(),
        }
    }

    pub fn from_lines(lines: Vec<Line>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn push(&mut self, text: impl Into<String>) {
        self.lines.push(Line::new(text));
    }

    pub fn append(&mut self, other: Fragment) {
        self.lines.extend(other.lines);
    }

    /// Glues `other` onto the end of the last line, separated by `separator`.
    ///
    /// `other`'s first line continues the last line; its remaining lines
    /// follow unchanged.
    pub fn join(mut self, separator: &str, other: Fragment) -> Fragment {
        let mut rest = other.lines.into_iter();
        let Some(first) = rest.next() else {
            return self;
        };
        match self.lines.last_mut() {
            Some(last) => {
                last.text.push_str(separator);
                last.text.push_str(&first.text);
            }
            None => self.lines.push(first),
        }
        self.lines.extend(rest);
        self
    }

    pub fn prefix_first(&mut self, prefix: &str) {
        match self.lines.first_mut() {
            Some(first) => first.text.insert_str(0, prefix),
            None => self.lines.push(Line::new(prefix)),
        }
    }

    pub fn suffix_last(&mut self, suffix: &str) {
        match self.lines.last_mut() {
            Some(last) => last.text.push_str(suffix),
            None => self.lines.push(Line::new(suffix)),
        }
    }

    /// Prefixes every non-empty, non-verbatim line with `unit`.
    pub fn indented(self, unit: &str) -> Fragment {
        self.indent_lines(unit, 0)
    }

    /// Like [`indented`](Self::indented) but leaves the first line alone.
    ///
    /// Used when the first line is spliced after existing text on a line.
    pub fn indent_continuation(self, indent: &str) -> Fragment {
        self.indent_lines(indent, 1)
    }

    fn indent_lines(self, indent: &str, skip: usize) -> Fragment {
        if indent.is_empty() {
            return self;
        }
        let lines = self
            .lines
            .into_iter()
            .enumerate()
            .map(|(idx, line)| {
                if idx < skip || line.verbatim || line.text.is_empty() {
                    line
                } else {
                    Line {
                        text: format!("{indent}{}", line.text),
                        verbatim: false,
                    }
                }
            })
            .collect();
        Fragment { lines }
    }

    /// Joins the lines with `new_line`.
    pub fn render(&self, new_line: &str) -> String {
        let mut out = String::new();
        for (idx, line) in self.lines.iter().enumerate() {
            if idx > 0 {
                out.push_str(new_line);
            }
            out.push_str(&line.text);
        }
        out
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_indented_skips_blank_and_verbatim_lines() {
        let fragment = Fragment::from_lines(vec![
            Line::new("msg: `a"),
            Line::verbatim("  b`,"),
            Line::new(""),
            Line::new("other: 1"),
        ]);
        assert_eq!(
            fragment.indented("  ").to_string(),
            "  msg: `a\n  b`,\n\n  other: 1"
        );
    }

    #[test]
    fn test_join_continues_last_line() {
        let key = Fragment::line("total():");
        let body = Fragment::from_text("{\n  return 1\n}");
        assert_eq!(
            key.join(" number ", body).to_string(),
            "total(): number {\n  return 1\n}"
        );
    }

    #[test]
    fn test_join_with_empty_sides() {
        assert_eq!(Fragment::new().join(" ", Fragment::line("x")).to_string(), "x");
        assert_eq!(Fragment::line("x").join(" ", Fragment::new()).to_string(), "x");
    }

    #[test]
    fn test_indent_continuation_keeps_first_line() {
        let fragment = Fragment::from_text("export default Vue.extend({\n  name: 'A'\n})");
        assert_eq!(
            fragment.indent_continuation("    ").render("\r\n"),
            "export default Vue.extend({\r\n      name: 'A'\r\n    })"
        );
    }

    #[test]
    fn test_prefix_and_suffix() {
        let mut fragment = Fragment::from_text("{\n}");
        fragment.prefix_first("data() ");
        fragment.suffix_last(",");
        assert_eq!(fragment.to_string(), "data() {\n},");
    }
}
