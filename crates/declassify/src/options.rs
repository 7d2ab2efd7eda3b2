//! Formatting options for generated code.

/// Options for [`declassify`](crate::declassify).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclassifyOptions {
    pub format: FormatOptions,
}

/// How generated code is laid out.
///
/// Copied source text keeps its own quotes and semicolons; these settings
/// apply to text the rewriter writes itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    pub indent: IndentStyle,
    pub quote: QuoteKind,
    pub new_line: NewLineKind,
    /// Emit a comma after the last entry of multi-line objects and arrays.
    pub trailing_commas: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indent: IndentStyle::Spaces(2),
            quote: QuoteKind::Single,
            new_line: NewLineKind::Lf,
            trailing_commas: false,
        }
    }
}

/// One level of indentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentStyle {
    Spaces(u8),
    Tab,
}

impl IndentStyle {
    pub fn unit(&self) -> String {
        match self {
            IndentStyle::Spaces(width) => " ".repeat(usize::from(*width)),
            IndentStyle::Tab => "\t".to_string(),
        }
    }
}

/// Quote character for generated string literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteKind {
    Single,
    Double,
}

impl QuoteKind {
    pub fn char(&self) -> char {
        match self {
            QuoteKind::Single => '\'',
            QuoteKind::Double => '"',
        }
    }

    /// Renders `value` as a string literal.
    pub fn quote(&self, value: &str) -> String {
        let quote = self.char();
        let mut out = String::with_capacity(value.len() + 2);
        out.push(quote);
        for ch in value.chars() {
            match ch {
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                c if c == quote => {
                    out.push('\\');
                    out.push(c);
                }
                c => out.push(c),
            }
        }
        out.push(quote);
        out
    }
}

/// Line terminator for the rewritten script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewLineKind {
    Lf,
    CrLf,
}

impl NewLineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NewLineKind::Lf => "\n",
            NewLineKind::CrLf => "\r\n",
        }
    }
}

/// Resolved layout for one rewrite: the user's options plus what was
/// detected from the input.
#[derive(Debug, Clone)]
pub(crate) struct Style {
    /// Target indentation unit.
    pub unit: String,
    pub quote: QuoteKind,
    pub trailing_commas: bool,
    /// Whether generated statements end with `;`.
    pub semi: bool,
}

impl Style {
    pub fn new(options: &FormatOptions, semi: bool) -> Self {
        Self {
            unit: options.indent.unit(),
            quote: options.quote,
            trailing_commas: options.trailing_commas,
            semi,
        }
    }

    pub fn quote(&self, value: &str) -> String {
        self.quote.quote(value)
    }

    pub fn semi(&self) -> &'static str {
        if self.semi {
            ";"
        } else {
            ""
        }
    }
}
