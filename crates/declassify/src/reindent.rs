//! Copying source text into fragments at a new indentation.
//!
//! A slice of the class body is indented relative to the class. When it
//! moves into an object literal its lines have to be re-based: the leading
//! whitespace of every line is measured in the source's indentation unit,
//! made relative to the slice's first line, and rewritten in the target
//! unit. Whitespace beyond whole units is kept as is.

use crate::error::{DeclassifyError, DeclassifyErrorKind};
use crate::fragment::{Fragment, Line};
use crate::parse::ParsedScript;
use source_patch::{line_indent, ByteOffset, Patch, Span};

pub(crate) struct Reindenter<'p, 'a> {
    parsed: &'p ParsedScript<'a>,
    source_unit: String,
    target_unit: String,
}

impl<'p, 'a> Reindenter<'p, 'a> {
    pub fn new(parsed: &'p ParsedScript<'a>, source_unit: String, target_unit: String) -> Self {
        Self {
            parsed,
            source_unit,
            target_unit,
        }
    }

    /// Indentation level of the line containing `offset`.
    pub fn level_at(&self, offset: ByteOffset) -> usize {
        let indent = line_indent(self.parsed.source, u32::from(offset) as usize);
        split_levels(indent, &self.source_unit).0
    }

    /// `levels` units of target indentation.
    pub fn indent(&self, levels: usize) -> String {
        self.target_unit.repeat(levels)
    }

    /// Copies `span` as a fragment whose indentation is relative to the
    /// line `span` starts on.
    pub fn code(&self, span: Span) -> Result<Fragment, DeclassifyError> {
        self.code_with(span, Patch::new())
    }

    /// Like [`code`](Self::code), with `edits` applied inside `span`.
    ///
    /// Text inserted by `edits` must already use the target unit, relative
    /// to the line `span` starts on.
    pub fn code_with(&self, span: Span, mut edits: Patch) -> Result<Fragment, DeclassifyError> {
        let source = self.parsed.source;
        let base = self.level_at(span.start);
        let claimed: Vec<Span> = edits.edits().map(|edit| edit.span).collect();
        let range = span.range();

        for (idx, _) in source[range.clone()].match_indices('\n') {
            let line_start = range.start + idx + 1;
            if self.parsed.in_template(offset(line_start)) {
                continue;
            }
            let rest = &source[line_start..range.end];
            let ws_len = rest.len() - rest.trim_start_matches([' ', '\t']).len();
            let ws = Span::from_usize(line_start, line_start + ws_len);
            if claimed.iter().any(|edit| touches(*edit, ws)) {
                continue;
            }
            let current = &rest[..ws_len];
            let blank = rest[ws_len..].is_empty() || rest[ws_len..].starts_with(['\n', '\r']);
            let target = if blank {
                String::new()
            } else {
                let (levels, remainder) = split_levels(current, &self.source_unit);
                format!(
                    "{}{}",
                    self.indent(levels.saturating_sub(base)),
                    remainder
                )
            };
            if target != current {
                edits.replace(ws, target);
            }
        }

        let patched = edits
            .apply_range(source, span)
            .map_err(|err| {
                DeclassifyError::new(
                    DeclassifyErrorKind::ConflictingEdits {
                        message: err.to_string(),
                    },
                    span,
                )
            })?;

        let mut lines = Vec::new();
        let mut generated = 0usize;
        for (idx, raw) in patched.text.split('\n').enumerate() {
            let verbatim = idx > 0
                && patched
                    .map
                    .original_position(offset(generated))
                    .is_some_and(|original| self.parsed.in_template(original));
            generated += raw.len() + 1;
            let text = raw.strip_suffix('\r').unwrap_or(raw);
            lines.push(Line {
                text: text.to_string(),
                verbatim,
            });
        }
        Ok(Fragment::from_lines(lines))
    }

    /// [`code`](Self::code) rendered back to a string with `\n` line breaks.
    pub fn code_string(&self, span: Span) -> Result<String, DeclassifyError> {
        self.code(span).map(|fragment| fragment.render("\n"))
    }
}

fn offset(value: usize) -> ByteOffset {
    Span::from_usize(value, value).start
}

/// Whether an edit claims any of the whitespace in `ws`.
fn touches(edit: Span, ws: Span) -> bool {
    if edit.is_empty() {
        ws.start < edit.start && edit.start < ws.end
    } else {
        edit.overlaps(ws)
    }
}

/// Counts how many whole `unit`s prefix `indent`, returning the count and
/// what is left over.
pub(crate) fn split_levels<'s>(indent: &'s str, unit: &str) -> (usize, &'s str) {
    if unit.is_empty() {
        return (0, indent);
    }
    let mut levels = 0;
    let mut rest = indent;
    while let Some(stripped) = rest.strip_prefix(unit) {
        levels += 1;
        rest = stripped;
    }
    (levels, rest)
}

/// Guesses the source's indentation unit from where members start.
///
/// `member_starts` are offsets of the class members and `outer` is the
/// indentation of the class line. Falls back to the first indented line of
/// the script, then to `fallback`.
pub(crate) fn detect_unit(
    source: &str,
    member_starts: impl IntoIterator<Item = usize>,
    outer: &str,
    fallback: &str,
) -> String {
    for start in member_starts {
        let indent = line_indent(source, start);
        if let Some(unit) = indent.strip_prefix(outer) {
            if !unit.is_empty() {
                return unit.to_string();
            }
        }
    }
    source
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| &line[..line.len() - line.trim_start_matches([' ', '\t']).len()])
        .find(|indent| !indent.is_empty())
        .unwrap_or(fallback)
        .to_string()
}
