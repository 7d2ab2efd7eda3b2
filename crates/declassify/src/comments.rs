//! Carrying member comments over to the generated object.

use crate::error::DeclassifyError;
use crate::model::LeadingComment;
use crate::parse::ParsedScript;
use crate::reindent::Reindenter;
use swc_common::comments::CommentKind;
use swc_common::BytePos;

/// Comments directly before the token at `pos`.
pub(crate) fn leading_comments(
    parsed: &ParsedScript<'_>,
    reindenter: &Reindenter<'_, '_>,
    pos: BytePos,
) -> Result<Vec<LeadingComment>, DeclassifyError> {
    parsed
        .leading_comments(pos)
        .into_iter()
        .map(|comment| match comment.kind {
            CommentKind::Line => Ok(LeadingComment::Line(comment.text.to_string())),
            CommentKind::Block if is_doc(&comment.text) => {
                Ok(LeadingComment::Doc(doc_lines(&comment.text)))
            }
            CommentKind::Block => reindenter
                .code(parsed.span(comment.span))
                .map(LeadingComment::Block),
        })
        .collect()
}

/// `/** ... */`, but not `/**/`.
fn is_doc(text: &str) -> bool {
    text.starts_with('*')
}

/// Splits the inside of a doc comment into lines without the `*` gutter.
///
/// `text` is what lies between `/*` and `*/`, so it starts with the second
/// star of the opening `/**`.
pub(crate) fn doc_lines(text: &str) -> Vec<String> {
    let body = &text[1..];
    let body = body.trim_start_matches(|c: char| c.is_whitespace() && c != '\n');
    let body = body.strip_prefix('\n').unwrap_or(body);
    let body = body.trim_end_matches(|c: char| c.is_whitespace() && c != '\n');
    let body = body.strip_suffix('\n').unwrap_or(body);
    let body = body.strip_suffix('\r').unwrap_or(body);

    body.split('\n')
        .map(|line| {
            let line = line.strip_suffix('\r').unwrap_or(line);
            let trimmed = line.trim_start();
            match trimmed.strip_prefix('*') {
                Some(after) => after.strip_prefix(' ').unwrap_or(after).to_string(),
                None => line.to_string(),
            }
        })
        .collect()
}
