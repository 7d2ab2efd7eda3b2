//! Parsing the script with swc.

use crate::error::{DeclassifyError, DeclassifyErrorKind};
use source_patch::{ByteOffset, Span};
use std::sync::Arc;
use swc_common::comments::{Comment, Comments, SingleThreadedComments};
use swc_common::{BytePos, FileName, SourceMap, Span as SwcSpan, Spanned};
use swc_ecma_ast::{EsVersion, Expr, Module, Tpl};
use swc_ecma_parser::{lexer::Lexer, Parser, StringInput, Syntax, TsSyntax};
use swc_ecma_visit::{Visit, VisitWith};

/// A parsed script and everything needed to map its nodes back to text.
pub(crate) struct ParsedScript<'a> {
    pub source: &'a str,
    pub module: Module,
    comments: SingleThreadedComments,
    file_start: BytePos,
    /// Spans of every template literal, in source order.
    templates: Vec<Span>,
}

pub(crate) fn parse_script(source: &str) -> Result<ParsedScript<'_>, DeclassifyError> {
    let cm: Arc<SourceMap> = Default::default();
    let fm = cm.new_source_file(
        FileName::Custom("component.ts".into()).into(),
        source.to_string(),
    );
    let file_start = fm.start_pos;
    let comments = SingleThreadedComments::default();
    let syntax = Syntax::Typescript(TsSyntax {
        tsx: false,
        decorators: true,
        ..Default::default()
    });
    let lexer = Lexer::new(
        syntax,
        EsVersion::latest(),
        StringInput::from(&*fm),
        Some(&comments),
    );
    let mut parser = Parser::new_from(lexer);
    let module = parser.parse_module().map_err(|err| {
        let span = convert_span(err.span(), file_start);
        DeclassifyError::new(
            DeclassifyErrorKind::Parse {
                message: err.kind().msg().into_owned(),
            },
            span,
        )
    })?;

    let mut collector = TemplateCollector::default();
    module.visit_with(&mut collector);
    let templates = collector
        .spans
        .into_iter()
        .map(|span| convert_span(span, file_start))
        .collect();

    Ok(ParsedScript {
        source,
        module,
        comments,
        file_start,
        templates,
    })
}

fn convert_span(span: SwcSpan, file_start: BytePos) -> Span {
    Span::new(
        span.lo.0.saturating_sub(file_start.0),
        span.hi.0.saturating_sub(file_start.0),
    )
}

impl<'a> ParsedScript<'a> {
    /// Converts an swc span to a span into [`source`](Self::source).
    pub fn span(&self, span: SwcSpan) -> Span {
        convert_span(span, self.file_start)
    }

    pub fn offset(&self, pos: BytePos) -> ByteOffset {
        Span::empty(pos.0.saturating_sub(self.file_start.0)).start
    }

    pub fn span_of(&self, node: &impl Spanned) -> Span {
        self.span(node.span())
    }

    /// Source text of a node.
    pub fn text(&self, node: &impl Spanned) -> &'a str {
        self.slice(self.span_of(node))
    }

    pub fn slice(&self, span: Span) -> &'a str {
        span.text(self.source).unwrap_or_default()
    }

    /// `span` widened to its whole lines, newline included, when nothing
    /// else shares those lines. The flag tells which span was returned.
    pub fn line_extent(&self, span: Span) -> (Span, bool) {
        let source = self.source;
        let range = span.range();
        let line_start = source[..range.start].rfind('\n').map_or(0, |idx| idx + 1);
        let line_end = source[range.end..]
            .find('\n')
            .map_or(source.len(), |idx| range.end + idx + 1);
        let alone = source[line_start..range.start].trim().is_empty()
            && source[range.end..line_end].trim().is_empty();
        if alone {
            (Span::from_usize(line_start, line_end), true)
        } else {
            (span, false)
        }
    }

    /// Comments directly before the token at `pos`.
    pub fn leading_comments(&self, pos: BytePos) -> Vec<Comment> {
        self.comments.get_leading(pos).unwrap_or_default()
    }

    /// Whether a line starting at `offset` lies inside a template literal.
    pub fn in_template(&self, offset: ByteOffset) -> bool {
        self.templates
            .iter()
            .any(|tpl| tpl.start < offset && offset < tpl.end)
    }
}

#[derive(Default)]
struct TemplateCollector {
    spans: Vec<SwcSpan>,
}

impl Visit for TemplateCollector {
    fn visit_tpl(&mut self, tpl: &Tpl) {
        self.spans.push(tpl.span);
        tpl.visit_children_with(self);
    }
}

/// Whether `expr` needs parentheses to be the operand of `await`.
pub(crate) fn needs_parens_after_await(expr: &Expr) -> bool {
    !matches!(
        expr,
        Expr::This(_)
            | Expr::Array(_)
            | Expr::Object(_)
            | Expr::Fn(_)
            | Expr::Class(_)
            | Expr::Unary(_)
            | Expr::Update(_)
            | Expr::Await(_)
            | Expr::Member(_)
            | Expr::SuperProp(_)
            | Expr::Call(_)
            | Expr::New(_)
            | Expr::Lit(_)
            | Expr::Ident(_)
            | Expr::Tpl(_)
            | Expr::TaggedTpl(_)
            | Expr::MetaProp(_)
            | Expr::Paren(_)
            | Expr::OptChain(_)
            | Expr::TsNonNull(_)
            | Expr::PrivateName(_)
    )
}

/// Whether `expr` binds more loosely than an `as` assertion written after it.
pub(crate) fn needs_parens_before_as(expr: &Expr) -> bool {
    matches!(
        expr,
        Expr::Arrow(_)
            | Expr::Cond(_)
            | Expr::Bin(_)
            | Expr::Assign(_)
            | Expr::Seq(_)
            | Expr::Yield(_)
    )
}
