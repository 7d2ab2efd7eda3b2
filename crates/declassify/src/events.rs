//! Rewriting `@Emit` methods into explicit `this.$emit` calls.
//!
//! A method without direct returns gets one `this.$emit(event, ...params)`
//! per decorator appended to its body. A method with direct returns becomes
//! `async`, and each `return value` turns into
//! `this.$emit(event, await value)` per decorator followed by a bare
//! `return`.
//!
//! All edits are expressed against the original source and use the target
//! indentation relative to the method's own line, as
//! [`Reindenter::code_with`] expects.

use crate::options::Style;
use crate::parse::ParsedScript;
use crate::reindent::Reindenter;
use crate::returns::{direct_returns, DirectReturn};
use source_patch::{Patch, Span};
use swc_ecma_ast::{BlockStmt, Param, Pat};

pub(crate) struct EmitRewriter<'r, 'p, 'a> {
    parsed: &'r ParsedScript<'a>,
    reindenter: &'r Reindenter<'p, 'a>,
    style: &'r Style,
    /// Indentation level of the method's first line.
    base: usize,
}

impl<'r, 'p, 'a> EmitRewriter<'r, 'p, 'a> {
    pub fn new(
        parsed: &'r ParsedScript<'a>,
        reindenter: &'r Reindenter<'p, 'a>,
        style: &'r Style,
        base: usize,
    ) -> Self {
        Self {
            parsed,
            reindenter,
            style,
            base,
        }
    }

    /// Adds the rewrite of `body` to `edits`. Returns true when the method
    /// had direct returns and must become `async`.
    pub fn rewrite(
        &self,
        params: &[Param],
        body: &BlockStmt,
        events: &[String],
        edits: &mut Patch,
    ) -> bool {
        let params = self.param_names(params).join(", ");
        let returns = direct_returns(body);
        if returns.is_empty() {
            self.append(body, events, &params, edits);
            return false;
        }
        for ret in &returns {
            self.replace_return(ret, events, &params, edits);
        }
        true
    }

    fn emit_statement(&self, event: &str, payload: &str) -> String {
        let event = self.style.quote(event);
        if payload.is_empty() {
            format!("this.$emit({event}){}", self.style.semi())
        } else {
            format!("this.$emit({event}, {payload}){}", self.style.semi())
        }
    }

    /// Relative level of the line containing `offset`.
    fn level(&self, offset: source_patch::ByteOffset) -> usize {
        self.reindenter.level_at(offset).saturating_sub(self.base)
    }

    fn append(&self, body: &BlockStmt, events: &[String], params: &str, edits: &mut Patch) {
        let source = self.parsed.source;
        let span = self.parsed.span(body.span);
        let range = span.range();
        let inner = &source[range.start + 1..range.end - 1];
        let brace_level = self.level(span.start);
        let statements = events
            .iter()
            .map(|event| self.emit_statement(event, params));

        if inner.trim().is_empty() {
            let mut text = String::from("{");
            for statement in statements {
                text.push('\n');
                text.push_str(&self.reindenter.indent(brace_level + 1));
                text.push_str(&statement);
            }
            text.push('\n');
            text.push_str(&self.reindenter.indent(brace_level));
            text.push('}');
            edits.replace(span, text);
            return;
        }

        let statement_level = match body.stmts.first() {
            Some(first) => {
                let start = self.parsed.span_of(first).start;
                let between = &source[range.start..u32::from(start) as usize];
                if between.contains('\n') {
                    self.level(start)
                } else {
                    brace_level + 1
                }
            }
            None => brace_level + 1,
        };
        let indent = self.reindenter.indent(statement_level);
        let mut text = String::new();
        for statement in statements {
            text.push('\n');
            text.push_str(&indent);
            text.push_str(&statement);
        }
        let insert_at = range.start + 1 + inner.trim_end().len();
        edits.insert(Span::from_usize(insert_at, insert_at).start, text);
    }

    fn replace_return(
        &self,
        ret: &DirectReturn,
        events: &[String],
        params: &str,
        edits: &mut Patch,
    ) {
        let span = self.parsed.span(ret.span);
        let line_level = self.level(span.start);
        let (open, close, level) = if ret.in_block {
            (String::new(), String::new(), line_level)
        } else {
            (
                format!("{{\n{}", self.reindenter.indent(line_level + 1)),
                format!("\n{}}}", self.reindenter.indent(line_level)),
                line_level + 1,
            )
        };
        let new_line = format!("\n{}", self.reindenter.indent(level));
        let semi = self.style.semi();

        match ret.arg {
            Some(arg) => {
                let arg = self.parsed.span(arg);
                let value = self.parsed.slice(arg);
                let Some((first, rest)) = events.split_first() else {
                    return;
                };
                let (lparen, rparen) = if ret.parenthesize { ("(", ")") } else { ("", "") };
                edits.replace(
                    Span::new(span.start, arg.start),
                    format!("{open}this.$emit({}, await {lparen}", self.style.quote(first)),
                );
                edits.insert(arg.end, format!("{rparen})"));
                let payload = format!("await {lparen}{value}{rparen}");
                let mut tail = String::new();
                for event in rest {
                    tail.push_str(&new_line);
                    tail.push_str(&self.emit_statement(event, &payload));
                }
                tail.push_str(&new_line);
                tail.push_str("return");
                tail.push_str(semi);
                tail.push_str(&close);
                edits.insert(span.end, tail);
            }
            None => {
                let mut text = open;
                for (idx, event) in events.iter().enumerate() {
                    if idx > 0 {
                        text.push_str(&new_line);
                    }
                    text.push_str(&self.emit_statement(event, params));
                }
                text.push_str(&new_line);
                text.push_str("return");
                text.push_str(semi);
                text.push_str(&close);
                edits.replace(span, text);
            }
        }
    }

    fn param_names(&self, params: &[Param]) -> Vec<String> {
        params
            .iter()
            .filter_map(|param| self.pattern_name(&param.pat))
            .collect()
    }

    fn pattern_name(&self, pat: &Pat) -> Option<String> {
        match pat {
            Pat::Ident(binding) if &*binding.id.sym == "this" => None,
            Pat::Ident(binding) => Some(binding.id.sym.to_string()),
            Pat::Rest(rest) => self
                .pattern_name(&rest.arg)
                .map(|name| format!("...{name}")),
            Pat::Assign(assign) => self.pattern_name(&assign.left),
            Pat::Object(object) => {
                Some(self.unannotated(object.span, object.type_ann.as_deref()))
            }
            Pat::Array(array) => Some(self.unannotated(array.span, array.type_ann.as_deref())),
            other => Some(self.parsed.text(other).to_string()),
        }
    }

    /// Text of a destructuring pattern without its type annotation.
    fn unannotated(
        &self,
        span: swc_common::Span,
        type_ann: Option<&swc_ecma_ast::TsTypeAnn>,
    ) -> String {
        let mut span = self.parsed.span(span);
        if let Some(ann) = type_ann {
            let ann = self.parsed.span(ann.span);
            if span.start < ann.start && ann.start < span.end {
                span.end = ann.start;
            }
        }
        let text = self.parsed.slice(span).trim_end();
        text.strip_suffix(':').unwrap_or(text).trim_end().to_string()
    }
}
