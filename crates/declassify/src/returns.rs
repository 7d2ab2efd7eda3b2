//! Finding the `return` statements that leave a method body.

use crate::parse::needs_parens_after_await;
use swc_common::Span as SwcSpan;
use swc_ecma_ast::{
    ArrowExpr, BlockStmt, Class, Function, GetterProp, ReturnStmt, SetterProp, Stmt,
};
use swc_ecma_visit::{Visit, VisitWith};

/// A `return` that belongs to the method itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DirectReturn {
    /// The whole statement, `;` included.
    pub span: SwcSpan,
    /// The returned expression, if any.
    pub arg: Option<SwcSpan>,
    /// The statement sits in a statement list. When false it is the
    /// braceless body of an `if`, loop or label and needs braces before
    /// more statements can go next to it.
    pub in_block: bool,
    /// The returned expression must be parenthesized after `await`.
    pub parenthesize: bool,
}

/// Returns of `body`, in source order, skipping those of nested functions,
/// arrow functions, classes and object accessors.
pub(crate) fn direct_returns(body: &BlockStmt) -> Vec<DirectReturn> {
    let mut finder = ReturnFinder::default();
    body.visit_with(&mut finder);
    finder.found
}

#[derive(Default)]
struct ReturnFinder {
    found: Vec<DirectReturn>,
}

impl ReturnFinder {
    fn record(&mut self, ret: &ReturnStmt, in_block: bool) {
        self.found.push(DirectReturn {
            span: ret.span,
            arg: ret.arg.as_ref().map(|arg| swc_common::Spanned::span(&**arg)),
            in_block,
            parenthesize: ret.arg.as_deref().is_some_and(needs_parens_after_await),
        });
    }
}

impl Visit for ReturnFinder {
    fn visit_stmts(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            match stmt {
                Stmt::Return(ret) => self.record(ret, true),
                other => other.visit_with(self),
            }
        }
    }

    fn visit_return_stmt(&mut self, ret: &ReturnStmt) {
        self.record(ret, false);
    }

    fn visit_function(&mut self, _: &Function) {}

    fn visit_arrow_expr(&mut self, _: &ArrowExpr) {}

    fn visit_class(&mut self, _: &Class) {}

    fn visit_getter_prop(&mut self, _: &GetterProp) {}

    fn visit_setter_prop(&mut self, _: &SetterProp) {}
}
