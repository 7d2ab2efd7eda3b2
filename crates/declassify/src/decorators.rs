//! Reading decorator calls and their literal arguments.

use swc_common::Span as SwcSpan;
use swc_ecma_ast::{
    CallExpr, Callee, Decorator, Expr, ExprOrSpread, Lit, ObjectLit, Prop, PropName, PropOrSpread,
};

/// The decorators a class component may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DecoratorKind {
    Component,
    Prop,
    PropSync,
    VModel,
    Watch,
    Emit,
}

impl DecoratorKind {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "Component" => DecoratorKind::Component,
            "Prop" => DecoratorKind::Prop,
            "PropSync" => DecoratorKind::PropSync,
            "VModel" => DecoratorKind::VModel,
            "Watch" => DecoratorKind::Watch,
            "Emit" => DecoratorKind::Emit,
            _ => return None,
        })
    }
}

/// `@Name` or `@Name(args)`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DecoratorCall<'a> {
    pub name: &'a str,
    pub args: &'a [ExprOrSpread],
    pub span: SwcSpan,
}

impl<'a> DecoratorCall<'a> {
    pub fn kind(&self) -> Option<DecoratorKind> {
        DecoratorKind::from_name(self.name)
    }

    /// The argument at `index`, or `None` when there are fewer arguments.
    pub fn arg(&self, index: usize) -> Result<Option<&'a Expr>, String> {
        match self.args.get(index) {
            None => Ok(None),
            Some(arg) if arg.spread.is_some() => {
                Err("spread arguments are not supported".to_string())
            }
            Some(arg) => Ok(Some(&*arg.expr)),
        }
    }
}

/// Returns `None` for decorators that are not a plain name or a call of one.
pub(crate) fn decorator_call(decorator: &Decorator) -> Option<DecoratorCall<'_>> {
    match &*decorator.expr {
        Expr::Ident(ident) => Some(DecoratorCall {
            name: ident.sym.as_str(),
            args: &[],
            span: decorator.span,
        }),
        Expr::Call(CallExpr {
            callee: Callee::Expr(callee),
            args,
            ..
        }) => match &**callee {
            Expr::Ident(ident) => Some(DecoratorCall {
                name: ident.sym.as_str(),
                args: args.as_slice(),
                span: decorator.span,
            }),
            _ => None,
        },
        _ => None,
    }
}

/// The value of a string literal expression.
pub(crate) fn string_literal(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Lit(Lit::Str(s)) => Some(s.value.to_string_lossy().into_owned()),
        Expr::Paren(paren) => string_literal(&paren.expr),
        _ => None,
    }
}

/// The name a property key stands for, when it is static.
pub(crate) fn prop_name(key: &PropName) -> Option<String> {
    match key {
        PropName::Ident(ident) => Some(ident.sym.to_string()),
        PropName::Str(s) => Some(s.value.to_string_lossy().into_owned()),
        PropName::Num(num) => Some(num.value.to_string()),
        _ => None,
    }
}

/// Finds the `name: value` entry of an options object.
///
/// An entry with that name written any other way (shorthand, method,
/// accessor) is an error, since its text cannot be copied as an option.
pub(crate) fn option_entry<'a>(object: &'a ObjectLit, name: &str) -> Result<Option<&'a Prop>, String> {
    for prop in &object.props {
        let PropOrSpread::Prop(prop) = prop else {
            continue;
        };
        let key = match &**prop {
            Prop::KeyValue(kv) => prop_name(&kv.key),
            Prop::Shorthand(ident) => Some(ident.sym.to_string()),
            Prop::Assign(assign) => Some(assign.key.sym.to_string()),
            Prop::Getter(getter) => prop_name(&getter.key),
            Prop::Setter(setter) => prop_name(&setter.key),
            Prop::Method(method) => prop_name(&method.key),
        };
        if key.as_deref() != Some(name) {
            continue;
        }
        return match &**prop {
            Prop::KeyValue(_) => Ok(Some(&**prop)),
            _ => Err(format!("`{name}` must be written as `{name}: value`")),
        };
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_script;
    use swc_ecma_ast::{ClassMember, Decl, ModuleItem, Stmt};

    fn with_decorator<T>(source: &str, check: impl FnOnce(&Decorator) -> T) -> T {
        let parsed = parse_script(source).unwrap();
        let ModuleItem::Stmt(Stmt::Decl(Decl::Class(class))) = &parsed.module.body[0] else {
            panic!("expected a class");
        };
        let ClassMember::ClassProp(prop) = &class.class.body[0] else {
            panic!("expected a field");
        };
        check(&prop.decorators[0])
    }

    #[test]
    fn test_bare_and_called_decorators() {
        let name = with_decorator("class A { @Prop x!: string }", |d| {
            decorator_call(d).map(|call| (call.name.to_string(), call.args.len()))
        });
        assert_eq!(name, Some(("Prop".to_string(), 0)));

        let name = with_decorator("class A { @PropSync('name', {}) x!: string }", |d| {
            let call = decorator_call(d).unwrap();
            (call.name.to_string(), call.arg(0).ok().flatten().and_then(string_literal))
        });
        assert_eq!(name, ("PropSync".to_string(), Some("name".to_string())));
    }

    #[test]
    fn test_decorator_kinds() {
        assert_eq!(DecoratorKind::from_name("PropSync"), Some(DecoratorKind::PropSync));
        assert_eq!(DecoratorKind::from_name("Ref"), None);
    }

    #[test]
    fn test_member_decorators_are_unsupported() {
        let call = with_decorator("class A { @ns.Prop() x!: string }", |d| decorator_call(d).is_none());
        assert!(call);
    }

    #[test]
    fn test_option_entry() {
        with_decorator(
            "class A { @Prop({ required: true, default() { return 1 } }) x!: number }",
            |d| {
                let call = decorator_call(d).unwrap();
                let Some(Expr::Object(object)) = call.arg(0).unwrap() else {
                    panic!("expected an object");
                };
                assert!(option_entry(object, "required").unwrap().is_some());
                assert!(option_entry(object, "default").is_err());
                assert!(option_entry(object, "validator").unwrap().is_none());
            },
        );
    }
}
