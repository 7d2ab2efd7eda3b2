//! Reading a decorated class into a [`ComponentModel`].
//!
//! The default export is resolved to its class, and each member is
//! classified by its decorator:
//!
//! | member                         | becomes                          |
//! |--------------------------------|----------------------------------|
//! | `@Prop() x!: T`                | prop `x`                         |
//! | `@PropSync('y') x!: T`         | prop `y` + computed proxy `x`    |
//! | `@VModel() x!: T`              | prop `value` + computed proxy `x`|
//! | `x = init`                     | `data()` entry                   |
//! | `get x()` / `set x(v)`         | computed `x`                     |
//! | `@Watch('path') m()`           | watcher calling `m`              |
//! | `@Emit() m()`                  | method with `$emit` calls added  |
//! | lifecycle hook name            | top-level hook                   |
//! | any other method               | entry under `methods`            |

use crate::comments::leading_comments;
use crate::decorators::{
    decorator_call, option_entry, prop_name, string_literal, DecoratorCall, DecoratorKind,
};
use crate::error::{DeclassifyError, DeclassifyErrorKind, Warning};
use crate::events::EmitRewriter;
use crate::fragment::Fragment;
use crate::model::{
    ComponentModel, ConfigEntry, Getter, Heritage, Input, LeadingComment, Method, ModelBinding,
    PropOptions, ReactiveField, Setter, SyncedInput, Watcher,
};
use crate::options::Style;
use crate::parse::{needs_parens_before_as, ParsedScript};
use crate::reindent::{detect_unit, Reindenter};
use crate::types::{FieldType, Primitive, TypeResolver};
use source_patch::{line_indent, Patch, Span};
use swc_common::{BytePos, Span as SwcSpan, Spanned};
use swc_ecma_ast::{
    CallExpr, Callee, Class, ClassMember, ClassMethod, ClassProp, Decl, DefaultDecl, Decorator,
    Expr, Ident, Lit, MethodKind, ModuleDecl, ModuleItem, ObjectLit, Pat, Stmt,
};

/// Method names Vue calls itself. These stay on the options object.
pub(crate) const LIFECYCLE_HOOKS: &[&str] = &[
    "data",
    "beforeCreate",
    "created",
    "beforeMount",
    "mounted",
    "beforeUpdate",
    "updated",
    "activated",
    "deactivated",
    "beforeDestroy",
    "destroyed",
    "errorCaptured",
    "serverPrefetch",
    "render",
    "renderError",
    "beforeRouteEnter",
    "beforeRouteUpdate",
    "beforeRouteLeave",
];

/// The extracted component and where it sits in the script.
pub(crate) struct Extraction {
    pub model: ComponentModel,
    /// The decorated class declaration, `export default` included.
    pub range: Span,
    /// A separate `export default Name` statement, when the class was
    /// declared first and exported afterwards.
    pub export_statement: Option<Span>,
    /// Indentation of the line the class starts on.
    pub indent: String,
    pub warnings: Vec<Warning>,
}

struct Located<'m> {
    class: &'m Class,
    ident: Option<&'m Ident>,
    range: Span,
    export_statement: Option<Span>,
}

pub(crate) fn extract_component(
    parsed: &ParsedScript<'_>,
    style: &Style,
) -> Result<Extraction, DeclassifyError> {
    let located = locate(parsed)?;
    let class = located.class;
    let component = component_decorator(parsed, class, located.range)?;

    let indent = line_indent(parsed.source, u32::from(located.range.start) as usize).to_string();
    let member_starts = class
        .body
        .iter()
        .filter(|member| !matches!(member, ClassMember::Empty(_)))
        .map(|member| u32::from(parsed.offset(member_start(member))) as usize);
    let unit = detect_unit(parsed.source, member_starts, &indent, &style.unit);

    let reindenter = Reindenter::new(parsed, unit, style.unit.clone());
    let mut extractor = Extractor {
        parsed,
        reindenter,
        resolver: TypeResolver::new(&parsed.module.body),
        style,
        model: ComponentModel::default(),
        warnings: Vec::new(),
    };

    extractor.options(&component)?;
    if !extractor.config_has_name() {
        extractor.model.name = located.ident.map(|ident| ident.sym.to_string());
    }
    extractor.heritage(class)?;
    for member in &class.body {
        extractor.member(member)?;
    }
    extractor.check_derived()?;
    extractor.check_data_hook()?;

    Ok(Extraction {
        model: extractor.model,
        range: located.range,
        export_statement: located.export_statement,
        indent,
        warnings: extractor.warnings,
    })
}

/// Resolves the default export to a class declaration.
fn locate<'m>(parsed: &'m ParsedScript<'_>) -> Result<Located<'m>, DeclassifyError> {
    let body = &parsed.module.body;
    for item in body {
        let ModuleItem::ModuleDecl(decl) = item else {
            continue;
        };
        match decl {
            ModuleDecl::ExportDefaultDecl(export) => {
                let DefaultDecl::Class(class_expr) = &export.decl else {
                    return Err(not_a_component(
                        "the default export is not a class",
                        Some(parsed.span(export.span)),
                    ));
                };
                return Ok(Located {
                    class: &class_expr.class,
                    ident: class_expr.ident.as_ref(),
                    range: class_range(parsed, export.span, &class_expr.class),
                    export_statement: None,
                });
            }
            ModuleDecl::ExportDefaultExpr(export) => {
                let span = parsed.span(export.span);
                let Expr::Ident(name) = unparen(&export.expr) else {
                    return Err(not_a_component(
                        "the default export is not a class",
                        Some(span),
                    ));
                };
                let declared = body.iter().find_map(|item| match item {
                    ModuleItem::Stmt(Stmt::Decl(Decl::Class(class))) if class.ident.sym == name.sym => {
                        Some(class)
                    }
                    _ => None,
                });
                let Some(declared) = declared else {
                    return Err(not_a_component(
                        &format!("the default export `{}` is not a class declared in this file", name.sym),
                        Some(span),
                    ));
                };
                return Ok(Located {
                    class: &declared.class,
                    ident: Some(&declared.ident),
                    range: class_range(parsed, declared.class.span, &declared.class),
                    export_statement: Some(span),
                });
            }
            _ => {}
        }
    }
    Err(not_a_component("the script has no default export", None))
}

fn unparen(expr: &Expr) -> &Expr {
    match expr {
        Expr::Paren(paren) => unparen(&paren.expr),
        other => other,
    }
}

fn not_a_component(reason: &str, span: Option<Span>) -> DeclassifyError {
    DeclassifyError {
        kind: DeclassifyErrorKind::NotAComponent {
            reason: reason.to_string(),
        },
        span,
    }
}

/// The span of the declaration including its decorators.
fn class_range(parsed: &ParsedScript<'_>, outer: SwcSpan, class: &Class) -> Span {
    let mut lo = outer.lo.min(class.span.lo);
    let hi = outer.hi.max(class.span.hi);
    for decorator in &class.decorators {
        lo = lo.min(decorator.span.lo);
    }
    parsed.span(SwcSpan::new(lo, hi))
}

fn component_decorator<'c>(
    parsed: &ParsedScript<'_>,
    class: &'c Class,
    range: Span,
) -> Result<DecoratorCall<'c>, DeclassifyError> {
    let calls: Vec<Option<DecoratorCall<'c>>> = class.decorators.iter().map(decorator_call).collect();
    let position = calls
        .iter()
        .position(|call| matches!(call, Some(call) if call.kind() == Some(DecoratorKind::Component)))
        .ok_or_else(|| not_a_component("the class has no @Component decorator", Some(range)))?;

    let mut component = None;
    for (idx, (decorator, call)) in class.decorators.iter().zip(calls).enumerate() {
        match call {
            Some(call) if idx == position => component = Some(call),
            Some(call) => {
                return Err(DeclassifyError::new(
                    DeclassifyErrorKind::UnsupportedDecorator {
                        name: call.name.to_string(),
                    },
                    parsed.span(decorator.span),
                ))
            }
            None => return Err(unsupported_decorator(parsed, decorator)),
        }
    }
    component.ok_or_else(|| not_a_component("the class has no @Component decorator", Some(range)))
}

fn unsupported_decorator(parsed: &ParsedScript<'_>, decorator: &Decorator) -> DeclassifyError {
    DeclassifyError::new(
        DeclassifyErrorKind::UnsupportedDecorator {
            name: parsed.text(&*decorator.expr).to_string(),
        },
        parsed.span(decorator.span),
    )
}

/// Position of a member's first token, decorators included.
fn member_start(member: &ClassMember) -> BytePos {
    match member {
        ClassMember::ClassProp(prop) => member_start_of(prop.span, &prop.decorators),
        ClassMember::Method(method) => member_start_of(method.span, &method.function.decorators),
        other => other.span().lo,
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default().trim()
}

struct Extractor<'p, 'a> {
    parsed: &'p ParsedScript<'a>,
    reindenter: Reindenter<'p, 'a>,
    resolver: TypeResolver<'p>,
    style: &'p Style,
    model: ComponentModel,
    warnings: Vec<Warning>,
}

impl<'p, 'a> Extractor<'p, 'a> {
    fn comments(&self, pos: BytePos) -> Result<Vec<LeadingComment>, DeclassifyError> {
        leading_comments(self.parsed, &self.reindenter, pos)
    }

    fn code(&self, node: &impl Spanned) -> Result<Fragment, DeclassifyError> {
        self.reindenter.code(self.parsed.span_of(node))
    }

    fn code_string(&self, node: &impl Spanned) -> Result<String, DeclassifyError> {
        self.reindenter.code_string(self.parsed.span_of(node))
    }

    fn warn(&mut self, message: String, span: SwcSpan) {
        let span = self.parsed.span(span);
        self.warnings.push(Warning::new(message, Some(span)));
    }

    fn unsupported(&self, description: String, span: SwcSpan) -> DeclassifyError {
        DeclassifyError::new(
            DeclassifyErrorKind::UnsupportedMember { description },
            self.parsed.span(span),
        )
    }

    fn unsupported_call(&self, call: &DecoratorCall<'_>) -> DeclassifyError {
        DeclassifyError::new(
            DeclassifyErrorKind::UnsupportedDecorator {
                name: call.name.to_string(),
            },
            self.parsed.span(call.span),
        )
    }

    fn decorator(&self, decorator: &'p Decorator) -> Result<DecoratorCall<'p>, DeclassifyError> {
        decorator_call(decorator).ok_or_else(|| unsupported_decorator(self.parsed, decorator))
    }

    /// The entries of `@Component({ ... })`.
    fn options(&mut self, component: &DecoratorCall<'_>) -> Result<(), DeclassifyError> {
        let invalid = |message: &str| {
            DeclassifyError::new(
                DeclassifyErrorKind::InvalidDecoratorArgument {
                    decorator: "Component".to_string(),
                    message: message.to_string(),
                },
                self.parsed.span(component.span),
            )
        };
        if component.args.len() > 1 {
            return Err(invalid("expected at most one options object"));
        }
        let object = match component.arg(0) {
            Ok(None) => return Ok(()),
            Ok(Some(Expr::Object(object))) => object,
            Ok(Some(_)) => return Err(invalid("the options must be an object literal")),
            Err(message) => return Err(invalid(&message)),
        };
        for prop in &object.props {
            let comments = self.comments(prop.span().lo)?;
            let code = self.code(prop)?;
            self.model.config.push(ConfigEntry { comments, code });
        }
        Ok(())
    }

    fn config_has_name(&self) -> bool {
        self.model.config.iter().any(|entry| {
            entry
                .code
                .lines()
                .first()
                .is_some_and(|line| line.text.starts_with("name:"))
        })
    }

    fn heritage(&mut self, class: &Class) -> Result<(), DeclassifyError> {
        let Some(super_class) = &class.super_class else {
            return Ok(());
        };
        self.model.heritage = match unparen(super_class) {
            Expr::Ident(ident) if ident.sym.as_str() == "Vue" => Heritage::None,
            Expr::Call(CallExpr {
                callee: Callee::Expr(callee),
                args,
                ..
            }) if matches!(&**callee, Expr::Ident(ident) if matches!(ident.sym.as_str(), "Mixins" | "mixins")) => {
                let mixins = args
                    .iter()
                    .map(|arg| self.code_string(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                Heritage::Mixins(mixins)
            }
            other => Heritage::Extends(self.code(other)?),
        };
        Ok(())
    }

    fn member(&mut self, member: &'p ClassMember) -> Result<(), DeclassifyError> {
        match member {
            ClassMember::ClassProp(prop) if !prop.is_static => self.field(prop),
            ClassMember::Method(method) if !method.is_static => match method.kind {
                MethodKind::Method => self.method(method),
                MethodKind::Getter => self.getter(method),
                MethodKind::Setter => self.setter(method),
            },
            ClassMember::Empty(_) => Ok(()),
            ClassMember::Constructor(ctor) => Err(self.unsupported(
                "constructors cannot be expressed in an options object".to_string(),
                ctor.span,
            )),
            other => Err(self.unsupported(
                format!("`{}`", first_line(self.parsed.text(other))),
                other.span(),
            )),
        }
    }

    fn field(&mut self, prop: &'p ClassProp) -> Result<(), DeclassifyError> {
        let key = self.parsed.text(&prop.key).to_string();
        let comments = self.comments(member_start_of(prop.span, &prop.decorators))?;
        let call = match prop.decorators.as_slice() {
            [] => return self.data_field(prop, key, comments),
            [decorator] => self.decorator(decorator)?,
            [_, second, ..] => {
                return Err(self.unsupported(
                    format!("field `{key}` has more than one decorator"),
                    second.span,
                ))
            }
        };

        match call.kind() {
            Some(DecoratorKind::Prop) => {
                let input = self.input(prop, &call, 0, key, comments)?;
                self.model.inputs.push(input);
            }
            Some(DecoratorKind::PropSync) => {
                let target = call
                    .arg(0)
                    .ok()
                    .flatten()
                    .and_then(string_literal)
                    .ok_or_else(|| {
                        DeclassifyError::new(
                            DeclassifyErrorKind::MissingSyncTarget { field: key.clone() },
                            self.parsed.span(call.span),
                        )
                    })?;
                let input = self.input(prop, &call, 1, key, comments)?;
                self.model.synced_inputs.push(SyncedInput { input, target });
            }
            Some(DecoratorKind::VModel) => {
                if self.model.model_binding.is_some() {
                    return Err(DeclassifyError::new(
                        DeclassifyErrorKind::DuplicateModelBinding { field: key },
                        self.parsed.span(prop.span),
                    ));
                }
                let input = self.input(prop, &call, 0, key, comments)?;
                self.model.model_binding = Some(ModelBinding { input });
            }
            _ => return Err(self.unsupported_call(&call)),
        }
        Ok(())
    }

    /// A prop-like field whose options object is argument `options_at`.
    fn input(
        &mut self,
        prop: &ClassProp,
        call: &DecoratorCall<'_>,
        options_at: usize,
        key: String,
        comments: Vec<LeadingComment>,
    ) -> Result<Input, DeclassifyError> {
        let options = self.prop_options(call, options_at, &key)?;
        let ty = self.field_type(prop, &key)?;
        if let Some(value) = &prop.value {
            self.warn(
                format!("the initializer of prop `{key}` was dropped; give it a `default` instead"),
                value.span(),
            );
        }
        Ok(Input {
            key,
            comments,
            ty,
            options,
            span: self.parsed.span(prop.span),
        })
    }

    fn prop_options(
        &self,
        call: &DecoratorCall<'_>,
        index: usize,
        key: &str,
    ) -> Result<PropOptions, DeclassifyError> {
        let invalid = |message: String| {
            DeclassifyError::new(
                DeclassifyErrorKind::InvalidPropArgument {
                    prop: key.to_string(),
                    message,
                },
                self.parsed.span(call.span),
            )
        };
        let object = match call.arg(index) {
            Ok(None) => return Ok(PropOptions::default()),
            Ok(Some(Expr::Object(object))) => object,
            Ok(Some(_)) => return Err(invalid("the options must be an object literal".to_string())),
            Err(message) => return Err(invalid(message)),
        };
        Ok(PropOptions {
            required: self.option_code(object, "required", &invalid)?,
            default: self.option_code(object, "default", &invalid)?,
        })
    }

    fn option_code(
        &self,
        object: &ObjectLit,
        name: &str,
        invalid: &dyn Fn(String) -> DeclassifyError,
    ) -> Result<Option<Fragment>, DeclassifyError> {
        match option_entry(object, name) {
            Ok(Some(prop)) => self.code(prop).map(Some),
            Ok(None) => Ok(None),
            Err(message) => Err(invalid(message)),
        }
    }

    fn field_type(&self, prop: &ClassProp, key: &str) -> Result<FieldType, DeclassifyError> {
        if let Some(ann) = &prop.type_ann {
            let written = self.code_string(&*ann.type_ann)?;
            return Ok(self.resolver.analyze(&ann.type_ann, written));
        }
        let inferred = match prop.value.as_deref().map(unparen) {
            Some(Expr::Lit(Lit::Str(_))) | Some(Expr::Tpl(_)) => Some(Primitive::String),
            Some(Expr::Lit(Lit::Num(_))) => Some(Primitive::Number),
            Some(Expr::Lit(Lit::Bool(_))) => Some(Primitive::Boolean),
            _ => None,
        };
        inferred.map(FieldType::inferred).ok_or_else(|| {
            DeclassifyError::new(
                DeclassifyErrorKind::UntypedProp {
                    name: key.to_string(),
                },
                self.parsed.span(prop.span),
            )
        })
    }

    fn data_field(
        &mut self,
        prop: &ClassProp,
        key: String,
        comments: Vec<LeadingComment>,
    ) -> Result<(), DeclassifyError> {
        let Some(value) = &prop.value else {
            self.warn(
                format!("field `{key}` has no initializer and was left out of data()"),
                prop.span,
            );
            return Ok(());
        };
        let initializer = self.code(&**value)?;
        let written_type = prop
            .type_ann
            .as_ref()
            .map(|ann| self.code_string(&*ann.type_ann))
            .transpose()?;
        self.model.reactive_fields.push(ReactiveField {
            key,
            comments,
            initializer,
            written_type,
            parenthesize: needs_parens_before_as(value),
        });
        Ok(())
    }

    fn method(&mut self, method: &'p ClassMethod) -> Result<(), DeclassifyError> {
        let function = &method.function;
        let key = self.parsed.text(&method.key).to_string();
        let name = prop_name(&method.key).unwrap_or_else(|| key.clone());
        let Some(body) = &function.body else {
            return Err(self.unsupported(format!("method `{name}` has no body"), method.span));
        };
        let comments = self.comments(member_start_of(method.span, &function.decorators))?;

        let mut events = Vec::new();
        for decorator in &function.decorators {
            let call = self.decorator(decorator)?;
            match call.kind() {
                Some(DecoratorKind::Watch) => {
                    let watcher = self.watcher(&call, &name)?;
                    self.model.watchers.push(watcher);
                }
                Some(DecoratorKind::Emit) => events.push(self.emit_event(&call, &name)?),
                _ => return Err(self.unsupported_call(&call)),
            }
        }

        let key_span = self.parsed.span_of(&method.key);
        let mut edits = Patch::new();
        let mut is_async = function.is_async;
        if !events.is_empty() {
            let base = self.reindenter.level_at(key_span.start);
            let rewriter = EmitRewriter::new(self.parsed, &self.reindenter, self.style, base);
            is_async |= rewriter.rewrite(&function.params, body, &events, &mut edits);
        }

        let range = Span::new(key_span.start, self.parsed.span(body.span).end);
        let mut code = self.reindenter.code_with(range, edits)?;
        let prefix = match (is_async, function.is_generator) {
            (true, true) => "async *",
            (true, false) => "async ",
            (false, true) => "*",
            (false, false) => "",
        };
        code.prefix_first(prefix);

        let lifecycle = LIFECYCLE_HOOKS.contains(&name.as_str());
        self.model.methods.push(Method {
            name,
            comments,
            code,
            lifecycle,
        });
        Ok(())
    }

    fn watcher(&self, call: &DecoratorCall<'_>, handler: &str) -> Result<Watcher, DeclassifyError> {
        let invalid = |message: String| {
            DeclassifyError::new(
                DeclassifyErrorKind::InvalidDecoratorArgument {
                    decorator: "Watch".to_string(),
                    message,
                },
                self.parsed.span(call.span),
            )
        };
        let path = call.arg(0).ok().flatten().and_then(string_literal).ok_or_else(|| {
            invalid("the first argument must be a string literal naming the watched path".to_string())
        })?;
        let mut watcher = Watcher {
            path,
            handler: handler.to_string(),
            immediate: None,
            deep: None,
        };
        match call.arg(1) {
            Ok(None) => {}
            Ok(Some(Expr::Object(object))) => {
                watcher.immediate = self.option_code(object, "immediate", &invalid)?;
                watcher.deep = self.option_code(object, "deep", &invalid)?;
            }
            Ok(Some(_)) => {
                return Err(invalid(
                    "the second argument must be an options object literal".to_string(),
                ))
            }
            Err(message) => return Err(invalid(message)),
        }
        Ok(watcher)
    }

    fn emit_event(&self, call: &DecoratorCall<'_>, method: &str) -> Result<String, DeclassifyError> {
        let invalid = || {
            DeclassifyError::new(
                DeclassifyErrorKind::InvalidDecoratorArgument {
                    decorator: "Emit".to_string(),
                    message: "the event name must be a string literal".to_string(),
                },
                self.parsed.span(call.span),
            )
        };
        match call.arg(0) {
            Ok(None) => Ok(method.to_string()),
            Ok(Some(expr)) => string_literal(expr).ok_or_else(invalid),
            Err(_) => Err(invalid()),
        }
    }

    fn getter(&mut self, method: &'p ClassMethod) -> Result<(), DeclassifyError> {
        let function = &method.function;
        if let Some(decorator) = function.decorators.first() {
            return Err(self.accessor_decorator(decorator));
        }
        let key = self.parsed.text(&method.key).to_string();
        let Some(body) = &function.body else {
            return Err(self.unsupported(format!("getter `{key}` has no body"), method.span));
        };
        let getter = Getter {
            comments: self.comments(method.span.lo)?,
            return_type: function
                .return_type
                .as_ref()
                .map(|ann| self.code_string(&*ann.type_ann))
                .transpose()?,
            body: self.code(body)?,
            span: self.parsed.span(method.span),
        };
        self.model.derived.entry(key).or_default().getter = Some(getter);
        Ok(())
    }

    fn setter(&mut self, method: &'p ClassMethod) -> Result<(), DeclassifyError> {
        let function = &method.function;
        if let Some(decorator) = function.decorators.first() {
            return Err(self.accessor_decorator(decorator));
        }
        let key = self.parsed.text(&method.key).to_string();
        let (Some(body), Some(param)) = (&function.body, function.params.first()) else {
            return Err(self.unsupported(format!("setter `{key}` has no body"), method.span));
        };
        let param_type = match &param.pat {
            Pat::Ident(binding) => binding
                .type_ann
                .as_ref()
                .map(|ann| self.code_string(&*ann.type_ann))
                .transpose()?,
            _ => None,
        };
        let setter = Setter {
            comments: self.comments(method.span.lo)?,
            param: self.code_string(param)?,
            param_type,
            body: self.code(body)?,
            span: self.parsed.span(method.span),
        };
        self.model.derived.entry(key).or_default().setter = Some(setter);
        Ok(())
    }

    fn accessor_decorator(&self, decorator: &Decorator) -> DeclassifyError {
        match decorator_call(decorator) {
            Some(call) => self.unsupported_call(&call),
            None => unsupported_decorator(self.parsed, decorator),
        }
    }

    /// Every setter needs a getter of the same name.
    fn check_derived(&self) -> Result<(), DeclassifyError> {
        for (name, member) in &self.model.derived {
            if let (None, Some(setter)) = (&member.getter, &member.setter) {
                return Err(DeclassifyError::new(
                    DeclassifyErrorKind::IllegalDerivedSetter { name: name.clone() },
                    setter.span,
                ));
            }
        }
        Ok(())
    }

    /// A `data()` hook would be shadowed by the generated one.
    fn check_data_hook(&self) -> Result<(), DeclassifyError> {
        if self.model.reactive_fields.is_empty() {
            return Ok(());
        }
        match self.model.methods.iter().find(|method| method.name == "data") {
            Some(_) => Err(DeclassifyError::without_span(
                DeclassifyErrorKind::UnsupportedMember {
                    description: "a `data()` method next to initialized fields".to_string(),
                },
            )),
            None => Ok(()),
        }
    }
}

fn member_start_of(span: SwcSpan, decorators: &[Decorator]) -> BytePos {
    decorators
        .iter()
        .map(|decorator| decorator.span.lo)
        .fold(span.lo, BytePos::min)
}
