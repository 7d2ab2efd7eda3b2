//! Prop type analysis.
//!
//! Vue validates props against a runtime constructor, so every prop needs
//! one: `String`, `Number` and `Boolean` for primitives, and otherwise
//! `Function`, `Array` or `Object` narrowed with `PropType<T>`. This module
//! reads the written annotation and resolves local type aliases and
//! interfaces far enough to pick that constructor.

use rustc_hash::FxHashMap;
use swc_ecma_ast::{
    Decl, ModuleDecl, ModuleItem, Stmt, TsEntityName, TsFnOrConstructorType, TsInterfaceDecl,
    TsKeywordTypeKind, TsType, TsTypeElement, TsUnionOrIntersectionType,
};

/// How deep alias chains are followed before giving up.
const MAX_ALIAS_DEPTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    String,
    Number,
    Boolean,
}

impl Primitive {
    /// The runtime constructor Vue checks against.
    pub fn constructor(&self) -> &'static str {
        match self {
            Primitive::String => "String",
            Primitive::Number => "Number",
            Primitive::Boolean => "Boolean",
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Primitive::String => "string",
            Primitive::Number => "number",
            Primitive::Boolean => "boolean",
        }
    }
}

/// What is known about a prop's declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldType {
    /// The annotation as written.
    pub written: String,
    pub primitive: Option<Primitive>,
    /// The type has a call signature.
    pub callable: bool,
}

impl FieldType {
    /// A type inferred from a literal initializer.
    pub fn inferred(primitive: Primitive) -> Self {
        Self {
            written: primitive.keyword().to_string(),
            primitive: Some(primitive),
            callable: false,
        }
    }

    /// The constructor used to wrap non-primitive types in `PropType<T>`.
    pub fn wrapper(&self) -> &'static str {
        if self.callable {
            "Function"
        } else if self.written.starts_with("Array<") || self.written.ends_with("[]") {
            "Array"
        } else {
            "Object"
        }
    }
}

enum LocalType<'a> {
    Alias(&'a TsType),
    Interface(&'a TsInterfaceDecl),
}

/// Resolves annotations against the type aliases and interfaces declared
/// at the top level of the same script.
pub(crate) struct TypeResolver<'a> {
    locals: FxHashMap<&'a str, LocalType<'a>>,
}

impl<'a> TypeResolver<'a> {
    pub fn new(items: &'a [ModuleItem]) -> Self {
        let mut locals = FxHashMap::default();
        for item in items {
            let decl = match item {
                ModuleItem::Stmt(Stmt::Decl(decl)) => decl,
                ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => &export.decl,
                _ => continue,
            };
            match decl {
                Decl::TsTypeAlias(alias) => {
                    locals.insert(alias.id.sym.as_str(), LocalType::Alias(&alias.type_ann));
                }
                Decl::TsInterface(interface) => {
                    locals.insert(interface.id.sym.as_str(), LocalType::Interface(interface));
                }
                _ => {}
            }
        }
        Self { locals }
    }

    pub fn analyze(&self, ty: &TsType, written: String) -> FieldType {
        FieldType {
            written,
            primitive: self.primitive(ty, 0),
            callable: self.callable(ty, 0),
        }
    }

    fn primitive(&self, ty: &TsType, depth: usize) -> Option<Primitive> {
        if depth > MAX_ALIAS_DEPTH {
            return None;
        }
        match strip_nullish(ty)? {
            TsType::TsKeywordType(keyword) => match keyword.kind {
                TsKeywordTypeKind::TsStringKeyword => Some(Primitive::String),
                TsKeywordTypeKind::TsNumberKeyword => Some(Primitive::Number),
                TsKeywordTypeKind::TsBooleanKeyword => Some(Primitive::Boolean),
                _ => None,
            },
            TsType::TsTypeRef(reference) => match self.lookup(&reference.type_name)? {
                LocalType::Alias(aliased) => self.primitive(aliased, depth + 1),
                LocalType::Interface(_) => None,
            },
            _ => None,
        }
    }

    fn callable(&self, ty: &TsType, depth: usize) -> bool {
        if depth > MAX_ALIAS_DEPTH {
            return false;
        }
        let Some(ty) = strip_nullish(ty) else {
            return false;
        };
        match ty {
            TsType::TsFnOrConstructorType(TsFnOrConstructorType::TsFnType(_)) => true,
            TsType::TsTypeLit(literal) => has_call_signature(&literal.members),
            TsType::TsUnionOrIntersectionType(
                TsUnionOrIntersectionType::TsIntersectionType(intersection),
            ) => intersection
                .types
                .iter()
                .any(|member| self.callable(member, depth + 1)),
            TsType::TsTypeRef(reference) => match self.lookup(&reference.type_name) {
                Some(LocalType::Alias(aliased)) => self.callable(aliased, depth + 1),
                Some(LocalType::Interface(interface)) => has_call_signature(&interface.body.body),
                None => false,
            },
            _ => false,
        }
    }

    fn lookup(&self, name: &TsEntityName) -> Option<&LocalType<'a>> {
        match name {
            TsEntityName::Ident(ident) => self.locals.get(ident.sym.as_str()),
            _ => None,
        }
    }
}

/// Drops parentheses and `null`/`undefined` union members.
///
/// Returns `None` when more than one other member remains, since no single
/// constructor describes such a union.
fn strip_nullish(ty: &TsType) -> Option<&TsType> {
    match ty {
        TsType::TsParenthesizedType(paren) => strip_nullish(&paren.type_ann),
        TsType::TsUnionOrIntersectionType(TsUnionOrIntersectionType::TsUnionType(union)) => {
            let mut rest = union.types.iter().filter(|member| !is_nullish(member));
            match (rest.next(), rest.next()) {
                (Some(single), None) => strip_nullish(single),
                _ => None,
            }
        }
        other => Some(other),
    }
}

fn is_nullish(ty: &TsType) -> bool {
    matches!(
        ty,
        TsType::TsKeywordType(keyword)
            if matches!(
                keyword.kind,
                TsKeywordTypeKind::TsNullKeyword | TsKeywordTypeKind::TsUndefinedKeyword
            )
    )
}

fn has_call_signature(members: &[TsTypeElement]) -> bool {
    members
        .iter()
        .any(|member| matches!(member, TsTypeElement::TsCallSignatureDecl(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_script;
    use swc_ecma_ast::{ClassMember, Decl};

    /// Analyzes the annotation of the first field of `class C` in `source`.
    fn analyze(source: &str) -> FieldType {
        let parsed = parse_script(source).unwrap();
        let resolver = TypeResolver::new(&parsed.module.body);
        for item in &parsed.module.body {
            if let ModuleItem::Stmt(Stmt::Decl(Decl::Class(class))) = item {
                if let Some(ClassMember::ClassProp(prop)) = class.class.body.first() {
                    let ann = prop.type_ann.as_ref().unwrap();
                    let written = parsed.text(&*ann.type_ann).to_string();
                    return resolver.analyze(&ann.type_ann, written);
                }
            }
        }
        panic!("no class field in test source");
    }

    #[test]
    fn test_primitives() {
        assert_eq!(
            analyze("class C { a!: string }").primitive,
            Some(Primitive::String)
        );
        assert_eq!(
            analyze("class C { a!: number | null }").primitive,
            Some(Primitive::Number)
        );
        assert_eq!(
            analyze("class C { a?: boolean | undefined }").primitive,
            Some(Primitive::Boolean)
        );
        assert_eq!(analyze("class C { a!: string | number }").primitive, None);
        assert_eq!(analyze("class C { a!: 'x' | 'y' }").primitive, None);
    }

    #[test]
    fn test_primitive_through_alias() {
        let ty = analyze("type Label = string\nclass C { a!: Label }");
        assert_eq!(ty.primitive, Some(Primitive::String));
        assert_eq!(ty.written, "Label");
    }

    #[test]
    fn test_wrappers() {
        assert_eq!(analyze("class C { a!: () => void }").wrapper(), "Function");
        assert_eq!(
            analyze("class C { a!: { (x: number): string } }").wrapper(),
            "Function"
        );
        assert_eq!(
            analyze("interface Handler { (x: number): void }\nclass C { a!: Handler }").wrapper(),
            "Function"
        );
        assert_eq!(
            analyze("type Cb = ((x: number) => void) | null\nclass C { a!: Cb }").wrapper(),
            "Function"
        );
        assert_eq!(analyze("class C { a!: string[] }").wrapper(), "Array");
        assert_eq!(analyze("class C { a!: Array<number> }").wrapper(), "Array");
        assert_eq!(analyze("class C { a!: Function }").wrapper(), "Object");
        assert_eq!(analyze("class C { a!: { x: number } }").wrapper(), "Object");
        assert_eq!(analyze("class C { a!: string[] | null }").wrapper(), "Object");
    }

    #[test]
    fn test_recursive_alias_terminates() {
        let ty = analyze("type A = B\ntype B = A\nclass C { a!: A }");
        assert_eq!(ty.primitive, None);
        assert!(!ty.callable);
    }
}
