//! Rewriting the import declarations of a module.
//!
//! [`ImportRewriter`] records which modules to drop and which bindings must
//! be imported, then turns that into text edits against the parsed source.
//! Running it on its own output produces no further edits.

use crate::options::Style;
use crate::parse::ParsedScript;
use source_patch::{ByteOffset, Patch, Span};
use swc_common::{BytePos, Spanned};
use swc_ecma_ast::{
    Decl, Decorator, DefaultDecl, ImportDecl, ImportSpecifier, ModuleDecl, ModuleExportName,
    ModuleItem, Stmt,
};

/// Bindings that must be imported from one module.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Required {
    module: String,
    default: Option<String>,
    named: Vec<String>,
}

pub(crate) struct ImportRewriter<'p, 'a> {
    parsed: &'p ParsedScript<'a>,
    removed_modules: Vec<String>,
    required: Vec<Required>,
}

impl<'p, 'a> ImportRewriter<'p, 'a> {
    pub fn new(parsed: &'p ParsedScript<'a>) -> Self {
        Self {
            parsed,
            removed_modules: Vec::new(),
            required: Vec::new(),
        }
    }

    /// Drops every import of the given modules.
    pub fn remove(&mut self, modules: &[&str]) {
        for module in modules {
            if !self.removed_modules.iter().any(|m| m == module) {
                self.removed_modules.push(module.to_string());
            }
        }
    }

    /// Makes sure `default` and every name in `named` are imported from
    /// `module`.
    pub fn ensure(&mut self, module: &str, default: Option<&str>, named: &[&str]) {
        let index = match self.required.iter().position(|r| r.module == module) {
            Some(index) => index,
            None => {
                self.required.push(Required {
                    module: module.to_string(),
                    default: None,
                    named: Vec::new(),
                });
                self.required.len() - 1
            }
        };
        let entry = &mut self.required[index];
        if let Some(default) = default {
            entry.default = Some(default.to_string());
        }
        for name in named {
            if !entry.named.iter().any(|n| n == name) {
                entry.named.push(name.to_string());
            }
        }
    }

    pub fn finish(&self, style: &Style) -> Patch {
        let mut edits = Patch::new();
        let imports: Vec<&ImportDecl> = self
            .parsed
            .module
            .body
            .iter()
            .filter_map(|item| match item {
                ModuleItem::ModuleDecl(ModuleDecl::Import(import)) => Some(import),
                _ => None,
            })
            .collect();

        let mut first_removed: Option<(Span, bool)> = None;
        let mut kept = Vec::new();
        for import in &imports {
            if self.is_removed(import) {
                let (span, whole_line) = self.parsed.line_extent(self.parsed.span(import.span));
                edits.delete(span);
                first_removed.get_or_insert((span, whole_line));
            } else {
                kept.push(*import);
            }
        }

        let mut additions = Vec::new();
        for required in &self.required {
            if let Some(edit) = self.merge(required, &kept, style, &mut additions) {
                edits.replace(edit.0, edit.1);
            }
        }
        if additions.is_empty() {
            return edits;
        }

        let text = additions.join("\n");
        let source = self.parsed.source;
        if let Some(last) = kept.last() {
            let end = u32::from(self.parsed.span(last.span).end) as usize;
            let line_end = source[end..].find('\n').map_or(source.len(), |idx| end + idx);
            edits.insert(Span::from_usize(line_end, line_end).start, format!("\n{text}"));
        } else if let Some((span, whole_line)) = first_removed {
            let text = if whole_line { format!("{text}\n") } else { text };
            edits.insert(span.start, text);
        } else {
            let start = self
                .parsed
                .module
                .body
                .first()
                .map(|item| self.item_start(item))
                .unwrap_or_default();
            edits.insert(start, format!("{text}\n\n"));
        }
        edits
    }

    /// Where an item starts, counting decorators written before `export`.
    fn item_start(&self, item: &ModuleItem) -> ByteOffset {
        let decorators: &[Decorator] = match item {
            ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(export)) => match &export.decl {
                DefaultDecl::Class(class) => class.class.decorators.as_slice(),
                _ => &[],
            },
            ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => match &export.decl {
                Decl::Class(class) => class.class.decorators.as_slice(),
                _ => &[],
            },
            ModuleItem::Stmt(Stmt::Decl(Decl::Class(class))) => class.class.decorators.as_slice(),
            _ => &[],
        };
        let lo = decorators
            .iter()
            .map(|decorator| decorator.span.lo)
            .fold(item.span().lo, BytePos::min);
        self.parsed.offset(lo)
    }

    fn is_removed(&self, import: &ImportDecl) -> bool {
        let module = import.src.value.to_string_lossy();
        self.removed_modules.iter().any(|m| *m == module)
    }

    /// Adds missing bindings to an existing declaration of the module when
    /// one can take them. Otherwise queues a new declaration in
    /// `additions`.
    fn merge(
        &self,
        required: &Required,
        kept: &[&ImportDecl],
        style: &Style,
        additions: &mut Vec<String>,
    ) -> Option<(Span, String)> {
        let existing: Vec<&ImportDecl> = kept
            .iter()
            .copied()
            .filter(|import| import.src.value.to_string_lossy() == required.module)
            .collect();

        let has_default = |name: &str| {
            existing.iter().any(|import| {
                import.specifiers.iter().any(|spec| {
                    matches!(spec, ImportSpecifier::Default(default) if default.local.sym.as_str() == name)
                })
            })
        };
        let has_named = |name: &str| {
            existing.iter().any(|import| {
                import
                    .specifiers
                    .iter()
                    .any(|spec| binds_named(spec, name))
            })
        };
        let missing_default = required
            .default
            .as_deref()
            .filter(|name| !has_default(name));
        let missing_named: Vec<&str> = required
            .named
            .iter()
            .map(String::as_str)
            .filter(|name| !has_named(name))
            .collect();
        if missing_default.is_none() && missing_named.is_empty() {
            return None;
        }

        let target = existing.iter().find(|import| {
            !import.type_only
                && !import
                    .specifiers
                    .iter()
                    .any(|spec| matches!(spec, ImportSpecifier::Namespace(_)))
                && (missing_default.is_none()
                    || !import
                        .specifiers
                        .iter()
                        .any(|spec| matches!(spec, ImportSpecifier::Default(_))))
        });
        let Some(target) = target else {
            additions.push(declaration(
                missing_default,
                missing_named,
                &style.quote(&required.module),
                style.semi(),
            ));
            return None;
        };

        let mut default = None;
        let mut named = Vec::new();
        for spec in &target.specifiers {
            let text = self.parsed.text(spec);
            match spec {
                ImportSpecifier::Default(_) => default = Some(text),
                _ => named.push(text),
            }
        }
        named.extend(missing_named);
        let span = self.parsed.span(target.span);
        let written = self.parsed.slice(span);
        let semi = if written.trim_end().ends_with(';') { ";" } else { "" };
        let text = declaration(
            default.or(missing_default),
            named,
            self.parsed.text(&*target.src),
            semi,
        );
        Some((span, text))
    }
}

/// The name a specifier imports from its module. `None` for namespaces and
/// defaults.
fn imported_name(spec: &ImportSpecifier) -> Option<String> {
    let ImportSpecifier::Named(named) = spec else {
        return None;
    };
    Some(match &named.imported {
        Some(ModuleExportName::Ident(ident)) => ident.sym.to_string(),
        Some(ModuleExportName::Str(s)) => s.value.to_string_lossy().into_owned(),
        None => named.local.sym.to_string(),
    })
}

/// Whether `spec` imports `name` under its own name. An aliased import
/// such as `{ PropType as PT }` leaves `PropType` unbound.
fn binds_named(spec: &ImportSpecifier, name: &str) -> bool {
    match spec {
        ImportSpecifier::Named(named) => {
            named.local.sym.as_str() == name && imported_name(spec).as_deref() == Some(name)
        }
        _ => false,
    }
}

fn declaration(default: Option<&str>, named: Vec<&str>, source: &str, semi: &str) -> String {
    let mut bindings = Vec::new();
    if let Some(default) = default {
        bindings.push(default.to_string());
    }
    if !named.is_empty() {
        bindings.push(format!("{{ {} }}", named.join(", ")));
    }
    format!("import {} from {source}{semi}", bindings.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::FormatOptions;
    use crate::parse::parse_script;
    use pretty_assertions::assert_eq;

    fn rewrite(source: &str, named: &[&str]) -> String {
        let parsed = parse_script(source).unwrap();
        let mut rewriter = ImportRewriter::new(&parsed);
        rewriter.remove(&["vue-class-component", "vue-property-decorator"]);
        rewriter.ensure("vue", Some("Vue"), named);
        let style = Style::new(&FormatOptions::default(), false);
        rewriter.finish(&style).apply(source).unwrap()
    }

    #[test]
    fn test_new_import_follows_remaining_imports() {
        let source = "import { Component, Prop } from 'vue-property-decorator'\nimport Foo from './foo'\n\nconst x = 1\n";
        assert_eq!(
            rewrite(source, &[]),
            "import Foo from './foo'\nimport Vue from 'vue'\n\nconst x = 1\n"
        );
    }

    #[test]
    fn test_merge_is_idempotent() {
        let source = "import Vue from \"vue\";\nimport Component from 'vue-class-component'\n\nconst x = 1;\n";
        let once = rewrite(source, &["PropType"]);
        assert_eq!(
            once,
            "import Vue, { PropType } from \"vue\";\n\nconst x = 1;\n"
        );
        assert_eq!(rewrite(&once, &["PropType"]), once);
    }

    #[test]
    fn test_existing_named_import_takes_default() {
        let source = "import { PropType, ref } from 'vue'\n";
        assert_eq!(
            rewrite(source, &["PropType"]),
            "import Vue, { PropType, ref } from 'vue'\n"
        );
    }

    #[test]
    fn test_aliased_binding_does_not_count() {
        let source = "import { PropType as PT } from 'vue'\n";
        let once = rewrite(source, &["PropType"]);
        assert_eq!(once, "import Vue, { PropType as PT, PropType } from 'vue'\n");
        assert_eq!(rewrite(&once, &["PropType"]), once);
    }

    #[test]
    fn test_namespace_import_gets_separate_declaration() {
        let source = "import * as V from 'vue'\n";
        assert_eq!(
            rewrite(source, &["PropType"]),
            "import * as V from 'vue'\nimport Vue, { PropType } from 'vue'\n"
        );
    }

    #[test]
    fn test_replaces_first_removed_import() {
        let source = "import Component from 'vue-class-component'\nimport { Prop } from 'vue-property-decorator'\n\nconst x = 1\n";
        assert_eq!(rewrite(source, &[]), "import Vue from 'vue'\n\nconst x = 1\n");
    }

    #[test]
    fn test_no_imports() {
        let source = "// header\nconst x = 1\n";
        assert_eq!(
            rewrite(source, &[]),
            "// header\nimport Vue from 'vue'\n\nconst x = 1\n"
        );
    }

    #[test]
    fn test_decorated_class_first() {
        let source = "@Component\nexport default class A extends Vue {}\n";
        assert_eq!(
            rewrite(source, &[]),
            "import Vue from 'vue'\n\n@Component\nexport default class A extends Vue {}\n"
        );
    }

    #[test]
    fn test_ensure_unions_named_bindings() {
        let parsed = parse_script("").unwrap();
        let mut rewriter = ImportRewriter::new(&parsed);
        rewriter.ensure("vue", None, &["PropType"]);
        rewriter.ensure("vue", Some("Vue"), &["PropType", "VNode"]);
        assert_eq!(
            rewriter.required,
            vec![Required {
                module: "vue".to_string(),
                default: Some("Vue".to_string()),
                named: vec!["PropType".to_string(), "VNode".to_string()],
            }]
        );
    }
}
