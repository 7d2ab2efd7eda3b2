//! Rendering a [`ComponentModel`] as a `Vue.extend({ ... })` call.
//!
//! Sections appear in a fixed order and are left out when empty: `name`,
//! the `@Component` options, `mixins`/`extends`, `props`, `data()`,
//! `computed`, `watch`, lifecycle hooks, then `methods`.

use crate::error::Warning;
use crate::fragment::Fragment;
use crate::model::{ComponentModel, DerivedMember, Heritage, Input, LeadingComment, Watcher};
use crate::options::Style;
use crate::types::FieldType;
use indexmap::IndexMap;

/// The rendered call and anything worth telling the user about it.
pub(crate) struct Emitted {
    pub fragment: Fragment,
    pub warnings: Vec<Warning>,
}

pub(crate) fn emit_component(model: &ComponentModel, style: &Style) -> Emitted {
    let mut emitter = Emitter {
        style,
        warnings: Vec::new(),
    };
    let entries = emitter.entries(model);
    let mut fragment = emitter.object(entries);
    fragment.prefix_first("Vue.extend(");
    fragment.suffix_last(")");
    Emitted {
        fragment,
        warnings: emitter.warnings,
    }
}

struct Emitter<'s> {
    style: &'s Style,
    warnings: Vec<Warning>,
}

impl Emitter<'_> {
    fn entries(&mut self, model: &ComponentModel) -> Vec<Fragment> {
        let mut entries = Vec::new();
        if let Some(name) = &model.name {
            entries.push(Fragment::line(format!("name: {}", self.style.quote(name))));
        }
        for entry in &model.config {
            entries.push(with_comments(&entry.comments, entry.code.clone()));
        }
        match &model.heritage {
            Heritage::None => {}
            Heritage::Mixins(mixins) => {
                entries.push(Fragment::from_text(&format!("mixins: [{}]", mixins.join(", "))));
            }
            Heritage::Extends(base) => entries.push(key_value("extends", base.clone())),
        }
        entries.extend(self.props(model));
        entries.extend(self.data(model));
        entries.extend(self.computed(model));
        entries.extend(self.watch(model));
        for hook in model.methods.iter().filter(|method| method.lifecycle) {
            entries.push(with_comments(&hook.comments, hook.code.clone()));
        }
        let methods: Vec<Fragment> = model
            .methods
            .iter()
            .filter(|method| !method.lifecycle)
            .map(|method| with_comments(&method.comments, method.code.clone()))
            .collect();
        if !methods.is_empty() {
            entries.push(key_value("methods", self.object(methods)));
        }
        entries
    }

    /// `{ ... }` with one entry per element, comma-separated.
    fn object(&self, entries: Vec<Fragment>) -> Fragment {
        self.delimited("{", "}", entries)
    }

    fn array(&self, entries: Vec<Fragment>) -> Fragment {
        self.delimited("[", "]", entries)
    }

    fn delimited(&self, open: &str, close: &str, entries: Vec<Fragment>) -> Fragment {
        if entries.is_empty() {
            return Fragment::line(format!("{open}{close}"));
        }
        let mut out = Fragment::line(open);
        let count = entries.len();
        for (idx, mut entry) in entries.into_iter().enumerate() {
            if idx + 1 < count || self.style.trailing_commas {
                entry.suffix_last(",");
            }
            out.append(entry.indented(&self.style.unit));
        }
        out.push(close);
        out
    }

    fn props(&mut self, model: &ComponentModel) -> Option<Fragment> {
        let mut props = Vec::new();
        if let Some(binding) = &model.model_binding {
            props.push(self.prop("value", &binding.input, true));
        }
        for input in &model.inputs {
            let prop = self.prop(&input.key, input, false);
            props.push(with_comments(&input.comments, prop));
        }
        for synced in &model.synced_inputs {
            props.push(self.prop(&self.property_key(&synced.target), &synced.input, false));
        }
        (!props.is_empty()).then(|| key_value("props", self.object(props)))
    }

    /// `key: { type: ..., <policy> }`.
    ///
    /// `default` wins over `required`; with neither, the prop is marked
    /// required only when `required_by_default` is set.
    fn prop(&self, key: &str, input: &Input, required_by_default: bool) -> Fragment {
        let policy = match (&input.options.default, &input.options.required) {
            (Some(default), _) => default.clone(),
            (None, Some(required)) => required.clone(),
            (None, None) => Fragment::line(format!("required: {required_by_default}")),
        };
        let body = vec![type_tag(&input.ty), policy];
        key_value(key, self.object(body))
    }

    fn data(&self, model: &ComponentModel) -> Option<Fragment> {
        if model.reactive_fields.is_empty() {
            return None;
        }
        let fields = model
            .reactive_fields
            .iter()
            .map(|field| {
                let mut value = field.initializer.clone();
                if let Some(ty) = &field.written_type {
                    if field.parenthesize {
                        value.prefix_first("(");
                        value.suffix_last(")");
                    }
                    value = value.join(" as ", Fragment::from_text(ty));
                }
                with_comments(&field.comments, key_value(&field.key, value))
            })
            .collect();
        let mut returned = self.object(fields);
        returned.prefix_first("return ");
        returned.suffix_last(self.style.semi());

        let mut out = Fragment::line("data() {");
        out.append(returned.indented(&self.style.unit));
        out.push("}");
        Some(out)
    }

    fn computed(&mut self, model: &ComponentModel) -> Option<Fragment> {
        let mut entries = Vec::new();
        if let Some(binding) = &model.model_binding {
            let input = &binding.input;
            let proxy = self.proxy(&input.key, "value", "input", &input.ty);
            entries.push(with_comments(&input.comments, proxy));
        }
        for synced in &model.synced_inputs {
            let input = &synced.input;
            let event = format!("update:{}", synced.target);
            let proxy = self.proxy(&input.key, &synced.target, &event, &input.ty);
            entries.push(with_comments(&input.comments, proxy));
        }
        for (key, member) in &model.derived {
            if let Some(entry) = self.derived(key, member) {
                entries.push(entry);
            }
        }
        (!entries.is_empty()).then(|| key_value("computed", self.object(entries)))
    }

    /// A get/set pair reading prop `prop` and emitting `event` on write.
    fn proxy(&self, key: &str, prop: &str, event: &str, ty: &FieldType) -> Fragment {
        let semi = self.style.semi();
        let read = if is_identifier(prop) {
            format!("this.{prop}")
        } else {
            format!("this[{}]", self.style.quote(prop))
        };

        let mut get = Fragment::line("get():")
            .join(" ", Fragment::from_text(&ty.written))
            .join(" ", Fragment::line("{"));
        get.append(Fragment::line(format!("return {read}{semi}")).indented(&self.style.unit));
        get.push("}");

        let mut set = Fragment::line("set(value:")
            .join(" ", Fragment::from_text(&ty.written))
            .join("", Fragment::line(") {"));
        set.append(
            Fragment::line(format!(
                "this.$emit({}, value){semi}",
                self.style.quote(event)
            ))
            .indented(&self.style.unit),
        );
        set.push("}");

        key_value(key, self.object(vec![get, set]))
    }

    fn derived(&mut self, key: &str, member: &DerivedMember) -> Option<Fragment> {
        let getter = member.getter.as_ref()?;
        let declared = getter.return_type.clone().or_else(|| {
            member
                .setter
                .as_ref()
                .and_then(|setter| setter.param_type.clone())
        });
        let return_type = match declared {
            Some(ty) => ty,
            None => {
                self.warnings.push(Warning::new(
                    format!("computed `{key}` has no return type annotation and was typed as `any`"),
                    Some(getter.span),
                ));
                "any".to_string()
            }
        };

        let Some(setter) = &member.setter else {
            let signature = Fragment::line(format!("{key}():")).join(" ", Fragment::from_text(&return_type));
            return Some(with_comments(
                &getter.comments,
                signature.join(" ", getter.body.clone()),
            ));
        };

        let get = Fragment::line("get():")
            .join(" ", Fragment::from_text(&return_type))
            .join(" ", getter.body.clone());
        let set = Fragment::from_text(&format!("set({})", setter.param))
            .join(" ", setter.body.clone());
        let pair = self.object(vec![get, with_comments(&setter.comments, set)]);
        Some(with_comments(&getter.comments, key_value(key, pair)))
    }

    fn watch(&self, model: &ComponentModel) -> Option<Fragment> {
        let mut by_path: IndexMap<&str, Vec<&Watcher>> = IndexMap::new();
        for watcher in &model.watchers {
            by_path.entry(watcher.path.as_str()).or_default().push(watcher);
        }
        let entries: Vec<Fragment> = by_path
            .into_iter()
            .map(|(path, watchers)| {
                let value = match watchers.as_slice() {
                    [single] => self.watcher(single),
                    many => self.array(many.iter().map(|watcher| self.watcher(watcher)).collect()),
                };
                key_value(&self.style.quote(path), value)
            })
            .collect();
        (!entries.is_empty()).then(|| key_value("watch", self.object(entries)))
    }

    fn watcher(&self, watcher: &Watcher) -> Fragment {
        let mut entries = vec![Fragment::line(format!(
            "handler: {}",
            self.style.quote(&watcher.handler)
        ))];
        entries.extend(watcher.immediate.clone());
        entries.extend(watcher.deep.clone());
        self.object(entries)
    }

    /// Keys that are not identifiers are quoted.
    fn property_key(&self, name: &str) -> String {
        if is_identifier(name) {
            name.to_string()
        } else {
            self.style.quote(name)
        }
    }
}

/// `type: String`, or `type: Object as PropType<T>` and friends.
fn type_tag(ty: &FieldType) -> Fragment {
    match ty.primitive {
        Some(primitive) => Fragment::line(format!("type: {}", primitive.constructor())),
        None => Fragment::line(format!("type: {} as PropType<", ty.wrapper()))
            .join("", Fragment::from_text(&ty.written))
            .join("", Fragment::line(">")),
    }
}

fn key_value(key: &str, value: Fragment) -> Fragment {
    Fragment::line(format!("{key}:")).join(" ", value)
}

fn with_comments(comments: &[LeadingComment], code: Fragment) -> Fragment {
    let mut out = Fragment::new();
    for comment in comments {
        out.append(comment.render());
    }
    out.append(code);
    out
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return false,
    };
    if !(first.is_ascii_alphabetic() || first == '_' || first == '$') {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
