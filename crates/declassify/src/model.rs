//! The component model: what a class component declares, independent of
//! how it was written.

use crate::fragment::Fragment;
use crate::types::FieldType;
use indexmap::IndexMap;
use source_patch::Span;

/// A comment found directly before a class member or config entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeadingComment {
    /// A `/** ... */` block, as its inner lines without the `*` gutter.
    Doc(Vec<String>),
    /// A `// ...` comment, without the slashes.
    Line(String),
    /// Any other block comment, kept as written.
    Block(Fragment),
}

impl LeadingComment {
    pub fn render(&self) -> Fragment {
        match self {
            LeadingComment::Doc(lines) => {
                let mut out = Fragment::line("/**");
                for line in lines {
                    if line.trim().is_empty() {
                        out.push(" *");
                    } else {
                        out.push(format!(" * {line}"));
                    }
                }
                out.push(" */");
                out
            }
            LeadingComment::Line(text) => Fragment::line(format!("//{text}")),
            LeadingComment::Block(code) => code.clone(),
        }
    }
}

/// What the class inherits from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Heritage {
    /// `extends Vue`, or no `extends` at all.
    #[default]
    None,
    /// `extends Mixins(A, B)`: the argument texts.
    Mixins(Vec<String>),
    /// Any other base class expression.
    Extends(Fragment),
}

/// An entry of the `@Component({ ... })` options object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    pub comments: Vec<LeadingComment>,
    pub code: Fragment,
}

/// The `required` and `default` entries of a prop's options object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropOptions {
    /// The whole `required: ...` entry.
    pub required: Option<Fragment>,
    /// The whole `default: ...` entry.
    pub default: Option<Fragment>,
}

/// A field declared as a prop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    /// The property key as written.
    pub key: String,
    pub comments: Vec<LeadingComment>,
    pub ty: FieldType,
    pub options: PropOptions,
    pub span: Span,
}

/// A `@PropSync('target')` field: a prop plus a computed proxy for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncedInput {
    /// The field; its key names the computed proxy.
    pub input: Input,
    /// The name of the prop being synced.
    pub target: String,
}

/// The `@VModel` field, bound to the `value` prop and the `input` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelBinding {
    pub input: Input,
}

/// A field with an initializer, returned from `data()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactiveField {
    pub key: String,
    pub comments: Vec<LeadingComment>,
    pub initializer: Fragment,
    /// The type annotation, emitted as an `as` assertion.
    pub written_type: Option<String>,
    /// The initializer binds more loosely than `as` and needs parentheses
    /// before the assertion.
    pub parenthesize: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Getter {
    pub comments: Vec<LeadingComment>,
    pub return_type: Option<String>,
    /// The body, braces included.
    pub body: Fragment,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setter {
    pub comments: Vec<LeadingComment>,
    /// The parameter as written, annotation included.
    pub param: String,
    pub param_type: Option<String>,
    pub body: Fragment,
    pub span: Span,
}

/// A computed property: a getter and optionally a setter of one name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivedMember {
    pub getter: Option<Getter>,
    pub setter: Option<Setter>,
}

/// A method, kept as object-literal shorthand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub name: String,
    pub comments: Vec<LeadingComment>,
    /// `name(params) { ... }` with any `async`/`*` prefix.
    pub code: Fragment,
    /// Lifecycle hooks go on the options object itself, not under `methods`.
    pub lifecycle: bool,
}

/// A `@Watch` on a method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Watcher {
    /// The watched path.
    pub path: String,
    /// The method to call.
    pub handler: String,
    /// The whole `immediate: ...` entry.
    pub immediate: Option<Fragment>,
    /// The whole `deep: ...` entry.
    pub deep: Option<Fragment>,
}

/// Everything a class component declares.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentModel {
    /// The class name, used as the component `name`.
    pub name: Option<String>,
    pub config: Vec<ConfigEntry>,
    pub heritage: Heritage,
    pub model_binding: Option<ModelBinding>,
    pub inputs: Vec<Input>,
    pub synced_inputs: Vec<SyncedInput>,
    pub reactive_fields: Vec<ReactiveField>,
    /// Keyed by property key, in order of first appearance.
    pub derived: IndexMap<String, DerivedMember>,
    pub methods: Vec<Method>,
    pub watchers: Vec<Watcher>,
}

impl ComponentModel {
    /// Whether any prop needs `PropType` to express its type.
    pub fn needs_prop_type(&self) -> bool {
        self.model_binding
            .iter()
            .map(|binding| &binding.input)
            .chain(&self.inputs)
            .chain(self.synced_inputs.iter().map(|synced| &synced.input))
            .any(|input| input.ty.primitive.is_none())
    }
}
