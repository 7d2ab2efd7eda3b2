//! Rewriting Vue class components into `Vue.extend` object components.
//!
//! This crate takes a component written with `vue-class-component` and
//! `vue-property-decorator` and produces the equivalent options object. It
//! handles:
//! - `@Prop`, `@PropSync` and `@VModel` fields as props, with the computed
//!   proxies the latter two need
//! - initialized fields as `data()`, accessors as `computed`
//! - `@Watch` handlers and `@Emit` methods
//! - lifecycle hooks, mixins and the `@Component` options object
//! - the `vue` imports the result needs
//!
//! Source outside the class is copied through unchanged, and so are the
//! bodies of members apart from their indentation.
//!
//! # Example
//!
//! ```
//! use declassify::{declassify, DeclassifyOptions, SourceKind};
//!
//! let source = r#"
//! import { Component, Prop, Vue } from 'vue-property-decorator'
//!
//! @Component
//! export default class Greeting extends Vue {
//!   @Prop() readonly name!: string
//! }
//! "#;
//!
//! let output = declassify(source, SourceKind::Module, &DeclassifyOptions::default()).unwrap();
//! assert!(output.code.contains("export default Vue.extend({"));
//! assert!(output.code.contains("type: String"));
//! ```

mod comments;
mod decorators;
mod emit;
mod error;
mod events;
mod extract;
mod fragment;
mod imports;
mod model;
mod options;
mod parse;
mod reindent;
mod returns;
mod sfc;
mod transform;
mod types;

pub use error::{DeclassifyError, DeclassifyErrorKind, Warning};
pub use options::{DeclassifyOptions, FormatOptions, IndentStyle, NewLineKind, QuoteKind};
pub use sfc::locate_script;
pub use transform::{declassify, DeclassifyOutput, SourceKind};
