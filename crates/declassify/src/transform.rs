//! The rewrite pipeline for one source file.

use crate::emit::emit_component;
use crate::error::{DeclassifyError, DeclassifyErrorKind, Warning};
use crate::extract::extract_component;
use crate::imports::ImportRewriter;
use crate::options::{DeclassifyOptions, NewLineKind, Style};
use crate::parse::{parse_script, ParsedScript};
use crate::sfc::locate_script;
use std::path::Path;
use swc_ecma_ast::{ModuleDecl, ModuleItem};

/// Modules whose imports only serve the class syntax.
const DECORATOR_MODULES: &[&str] = &["vue-class-component", "vue-property-decorator"];

/// What kind of file the source comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// A TypeScript module (`.ts`).
    Module,
    /// A single-file component (`.vue`) with a `<script>` block.
    Component,
}

impl SourceKind {
    /// Detects the kind from a file extension. Other extensions give `None`.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        match path.as_ref().extension()?.to_str()? {
            "ts" => Some(SourceKind::Module),
            "vue" => Some(SourceKind::Component),
            _ => None,
        }
    }
}

/// The rewritten source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclassifyOutput {
    /// The whole file after the rewrite.
    pub code: String,
    /// Things the rewrite dropped or had to guess, with locations in the
    /// original file.
    pub warnings: Vec<Warning>,
}

/// Rewrites the class component in `source` into `Vue.extend({ ... })`.
///
/// For [`SourceKind::Component`] only the `<script>` block changes; every
/// other byte of the file is kept. Error and warning spans always refer to
/// the whole of `source`.
pub fn declassify(
    source: &str,
    kind: SourceKind,
    options: &DeclassifyOptions,
) -> Result<DeclassifyOutput, DeclassifyError> {
    check_input_len(source.len())?;
    match kind {
        SourceKind::Module => declassify_script(source, options),
        SourceKind::Component => {
            let region = locate_script(source)
                .ok_or_else(|| DeclassifyError::without_span(DeclassifyErrorKind::MissingScriptRegion))?;
            let range = region.range();
            let shift = u32::from(region.start);
            let script = declassify_script(&source[range.clone()], options)
                .map_err(|err| err.shifted(shift))?;

            let mut code = String::with_capacity(source.len() + script.code.len());
            code.push_str(&source[..range.start]);
            code.push_str(&script.code);
            code.push_str(&source[range.end..]);
            Ok(DeclassifyOutput {
                code,
                warnings: script
                    .warnings
                    .into_iter()
                    .map(|warning| warning.shifted(shift))
                    .collect(),
            })
        }
    }
}

/// Spans are 32-bit.
fn check_input_len(len: usize) -> Result<(), DeclassifyError> {
    if u32::try_from(len).is_err() {
        return Err(DeclassifyError::without_span(DeclassifyErrorKind::InputTooLarge { len }));
    }
    Ok(())
}

fn declassify_script(
    source: &str,
    options: &DeclassifyOptions,
) -> Result<DeclassifyOutput, DeclassifyError> {
    let parsed = parse_script(source)?;
    let style = Style::new(&options.format, uses_semicolons(&parsed));
    let extraction = extract_component(&parsed, &style)?;
    let emitted = emit_component(&extraction.model, &style);

    let mut imports = ImportRewriter::new(&parsed);
    imports.remove(DECORATOR_MODULES);
    let named: &[&str] = if extraction.model.needs_prop_type() {
        &["PropType"]
    } else {
        &[]
    };
    imports.ensure("vue", Some("Vue"), named);
    let mut edits = imports.finish(&style);

    let mut fragment = emitted.fragment;
    fragment.prefix_first("export default ");
    fragment.suffix_last(style.semi());
    let replacement = fragment
        .indent_continuation(&extraction.indent)
        .render("\n");
    edits.replace(extraction.range, replacement);
    if let Some(export) = extraction.export_statement {
        edits.delete(parsed.line_extent(export).0);
    }

    let code = edits.apply(source).map_err(|err| {
        DeclassifyError::without_span(DeclassifyErrorKind::ConflictingEdits {
            message: err.to_string(),
        })
    })?;

    let mut warnings = extraction.warnings;
    warnings.extend(emitted.warnings);
    Ok(DeclassifyOutput {
        code: normalize_newlines(&code, options.format.new_line),
        warnings,
    })
}

/// Whether generated statements should end with `;`. The first import
/// decides; a module without imports gets none.
fn uses_semicolons(parsed: &ParsedScript<'_>) -> bool {
    parsed
        .module
        .body
        .iter()
        .find_map(|item| match item {
            ModuleItem::ModuleDecl(ModuleDecl::Import(import)) => {
                Some(parsed.text(import).trim_end().ends_with(';'))
            }
            _ => None,
        })
        .unwrap_or(false)
}

fn normalize_newlines(code: &str, new_line: NewLineKind) -> String {
    let unified = code.replace("\r\n", "\n");
    match new_line {
        NewLineKind::Lf => unified,
        NewLineKind::CrLf => unified.replace('\n', "\r\n"),
    }
}
