//! Error and warning types.

use source_patch::Span;
use std::fmt;
use thiserror::Error;

/// A component that could not be rewritten.
///
/// Rewriting is all-or-nothing: when this is returned the input text must
/// be left untouched.
#[derive(Debug, Clone, Error)]
#[error("{kind}")]
pub struct DeclassifyError {
    /// The kind of error.
    pub kind: DeclassifyErrorKind,
    /// Where in the input the problem was found, when it has a location.
    pub span: Option<Span>,
}

impl DeclassifyError {
    /// Creates an error pointing at `span`.
    pub fn new(kind: DeclassifyErrorKind, span: Span) -> Self {
        Self {
            kind,
            span: Some(span),
        }
    }

    /// Creates an error with no source location.
    pub fn without_span(kind: DeclassifyErrorKind) -> Self {
        Self { kind, span: None }
    }

    /// Moves the location right by `offset` bytes.
    pub(crate) fn shifted(self, offset: u32) -> Self {
        Self {
            kind: self.kind,
            span: self.span.map(|span| span.shift(offset)),
        }
    }
}

/// The kind of declassify error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclassifyErrorKind {
    /// The script is not valid TypeScript.
    #[error("failed to parse script: {message}")]
    Parse {
        /// The parser's message.
        message: String,
    },

    /// The default export is missing, is not a class, or lacks `@Component`.
    #[error("not a class component: {reason}")]
    NotAComponent { reason: String },

    /// A decorator received an argument of the wrong shape.
    #[error("invalid argument to @{decorator}: {message}")]
    InvalidDecoratorArgument { decorator: String, message: String },

    /// The options object of `@Prop`, `@PropSync` or `@VModel` is malformed.
    #[error("invalid options for prop `{prop}`: {message}")]
    InvalidPropArgument { prop: String, message: String },

    /// `@PropSync` was used without naming the synced prop.
    #[error("@PropSync on `{field}` must name the synced prop with a string literal")]
    MissingSyncTarget { field: String },

    /// A setter has no getter with the same name.
    #[error("setter `{name}` has no matching getter")]
    IllegalDerivedSetter { name: String },

    /// A `.vue` file without a `<script>` block.
    #[error("no <script> block found")]
    MissingScriptRegion,

    /// Input too long for 32-bit offsets.
    #[error("input is {len} bytes, offsets are limited to 4 GiB")]
    InputTooLarge { len: usize },

    /// A class member that has no place in an options object.
    #[error("unsupported class member: {description}")]
    UnsupportedMember { description: String },

    /// A decorator other than the ones this tool understands.
    #[error("unsupported decorator @{name}")]
    UnsupportedDecorator { name: String },

    /// More than one `@VModel` field.
    #[error("only one @VModel field is allowed, `{field}` is a second one")]
    DuplicateModelBinding { field: String },

    /// A prop whose runtime type cannot be derived.
    #[error("prop `{name}` needs a type annotation or a literal initializer")]
    UntypedProp { name: String },

    /// Two rewrites touched the same part of the source.
    #[error("conflicting rewrites: {message}")]
    ConflictingEdits { message: String },
}

/// A non-fatal note about something the rewrite dropped or guessed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub message: String,
    pub span: Option<Span>,
}

impl Warning {
    pub fn new(message: impl Into<String>, span: Option<Span>) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }

    pub(crate) fn shifted(self, offset: u32) -> Self {
        Self {
            message: self.message,
            span: self.span.map(|span| span.shift(offset)),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = DeclassifyError::new(
            DeclassifyErrorKind::MissingSyncTarget {
                field: "syncedName".to_string(),
            },
            Span::from_usize(0, 9),
        );
        assert_eq!(
            error.to_string(),
            "@PropSync on `syncedName` must name the synced prop with a string literal"
        );
    }

    #[test]
    fn test_shift_moves_span() {
        let error = DeclassifyError::new(
            DeclassifyErrorKind::IllegalDerivedSetter {
                name: "total".to_string(),
            },
            Span::from_usize(3, 8),
        )
        .shifted(10);
        assert_eq!(error.span, Some(Span::from_usize(13, 18)));

        let error = DeclassifyError::without_span(DeclassifyErrorKind::MissingScriptRegion);
        assert_eq!(error.shifted(10).span, None);
    }
}
