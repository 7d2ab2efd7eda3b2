//! CLI argument parsing.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand, ValueEnum};
use declassify::{IndentStyle, NewLineKind, QuoteKind};
use serde::Deserialize;

/// Rewrites Vue class components into `Vue.extend` object components.
#[derive(Debug, Parser)]
#[command(name = "vue-declassify")]
#[command(version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Rewrite class components in place
    Declassify(DeclassifyArgs),
}

#[derive(Debug, Clone, clap::Args)]
pub struct DeclassifyArgs {
    /// `.ts`/`.vue` files, or directories to search for them
    #[arg(required = true)]
    pub paths: Vec<Utf8PathBuf>,

    /// Print the rewritten code instead of writing it back
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "human")]
    pub output: OutputFormat,

    /// Path to a declassify.json (defaults to ./declassify.json when present)
    #[arg(long)]
    pub config: Option<Utf8PathBuf>,

    /// Indentation of generated code: a number of spaces or `tab`
    #[arg(long, value_parser = parse_indent)]
    pub indent: Option<IndentStyle>,

    /// Quote style of generated strings
    #[arg(long, value_enum)]
    pub quote: Option<QuoteStyle>,

    /// Line endings of rewritten scripts
    #[arg(long, value_enum)]
    pub newline: Option<LineEnding>,

    /// Add a comma after the last entry of multi-line objects
    #[arg(long = "trailing-commas")]
    pub trailing_commas: bool,

    /// Glob patterns to skip inside directories
    #[arg(long)]
    pub ignore: Vec<String>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStyle {
    Single,
    Double,
}

impl From<QuoteStyle> for QuoteKind {
    fn from(style: QuoteStyle) -> Self {
        match style {
            QuoteStyle::Single => QuoteKind::Single,
            QuoteStyle::Double => QuoteKind::Double,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    Lf,
    Crlf,
}

impl From<LineEnding> for NewLineKind {
    fn from(ending: LineEnding) -> Self {
        match ending {
            LineEnding::Lf => NewLineKind::Lf,
            LineEnding::Crlf => NewLineKind::CrLf,
        }
    }
}

/// Parses `tab` or a space count between 1 and 8.
pub fn parse_indent(value: &str) -> Result<IndentStyle, String> {
    if value.eq_ignore_ascii_case("tab") {
        return Ok(IndentStyle::Tab);
    }
    match value.parse::<u8>() {
        Ok(width @ 1..=8) => Ok(IndentStyle::Spaces(width)),
        _ => Err(format!(
            "expected `tab` or a number of spaces from 1 to 8, got `{value}`"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declassify_args(args: &[&str]) -> DeclassifyArgs {
        let argv = ["vue-declassify", "declassify"].iter().chain(args);
        match Args::parse_from(argv).command {
            Command::Declassify(args) => args,
        }
    }

    #[test]
    fn test_default_args() {
        let args = declassify_args(&["src"]);
        assert_eq!(args.paths, vec![Utf8PathBuf::from("src")]);
        assert_eq!(args.output, OutputFormat::Human);
        assert!(!args.dry_run);
        assert!(!args.trailing_commas);
        assert_eq!(args.indent, None);
    }

    #[test]
    fn test_formatting_flags() {
        let args = declassify_args(&[
            "--indent",
            "tab",
            "--quote",
            "double",
            "--newline",
            "crlf",
            "--trailing-commas",
            "a.vue",
            "b.ts",
        ]);
        assert_eq!(args.indent, Some(IndentStyle::Tab));
        assert_eq!(args.quote, Some(QuoteStyle::Double));
        assert_eq!(args.newline, Some(LineEnding::Crlf));
        assert!(args.trailing_commas);
        assert_eq!(args.paths.len(), 2);
    }

    #[test]
    fn test_output_and_dry_run() {
        let args = declassify_args(&["--output", "json", "--dry-run", "--ignore", "**/legacy/**", "."]);
        assert_eq!(args.output, OutputFormat::Json);
        assert!(args.dry_run);
        assert_eq!(args.ignore, vec!["**/legacy/**".to_string()]);
    }

    #[test]
    fn test_paths_are_required() {
        assert!(Args::try_parse_from(["vue-declassify", "declassify"]).is_err());
    }

    #[test]
    fn test_parse_indent() {
        assert_eq!(parse_indent("4"), Ok(IndentStyle::Spaces(4)));
        assert_eq!(parse_indent("TAB"), Ok(IndentStyle::Tab));
        assert!(parse_indent("0").is_err());
        assert!(parse_indent("wide").is_err());
    }
}
