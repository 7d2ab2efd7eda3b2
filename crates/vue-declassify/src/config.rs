//! Configuration loading.
//!
//! Formatting settings come from three layers: built-in defaults, an
//! optional `declassify.json`, and command-line flags, later layers
//! winning.

use crate::cli::{parse_indent, DeclassifyArgs, LineEnding, QuoteStyle};
use camino::{Utf8Path, Utf8PathBuf};
use declassify::{DeclassifyOptions, FormatOptions};
use serde::Deserialize;
use std::fs;
use thiserror::Error;

/// File name looked up in the working directory when `--config` is absent.
pub const CONFIG_FILE_NAME: &str = "declassify.json";

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid indent in {path}: {message}")]
    InvalidIndent { path: Utf8PathBuf, message: String },
}

/// The contents of a `declassify.json` file. Comments are allowed.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FileConfig {
    pub indent: Option<IndentSetting>,
    pub quote: Option<QuoteStyle>,
    pub new_line: Option<LineEnding>,
    pub trailing_commas: Option<bool>,
    #[serde(default)]
    pub ignore: Vec<String>,
}

/// `"indent": 4` or `"indent": "tab"`.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum IndentSetting {
    Width(u8),
    Named(String),
}

impl FileConfig {
    /// Loads and parses a config file.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    fn parse(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(&remove_json_comments(content))
    }
}

/// Fully resolved settings for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub options: DeclassifyOptions,
    /// Extra ignore globs, from the config file and `--ignore`.
    pub ignore: Vec<String>,
}

impl Settings {
    /// Merges defaults, the config file and the flags in `args`.
    ///
    /// An explicit `--config` must exist; otherwise `declassify.json` in
    /// `workspace` is used when present.
    pub fn resolve(args: &DeclassifyArgs, workspace: &Utf8Path) -> Result<Self, ConfigError> {
        let (path, file) = match &args.config {
            Some(path) => {
                let path = workspace.join(path);
                let file = FileConfig::load(&path)?;
                (path, file)
            }
            None => {
                let path = workspace.join(CONFIG_FILE_NAME);
                if path.is_file() {
                    let file = FileConfig::load(&path)?;
                    (path, file)
                } else {
                    (path, FileConfig::default())
                }
            }
        };

        let mut format = FormatOptions::default();
        if let Some(indent) = &file.indent {
            let value = match indent {
                IndentSetting::Width(width) => width.to_string(),
                IndentSetting::Named(name) => name.clone(),
            };
            format.indent = parse_indent(&value)
                .map_err(|message| ConfigError::InvalidIndent { path, message })?;
        }
        if let Some(quote) = file.quote {
            format.quote = quote.into();
        }
        if let Some(new_line) = file.new_line {
            format.new_line = new_line.into();
        }
        if let Some(trailing_commas) = file.trailing_commas {
            format.trailing_commas = trailing_commas;
        }

        if let Some(indent) = args.indent {
            format.indent = indent;
        }
        if let Some(quote) = args.quote {
            format.quote = quote.into();
        }
        if let Some(new_line) = args.newline {
            format.new_line = new_line.into();
        }
        if args.trailing_commas {
            format.trailing_commas = true;
        }

        let mut ignore = file.ignore;
        ignore.extend(args.ignore.iter().cloned());
        Ok(Self {
            options: DeclassifyOptions { format },
            ignore,
        })
    }
}

/// Strips `//` and `/* */` comments outside of strings.
fn remove_json_comments(json: &str) -> String {
    let mut result = String::with_capacity(json.len());
    let mut chars = json.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            result.push(c);
            if c == '"' {
                in_string = false;
            } else if c == '\\' {
                if let Some(next) = chars.next() {
                    result.push(next);
                }
            }
            continue;
        }
        match (c, chars.peek()) {
            ('"', _) => {
                in_string = true;
                result.push(c);
            }
            ('/', Some('/')) => {
                while chars.next_if(|&next| next != '\n').is_some() {}
            }
            ('/', Some('*')) => {
                chars.next();
                while let Some(next) = chars.next() {
                    if next == '*' && chars.next_if_eq(&'/').is_some() {
                        break;
                    }
                }
            }
            _ => result.push(c),
        }
    }

    result
}
