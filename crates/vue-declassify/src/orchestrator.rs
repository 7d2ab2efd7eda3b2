//! Main orchestration logic.

use crate::cli::{DeclassifyArgs, OutputFormat};
use crate::config::{ConfigError, Settings};
use crate::output::{FileReport, Formatter, Note, Outcome, Position, RunSummary};
use camino::{Utf8Path, Utf8PathBuf};
use declassify::{declassify, DeclassifyErrorKind, DeclassifyOptions, SourceKind};
use globset::{Glob, GlobSet, GlobSetBuilder};
use rayon::prelude::*;
use source_patch::LineIndex;
use std::collections::HashSet;
use std::fs;
use thiserror::Error;
use walkdir::WalkDir;

/// Directories never searched for components.
const DEFAULT_IGNORES: &[&str] = &["**/node_modules/**", "**/dist/**"];

/// Orchestration errors.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Invalid glob pattern.
    #[error("invalid glob pattern: {0}")]
    InvalidGlob(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A path given on the command line that is neither `.ts` nor `.vue`.
    #[error("unsupported file {0}: expected a .ts or .vue file")]
    UnsupportedFile(Utf8PathBuf),

    #[error("no such file or directory: {0}")]
    MissingPath(Utf8PathBuf),

    #[error("invalid working directory: {0}")]
    Workspace(String),
}

/// A file queued for rewriting.
struct Target {
    path: Utf8PathBuf,
    kind: SourceKind,
    /// Named on the command line rather than found in a directory.
    explicit: bool,
}

/// Declassifies every path in `args`, prints the results and returns the
/// summary.
pub fn run(args: &DeclassifyArgs) -> Result<RunSummary, OrchestratorError> {
    let workspace = std::env::current_dir()
        .map_err(|e| OrchestratorError::Workspace(e.to_string()))
        .and_then(|dir| {
            Utf8PathBuf::try_from(dir).map_err(|e| OrchestratorError::Workspace(e.to_string()))
        })?;

    let reports = declassify_paths(args, &workspace)?;
    let formatter = Formatter::new(args.output);
    print!("{}", formatter.format(&reports));

    let summary = RunSummary::from_reports(&reports);
    if args.output == OutputFormat::Human {
        println!("{}", summary.format());
    }
    Ok(summary)
}

/// Rewrites the files behind `args.paths`, resolved against `workspace`.
///
/// Reports come back in discovery order. Nothing is written for files that
/// fail, or for any file on a dry run.
pub fn declassify_paths(
    args: &DeclassifyArgs,
    workspace: &Utf8Path,
) -> Result<Vec<FileReport>, OrchestratorError> {
    let settings = Settings::resolve(args, workspace)?;
    let ignore_set = build_ignore_set(&settings.ignore)?;
    let targets = collect_targets(&args.paths, workspace, &ignore_set)?;

    let reports = targets
        .par_iter()
        .map(|target| {
            let filename = target
                .path
                .strip_prefix(workspace)
                .unwrap_or(&target.path)
                .to_string();
            let outcome = process_file(target, &settings.options, args.dry_run);
            FileReport { filename, outcome }
        })
        .collect();
    Ok(reports)
}

fn build_ignore_set(patterns: &[String]) -> Result<GlobSet, OrchestratorError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns.iter().map(String::as_str).chain(DEFAULT_IGNORES.iter().copied()) {
        let glob = Glob::new(pattern).map_err(|e| OrchestratorError::InvalidGlob(e.to_string()))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| OrchestratorError::InvalidGlob(e.to_string()))
}

fn collect_targets(
    paths: &[Utf8PathBuf],
    workspace: &Utf8Path,
    ignore_set: &GlobSet,
) -> Result<Vec<Target>, OrchestratorError> {
    let mut seen = HashSet::new();
    let mut targets = Vec::new();

    for path in paths {
        // Rebuilding from components drops `.` segments.
        let full: Utf8PathBuf = workspace.join(path).components().collect();
        if full.is_dir() {
            let found = WalkDir::new(&full)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .filter_map(|e| Utf8PathBuf::try_from(e.into_path()).ok())
                .filter(|p| {
                    let relative = p.strip_prefix(workspace).unwrap_or(p);
                    !ignore_set.is_match(relative.as_str())
                })
                .filter_map(|p| {
                    SourceKind::from_path(&p).map(|kind| Target {
                        path: p,
                        kind,
                        explicit: false,
                    })
                });
            for target in found {
                if seen.insert(target.path.clone()) {
                    targets.push(target);
                }
            }
        } else if full.is_file() {
            let kind = SourceKind::from_path(&full)
                .ok_or_else(|| OrchestratorError::UnsupportedFile(path.clone()))?;
            if seen.insert(full.clone()) {
                targets.push(Target {
                    path: full,
                    kind,
                    explicit: true,
                });
            }
        } else {
            return Err(OrchestratorError::MissingPath(path.clone()));
        }
    }

    Ok(targets)
}

fn process_file(target: &Target, options: &DeclassifyOptions, dry_run: bool) -> Outcome {
    let source = match fs::read_to_string(&target.path) {
        Ok(s) => s,
        Err(e) => {
            return Outcome::Failed {
                error: Note::new(format!("failed to read file: {e}"), None),
            }
        }
    };
    let line_index = LineIndex::new(&source);

    match declassify(&source, target.kind, options) {
        Ok(output) => {
            let warnings = output
                .warnings
                .iter()
                .map(|warning| {
                    let start = warning.span.map(|span| Position::at(&line_index, span.start));
                    Note::new(warning.message.clone(), start)
                })
                .collect();
            if dry_run {
                return Outcome::Converted {
                    warnings,
                    code: Some(output.code),
                };
            }
            match fs::write(&target.path, &output.code) {
                Ok(()) => Outcome::Converted {
                    warnings,
                    code: None,
                },
                Err(e) => Outcome::Failed {
                    error: Note::new(format!("failed to write file: {e}"), None),
                },
            }
        }
        Err(err) if !target.explicit && matches!(err.kind, DeclassifyErrorKind::NotAComponent { .. }) => {
            Outcome::Skipped {
                reason: err.to_string(),
            }
        }
        Err(err) => {
            let start = err.span.map(|span| Position::at(&line_index, span.start));
            Outcome::Failed {
                error: Note::new(err.to_string(), start),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Args, Command};
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const COMPONENT: &str = "import { Component, Vue } from 'vue-property-decorator'

@Component
export default class Counter extends Vue {
  count = 0
}
";

    const CONVERTED: &str = "import Vue from 'vue'

export default Vue.extend({
  name: 'Counter',
  data() {
    return {
      count: 0
    }
  }
})
";

    fn args(argv: &[&str]) -> DeclassifyArgs {
        let argv = ["vue-declassify", "declassify"].iter().chain(argv);
        match Args::parse_from(argv).command {
            Command::Declassify(args) => args,
        }
    }

    fn workspace(files: &[(&str, &str)]) -> (TempDir, Utf8PathBuf) {
        let dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        for (path, content) in files {
            let path = root.join(path);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        (dir, root)
    }

    fn statuses(reports: &[FileReport]) -> Vec<(&str, &str)> {
        reports
            .iter()
            .map(|report| {
                let status = match report.outcome {
                    Outcome::Converted { .. } => "converted",
                    Outcome::Skipped { .. } => "skipped",
                    Outcome::Failed { .. } => "failed",
                };
                (report.filename.as_str(), status)
            })
            .collect()
    }

    #[test]
    fn test_directory_walk() {
        let (_dir, root) = workspace(&[
            ("src/Counter.ts", COMPONENT),
            ("src/helpers.ts", "export const double = (n: number) => n * 2\n"),
            ("src/readme.md", "# notes\n"),
            ("src/legacy/Old.ts", COMPONENT),
            ("src/node_modules/lib/Lib.ts", COMPONENT),
        ]);
        let reports = declassify_paths(&args(&["--ignore", "**/legacy/**", "src"]), &root).unwrap();

        assert_eq!(
            statuses(&reports),
            vec![("src/Counter.ts", "converted"), ("src/helpers.ts", "skipped")]
        );
        assert_eq!(fs::read_to_string(root.join("src/Counter.ts")).unwrap(), CONVERTED);
        assert_eq!(fs::read_to_string(root.join("src/legacy/Old.ts")).unwrap(), COMPONENT);
        assert_eq!(fs::read_to_string(root.join("src/node_modules/lib/Lib.ts")).unwrap(), COMPONENT);
    }

    #[test]
    fn test_decorated_plain_class_is_skipped() {
        let service = "@Injectable()\nexport default class Service {}\n";
        let (_dir, root) = workspace(&[("src/Service.ts", service)]);
        let reports = declassify_paths(&args(&["src"]), &root).unwrap();

        assert_eq!(statuses(&reports), vec![("src/Service.ts", "skipped")]);
        assert_eq!(fs::read_to_string(root.join("src/Service.ts")).unwrap(), service);
    }

    #[test]
    fn test_dry_run_leaves_files() {
        let (_dir, root) = workspace(&[("Counter.ts", COMPONENT)]);
        let reports = declassify_paths(&args(&["--dry-run", "Counter.ts"]), &root).unwrap();

        assert_eq!(
            reports[0].outcome,
            Outcome::Converted {
                warnings: Vec::new(),
                code: Some(CONVERTED.to_string()),
            }
        );
        assert_eq!(fs::read_to_string(root.join("Counter.ts")).unwrap(), COMPONENT);
    }

    #[test]
    fn test_explicit_plain_module_fails() {
        let source = "export const answer = 42\n";
        let (_dir, root) = workspace(&[("answer.ts", source)]);
        let reports = declassify_paths(&args(&["answer.ts"]), &root).unwrap();

        assert_eq!(statuses(&reports), vec![("answer.ts", "failed")]);
        assert_eq!(fs::read_to_string(root.join("answer.ts")).unwrap(), source);
    }

    #[test]
    fn test_error_location() {
        let source = format!("{}  @PropSync() open!: boolean\n}}\n", COMPONENT.trim_end_matches("}\n"));
        let (_dir, root) = workspace(&[("Sync.ts", &source)]);
        let reports = declassify_paths(&args(&["Sync.ts"]), &root).unwrap();

        let Outcome::Failed { error } = &reports[0].outcome else {
            panic!("expected a failure, got {:?}", reports[0].outcome);
        };
        assert_eq!(error.start.map(|start| start.line), Some(6));
        assert_eq!(fs::read_to_string(root.join("Sync.ts")).unwrap(), source);
    }

    #[test]
    fn test_rejected_paths() {
        let (_dir, root) = workspace(&[("notes.md", "# notes\n")]);
        assert!(matches!(
            declassify_paths(&args(&["notes.md"]), &root),
            Err(OrchestratorError::UnsupportedFile(_))
        ));
        assert!(matches!(
            declassify_paths(&args(&["missing.ts"]), &root),
            Err(OrchestratorError::MissingPath(_))
        ));
        assert!(matches!(
            declassify_paths(&args(&["--ignore", "[", "."]), &root),
            Err(OrchestratorError::InvalidGlob(_))
        ));
    }

    #[test]
    fn test_config_file_is_applied() {
        let (_dir, root) = workspace(&[
            ("declassify.json", r#"{ "quote": "double", "indent": 4 }"#),
            ("Counter.ts", COMPONENT),
        ]);
        declassify_paths(&args(&["Counter.ts"]), &root).unwrap();

        let code = fs::read_to_string(root.join("Counter.ts")).unwrap();
        assert!(code.starts_with("import Vue from \"vue\"\n"));
        assert!(code.contains("\n    name: \"Counter\",\n"));
    }
}
