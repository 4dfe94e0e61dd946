//! The `transform` subcommand.
//!
//! All writes go through a `Transaction`; a manifest that fails to parse is
//! reported and skipped without stopping the others.

use crate::error::{Result, TransformError};
use crate::fs::Transaction;
use crate::manifest::{Flavor, write_feature, write_manifest};
use crate::rewrite::{ManifestTransformer, PackageMatcher};
use crate::rules::load_rules;

use clap::Parser;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

/// Arguments for the `transform` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct TransformArgs {
    /// TOML file with [renames], [versions] and [bundles] rules
    #[arg(long, short = 'r', value_name = "FILE")]
    pub rules: PathBuf,

    /// Manifest files, or directories searched for META-INF/MANIFEST.MF
    #[arg(required = true, value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Preview changes without writing them
    #[arg(long, short = 'n')]
    pub dry_run: bool,

    /// Log every rewrite decision
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Also rewrite feature manifests (`*.mf` other than MANIFEST.MF)
    #[arg(long)]
    pub features: bool,
}

/// Runs the transform.
///
/// ## Phases
///
/// 1. Load and validate the rule file
/// 2. Collect manifests from the given paths
/// 3. Transform each manifest and stage the changed ones
/// 4. Commit, or restore everything if a write fails
///
/// Returns an error if any manifest failed, after the others were written.
pub fn execute(args: TransformArgs) -> Result<()> {
    let rules = load_rules(&args.rules)?;
    if rules.is_empty() {
        log::warn!("Rule file {} defines no rules", args.rules.display());
    }

    let manifests = collect_manifests(&args.paths, args.features)?;
    if manifests.is_empty() {
        let path = args.paths.first().cloned().unwrap_or_default();
        return Err(TransformError::NothingToDo(path));
    }
    log::info!("Found {} manifest(s)", manifests.len());

    let transformer = ManifestTransformer::new(&rules);
    let mut txn = Transaction::new(args.dry_run);
    let mut failed = 0;

    for path in &manifests {
        if let Err(e) = stage_manifest(path, &transformer, &mut txn) {
            eprintln!("{} {}: {}", "Error:".red().bold(), path.display(), e);
            failed += 1;
        }
    }
    log::debug!("Staged {} of {} manifest(s)", txn.len(), manifests.len());

    if let Err(e) = txn.commit() {
        return handle_commit_error(e);
    }

    txn.print_summary(&summary_root(&args.paths));

    if failed > 0 {
        return Err(TransformError::Other(anyhow::anyhow!(
            "{} of {} manifest(s) could not be transformed",
            failed,
            manifests.len()
        )));
    }

    Ok(())
}

/// Transforms one manifest and stages it if anything changed.
fn stage_manifest<M: PackageMatcher>(
    path: &Path,
    transformer: &ManifestTransformer<'_, M>,
    txn: &mut Transaction,
) -> Result<()> {
    let text = fs::read_to_string(path).map_err(|e| {
        TransformError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to read {}: {}", path.display(), e),
        ))
    })?;

    let name = path.display().to_string();
    let Some(transformed) = transformer.apply(&name, &text)? else {
        return Ok(());
    };

    for diagnostic in &transformed.report.diagnostics {
        log::warn!("{}: {}", name, diagnostic);
    }

    let new_content = match Flavor::for_path(path).unwrap_or(Flavor::Manifest) {
        Flavor::Manifest => write_manifest(&transformed.manifest),
        Flavor::Feature => write_feature(&transformed.manifest, &quote_value),
    };

    txn.update_file(
        path.to_path_buf(),
        text,
        new_content,
        transformed.report.changes,
    )
}

/// Quotes a feature attribute value unless it is a plain token.
fn quote_value(value: &str) -> String {
    let is_token = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));

    if is_token {
        value.to_string()
    } else {
        format!("\"{}\"", value.replace('"', "\\\""))
    }
}

/// Expands `paths` into the `MANIFEST.MF` files to transform.
///
/// Files are taken as given. Directories are walked, honouring ignore
/// files and skipping `target` and `.git`. Feature manifests are skipped
/// unless `include_features` is set.
pub fn collect_manifests(paths: &[PathBuf], include_features: bool) -> Result<Vec<PathBuf>> {
    let mut manifests = Vec::new();

    for path in paths {
        if path.is_file() {
            if !include_features && Flavor::for_path(path) == Some(Flavor::Feature) {
                log::warn!(
                    "Skipping feature manifest {} (use --features)",
                    path.display()
                );
            } else {
                manifests.push(path.clone());
            }
            continue;
        }

        if !path.is_dir() {
            return Err(TransformError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Path does not exist: {}", path.display()),
            )));
        }

        walk_directory(path, include_features, &mut manifests);
    }

    manifests.sort();
    manifests.dedup();
    Ok(manifests)
}

fn walk_directory(root: &Path, include_features: bool, manifests: &mut Vec<PathBuf>) {
    let walker = ignore::WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .git_exclude(true)
        .git_global(true)
        .filter_entry(|e| {
            let name = e.file_name().to_str();
            !(name == Some("target") || name == Some(".git"))
        })
        .build();

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                log::debug!("Skipping entry due to error: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let path = entry.path();
        match Flavor::for_path(path) {
            Some(Flavor::Manifest) => manifests.push(path.to_path_buf()),
            Some(Flavor::Feature) if include_features => manifests.push(path.to_path_buf()),
            Some(Flavor::Feature) => {
                log::debug!("Skipping feature manifest {}", path.display());
            }
            None => {}
        }
    }
}

/// Directory that summary paths are shown relative to.
fn summary_root(paths: &[PathBuf]) -> PathBuf {
    match paths {
        [dir] if dir.is_dir() => dir.clone(),
        _ => PathBuf::from("."),
    }
}

fn handle_commit_error(e: TransformError) -> Result<()> {
    eprintln!("{} {}", "Error during commit:".red().bold(), e);

    if matches!(e, TransformError::RollbackFailed(_)) {
        eprintln!(
            "{}",
            "⚠ Some manifests may be partially rewritten.".yellow().bold()
        );
        eprintln!("Hint: Check your version control system.");
    } else {
        eprintln!("{} No manifests were changed.", "ℹ".blue().bold());
    }

    Err(e)
}
