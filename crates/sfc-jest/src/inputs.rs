//! Input discovery.

use camino::{Utf8Path, Utf8PathBuf};
use globset::{Glob, GlobSet, GlobSetBuilder};
use rustc_hash::FxHashSet;
use walkdir::WalkDir;

use crate::error::RunError;

/// Builds the ignore set from `--ignore` patterns.
pub fn ignore_set(patterns: &[String]) -> Result<GlobSet, RunError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| RunError::InvalidGlob {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| RunError::InvalidGlob {
        pattern: patterns.join(", "),
        message: e.to_string(),
    })
}

/// Resolves `inputs` against `cwd` into the list of component files.
///
/// Files are taken as given. Directories are walked for `extensions`,
/// skipping `node_modules` and anything `ignore` matches (relative to
/// `cwd`). An empty `inputs` walks `cwd` itself.
pub fn collect(
    inputs: &[Utf8PathBuf],
    cwd: &Utf8Path,
    extensions: &[String],
    ignore: &GlobSet,
) -> Result<Vec<Utf8PathBuf>, RunError> {
    let roots: Vec<Utf8PathBuf> = if inputs.is_empty() {
        vec![cwd.to_path_buf()]
    } else {
        inputs.iter().map(|input| cwd.join(input)).collect()
    };

    let mut files = Vec::new();
    for root in roots {
        if root.is_file() {
            files.push(root);
        } else if root.is_dir() {
            files.extend(walk(&root, cwd, extensions, ignore));
        } else {
            return Err(RunError::MissingInput(root));
        }
    }

    let mut seen = FxHashSet::default();
    files.retain(|file| seen.insert(file.clone()));
    Ok(files)
}

fn walk(
    root: &Utf8Path,
    cwd: &Utf8Path,
    extensions: &[String],
    ignore: &GlobSet,
) -> Vec<Utf8PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || e.file_name() != "node_modules")
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| Utf8PathBuf::try_from(e.into_path()).ok())
        .filter(|p| {
            p.extension().is_some_and(|ext| {
                extensions
                    .iter()
                    .any(|wanted| wanted.trim_start_matches('.') == ext)
            })
        })
        .filter(|p| {
            let relative = p.strip_prefix(cwd).unwrap_or(p);
            !ignore.is_match(relative.as_str())
        })
        .collect()
}
