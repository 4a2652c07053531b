//! Patching a single target file.

use std::ffi::OsStr;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, error, info, instrument, trace, warn};

use crate::config::{PathResolver, TargetConfig};
use crate::error::{Result, ThemeError};
use crate::settings::ThemeSettings;

use super::edit::{CompiledEdit, EditReport, apply_edits};

/// What happened to a target file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetOutcome {
    /// Written with new content.
    Updated,
    /// Would be written (dry run).
    WouldUpdate,
    /// Did not exist; written from the target's template.
    Created,
    /// Would be created (dry run).
    WouldCreate,
    /// Content already current; not written.
    Unchanged,
    /// No candidate file exists; skipped.
    Missing,
    /// Read or write failed.
    Failed,
}

/// Report for one target.
#[derive(Debug, Clone, Serialize)]
pub struct TargetReport {
    pub name: String,
    /// The file that was patched, or the primary path when none was found.
    pub path: PathBuf,
    pub outcome: TargetOutcome,
    pub edits: Vec<EditReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TargetReport {
    fn new(target: &ResolvedTarget, path: &Path, outcome: TargetOutcome) -> Self {
        Self {
            name: target.name.clone(),
            path: path.to_path_buf(),
            outcome,
            edits: Vec::new(),
            error: None,
        }
    }

    fn failed(target: &ResolvedTarget, path: &Path, message: String) -> Self {
        error!(target = %target.name, path = %path.display(), error = %message, "Target failed");
        Self {
            error: Some(message),
            ..Self::new(target, path, TargetOutcome::Failed)
        }
    }
}

/// A target with its paths resolved and edits compiled.
#[derive(Debug, Clone)]
pub struct ResolvedTarget {
    pub name: String,
    /// Candidate files, primary path first.
    pub paths: Vec<PathBuf>,
    /// Template for creating the primary path when no candidate exists.
    pub create: Option<String>,
    pub edits: Vec<CompiledEdit>,
}

impl ResolvedTarget {
    pub fn resolve(config: &TargetConfig, resolver: &PathResolver) -> Result<Self> {
        let edits = config
            .edits
            .iter()
            .enumerate()
            .map(|(index, spec)| {
                CompiledEdit::compile(spec).map_err(|reason| ThemeError::InvalidPattern {
                    target: config.name.clone(),
                    index,
                    reason,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let paths = config
            .candidates()
            .map(|path| resolver.resolve(path))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name: config.name.clone(),
            paths,
            create: config.create.clone(),
            edits,
        })
    }

    /// The primary path.
    pub fn path(&self) -> &Path {
        self.paths.first().map_or(Path::new(""), PathBuf::as_path)
    }
}

/// First candidate that exists, or why none could be used.
enum Located<'a> {
    File(&'a Path),
    Nothing,
    Unusable(&'a Path, String),
}

fn locate(target: &ResolvedTarget) -> Located<'_> {
    for path in &target.paths {
        match fs::metadata(path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                trace!(path = %path.display(), "Candidate not found");
            }
            Err(e) => return Located::Unusable(path, e.to_string()),
            Ok(meta) if !meta.is_file() => {
                return Located::Unusable(path, "not a regular file".to_string());
            }
            Ok(_) => return Located::File(path),
        }
    }
    Located::Nothing
}

/// Apply a target's edits to its file.
///
/// Never returns an error: every problem ends up in the report so the caller
/// can carry on with the next target.
#[instrument(skip_all, fields(target = %target.name))]
pub fn patch_target(target: &ResolvedTarget, settings: &ThemeSettings, dry_run: bool) -> TargetReport {
    let path = match locate(target) {
        Located::File(path) => path,
        Located::Unusable(path, message) => return TargetReport::failed(target, path, message),
        Located::Nothing => return create_target(target, settings, dry_run),
    };
    if path != target.path() {
        debug!(path = %path.display(), "Using fallback location");
    }

    let original = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => return TargetReport::failed(target, path, format!("read failed: {e}")),
    };

    let (patched, edits) = apply_edits(&original, &target.edits, settings);
    for edit in edits.iter().filter(|e| e.outcome.is_miss()) {
        warn!(edit = edit.index, locator = %edit.locator, outcome = ?edit.outcome, "Edit did not apply");
    }

    let outcome = if patched == original {
        debug!("Content already current");
        TargetOutcome::Unchanged
    } else if dry_run {
        info!(path = %path.display(), "Would update target");
        TargetOutcome::WouldUpdate
    } else {
        if let Err(e) = write_atomic(path, &patched) {
            return TargetReport {
                edits,
                ..TargetReport::failed(target, path, format!("write failed: {e}"))
            };
        }
        info!(path = %path.display(), "Updated target");
        TargetOutcome::Updated
    };

    TargetReport {
        edits,
        ..TargetReport::new(target, path, outcome)
    }
}

/// Write the rendered template to the primary path.
///
/// Only done when the target has a template and the primary path's
/// directory already exists; otherwise the target is missing.
fn create_target(target: &ResolvedTarget, settings: &ThemeSettings, dry_run: bool) -> TargetReport {
    let path = target.path();
    let Some(template) = &target.create else {
        info!(path = %path.display(), "Target file not found, skipping");
        return TargetReport::new(target, path, TargetOutcome::Missing);
    };
    if !path.parent().is_some_and(Path::is_dir) {
        info!(path = %path.display(), "Target directory not found, skipping");
        return TargetReport::new(target, path, TargetOutcome::Missing);
    }

    if dry_run {
        info!(path = %path.display(), "Would create target");
        return TargetReport::new(target, path, TargetOutcome::WouldCreate);
    }
    if let Err(e) = fs::write(path, settings.render(template)) {
        return TargetReport::failed(target, path, format!("create failed: {e}"));
    }
    info!(path = %path.display(), "Created target");
    TargetReport::new(target, path, TargetOutcome::Created)
}

/// Replace a file's content via a temp file and rename.
///
/// Dotfiles are often symlinks into a repository, so the link is followed and
/// the real file replaced. Permissions of the original are kept. The temp
/// file is created exclusively and removed again on any failure.
pub fn write_atomic(path: &Path, contents: &str) -> io::Result<()> {
    let real = fs::canonicalize(path)?;
    let dir = real
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no parent"))?;
    let file_name = real
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
    let permissions = fs::metadata(&real)?.permissions();

    let tmp = temp_path(dir, file_name);
    // create_new never opens an existing file or follows a link at `tmp`
    let mut file = OpenOptions::new().write(true).create_new(true).open(&tmp)?;
    let written = file.write_all(contents.as_bytes()).and_then(|()| file.sync_all());
    drop(file);
    let written = written
        .and_then(|()| fs::set_permissions(&tmp, permissions))
        .and_then(|()| fs::rename(&tmp, &real));
    if written.is_err() {
        trace!(tmp = %tmp.display(), "Removing temp file after failed write");
        let _ = fs::remove_file(&tmp);
    }
    written
}

/// Per-process temp name next to the file being replaced.
fn temp_path(dir: &Path, file_name: &OsStr) -> PathBuf {
    dir.join(format!(
        ".{}.{}.themesync-tmp",
        file_name.to_string_lossy(),
        std::process::id()
    ))
}
