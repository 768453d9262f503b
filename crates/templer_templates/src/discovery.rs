//! Template discovery.
//!
//! Turns template paths and a destination into a list of [`TemplateJob`]s:
//!
//! - several templates, or a directory: the destination is a directory and
//!   each template keeps its path relative to the directory it was found in,
//!   minus the template extension
//! - a single file: the destination is the output file, unless it is an
//!   existing directory

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{TemplateError, TemplateResult};
use crate::renderer::RenderOptions;

/// File extensions recognized as templates inside directories.
pub const TEMPLATE_EXTENSIONS: &[&str] = &["j2", "jinja2"];

/// A template to render and where its output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateJob {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub force_overwrite: bool,
    pub remove_template: bool,
    pub file_mode: Option<u32>,
}

impl TemplateJob {
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>, options: &RenderOptions) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            force_overwrite: options.force_overwrite,
            remove_template: options.remove_templates,
            file_mode: options.file_mode,
        }
    }
}

/// Build the jobs for `templates` rendered into `destination`.
pub fn discover_jobs(
    templates: &[PathBuf],
    destination: &Path,
    options: &RenderOptions,
) -> TemplateResult<Vec<TemplateJob>> {
    let first = templates.first().ok_or(TemplateError::NoTemplatePaths)?;
    let mut jobs = Vec::new();

    if templates.len() > 1 || first.is_dir() {
        if destination.exists() && !destination.is_dir() {
            return Err(TemplateError::DestinationNotDirectory(destination.to_path_buf()));
        }

        for path in templates {
            if path.is_dir() {
                for source in find_templates(path) {
                    let relative = source.strip_prefix(path).unwrap_or(&source);
                    let target = destination.join(strip_template_extension(relative));
                    jobs.push(TemplateJob::new(source.clone(), target, options));
                }
            } else if path.is_file() {
                let target = destination.join(output_file_name(path));
                jobs.push(TemplateJob::new(path.clone(), target, options));
            } else {
                return Err(TemplateError::NotFound(path.clone()));
            }
        }
    } else {
        if !first.is_file() {
            return Err(TemplateError::NotFound(first.clone()));
        }
        let target = if destination.is_dir() {
            destination.join(output_file_name(first))
        } else {
            destination.to_path_buf()
        };
        jobs.push(TemplateJob::new(first.clone(), target, options));
    }

    if jobs.is_empty() {
        return Err(TemplateError::NoTemplates);
    }

    for job in &jobs {
        debug!("Template {} -> {}", job.source.display(), job.destination.display());
    }
    Ok(jobs)
}

/// All template files below `dir`, in file name order.
pub fn find_templates(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_template(e.path()))
        .map(|e| e.into_path())
        .collect()
}

pub fn is_template(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| TEMPLATE_EXTENSIONS.contains(&e))
        .unwrap_or(false)
}

/// `path` with a trailing template extension removed.
pub fn strip_template_extension(path: &Path) -> PathBuf {
    if is_template(path) {
        path.with_extension("")
    } else {
        path.to_path_buf()
    }
}

fn output_file_name(path: &Path) -> PathBuf {
    match path.file_name() {
        Some(name) => strip_template_extension(Path::new(name)),
        None => path.to_path_buf(),
    }
}
