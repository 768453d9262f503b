//! Template rendering.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use templer_context::Namespace;
use templer_core::{CoreResult, TemplateEngine, UndefinedMode};

use crate::discovery::{discover_jobs, TemplateJob};
use crate::error::{TemplateError, TemplateResult};

/// Options for a rendering run.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Overwrite destination files that already exist.
    pub force_overwrite: bool,
    /// Delete each template after its output was written.
    pub remove_templates: bool,
    /// Permission bits applied to written files.
    pub file_mode: Option<u32>,
    /// Undefined handling while rendering.
    pub undefined: UndefinedMode,
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn force_overwrite(mut self, force: bool) -> Self {
        self.force_overwrite = force;
        self
    }

    pub fn remove_templates(mut self, remove: bool) -> Self {
        self.remove_templates = remove;
        self
    }

    pub fn file_mode(mut self, mode: Option<u32>) -> Self {
        self.file_mode = mode;
        self
    }

    pub fn undefined(mut self, undefined: UndefinedMode) -> Self {
        self.undefined = undefined;
        self
    }
}

/// Renders template jobs against a resolved namespace.
pub struct TemplateRenderer {
    engine: TemplateEngine,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new(UndefinedMode::default())
    }
}

impl TemplateRenderer {
    pub fn new(mode: UndefinedMode) -> Self {
        Self {
            engine: TemplateEngine::new(mode),
        }
    }

    /// Render template text.
    pub fn render_content<S: Serialize>(&self, name: &str, content: &str, vars: S) -> CoreResult<String> {
        self.engine.render(name, content, vars)
    }

    /// Render every job in order, stopping at the first failure.
    ///
    /// Outputs written before a failing job stay on disk.
    pub fn render_all(&self, jobs: &[TemplateJob], ns: &Namespace) -> TemplateResult<Vec<PathBuf>> {
        let mut created = Vec::with_capacity(jobs.len());
        for job in jobs {
            self.render_job(job, ns)?;
            created.push(job.destination.clone());
        }
        Ok(created)
    }

    /// Render a single job and write its output.
    pub fn render_job(&self, job: &TemplateJob, ns: &Namespace) -> TemplateResult<()> {
        debug!("Loading template file: {}", job.source.display());
        let content = fs::read_to_string(&job.source).map_err(TemplateError::io(&job.source))?;

        check_destination(job)?;

        let rendered = self
            .render_content(&job.source.display().to_string(), &content, ns)
            .map_err(|source| TemplateError::Render {
                path: job.source.clone(),
                source,
            })?;

        write_output(job, &rendered)?;
        info!("Created file '{}' from '{}'", job.destination.display(), job.source.display());

        if job.remove_template {
            fs::remove_file(&job.source).map_err(TemplateError::io(&job.source))?;
            debug!("Removed template file: {}", job.source.display());
        }
        Ok(())
    }
}

/// Discover and render templates in one go.
pub fn render_templates(
    templates: &[PathBuf],
    destination: &Path,
    ns: &Namespace,
    options: &RenderOptions,
) -> TemplateResult<Vec<PathBuf>> {
    let jobs = discover_jobs(templates, destination, options)?;
    TemplateRenderer::new(options.undefined).render_all(&jobs, ns)
}

fn check_destination(job: &TemplateJob) -> TemplateResult<()> {
    let dest = &job.destination;
    if dest.exists() {
        if !dest.is_file() {
            return Err(TemplateError::DestinationNotFile(dest.clone()));
        }
        if !job.force_overwrite {
            return Err(TemplateError::DestinationExists(dest.clone()));
        }
    }
    Ok(())
}

fn write_output(job: &TemplateJob, content: &str) -> TemplateResult<()> {
    let dest = &job.destination;
    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(TemplateError::io(parent))?;
    }

    debug!("Saving rendered file to: {}", dest.display());
    fs::write(dest, content).map_err(TemplateError::io(dest))?;

    if let Some(mode) = job.file_mode {
        set_file_mode(dest, mode)?;
    }
    Ok(())
}

#[cfg(unix)]
fn set_file_mode(path: &Path, mode: u32) -> TemplateResult<()> {
    use std::os::unix::fs::PermissionsExt;

    debug!("Setting file mode {:o} on {}", mode, path.display());
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).map_err(TemplateError::io(path))
}

#[cfg(not(unix))]
fn set_file_mode(path: &Path, _mode: u32) -> TemplateResult<()> {
    tracing::warn!("File modes are not supported on this platform, leaving {} as is", path.display());
    Ok(())
}
