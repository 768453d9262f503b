//! Context file discovery and loading.

use std::fs;
use std::path::{Path, PathBuf};

use templer_core::UndefinedMode;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::document::ContextDocument;
use crate::env::EnvVars;
use crate::error::{ContextError, ContextResult};
use crate::merge::resolve_document;
use crate::namespace::Namespace;
use crate::render::ContextRenderer;

/// File extensions recognized as context files inside directories.
pub const CONTEXT_EXTENSIONS: &[&str] = &["yml", "yaml"];

/// Options for resolving context files.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveOptions {
    /// Fail when an environment value does not match the type of its default.
    pub type_check: bool,
    /// Render context files as templates before parsing them.
    pub dynamic: bool,
    /// Undefined handling while pre-rendering.
    pub undefined: UndefinedMode,
}

impl ResolveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn type_check(mut self, type_check: bool) -> Self {
        self.type_check = type_check;
        self
    }

    pub fn dynamic(mut self, dynamic: bool) -> Self {
        self.dynamic = dynamic;
        self
    }

    pub fn undefined(mut self, undefined: UndefinedMode) -> Self {
        self.undefined = undefined;
        self
    }
}

/// Loads context files and resolves them into a [`Namespace`].
pub struct ContextLoader {
    options: ResolveOptions,
    renderer: ContextRenderer,
}

impl ContextLoader {
    pub fn new(options: ResolveOptions) -> Self {
        Self {
            options,
            renderer: ContextRenderer::new(options.undefined, options.dynamic),
        }
    }

    /// Expand context paths into files.
    ///
    /// Directories contribute every `*.yml` / `*.yaml` below them, sorted.
    pub fn discover(paths: &[PathBuf]) -> ContextResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        for path in paths {
            if path.is_dir() {
                let mut found: Vec<PathBuf> = WalkDir::new(path)
                    .into_iter()
                    .filter_map(|e| e.ok())
                    .filter(|e| e.file_type().is_file() && has_context_extension(e.path()))
                    .map(|e| e.into_path())
                    .collect();
                found.sort();
                files.extend(found);
            } else if path.is_file() {
                files.push(path.clone());
            } else {
                return Err(ContextError::NotFound(path.clone()));
            }
        }

        if files.is_empty() && !paths.is_empty() {
            return Err(ContextError::NoContextFiles);
        }
        Ok(files)
    }

    /// Resolve all context files found under `paths` into one namespace.
    ///
    /// The environment forms the lowest layer. Files are resolved
    /// independently against the environment and applied in order: a later
    /// file wins over an earlier one within the same precedence tier, but
    /// `defaults` from any file never shadow `static` or `dynamic` values.
    pub fn load(&self, paths: &[PathBuf], env: &EnvVars) -> ContextResult<Namespace> {
        let env_ns = Namespace::from_env(env);
        let mut ns = env_ns.clone();

        for file in Self::discover(paths)? {
            ns.extend(self.load_file(&file, env, &env_ns)?);
        }

        Ok(ns)
    }

    /// Resolve a single context file, without the environment layer.
    pub fn load_file(&self, path: &Path, env: &EnvVars, env_ns: &Namespace) -> ContextResult<Namespace> {
        debug!("Loading context file: {}", path.display());
        let resolve = || -> ContextResult<Namespace> {
            let raw = fs::read_to_string(path)?;
            let text = self.renderer.render(&path.display().to_string(), &raw, env_ns)?;
            let document = ContextDocument::parse(&text)?;
            resolve_document(&document, env, self.options.type_check)
        };

        let ns = resolve().map_err(|e| e.in_file(path))?;
        info!("Loaded context file {}", path.display());
        Ok(ns)
    }
}

fn has_context_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| CONTEXT_EXTENSIONS.contains(&e))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_discover_sorted_and_filtered() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("sub")).unwrap();
        fs::write(temp.path().join("b.yml"), "").unwrap();
        fs::write(temp.path().join("a.yaml"), "").unwrap();
        fs::write(temp.path().join("sub/c.yml"), "").unwrap();
        fs::write(temp.path().join("notes.txt"), "").unwrap();

        let files = ContextLoader::discover(&[temp.path().to_path_buf()]).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|f| f.strip_prefix(temp.path()).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(names, vec!["a.yaml", "b.yml", "sub/c.yml"]);
    }

    #[test]
    fn test_discover_empty_dir_fails() {
        let temp = tempdir().unwrap();
        assert!(matches!(
            ContextLoader::discover(&[temp.path().to_path_buf()]),
            Err(ContextError::NoContextFiles)
        ));
    }

    #[test]
    fn test_discover_missing_path() {
        let temp = tempdir().unwrap();
        assert!(matches!(
            ContextLoader::discover(&[temp.path().join("missing.yml")]),
            Err(ContextError::NotFound(_))
        ));
    }

    #[test]
    fn test_no_paths_is_env_only() {
        let loader = ContextLoader::new(ResolveOptions::new());
        let env: EnvVars = [("A".to_string(), "1".to_string())].into_iter().collect();
        let ns = loader.load(&[], &env).unwrap();
        assert_eq!(ns.names(), vec!["A".to_string()]);
    }

    #[test]
    fn test_errors_name_the_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("bad.yml");
        fs::write(&path, "defaults: {X: {type: enum}}").unwrap();

        let loader = ContextLoader::new(ResolveOptions::new());
        let err = loader.load(&[path.clone()], &EnvVars::new()).unwrap_err();
        assert!(err.to_string().contains("bad.yml"));
        assert!(matches!(err.root(), ContextError::UnknownDefaultType { .. }));
    }
}
