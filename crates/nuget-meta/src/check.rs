//! Checking project directories against their lock files.
//!
//! Each project is checked independently; up to
//! [`MetaConfig::concurrency`] checks run at once and results come back in
//! input order.

use crate::config::MetaConfig;
use crate::error::{MetaError, Result};
use crate::provider::{LockFileCache, LockFileProvider, ProjectLockFileProvider};
use futures::stream::{self, StreamExt};
use nuget_project_model::{LockFile, LockFileMismatch, PackageSpec};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Verdict for one project directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The lock file matches the project.
    Valid,
    /// The lock file must be regenerated.
    Stale(LockFileMismatch),
    /// No lock file was found for the project.
    MissingLockFile,
    /// The project or lock file could not be read.
    Failed(String),
}

impl CheckOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid => write!(f, "valid"),
            Self::Stale(reason) => write!(f, "stale: {}", reason),
            Self::MissingLockFile => write!(f, "missing lock file"),
            Self::Failed(error) => write!(f, "failed: {}", error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectCheck {
    pub project_dir: PathBuf,
    pub outcome: CheckOutcome,
}

/// Checks projects using a lock file provider and an optional cache.
///
/// # Examples
///
/// ```no_run
/// use nuget_meta::check::ProjectChecker;
/// use nuget_meta::config::MetaConfig;
/// use std::path::PathBuf;
///
/// # async fn example() {
/// let checker = ProjectChecker::new(MetaConfig::default());
/// let checks = checker.check_all(&[PathBuf::from("src/App")]).await;
///
/// for check in &checks {
///     println!("{}: {}", check.project_dir.display(), check.outcome);
/// }
/// # }
/// ```
pub struct ProjectChecker {
    config: MetaConfig,
    provider: Arc<dyn LockFileProvider>,
    cache: Option<LockFileCache>,
}

impl ProjectChecker {
    pub fn new(config: MetaConfig) -> Self {
        let provider = Arc::new(ProjectLockFileProvider::from_config(&config));
        Self::with_provider(config, provider)
    }

    pub fn with_provider(config: MetaConfig, provider: Arc<dyn LockFileProvider>) -> Self {
        let cache = config.cache.enabled.then(LockFileCache::new);
        Self {
            config,
            provider,
            cache,
        }
    }

    pub fn config(&self) -> &MetaConfig {
        &self.config
    }

    pub fn cache(&self) -> Option<&LockFileCache> {
        self.cache.as_ref()
    }

    /// Checks every directory, returning one result per input in input order.
    pub async fn check_all(&self, project_dirs: &[PathBuf]) -> Vec<ProjectCheck> {
        stream::iter(project_dirs)
            .map(|dir| self.check_project(dir))
            .buffered(self.config.concurrency())
            .collect()
            .await
    }

    /// Checks one project directory.
    pub async fn check_project(&self, project_dir: &Path) -> ProjectCheck {
        let outcome = match self.evaluate(project_dir).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!("Check failed for {}: {}", project_dir.display(), e);
                CheckOutcome::Failed(e.to_string())
            }
        };

        ProjectCheck {
            project_dir: project_dir.to_path_buf(),
            outcome,
        }
    }

    async fn evaluate(&self, project_dir: &Path) -> Result<CheckOutcome> {
        let spec = self.read_spec(project_dir).await?;

        let Some(lockfile_path) = self.provider.locate_lockfile(project_dir) else {
            return Ok(CheckOutcome::MissingLockFile);
        };

        let lock_file = self.load_lock_file(&lockfile_path).await?;

        Ok(match lock_file.staleness(&spec) {
            Some(reason) => CheckOutcome::Stale(reason),
            None => {
                tracing::debug!("Lock file is current: {}", lockfile_path.display());
                CheckOutcome::Valid
            }
        })
    }

    async fn read_spec(&self, project_dir: &Path) -> Result<PackageSpec> {
        let path = project_dir.join(&self.config.project_file_name);
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| MetaError::read_file(&path, e))?;

        let name = project_dir
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();

        Ok(PackageSpec::from_json(&content, name)?)
    }

    async fn load_lock_file(&self, lockfile_path: &Path) -> Result<Arc<LockFile>> {
        match &self.cache {
            Some(cache) => cache.get_or_parse(&*self.provider, lockfile_path).await,
            None => Ok(Arc::new(self.provider.parse_lockfile(lockfile_path).await?)),
        }
    }
}

/// Checks every project directory with the default lock file provider.
pub async fn check_projects(config: &MetaConfig, project_dirs: &[PathBuf]) -> Vec<ProjectCheck> {
    ProjectChecker::new(config.clone())
        .check_all(project_dirs)
        .await
}

/// Returns true when every check found a current lock file.
pub fn all_valid(checks: &[ProjectCheck]) -> bool {
    checks.iter().all(|c| c.outcome.is_valid())
}
