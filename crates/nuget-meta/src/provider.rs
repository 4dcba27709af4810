//! Lock file discovery, parsing and caching.

use crate::config::MetaConfig;
use crate::error::{MetaError, Result};
use async_trait::async_trait;
use dashmap::DashMap;
use nuget_project_model::{LockFile, read_lock_file};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Instant, SystemTime};

/// Finds and parses the lock file belonging to a project directory.
///
/// # Examples
///
/// ```no_run
/// use nuget_meta::provider::{LockFileProvider, ProjectLockFileProvider};
/// use std::path::Path;
///
/// # async fn example() -> nuget_meta::error::Result<()> {
/// let provider = ProjectLockFileProvider::default();
///
/// if let Some(path) = provider.locate_lockfile(Path::new("/src/app")) {
///     let lock_file = provider.parse_lockfile(&path).await?;
///     println!("{} libraries", lock_file.libraries.len());
/// }
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait LockFileProvider: Send + Sync {
    /// Locates the lock file for a project directory.
    ///
    /// Returns `None` if no lock file exists in the directory or in the
    /// searched parents.
    fn locate_lockfile(&self, project_dir: &Path) -> Option<PathBuf>;

    /// Reads and parses a lock file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid lock
    /// file document.
    async fn parse_lockfile(&self, lockfile_path: &Path) -> Result<LockFile>;

    /// Checks if the lock file changed since `last_modified`.
    ///
    /// Returns `true` if the file is newer or cannot be stat'd.
    fn is_lockfile_stale(&self, lockfile_path: &Path, last_modified: SystemTime) -> bool {
        if let Ok(metadata) = std::fs::metadata(lockfile_path)
            && let Ok(mtime) = metadata.modified()
        {
            return mtime > last_modified;
        }
        true
    }
}

/// Reads `project.lock.json` from the project directory or its parents.
///
/// # Lock File Location
///
/// 1. The project directory itself
/// 2. Parent directories, up to `max_parent_depth` levels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLockFileProvider {
    lock_file_name: String,
    max_parent_depth: usize,
}

impl Default for ProjectLockFileProvider {
    fn default() -> Self {
        Self::from_config(&MetaConfig::default())
    }
}

impl ProjectLockFileProvider {
    pub fn new(lock_file_name: impl Into<String>, max_parent_depth: usize) -> Self {
        Self {
            lock_file_name: lock_file_name.into(),
            max_parent_depth,
        }
    }

    pub fn from_config(config: &MetaConfig) -> Self {
        Self::new(config.lock_file_name.clone(), config.max_parent_depth)
    }

    pub fn lock_file_name(&self) -> &str {
        &self.lock_file_name
    }
}

#[async_trait]
impl LockFileProvider for ProjectLockFileProvider {
    fn locate_lockfile(&self, project_dir: &Path) -> Option<PathBuf> {
        let lock_path = project_dir.join(&self.lock_file_name);
        if lock_path.is_file() {
            tracing::debug!("Found {} at: {}", self.lock_file_name, lock_path.display());
            return Some(lock_path);
        }

        let mut current_dir = project_dir;
        for depth in 0..self.max_parent_depth {
            current_dir = current_dir.parent()?;
            let parent_lock = current_dir.join(&self.lock_file_name);
            if parent_lock.is_file() {
                tracing::debug!(
                    "Found {} at depth {}: {}",
                    self.lock_file_name,
                    depth + 1,
                    parent_lock.display()
                );
                return Some(parent_lock);
            }
        }

        tracing::debug!(
            "No {} found for: {}",
            self.lock_file_name,
            project_dir.display()
        );
        None
    }

    async fn parse_lockfile(&self, lockfile_path: &Path) -> Result<LockFile> {
        tracing::debug!("Parsing lock file: {}", lockfile_path.display());

        let content = tokio::fs::read_to_string(lockfile_path)
            .await
            .map_err(|e| MetaError::read_file(lockfile_path, e))?;

        Ok(read_lock_file(&content)?)
    }
}

struct CachedLockFile {
    lock_file: Arc<LockFile>,
    modified_at: SystemTime,
    parsed_at: Instant,
}

/// Parsed lock files keyed by path, re-read when the file's modification
/// time moves forward. Safe to share between concurrent checks.
pub struct LockFileCache {
    entries: DashMap<PathBuf, CachedLockFile>,
}

impl LockFileCache {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Returns the cached lock file, parsing it on a miss or when stale.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be stat'd, read or parsed.
    pub async fn get_or_parse(
        &self,
        provider: &dyn LockFileProvider,
        lockfile_path: &Path,
    ) -> Result<Arc<LockFile>> {
        let cached = self
            .entries
            .get(lockfile_path)
            .map(|entry| {
                (
                    Arc::clone(&entry.lock_file),
                    entry.modified_at,
                    entry.parsed_at,
                )
            });

        if let Some((lock_file, modified_at, parsed_at)) = cached
            && !provider.is_lockfile_stale(lockfile_path, modified_at)
        {
            tracing::debug!(
                "Lock file cache hit: {} (parsed {:?} ago)",
                lockfile_path.display(),
                parsed_at.elapsed()
            );
            return Ok(lock_file);
        }

        tracing::debug!("Lock file cache miss: {}", lockfile_path.display());
        let modified_at = tokio::fs::metadata(lockfile_path).await?.modified()?;
        let lock_file = Arc::new(provider.parse_lockfile(lockfile_path).await?);

        self.entries.insert(
            lockfile_path.to_path_buf(),
            CachedLockFile {
                lock_file: Arc::clone(&lock_file),
                modified_at,
                parsed_at: Instant::now(),
            },
        );

        Ok(lock_file)
    }

    /// Drops the cached entry so the next access re-parses the file.
    pub fn invalidate(&self, lockfile_path: &Path) {
        self.entries.remove(lockfile_path);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for LockFileCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    const LOCK_FILE: &str = r#"{
        "locked": false,
        "version": 1,
        "libraries": { "jQuery/1.8.2": { "files": [] } },
        "projectFileDependencyGroups": { "": ["jQuery >= 1.8.2"] }
    }"#;

    struct CountingProvider {
        inner: ProjectLockFileProvider,
        parses: AtomicUsize,
    }

    impl CountingProvider {
        fn new() -> Self {
            Self {
                inner: ProjectLockFileProvider::default(),
                parses: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl LockFileProvider for CountingProvider {
        fn locate_lockfile(&self, project_dir: &Path) -> Option<PathBuf> {
            self.inner.locate_lockfile(project_dir)
        }

        async fn parse_lockfile(&self, lockfile_path: &Path) -> Result<LockFile> {
            self.parses.fetch_add(1, Ordering::SeqCst);
            self.inner.parse_lockfile(lockfile_path).await
        }
    }

    #[tokio::test]
    async fn test_locate_in_project_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let lock_path = temp_dir.path().join("project.lock.json");
        tokio::fs::write(&lock_path, LOCK_FILE).await.unwrap();

        let provider = ProjectLockFileProvider::default();
        assert_eq!(provider.locate_lockfile(temp_dir.path()), Some(lock_path));
    }

    #[tokio::test]
    async fn test_locate_in_parent_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let project_dir = temp_dir.path().join("src").join("App");
        tokio::fs::create_dir_all(&project_dir).await.unwrap();
        let lock_path = temp_dir.path().join("project.lock.json");
        tokio::fs::write(&lock_path, LOCK_FILE).await.unwrap();

        let provider = ProjectLockFileProvider::default();
        assert_eq!(provider.locate_lockfile(&project_dir), Some(lock_path));

        let shallow = ProjectLockFileProvider::new("project.lock.json", 1);
        assert_eq!(shallow.locate_lockfile(&project_dir), None);
    }

    #[tokio::test]
    async fn test_locate_missing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let provider = ProjectLockFileProvider::new("does-not-exist.lock.json", 2);
        assert_eq!(provider.locate_lockfile(temp_dir.path()), None);
    }

    #[tokio::test]
    async fn test_parse_lockfile() {
        let temp_dir = tempfile::tempdir().unwrap();
        let lock_path = temp_dir.path().join("project.lock.json");
        tokio::fs::write(&lock_path, LOCK_FILE).await.unwrap();

        let lock_file = ProjectLockFileProvider::default()
            .parse_lockfile(&lock_path)
            .await
            .unwrap();
        assert_eq!(lock_file.libraries.len(), 1);
        assert_eq!(lock_file.project_file_dependency_groups.len(), 1);
    }

    #[tokio::test]
    async fn test_parse_malformed_lockfile() {
        let temp_dir = tempfile::tempdir().unwrap();
        let lock_path = temp_dir.path().join("project.lock.json");
        tokio::fs::write(&lock_path, "{ not json").await.unwrap();

        let err = ProjectLockFileProvider::default()
            .parse_lockfile(&lock_path)
            .await
            .unwrap_err();
        assert!(matches!(err, MetaError::ProjectModel(_)));
    }

    #[tokio::test]
    async fn test_parse_unreadable_lockfile() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = ProjectLockFileProvider::default()
            .parse_lockfile(&temp_dir.path().join("project.lock.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, MetaError::ReadFile { .. }));
    }

    #[test]
    fn test_is_lockfile_stale_missing_file() {
        let provider = ProjectLockFileProvider::default();
        assert!(provider.is_lockfile_stale(
            Path::new("/nonexistent/project.lock.json"),
            SystemTime::now()
        ));
    }

    #[tokio::test]
    async fn test_cache_hit_skips_parse() {
        let temp_dir = tempfile::tempdir().unwrap();
        let lock_path = temp_dir.path().join("project.lock.json");
        tokio::fs::write(&lock_path, LOCK_FILE).await.unwrap();

        let provider = CountingProvider::new();
        let cache = LockFileCache::new();

        let first = cache.get_or_parse(&provider, &lock_path).await.unwrap();
        let second = cache.get_or_parse(&provider, &lock_path).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(provider.parses.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_cache_reparses_newer_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let lock_path = temp_dir.path().join("project.lock.json");
        tokio::fs::write(&lock_path, LOCK_FILE).await.unwrap();

        let provider = CountingProvider::new();
        let cache = LockFileCache::new();
        cache.get_or_parse(&provider, &lock_path).await.unwrap();

        let file = std::fs::File::options().write(true).open(&lock_path).unwrap();
        file.set_modified(SystemTime::now() + Duration::from_secs(60))
            .unwrap();

        cache.get_or_parse(&provider, &lock_path).await.unwrap();
        assert_eq!(provider.parses.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_cache_invalidate() {
        let temp_dir = tempfile::tempdir().unwrap();
        let lock_path = temp_dir.path().join("project.lock.json");
        tokio::fs::write(&lock_path, LOCK_FILE).await.unwrap();

        let provider = CountingProvider::new();
        let cache = LockFileCache::new();
        cache.get_or_parse(&provider, &lock_path).await.unwrap();

        cache.invalidate(&lock_path);
        assert!(cache.is_empty());

        cache.get_or_parse(&provider, &lock_path).await.unwrap();
        assert_eq!(provider.parses.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_cache_does_not_store_failures() {
        let temp_dir = tempfile::tempdir().unwrap();
        let lock_path = temp_dir.path().join("project.lock.json");
        tokio::fs::write(&lock_path, "[]").await.unwrap();

        let cache = LockFileCache::new();
        assert!(
            cache
                .get_or_parse(&ProjectLockFileProvider::default(), &lock_path)
                .await
                .is_err()
        );
        assert!(cache.is_empty());
    }
}
