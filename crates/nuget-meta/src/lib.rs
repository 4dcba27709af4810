//! Lock file checks for project directories.
//!
//! Ties the project model to the file system: finds each project's
//! `project.json` and lock file, parses them (with a modification-time
//! cache for lock files) and reports whether each lock file is still
//! current. Projects are checked concurrently with a configurable bound.
//!
//! # Examples
//!
//! ```no_run
//! use nuget_meta::{MetaConfig, all_valid, check_projects};
//! use std::path::PathBuf;
//!
//! # async fn example() {
//! let config = MetaConfig::default();
//! let checks = check_projects(&config, &[PathBuf::from("src/App")]).await;
//! assert!(all_valid(&checks));
//! # }
//! ```

pub mod check;
pub mod config;
pub mod error;
pub mod provider;

pub use check::{CheckOutcome, ProjectCheck, ProjectChecker, all_valid, check_projects};
pub use config::{CacheConfig, MetaConfig};
pub use error::{MetaError, Result};
pub use provider::{LockFileCache, LockFileProvider, ProjectLockFileProvider};
