//! # File I/O Module
//!
//! Load projects are stored as `.ecl` files containing JSON.
//!
//! - **Atomic saves**: write `.ecl.tmp`, fsync, then rename over the target
//! - **Advisory locking**: a `.ecl.lock` sidecar holds an OS-level exclusive
//!   lock plus JSON metadata naming the holder
//! - **Version validation**: files from a newer schema are refused
//!
//! ## Example
//!
//! ```rust,no_run
//! use eurocode_core::file_io::{load_project, save_project, FileLock};
//! use eurocode_core::project::LoadProject;
//! use std::path::Path;
//!
//! let path = Path::new("warehouse.ecl");
//! let lock = FileLock::acquire(path, "engineer@company.com")?;
//!
//! let mut project = LoadProject::new("Engineer", "25-001", "Warehouse");
//! project.add_permanent("G")?;
//! save_project(&project, path)?;
//!
//! let reloaded = load_project(path)?;
//! assert_eq!(reloaded.loads.len(), 1);
//! drop(lock);
//! # Ok::<(), eurocode_core::errors::CalcError>(())
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::project::{LoadProject, SCHEMA_VERSION};

/// Locks older than this are treated as abandoned
const STALE_LOCK_HOURS: i64 = 24;

/// Metadata written into the lock sidecar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// User identifier (email or username)
    pub user_id: String,
    /// Host the lock was taken on
    pub machine: String,
    /// Process holding the lock
    pub pid: u32,
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    fn current(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: hostname(),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }

    /// A lock is stale once its process is gone (same host) or it is over a day old
    fn is_stale(&self) -> bool {
        if self.machine == hostname() && !process_alive(self.pid) {
            return true;
        }
        (Utc::now() - self.locked_at).num_hours() > STALE_LOCK_HOURS
    }
}

fn hostname() -> String {
    ["HOSTNAME", "COMPUTERNAME", "HOST"]
        .iter()
        .find_map(|key| std::env::var(key).ok())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(unix)]
fn process_alive(pid: u32) -> bool {
    Path::new(&format!("/proc/{}", pid)).exists()
}

#[cfg(not(unix))]
fn process_alive(_pid: u32) -> bool {
    true
}

/// Exclusive lock on a project file, released on drop.
#[derive(Debug)]
pub struct FileLock {
    lock_path: PathBuf,
    _handle: File,
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire the lock for `path`.
    ///
    /// # Errors
    ///
    /// * [`CalcError::FileLocked`] - someone else holds a live lock
    /// * [`CalcError::FileError`] - the sidecar could not be written
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> CalcResult<Self> {
        if let Some(holder) = FileLock::check(path) {
            return Err(CalcError::file_locked(
                path.display().to_string(),
                format!("{} ({})", holder.user_id, holder.machine),
                holder.locked_at.to_rfc3339(),
            ));
        }

        let lock_path = lock_path_for(path);
        let io_err = |operation: &str, e: std::io::Error| {
            CalcError::file_error(operation, lock_path.display().to_string(), e.to_string())
        };

        let mut handle = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(|e| io_err("create lock", e))?;

        handle.try_lock_exclusive().map_err(|_| {
            CalcError::file_locked(path.display().to_string(), "another process", "unknown")
        })?;

        let info = LockInfo::current(user_id);
        let json = serde_json::to_string_pretty(&info).map_err(CalcError::serialization)?;
        handle.write_all(json.as_bytes()).map_err(|e| io_err("write lock", e))?;
        handle.sync_all().map_err(|e| io_err("sync lock", e))?;

        debug!("acquired lock on {} for {}", path.display(), info.user_id);
        Ok(FileLock {
            lock_path,
            _handle: handle,
            info,
        })
    }

    /// Return the holder of a live lock on `path`, if any
    pub fn check(path: &Path) -> Option<LockInfo> {
        let contents = fs::read_to_string(lock_path_for(path)).ok()?;
        let info: LockInfo = serde_json::from_str(&contents).ok()?;
        (!info.is_stale()).then_some(info)
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}

/// `project.ecl` -> `project.ecl.lock`
fn lock_path_for(path: &Path) -> PathBuf {
    sidecar(path, "lock")
}

fn sidecar(path: &Path, suffix: &str) -> PathBuf {
    let extension = match path.extension() {
        Some(ext) => format!("{}.{}", ext.to_string_lossy(), suffix),
        None => suffix.to_string(),
    };
    path.with_extension(extension)
}

/// Save a project with atomic write semantics.
///
/// The JSON goes to a `.tmp` sidecar that is synced and then renamed over
/// `path`, so an interrupted save never leaves a truncated file behind.
pub fn save_project(project: &LoadProject, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(project).map_err(CalcError::serialization)?;
    let tmp_path = sidecar(path, "tmp");
    let tmp_err = |operation: &str, e: std::io::Error| {
        CalcError::file_error(operation, tmp_path.display().to_string(), e.to_string())
    };

    let mut tmp_file = File::create(&tmp_path).map_err(|e| tmp_err("create temp file", e))?;
    tmp_file.write_all(json.as_bytes()).map_err(|e| tmp_err("write temp file", e))?;
    tmp_file.sync_all().map_err(|e| tmp_err("sync temp file", e))?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    info!("saved {} loads to {}", project.loads.len(), path.display());
    Ok(())
}

/// Load a project from a file.
///
/// # Errors
///
/// * [`CalcError::FileError`] - the file could not be read
/// * [`CalcError::SerializationError`] - invalid JSON, or a load collection
///   that breaks its invariants (e.g. duplicate names)
/// * [`CalcError::VersionMismatch`] - the schema version is not supported
/// * [`CalcError::InvalidInput`] - the stored generation tolerance is unusable
pub fn load_project(path: &Path) -> CalcResult<LoadProject> {
    let contents = fs::read_to_string(path)
        .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;

    let project: LoadProject = serde_json::from_str(&contents)
        .map_err(|e| CalcError::serialization(format!("Invalid JSON in {}: {}", path.display(), e)))?;

    validate_version(&project.meta.version)?;
    project.settings.combinations.validate()?;
    debug!("loaded {} loads from {}", project.loads.len(), path.display());
    Ok(project)
}

/// Load a project together with the holder of any live lock on it
pub fn load_project_with_lock_check(path: &Path) -> CalcResult<(LoadProject, Option<LockInfo>)> {
    let project = load_project(path)?;
    Ok((project, FileLock::check(path)))
}

/// Major versions must match; within 0.x the file's minor may not be newer.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };
    let parse = |version: &str| -> Option<(u32, u32)> {
        let mut parts = version.split('.').map(|p| p.parse::<u32>().ok());
        Some((parts.next()??, parts.next().flatten().unwrap_or(0)))
    };

    let (file_major, file_minor) = parse(file_version).ok_or_else(mismatch)?;
    let (major, minor) = parse(SCHEMA_VERSION).ok_or_else(mismatch)?;

    if file_major != major || (major == 0 && file_minor > minor) {
        return Err(mismatch());
    }
    Ok(())
}
