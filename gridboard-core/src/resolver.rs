//! Monthly workbook discovery

use crate::error::{DashboardError, DashboardResult};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info};

/// Extensions recognized as spreadsheets when none are configured
pub const DEFAULT_EXTENSIONS: [&str; 3] = ["xls", "xlsx", "xlsm"];

/// The workbook selected for one calendar month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyFile {
    pub file_name: String,
    pub path: PathBuf,
    pub modified: SystemTime,
}

impl MonthlyFile {
    /// Stat a path into a `MonthlyFile`
    pub fn from_path(path: impl Into<PathBuf>) -> DashboardResult<Self> {
        let path = path.into();
        let modified = modified_time(&path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            file_name,
            path,
            modified,
        })
    }

    /// True when the file on disk no longer matches this snapshot
    pub fn is_stale(&self) -> bool {
        match modified_time(&self.path) {
            Ok(modified) => modified != self.modified,
            Err(_) => true,
        }
    }
}

pub(crate) fn modified_time(path: &Path) -> DashboardResult<SystemTime> {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|e| DashboardError::io(path, e))
}

/// Finds the newest workbook whose file name mentions a month
#[derive(Debug, Clone)]
pub struct FileResolver {
    dir: PathBuf,
    extensions: Vec<String>,
}

impl FileResolver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_extensions(dir, DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()))
    }

    pub fn with_extensions<I, S>(dir: impl Into<PathBuf>, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
            .collect();
        Self {
            dir: dir.into(),
            extensions,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolve the workbook for `month` (e.g. "June").
    ///
    /// Matching is a case-insensitive substring test on the file name.
    /// Among several matches the newest modification time wins; equal times
    /// fall back to the lexicographically greatest name so repeated calls
    /// agree.
    pub fn resolve(&self, month: &str) -> DashboardResult<MonthlyFile> {
        let needle = month.to_lowercase();
        let entries = fs::read_dir(&self.dir).map_err(|e| DashboardError::io(&self.dir, e))?;

        let mut best: Option<MonthlyFile> = None;
        for entry in entries {
            let entry = entry.map_err(|e| DashboardError::io(&self.dir, e))?;
            let file_name = entry.file_name().to_string_lossy().into_owned();

            if !file_name.to_lowercase().contains(&needle) || !self.has_spreadsheet_extension(&file_name) {
                continue;
            }

            // Follows symlinks
            let path = entry.path();
            let metadata = match fs::metadata(&path) {
                Ok(m) if m.is_file() => m,
                Ok(_) => continue,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    debug!(file = %file_name, "skipping dangling link");
                    continue;
                }
                Err(e) => return Err(DashboardError::io(path, e)),
            };
            let modified = metadata.modified().map_err(|e| DashboardError::io(&path, e))?;

            debug!(file = %file_name, "candidate workbook");

            let candidate = MonthlyFile {
                file_name,
                path,
                modified,
            };
            best = match best {
                Some(current) if !is_newer(&candidate, &current) => Some(current),
                _ => Some(candidate),
            };
        }

        match best {
            Some(file) => {
                info!(month, file = %file.file_name, "resolved workbook");
                Ok(file)
            }
            None => Err(DashboardError::NotFound {
                month: month.to_string(),
                dir: self.dir.clone(),
            }),
        }
    }

    fn has_spreadsheet_extension(&self, file_name: &str) -> bool {
        Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| {
                let e = e.to_ascii_lowercase();
                self.extensions.iter().any(|known| *known == e)
            })
            .unwrap_or(false)
    }
}

fn is_newer(candidate: &MonthlyFile, current: &MonthlyFile) -> bool {
    candidate
        .modified
        .cmp(&current.modified)
        .then_with(|| candidate.file_name.cmp(&current.file_name))
        .is_gt()
}
