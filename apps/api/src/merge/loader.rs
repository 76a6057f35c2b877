//! Directory batch mode: discover per-résumé JSON files, merge them, write the master.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use regex::{Regex, RegexBuilder};
use thiserror::Error;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::merge::assembler::merge_all;
use crate::merge::config::MergeConfig;
use crate::models::resume::{MasterRecord, SourceRecord};

pub const MASTER_FILE_NAME: &str = "master_resume.json";

/// File names never read as inputs: earlier merge outputs.
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &[r"^master.*\.json$", r"^merged.*\.json$"];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid exclude pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        source: regex::Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("{} is not a JSON object", path.display())]
    NotAnObject { path: PathBuf },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Records that loaded, plus the per-file failures that were skipped.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub records: Vec<SourceRecord>,
    pub failures: Vec<LoadError>,
}

/// Finds and reads source records under a root directory, recursively.
pub struct RecordLoader {
    root: PathBuf,
    exclude: Vec<Regex>,
}

impl RecordLoader {
    /// Patterns match file names case-insensitively.
    pub fn new<S: AsRef<str>>(root: impl Into<PathBuf>, patterns: &[S]) -> Result<Self, LoadError> {
        let exclude = patterns
            .iter()
            .map(|p| {
                RegexBuilder::new(p.as_ref())
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| LoadError::Pattern {
                        pattern: p.as_ref().to_string(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            root: root.into(),
            exclude,
        })
    }

    pub fn is_excluded(&self, file_name: &str) -> bool {
        self.exclude.iter().any(|re| re.is_match(file_name))
    }

    /// Candidate `*.json` files, sorted by path.
    pub fn discover(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = WalkDir::new(&self.root)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "json"))
            .filter(|entry| !self.is_excluded(&entry.file_name().to_string_lossy()))
            .map(|entry| entry.into_path())
            .collect();
        paths.sort();
        paths
    }

    /// Loads every candidate. A file that cannot be used is logged and left out; it
    /// never stops the batch.
    pub fn load_all(&self) -> LoadReport {
        let mut report = LoadReport::default();
        for path in self.discover() {
            match load_record(&path) {
                Ok(record) => report.records.push(record),
                Err(e) => {
                    warn!("Skipping input: {e}");
                    report.failures.push(e);
                }
            }
        }
        report
    }
}

pub fn load_record(path: &Path) -> Result<SourceRecord, LoadError> {
    let raw = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let value: serde_json::Value =
        serde_json::from_str(&raw).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    SourceRecord::from_value(value).ok_or_else(|| LoadError::NotAnObject {
        path: path.to_path_buf(),
    })
}

/// Writes the master record as pretty-printed UTF-8 JSON. The file is staged in the
/// output directory and renamed into place, so readers never see a partial file.
pub fn write_master(master: &MasterRecord, output_dir: &Path) -> Result<PathBuf, LoadError> {
    let target = output_dir.join(MASTER_FILE_NAME);
    let write_err = |source: std::io::Error| LoadError::Write {
        path: target.clone(),
        source,
    };

    fs::create_dir_all(output_dir).map_err(write_err)?;
    let staged = tempfile::NamedTempFile::new_in(output_dir).map_err(write_err)?;
    {
        let mut writer = BufWriter::new(staged.as_file());
        serde_json::to_writer_pretty(&mut writer, master)
            .map_err(|e| write_err(std::io::Error::other(e)))?;
        writer.write_all(b"\n").map_err(write_err)?;
        writer.flush().map_err(write_err)?;
    }
    staged.persist(&target).map_err(|e| write_err(e.error))?;
    Ok(target)
}

/// Merges every record under `input_dir` into `output_dir/master_resume.json`.
/// Returns `None` when nothing could be loaded; no file is written then.
pub fn run_batch<S: AsRef<str>>(
    input_dir: &Path,
    output_dir: &Path,
    exclude_patterns: &[S],
    config: &MergeConfig,
) -> Result<Option<PathBuf>, LoadError> {
    let loader = RecordLoader::new(input_dir, exclude_patterns)?;
    let report = loader.load_all();
    info!(
        "Loaded {} record(s) from {} ({} skipped)",
        report.records.len(),
        input_dir.display(),
        report.failures.len()
    );

    if report.records.is_empty() {
        warn!("No JSON resumes found in {}", input_dir.display());
        return Ok(None);
    }

    let master = merge_all(&report.records, config);
    let path = write_master(&master, output_dir)?;
    info!("Master resume written to {}", path.display());
    Ok(Some(path))
}
