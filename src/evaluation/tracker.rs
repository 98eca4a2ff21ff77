//! File-backed experiment tracking
//!
//! Each run is written once to `<output_dir>/run_<run_id>.json` and never
//! overwritten: logging a run id that already has a file fails with
//! [`SwaliError::RunAlreadyLogged`]. Records keep per-case metrics only, not
//! retrieved documents, so comparisons never need the original corpus.

use std::fs::OpenOptions;
use std::io::BufWriter;
use std::io::ErrorKind;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use tracing::debug;
use tracing::info;
use tracing::warn;

use super::EvaluationRun;
use super::RunConfig;
use super::RunSummary;
use crate::errors::Result;
use crate::errors::SwaliError;

/// Per-case metrics as persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredResult {
    pub query: String,
    pub recall: f64,
    pub precision: f64,
    pub mrr: f64,
}

/// Persisted snapshot of an evaluation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRun {
    pub run_id: String,
    /// ISO-8601
    pub timestamp: String,
    pub config: RunConfig,
    /// `None` for a run without cases
    pub summary: Option<RunSummary>,
    #[serde(default)]
    pub notes: String,
    pub results: Vec<StoredResult>,
}

impl StoredRun {
    pub fn from_run(run: &EvaluationRun, notes: &str) -> Self {
        Self {
            run_id: run.run_id.clone(),
            timestamp: run.timestamp.to_rfc3339(),
            config: run.config.clone(),
            summary: run.summary(),
            notes: notes.to_string(),
            results: run
                .results
                .iter()
                .map(|r| StoredResult {
                    query: r.query.clone(),
                    recall: r.recall_at_k,
                    precision: r.precision_at_k,
                    mrr: r.mrr,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparedRun {
    pub run_id: String,
    pub summary: Option<RunSummary>,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunComparison {
    pub runs: Vec<ComparedRun>,
}

pub struct ExperimentTracker {
    output_dir: PathBuf,
}

fn write_record(path: &Path, stored: &StoredRun) -> Result<()> {
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, stored)?;
    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(())
}

impl ExperimentTracker {
    /// Open (and create if needed) the run directory
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn run_path(&self, run_id: &str) -> Result<PathBuf> {
        if run_id.is_empty()
            || run_id.contains(['/', '\\'])
            || run_id.starts_with('.')
        {
            return Err(SwaliError::InvalidInput(format!(
                "run id '{run_id}' cannot be used as a file name"
            )));
        }
        Ok(self.output_dir.join(format!("run_{run_id}.json")))
    }

    /// Persist a run; rejects ids that were already logged
    ///
    /// The record is written to a hidden sibling first and hard-linked into
    /// place, so `run_<id>.json` is either absent or complete.
    pub fn log_run(&self, run: &EvaluationRun, notes: &str) -> Result<PathBuf> {
        let path = self.run_path(&run.run_id)?;
        if path.exists() {
            return Err(SwaliError::RunAlreadyLogged(run.run_id.clone()));
        }
        let stored = StoredRun::from_run(run, notes);
        let staging = self.output_dir.join(format!(".run_{}.json.tmp", run.run_id));

        let written = write_record(&staging, &stored);
        let linked = written.and_then(|()| match std::fs::hard_link(&staging, &path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                Err(SwaliError::RunAlreadyLogged(run.run_id.clone()))
            }
            Err(e) => Err(e.into()),
        });
        if let Err(e) = std::fs::remove_file(&staging) {
            if e.kind() != ErrorKind::NotFound {
                warn!("Could not remove staging file {}: {}", staging.display(), e);
            }
        }
        linked?;

        info!("Logged run {} to {}", run.run_id, path.display());
        Ok(path)
    }

    /// Load a stored run, `None` if it was never logged
    pub fn load_run(&self, run_id: &str) -> Result<Option<StoredRun>> {
        let path = self.run_path(run_id)?;
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Summaries of the given runs in input order; unknown ids are skipped
    pub fn compare_runs<S: AsRef<str>>(&self, run_ids: &[S]) -> Result<RunComparison> {
        let mut runs = Vec::with_capacity(run_ids.len());

        for run_id in run_ids {
            match self.load_run(run_id.as_ref())? {
                Some(stored) => runs.push(ComparedRun {
                    run_id: stored.run_id,
                    summary: stored.summary,
                    notes: stored.notes,
                }),
                None => debug!("Run {} not logged, skipping", run_id.as_ref()),
            }
        }

        Ok(RunComparison { runs })
    }

    /// Ids of every logged run, sorted (time-derived ids sort chronologically)
    pub fn list_runs(&self) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        for entry in std::fs::read_dir(&self.output_dir)? {
            let name = entry?.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if let Some(id) = name
                .strip_prefix("run_")
                .and_then(|rest| rest.strip_suffix(".json"))
            {
                ids.push(id.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }
}
