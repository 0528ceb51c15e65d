//! Run storage API.
//!
//! A run directory holds `manifest.json` and one CSV per matrix or summary.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::csv;
use crate::matrix::{ResultMatrix, Summary};
use crate::types::RunManifest;
use crate::{ResultsError, ResultsResult};

#[derive(Clone)]
pub struct ResultStore {
    root_dir: PathBuf,
}

impl ResultStore {
    pub fn new(root_dir: PathBuf) -> ResultsResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    pub fn for_project(project_path: &Path) -> ResultsResult<Self> {
        let project_dir = project_path
            .parent()
            .ok_or_else(|| ResultsError::InvalidPath {
                message: "project path has no parent directory".to_string(),
            })?;
        let runs_dir = project_dir.join(".comfortmap").join("runs");
        Self::new(runs_dir)
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn run_dir(&self, run_id: &str) -> PathBuf {
        self.root_dir.join(run_id)
    }

    pub fn has_run(&self, run_id: &str) -> bool {
        self.run_dir(run_id).join("manifest.json").exists()
    }

    /// Write every matrix and summary, then the manifest listing them.
    pub fn save_run(
        &self,
        manifest: &RunManifest,
        matrices: &[ResultMatrix],
        summaries: &[Summary],
    ) -> ResultsResult<RunManifest> {
        let run_dir = self.run_dir(&manifest.run_id);
        fs::create_dir_all(&run_dir)?;

        let mut manifest = manifest.clone();
        manifest.files.clear();

        for matrix in matrices {
            let name = csv::file_name(&matrix.label);
            csv::write_matrix(&run_dir.join(&name), matrix)?;
            manifest.files.push(name);
        }
        for summary in summaries {
            let name = format!("summary_{}", csv::file_name(&summary.label));
            csv::write_summary(&run_dir.join(&name), summary)?;
            manifest.files.push(name);
        }

        let manifest_path = run_dir.join("manifest.json");
        let manifest_json = serde_json::to_string_pretty(&manifest)?;
        fs::write(manifest_path, manifest_json)?;

        debug!(run_id = %manifest.run_id, files = manifest.files.len(), "Saved run");
        Ok(manifest)
    }

    pub fn load_manifest(&self, run_id: &str) -> ResultsResult<RunManifest> {
        let manifest_path = self.run_dir(run_id).join("manifest.json");

        if !manifest_path.exists() {
            return Err(ResultsError::RunNotFound {
                run_id: run_id.to_string(),
            });
        }

        let content = fs::read_to_string(manifest_path)?;
        let manifest = serde_json::from_str(&content)?;
        Ok(manifest)
    }

    /// Read back a matrix written by [`ResultStore::save_run`].
    pub fn load_matrix(&self, run_id: &str, label: &str) -> ResultsResult<ResultMatrix> {
        let path = self.run_dir(run_id).join(csv::file_name(label));
        if !path.exists() {
            return Err(ResultsError::RunNotFound {
                run_id: run_id.to_string(),
            });
        }
        csv::read_matrix(&path, is_aggregate_label(label))
    }

    pub fn load_summary(&self, run_id: &str, label: &str) -> ResultsResult<Summary> {
        let path = self
            .run_dir(run_id)
            .join(format!("summary_{}", csv::file_name(label)));
        if !path.exists() {
            return Err(ResultsError::RunNotFound {
                run_id: run_id.to_string(),
            });
        }
        csv::read_summary(&path)
    }

    pub fn list_runs(&self, project_name: &str) -> ResultsResult<Vec<RunManifest>> {
        let mut runs = Vec::new();

        if !self.root_dir.exists() {
            return Ok(runs);
        }

        for entry in fs::read_dir(&self.root_dir)? {
            let entry = entry?;
            if entry.path().is_dir() {
                let run_id = entry.file_name().to_string_lossy().to_string();
                match self.load_manifest(&run_id) {
                    Ok(manifest) if manifest.project_name == project_name => runs.push(manifest),
                    _ => {}
                }
            }
        }

        runs.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(runs)
    }

    pub fn delete_run(&self, run_id: &str) -> ResultsResult<()> {
        let run_dir = self.run_dir(run_id);
        if run_dir.exists() {
            fs::remove_dir_all(run_dir)?;
        }
        Ok(())
    }
}

/// True for occupancy-normalized indicator matrices, which carry the
/// occupied-hours row.
pub fn is_aggregate_label(label: &str) -> bool {
    ["Occupied Thermal Comfort", "Thermal Autonomy", "Over-Heated", "Under-Heated"]
        .iter()
        .any(|k| label.contains(k))
}
