//! Project file schema.

use std::path::{Path, PathBuf};

use cm_comfort::ComfortStandardParams;
use cm_map::{MapOptions, SiteContext};
use cm_results::SummaryMode;
use cm_series::{AnalysisPeriod, MergePolicy};
use serde::{Deserialize, Serialize};

fn default_parallel() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub version: u32,
    pub name: String,
    /// Input bundle (JSON), relative to the project file.
    pub inputs: PathBuf,
    #[serde(default)]
    pub standard: ComfortStandardParams,
    #[serde(default)]
    pub site: SiteContext,
    #[serde(default)]
    pub analysis_period: AnalysisPeriod,
    #[serde(default)]
    pub aggregation: AggregationDef,
    #[serde(default)]
    pub merge_policy: MergePolicy,
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AggregationDef {
    /// A zone is occupied at hours whose schedule exceeds this value.
    #[serde(default)]
    pub occupancy_threshold: f64,
    #[serde(default)]
    pub mode: SummaryMode,
    /// Run store location. Defaults to `.comfortmap/runs` next to the project.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

impl Project {
    pub fn new(name: impl Into<String>, inputs: impl Into<PathBuf>) -> Self {
        Self {
            version: crate::LATEST_VERSION,
            name: name.into(),
            inputs: inputs.into(),
            standard: ComfortStandardParams::default(),
            site: SiteContext::default(),
            analysis_period: AnalysisPeriod::whole_year(),
            aggregation: AggregationDef::default(),
            merge_policy: MergePolicy::default(),
            parallel: true,
        }
    }

    pub fn map_options(&self) -> MapOptions {
        MapOptions {
            period: self.analysis_period,
            site: self.site,
            merge_policy: self.merge_policy,
            parallel: self.parallel,
        }
    }

    /// Bundle path resolved against the directory of `project_path`.
    pub fn bundle_path(&self, project_path: &Path) -> PathBuf {
        resolve(project_path, &self.inputs)
    }

    pub fn output_dir(&self, project_path: &Path) -> Option<PathBuf> {
        self.aggregation
            .output_dir
            .as_deref()
            .map(|dir| resolve(project_path, dir))
    }
}

fn resolve(project_path: &Path, relative: &Path) -> PathBuf {
    if relative.is_absolute() {
        return relative.to_path_buf();
    }
    match project_path.parent() {
        Some(dir) => dir.join(relative),
        None => relative.to_path_buf(),
    }
}
