//! Project loading and pre-run checks.

use std::path::Path;

use cm_comfort::StandardKind;
use cm_map::{MapError, RunContext};
use cm_project::{InputBundle, Project, ProjectError};
use cm_series::Diagnostic;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};

pub fn load_project(path: &Path) -> AppResult<Project> {
    let project = cm_project::load_project(path)?;
    info!(name = %project.name, path = %path.display(), "Loaded project");
    Ok(project)
}

/// Input bundle named by `project`, resolved next to `project_path`.
pub fn load_inputs(project_path: &Path, project: &Project) -> AppResult<InputBundle> {
    let path = project.bundle_path(project_path);
    cm_project::load_bundle(&path).map_err(|e| AppError::BundleRead {
        path,
        message: e.to_string(),
    })
}

/// Outcome of checking a project and its inputs without mapping.
#[derive(Debug, Clone)]
pub struct CheckReport {
    pub project_name: String,
    pub standard: StandardKind,
    pub zones: usize,
    pub points: usize,
    pub hours: usize,
    /// Series validation findings, all of them.
    pub diagnostics: Vec<Diagnostic>,
    /// Matching and geometry problems.
    pub problems: Vec<String>,
}

impl CheckReport {
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty() && self.problems.is_empty()
    }
}

/// Load and check everything a run needs. Configuration errors fail; input
/// problems are collected into the report.
pub fn check_project(project_path: &Path) -> AppResult<CheckReport> {
    let project = load_project(project_path)?;
    let bundle = load_inputs(project_path, &project)?;

    let mut report = CheckReport {
        project_name: project.name.clone(),
        standard: project.standard.kind(),
        zones: bundle.zones.len(),
        points: 0,
        hours: 0,
        diagnostics: Vec::new(),
        problems: Vec::new(),
    };

    let model = match bundle.model() {
        Ok(model) => model,
        Err(e) => {
            report.problems.push(e.to_string());
            return Ok(report);
        }
    };
    report.points = model.point_count();

    match RunContext::build(
        model.clone(),
        &bundle.series,
        &project.standard,
        &project.map_options(),
    ) {
        Ok(ctx) => report.hours = ctx.hour_count(),
        Err(MapError::Validation { diagnostics }) => report.diagnostics.extend(diagnostics),
        Err(e) => report.problems.push(e.to_string()),
    }

    match bundle.schedules(&model, &project.analysis_period) {
        Ok(_) => {}
        Err(ProjectError::InvalidSeries { diagnostics, .. }) => {
            report.diagnostics.extend(diagnostics)
        }
        Err(e) => report.problems.push(e.to_string()),
    }

    if !report.is_ok() {
        warn!(
            diagnostics = report.diagnostics.len(),
            problems = report.problems.len(),
            "Project inputs have problems"
        );
    }
    Ok(report)
}
