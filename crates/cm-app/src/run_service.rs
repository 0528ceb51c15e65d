//! Run execution and caching service.

use std::path::Path;
use std::time::Instant;

use cm_core::timing::StageTimes;
use cm_map::{CancelToken, MapProgress, ProgressFn, RunContext, run_map};
use cm_results::{
    AggregationInputs, ResultMatrix, ResultStore, RunManifest, Summary, SummaryMode,
    TemporalAggregator, compute_run_id, digest_bytes,
};
use tracing::{debug, info};

use crate::error::AppResult;
use crate::progress::{HourProgress, ProgressSink, RunProgressEvent, RunStage};
use crate::project_service;

/// What a run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Per-hour matrices only.
    Map,
    /// Per-hour matrices plus the temporal indicators and their summaries.
    Aggregate,
}

impl RunMode {
    pub fn label(&self) -> &'static str {
        match self {
            RunMode::Map => "map",
            RunMode::Aggregate => "aggregate",
        }
    }
}

/// Options for executing runs.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub use_cache: bool,
    pub version: String,
    /// Overrides the project's `parallel` flag.
    pub parallel: Option<bool>,
    /// Overrides the project's summary mode.
    pub summary_mode: Option<SummaryMode>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            version: env!("CARGO_PKG_VERSION").to_string(),
            parallel: None,
            summary_mode: None,
        }
    }
}

/// Request to execute a run.
pub struct RunRequest<'a> {
    pub project_path: &'a Path,
    pub mode: RunMode,
    pub options: RunOptions,
}

/// Response from a run execution.
#[derive(Debug, Clone)]
pub struct RunResponse {
    pub run_id: String,
    pub manifest: RunManifest,
    pub loaded_from_cache: bool,
    /// Summaries written with the run, empty when loaded from cache.
    pub summaries: Vec<Summary>,
    pub timing: StageTimes,
}

fn emit_progress(
    progress: Option<ProgressSink<'_>>,
    mode: RunMode,
    stage: RunStage,
    started: Instant,
    message: &str,
) {
    if let Some(cb) = progress {
        cb(RunProgressEvent::stage(
            mode,
            stage,
            started.elapsed().as_secs_f64(),
            Some(message.to_string()),
        ));
    }
}

/// Execute or load a run based on request.
pub fn ensure_run(request: &RunRequest) -> AppResult<RunResponse> {
    ensure_run_with_progress(request, None, &CancelToken::new())
}

/// Execute or load a run, streaming progress events. Cancelling `cancel`
/// aborts the hour loop and nothing is written.
pub fn ensure_run_with_progress(
    request: &RunRequest,
    progress: Option<ProgressSink<'_>>,
    cancel: &CancelToken,
) -> AppResult<RunResponse> {
    let started = Instant::now();
    let mode = request.mode;
    let mut timing = StageTimes::default();

    emit_progress(progress, mode, RunStage::LoadingProject, started, "Loading project");
    let mut project = project_service::load_project(request.project_path)?;
    let bundle_path = project.bundle_path(request.project_path);
    let bundle_bytes = std::fs::read(&bundle_path)?;
    let bundle = project_service::load_inputs(request.project_path, &project)?;
    timing.load_s = started.elapsed().as_secs_f64();

    // The summary mode shapes the saved files, so it is part of the run id.
    if let Some(summary_mode) = request.options.summary_mode {
        project.aggregation.mode = summary_mode;
    }
    let summary_mode = project.aggregation.mode;

    emit_progress(progress, mode, RunStage::CheckingCache, started, "Checking run cache");
    let run_id = compute_run_id(
        &(&project, mode.label()),
        &digest_bytes(&bundle_bytes),
        &request.options.version,
    );
    let store = match project.output_dir(request.project_path) {
        Some(dir) => ResultStore::new(dir)?,
        None => ResultStore::for_project(request.project_path)?,
    };

    if request.options.use_cache && store.has_run(&run_id) {
        emit_progress(
            progress,
            mode,
            RunStage::LoadingCachedResult,
            started,
            "Loading cached run",
        );
        let manifest = store.load_manifest(&run_id)?;
        info!(run_id = %run_id, "Loaded cached run");
        emit_progress(progress, mode, RunStage::Completed, started, "Run loaded from cache");
        return Ok(RunResponse {
            run_id,
            manifest,
            loaded_from_cache: true,
            summaries: Vec::new(),
            timing,
        });
    }

    if let Some(parallel) = request.options.parallel {
        project.parallel = parallel;
    }

    emit_progress(progress, mode, RunStage::BuildingContext, started, "Validating inputs");
    let stage = Instant::now();
    let ctx = RunContext::build(
        bundle.model()?,
        &bundle.series,
        &project.standard,
        &project.map_options(),
    )?;
    timing.build_s = stage.elapsed().as_secs_f64();
    debug!(context = ?ctx, "Run context ready");

    emit_progress(progress, mode, RunStage::Mapping, started, "Mapping hours");
    let stage = Instant::now();
    let forward = |p: MapProgress| {
        if let Some(cb) = progress {
            cb(RunProgressEvent {
                mode,
                stage: RunStage::Mapping,
                elapsed_wall_s: started.elapsed().as_secs_f64(),
                message: None,
                hours: Some(HourProgress {
                    completed: p.completed,
                    total: p.total,
                    hoy: p.hoy,
                }),
            });
        }
    };
    let forward: ProgressFn<'_> = &forward;
    let output = run_map(&ctx, cancel, Some(forward))?;
    timing.hour_loop_s = stage.elapsed().as_secs_f64();
    timing.hours = output.hours.len();

    let mut matrices: Vec<ResultMatrix> = output.matrices();
    let comfort = output.comfort_matrix();
    let mut summaries = vec![comfort.summarize(summary_mode)?];

    if mode == RunMode::Aggregate {
        emit_progress(progress, mode, RunStage::Aggregating, started, "Aggregating");
        let stage = Instant::now();
        let schedules = bundle.schedules(&ctx.model, &ctx.period)?;
        let degrees = output.degrees_matrix();
        let mut aggregator = TemporalAggregator::new(project.aggregation.occupancy_threshold);
        if !project.parallel {
            aggregator = aggregator.sequential();
        }
        let aggregate = aggregator.aggregate(&AggregationInputs {
            comfort: &comfort,
            degrees: &degrees,
            point_zones: &output.point_zones,
            occupancy: &schedules.occupancy,
            conditioning: &schedules.conditioning,
            outdoor_zone: output.outdoor_zone,
        })?;
        summaries.extend(aggregate.summaries(summary_mode)?);
        matrices.extend(aggregate.matrices);
        timing.aggregate_s = stage.elapsed().as_secs_f64();
    }

    emit_progress(progress, mode, RunStage::SavingResults, started, "Saving results");
    let stage = Instant::now();
    let manifest = RunManifest {
        run_id: run_id.clone(),
        project_name: project.name.clone(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        standard: ctx.standard.kind().prefix().to_string(),
        analysis_period: ctx.period.to_string(),
        points: ctx.model.point_count(),
        hours: ctx.hour_count(),
        files: Vec::new(),
        version: request.options.version.clone(),
    };
    let manifest = store.save_run(&manifest, &matrices, &summaries)?;
    timing.write_s = stage.elapsed().as_secs_f64();
    timing.log_summary();

    info!(
        run_id = %run_id,
        files = manifest.files.len(),
        elapsed_s = started.elapsed().as_secs_f64(),
        "Run complete"
    );
    emit_progress(progress, mode, RunStage::Completed, started, "Run complete");

    Ok(RunResponse {
        run_id,
        manifest,
        loaded_from_cache: false,
        summaries,
        timing,
    })
}

/// Runs stored for the project, oldest first.
pub fn list_runs(project_path: &Path) -> AppResult<Vec<RunManifest>> {
    let project = project_service::load_project(project_path)?;
    let store = match project.output_dir(project_path) {
        Some(dir) => ResultStore::new(dir)?,
        None => ResultStore::for_project(project_path)?,
    };
    Ok(store.list_runs(&project.name)?)
}
