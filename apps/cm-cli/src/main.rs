use clap::{Parser, Subcommand};
use cm_app::{
    AppError, AppResult, RunMode, RunOptions, RunProgressEvent, RunRequest, RunStage, check_project,
    ensure_run_with_progress, inspect_file,
};
use cm_map::CancelToken;
use cm_results::{MetricValue, SummaryMode};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cm-cli")]
#[command(about = "ComfortMap CLI - hourly indoor thermal comfort maps", long_about = None)]
struct Cli {
    /// Log stage timings
    #[arg(long, global = true)]
    timing: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the project file and every input series
    Validate {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
    },
    /// Map every hour of the analysis period and write the result matrices
    Map {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
        /// Map hours in parallel regardless of the project setting
        #[arg(long)]
        parallel: bool,
        /// Skip cache and force re-run
        #[arg(long)]
        no_cache: bool,
    },
    /// Map, then aggregate comfort over occupied hours
    Aggregate {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
        /// Report hour counts instead of percentages
        #[arg(long)]
        hours: bool,
        /// Skip cache and force re-run
        #[arg(long)]
        no_cache: bool,
    },
    /// Print the header and per-point summary of a result file
    Show {
        /// Matrix or summary CSV written by a run
        csv_path: PathBuf,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if cli.timing {
        cm_core::timing::enable_timing();
    }

    match cli.command {
        Commands::Validate { project_path } => cmd_validate(&project_path),
        Commands::Map {
            project_path,
            parallel,
            no_cache,
        } => {
            let options = RunOptions {
                use_cache: !no_cache,
                parallel: parallel.then_some(true),
                ..RunOptions::default()
            };
            cmd_run(&project_path, RunMode::Map, options)
        }
        Commands::Aggregate {
            project_path,
            hours,
            no_cache,
        } => {
            let options = RunOptions {
                use_cache: !no_cache,
                summary_mode: hours.then_some(SummaryMode::Hours),
                ..RunOptions::default()
            };
            cmd_run(&project_path, RunMode::Aggregate, options)
        }
        Commands::Show { csv_path } => cmd_show(&csv_path),
    }
}

fn cmd_validate(project_path: &Path) -> AppResult<()> {
    println!("Validating project: {}", project_path.display());
    let report = check_project(project_path)?;

    println!(
        "  {} standard, {} zones, {} points, {} hours",
        report.standard.prefix(),
        report.zones,
        report.points,
        report.hours
    );
    for d in &report.diagnostics {
        println!("  ✗ {d}");
    }
    for p in &report.problems {
        println!("  ✗ {p}");
    }

    if report.is_ok() {
        println!("✓ Project and inputs are valid");
        Ok(())
    } else {
        Err(AppError::InvalidInput(format!(
            "{} diagnostic(s), {} problem(s)",
            report.diagnostics.len(),
            report.problems.len()
        )))
    }
}

fn cmd_run(project_path: &Path, mode: RunMode, options: RunOptions) -> AppResult<()> {
    println!("Running {} for project: {}", mode.label(), project_path.display());

    let request = RunRequest {
        project_path,
        mode,
        options,
    };

    let last = Mutex::new((Instant::now(), None::<RunStage>));
    let sink = |event: RunProgressEvent| {
        let Ok(mut last) = last.lock() else {
            return;
        };
        let emit_now = last.1 != Some(event.stage) || last.0.elapsed().as_millis() >= 100;
        if emit_now {
            render_cli_progress(&event);
            *last = (Instant::now(), Some(event.stage));
        }
    };
    let response = ensure_run_with_progress(&request, Some(&sink), &CancelToken::new())?;
    clear_progress_line();

    if response.loaded_from_cache {
        println!("✓ Loaded from cache: {}", response.run_id);
    } else {
        println!("✓ Run completed: {}", response.run_id);
        println!(
            "  load={:.2}s  validate={:.2}s  map={:.2}s  aggregate={:.2}s  write={:.2}s",
            response.timing.load_s,
            response.timing.build_s,
            response.timing.hour_loop_s,
            response.timing.aggregate_s,
            response.timing.write_s
        );
    }

    let manifest = &response.manifest;
    println!("  Standard: {}", manifest.standard);
    println!("  Period: {}", manifest.analysis_period);
    println!("  Points: {}  Hours: {}", manifest.points, manifest.hours);
    println!("  Files: {}", manifest.files.len());
    for summary in &response.summaries {
        println!(
            "  {}: mean {}  ({} undefined)",
            summary.label,
            format_value(summary.mean()),
            summary.undefined_count()
        );
    }
    Ok(())
}

fn cmd_show(csv_path: &Path) -> AppResult<()> {
    let report = inspect_file(csv_path)?;
    println!("{}", report.header);
    if let Some(hours) = report.hours {
        println!("  Hours: {hours}");
    }
    let summary = &report.summary;
    println!("  Points: {}", summary.point_count());
    println!("  Mean: {}", format_value(summary.mean()));
    if summary.undefined_count() > 0 {
        println!("  Undefined: {}", summary.undefined_count());
    }
    for (p, value) in summary.values.iter().enumerate() {
        println!("  {p:>6}  {}", format_value(*value));
    }
    Ok(())
}

fn format_value(value: MetricValue) -> String {
    match value {
        MetricValue::Value(v) => format!("{v:.2}"),
        MetricValue::Undefined => "undefined".to_string(),
    }
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(120));
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &RunProgressEvent) {
    match (&event.stage, &event.hours) {
        (RunStage::Mapping, Some(h)) => {
            let width = 28usize;
            let fraction = h.fraction_complete();
            let filled = ((fraction * width as f64).round() as usize).min(width);
            print!(
                "\r[{}{}] {:>6.2}%  hours={}/{}  elapsed={:.1}s",
                "#".repeat(filled),
                "-".repeat(width.saturating_sub(filled)),
                fraction * 100.0,
                h.completed,
                h.total,
                event.elapsed_wall_s
            );
        }
        _ => {
            let spinner = ['|', '/', '-', '\\'];
            let spin_idx = ((event.elapsed_wall_s * 10.0) as usize) % spinner.len();
            let mut line = format!(
                "\r{} {}  elapsed={:.2}s",
                spinner[spin_idx],
                event.stage.label(),
                event.elapsed_wall_s
            );
            if let Some(msg) = &event.message {
                line.push_str(&format!("  {msg}"));
            }
            print!("{line:<120}");
        }
    }
    let _ = io::stdout().flush();
}
