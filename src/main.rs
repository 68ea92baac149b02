use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use route_rerun::{
    driver, install, Layout, LogReader, RerunSessionFactory, SegmentStats, ServiceRegistry,
    Settings,
};

#[derive(Parser, Debug)]
#[command(name = "route-rerun")]
#[command(about = "A helper to run rerun on openpilot routes")]
struct Args {
    /// Use the demo route instead of providing one
    #[arg(long)]
    demo: bool,

    /// Install or update rerun
    #[arg(long)]
    install: bool,

    /// Settings file (defaults to ./route-rerun.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of segments processed in parallel (defaults to the core count)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// The route or segment name to plot
    #[arg(required_unless_present_any = ["demo", "install"])]
    route_or_segment_name: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    if std::env::args_os().len() == 1 {
        Args::command().print_help()?;
        return Ok(());
    }

    let args = Args::parse();
    let mut settings = Settings::load(args.config.as_deref()).context("loading settings")?;
    if let Some(jobs) = args.jobs {
        settings.workers = Some(jobs);
    }

    if args.install {
        install::install(&settings.install_command)?;
        println!("Rerun installed");
        return Ok(());
    }

    install::ensure_viewer()?;

    let name = if args.demo {
        settings.demo_route.clone()
    } else {
        // Required by clap unless --demo or --install is given
        args.route_or_segment_name.unwrap_or_default().trim().to_string()
    };

    run(&name, &settings)
}

/// Stream every selected segment of `name` into the viewer
fn run(name: &str, settings: &Settings) -> Result<()> {
    let registry = ServiceRegistry::load(settings.services_file.as_deref())?;
    let layout = Layout::build(&registry);
    tracing::debug!(topics = registry.len(), layout = ?layout, "built layout");

    println!("Getting route log paths");
    let reader = LogReader::open(name, &settings.data_dir)
        .with_context(|| format!("opening route {}", name))?;

    let factory = RerunSessionFactory::new(
        settings.app_id.as_str(),
        reader.route().canonical_name(),
        settings.timeline.as_str(),
    );
    let stats = driver::run_across_segments(
        &factory,
        &layout,
        reader.segments(),
        settings.worker_count(),
    )?;

    report(&stats);
    Ok(())
}

/// Log a per-segment summary and the totals
fn report(stats: &[SegmentStats]) {
    for s in stats {
        tracing::info!(
            segment = %s.segment,
            messages = s.messages,
            scalars = s.scalars,
            images = s.images,
            "streamed segment"
        );
    }

    let messages: u64 = stats.iter().map(|s| s.messages).sum();
    let scalars: u64 = stats.iter().map(|s| s.scalars).sum();
    let images: u64 = stats.iter().map(|s| s.images).sum();
    tracing::info!(
        segments = stats.len(),
        messages,
        scalars,
        images,
        "route streamed"
    );
}
