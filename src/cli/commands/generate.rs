//! Generate command - one-shot generation, optionally followed by watch mode.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Settings;
use crate::watcher::{RouteWatcher, shutdown_signal};

/// Arguments for the generate command.
pub struct GenerateArgs {
    pub watch: bool,
    pub app_dir: Option<PathBuf>,
}

/// Run the generate command.
///
/// Watch mode is entered with `--watch` or when the settings are in dev mode.
pub async fn run(args: GenerateArgs, settings: Settings) -> anyhow::Result<()> {
    let watch = args.watch || settings.dev_mode;
    let watch_config = settings.watch.clone();

    let pipeline = Arc::new(super::pipeline_for(settings, args.app_dir)?.with_default_emitters());

    let report = pipeline.generate().await?;
    println!(
        "Generated {} routes in {:.2?}",
        report.route_count, report.elapsed
    );
    for artifact in &report.artifacts {
        println!("  wrote {}", artifact.display());
    }

    if !watch {
        return Ok(());
    }

    let watcher = RouteWatcher::builder()
        .pipeline(pipeline)
        .config(&watch_config)
        .build()?;
    println!(
        "Watching {} for added or removed pages (ctrl-c to stop)",
        watcher.root().display()
    );

    let summary = watcher.watch(shutdown_signal()).await?;
    println!(
        "Stopped after {} regenerations ({} failed)",
        summary.runs, summary.failures
    );
    Ok(())
}
