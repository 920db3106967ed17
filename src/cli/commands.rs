use crate::archive::{
    ArchiveFetcher, DirectoryArchiveFetcher, HttpArchiveFetcher, StaticArchiveFetcher,
};
use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::logging;
use crate::processors::{Pipeline, PipelineOutcome, PipelineRun, RunOptions, RunReport};
use crate::readers::{load_reference_data, read_consolidated_table};
use crate::settings::PipelineConfig;
use crate::utils::filename::snapshot_path;
use crate::utils::progress::ProgressReporter;
use crate::writers::CursorStore;
use chrono::{Datelike, Local};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

pub async fn run(cli: Cli) -> Result<()> {
    logging::init(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    let config = PipelineConfig::load(cli.config.as_deref())?;
    debug!("Loaded settings: {:?}", config);

    match cli.command {
        Commands::Run {
            year,
            archive_dir,
            dry_run,
        } => {
            let store = CursorStore::new(&config.cursor_path);
            let cursor = store.load()?;
            info!("Last published period: {}", cursor.last_updated());

            let reference = load_reference_data(&config)?;
            let fetcher = build_fetcher(&config, archive_dir)?;
            let current_year = year.unwrap_or_else(|| Local::now().year());

            let pipeline = Pipeline::new(config, reference, fetcher);
            let progress = ProgressReporter::new(0, "Fetching archives...", cli.quiet);

            let run = pipeline
                .run(
                    &cursor,
                    RunOptions {
                        current_year,
                        dry_run,
                    },
                    Some(&progress),
                )
                .await?;
            progress.finish_with_message("Consolidation complete");

            finish(&store, &run)?;
        }

        Commands::Extract { year, archive_dir } => {
            let reference = load_reference_data(&config)?;
            let fetcher = build_fetcher(&config, archive_dir)?;
            let current_year = year.unwrap_or_else(|| Local::now().year());

            let pipeline = Pipeline::new(config, reference, fetcher);
            let progress = ProgressReporter::new(0, "Fetching archives...", cli.quiet);

            let consolidation = pipeline.extract(current_year, Some(&progress)).await?;
            progress.finish_with_message("Consolidation complete");

            let report = RunReport {
                consolidated_rows: consolidation.records.len(),
                years: consolidation.years,
                ..RunReport::default()
            };
            println!("\n{}", report.summary());

            if consolidation.records.is_empty() {
                println!("No bulletin rows in the year window; nothing written");
            } else {
                let path = pipeline.write_consolidated(&consolidation.records)?;
                println!(
                    "Wrote {} rows to {}",
                    consolidation.records.len(),
                    path.display()
                );
            }
        }

        Commands::Generate { input, dry_run } => {
            let store = CursorStore::new(&config.cursor_path);
            let cursor = store.load()?;
            info!("Last published period: {}", cursor.last_updated());

            let reference = load_reference_data(&config)?;
            let input = input.unwrap_or_else(|| config.consolidated_path());
            let spinner = ProgressReporter::new_spinner("Reading consolidated table...", cli.quiet);
            let records = read_consolidated_table(&input)?;
            spinner.finish_with_message(&format!("Read {} consolidated rows", records.len()));
            info!("Read {} consolidated rows from {}", records.len(), input.display());

            // Nothing is fetched when publishing from an existing table.
            let pipeline = Pipeline::new(config, reference, Arc::new(StaticArchiveFetcher::new()));

            let mut report = RunReport {
                consolidated_rows: records.len(),
                ..RunReport::default()
            };
            let outcome = pipeline.publish(&records, &cursor, dry_run, &mut report)?;

            finish(&store, &PipelineRun { outcome, report })?;
        }

        Commands::Status => {
            let store = CursorStore::new(&config.cursor_path);
            let cursor = store.load()?;
            let next = cursor.next_period();
            let path = snapshot_path(&config.output_dir, &config.snapshot_prefix, next);

            println!("Cursor file: {}", store.path().display());
            println!("Last published period: {}", cursor.last_updated());
            println!("Next period: {}", next);
            println!(
                "Next snapshot: {} ({})",
                path.display(),
                if path.exists() { "exists" } else { "pending" }
            );
        }
    }

    Ok(())
}

fn build_fetcher(
    config: &PipelineConfig,
    archive_dir: Option<PathBuf>,
) -> Result<Arc<dyn ArchiveFetcher>> {
    Ok(match archive_dir {
        Some(dir) => {
            info!("Reading archives from {}", dir.display());
            Arc::new(DirectoryArchiveFetcher::new(dir))
        }
        None => Arc::new(HttpArchiveFetcher::new(
            config.source_url_template.clone(),
            config.request_timeout(),
        )?),
    })
}

/// Print the report and commit the cursor when a snapshot was written.
fn finish(store: &CursorStore, run: &PipelineRun) -> Result<()> {
    println!("\n{}", run.report.summary());

    match &run.outcome {
        PipelineOutcome::NoData => println!("No bulletin rows in the year window; nothing published"),
        PipelineOutcome::NoNewPeriod { expected } => {
            println!("No rows for {} yet; snapshot already current", expected)
        }
        PipelineOutcome::NoSeries => {
            println!("No consolidated row belongs to a published series; nothing published")
        }
        PipelineOutcome::Published(publication) if publication.written => println!(
            "Wrote {} rows for {} to {}",
            publication.rows,
            publication.period,
            publication.snapshot_path.display()
        ),
        PipelineOutcome::Published(publication) => println!(
            "Dry run: {} rows for {} not written",
            publication.rows, publication.period
        ),
    }

    if let Some(next) = run.cursor_to_commit() {
        store.commit(&next)?;
        info!("Update cursor advanced to {}", next.last_updated());
    }

    Ok(())
}
