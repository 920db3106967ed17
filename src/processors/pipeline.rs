use crate::archive::{ArchiveFetcher, ArchiveMemberResolver, NamingSchedule, StagingArea};
use crate::error::Result;
use crate::models::{ConsolidatedRecord, Period, ReferenceData, SeriesPoint, UpdateCursor};
use crate::processors::{
    Consolidation, RunReport, SeriesBuild, SeriesBuilder, WorldAggregator, YearRangeConsolidator,
};
use crate::settings::PipelineConfig;
use crate::utils::filename::snapshot_path;
use crate::utils::progress::ProgressReporter;
use crate::writers::{write_consolidated_table, SnapshotWriter};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub current_year: i32,
    pub dry_run: bool,
}

/// A snapshot produced for the cursor's next period.
#[derive(Debug, Clone, PartialEq)]
pub struct Publication {
    pub period: Period,
    pub snapshot_path: PathBuf,
    pub rows: usize,
    pub written: bool,
    pub next_cursor: UpdateCursor,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    /// No year in the window produced any row.
    NoData,
    /// Rows exist but none for the period after the cursor.
    NoNewPeriod { expected: Period },
    /// Every row was excluded by the series catalog.
    NoSeries,
    Published(Publication),
}

#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub outcome: PipelineOutcome,
    pub report: RunReport,
}

impl PipelineRun {
    /// Cursor to persist. Only a snapshot actually written advances it.
    pub fn cursor_to_commit(&self) -> Option<UpdateCursor> {
        match &self.outcome {
            PipelineOutcome::Published(publication) if publication.written => {
                Some(publication.next_cursor)
            }
            _ => None,
        }
    }
}

/// Composes the stages of one batch run. The update cursor is handed in by
/// the caller and the advanced cursor handed back; nothing here persists it.
pub struct Pipeline {
    config: PipelineConfig,
    reference: ReferenceData,
    consolidator: YearRangeConsolidator,
}

impl Pipeline {
    pub fn new(
        config: PipelineConfig,
        reference: ReferenceData,
        fetcher: Arc<dyn ArchiveFetcher>,
    ) -> Self {
        let resolver = ArchiveMemberResolver::new(NamingSchedule::from_config(&config));
        let consolidator =
            YearRangeConsolidator::new(fetcher, resolver, config.suppression_marker());
        Self {
            config,
            reference,
            consolidator,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Clear the staging area and consolidate the year window.
    pub async fn extract(
        &self,
        current_year: i32,
        progress: Option<&ProgressReporter>,
    ) -> Result<Consolidation> {
        let staging = StagingArea::prepare(&self.config.staging_dir)?;
        let years = self.config.year_window(current_year);
        info!(
            "Consolidating bulletins for {}..={}",
            years.first().copied().unwrap_or(current_year),
            current_year
        );
        self.consolidator
            .consolidate(&years, &self.reference, &staging, progress)
            .await
    }

    pub fn write_consolidated(&self, records: &[ConsolidatedRecord]) -> Result<PathBuf> {
        let path = self.config.consolidated_path();
        write_consolidated_table(&path, records)?;
        Ok(path)
    }

    pub async fn run(
        &self,
        cursor: &UpdateCursor,
        options: RunOptions,
        progress: Option<&ProgressReporter>,
    ) -> Result<PipelineRun> {
        let consolidation = self.extract(options.current_year, progress).await?;

        let mut report = RunReport {
            years: consolidation.years.clone(),
            consolidated_rows: consolidation.records.len(),
            ..RunReport::default()
        };

        if consolidation.is_empty() {
            info!("No bulletin rows in the year window; nothing to publish");
            return Ok(PipelineRun {
                outcome: PipelineOutcome::NoData,
                report,
            });
        }

        if !options.dry_run {
            self.write_consolidated(&consolidation.records)?;
        }

        let outcome = self.publish(&consolidation.records, cursor, options.dry_run, &mut report)?;
        Ok(PipelineRun { outcome, report })
    }

    /// Build the series for `records` and write the snapshot labelled with
    /// the cursor's next period.
    pub fn publish(
        &self,
        records: &[ConsolidatedRecord],
        cursor: &UpdateCursor,
        dry_run: bool,
        report: &mut RunReport,
    ) -> Result<PipelineOutcome> {
        if records.is_empty() {
            return Ok(PipelineOutcome::NoData);
        }

        let period = cursor.next_period();
        if self.config.require_new_period && !records.iter().any(|r| r.period() == period) {
            info!("No rows for {} yet; snapshot already current", period);
            return Ok(PipelineOutcome::NoNewPeriod { expected: period });
        }

        let build = self.build_country_series(records);
        report.missing_country = build.missing_country;
        report.outside_catalog = build.outside_catalog;

        if build.points.is_empty() {
            warn!("All {} consolidated rows fell outside the series catalog", records.len());
            return Ok(PipelineOutcome::NoSeries);
        }

        let country_points = build.points.len();
        let points = self.add_world_series(build.points);
        report.series_points = country_points;
        report.world_points = points.len() - country_points;

        let path = snapshot_path(&self.config.output_dir, &self.config.snapshot_prefix, period);
        if dry_run {
            info!("Dry run: would write {} rows to {}", points.len(), path.display());
        } else {
            SnapshotWriter::new().write(&path, &points)?;
        }

        Ok(PipelineOutcome::Published(Publication {
            period,
            snapshot_path: path,
            rows: points.len(),
            written: !dry_run,
            next_cursor: cursor.advanced(),
        }))
    }

    pub fn build_country_series(&self, records: &[ConsolidatedRecord]) -> SeriesBuild {
        SeriesBuilder::new(&self.reference.allowed_series, &self.config.namespace).build(records)
    }

    pub fn add_world_series(&self, points: Vec<SeriesPoint>) -> Vec<SeriesPoint> {
        WorldAggregator::new(&self.config.namespace, &self.config.world_marker).combine(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::StaticArchiveFetcher;
    use crate::models::{CommodityMapping, CountryLookupTable, Measure, SeriesAllowList};
    use tempfile::TempDir;

    fn reference() -> ReferenceData {
        ReferenceData::new(
            CommodityMapping::default(),
            CountryLookupTable::from_pairs([("X", "AR")]),
            SeriesAllowList::from_keys(["COS_AR"]),
        )
    }

    fn pipeline(temp_dir: &TempDir, require_new_period: bool) -> Pipeline {
        let config = PipelineConfig {
            staging_dir: temp_dir.path().join("raw"),
            processed_dir: temp_dir.path().join("processed"),
            output_dir: temp_dir.path().join("ipvs"),
            require_new_period,
            ..PipelineConfig::default()
        };
        Pipeline::new(config, reference(), Arc::new(StaticArchiveFetcher::new()))
    }

    fn record(month: u32, kgl: &str) -> ConsolidatedRecord {
        ConsolidatedRecord {
            year: 2024,
            month,
            ticker: "COS".to_string(),
            country_code: Some("AR".to_string()),
            net_weight: Measure::new(kgl),
            fob: Measure::new("1"),
        }
    }

    #[test]
    fn test_publish_requires_next_period() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let pipeline = pipeline(&temp_dir, true);
        let cursor = UpdateCursor::new(Period::new(2024, 3)?);

        let mut report = RunReport::default();
        let outcome = pipeline.publish(&[record(3, "1")], &cursor, false, &mut report)?;
        assert_eq!(
            outcome,
            PipelineOutcome::NoNewPeriod {
                expected: Period::new(2024, 4)?
            }
        );
        Ok(())
    }

    #[test]
    fn test_publish_writes_snapshot_for_next_period() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let pipeline = pipeline(&temp_dir, true);
        let cursor = UpdateCursor::new(Period::new(2024, 3)?);

        let mut report = RunReport::default();
        let outcome = pipeline.publish(
            &[record(3, "1"), record(4, "2,5")],
            &cursor,
            false,
            &mut report,
        )?;

        let publication = match outcome {
            PipelineOutcome::Published(publication) => publication,
            other => panic!("unexpected outcome: {:?}", other),
        };
        assert!(publication.written);
        assert!(publication
            .snapshot_path
            .ends_with("historical_indec_exp_2024_04.ipv"));
        assert_eq!(publication.rows, 4);
        assert_eq!(publication.next_cursor.last_updated(), Period::new(2024, 4)?);
        assert!(publication.snapshot_path.exists());
        assert_eq!(report.world_points, 2);
        Ok(())
    }

    #[test]
    fn test_dry_run_writes_nothing() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let pipeline = pipeline(&temp_dir, false);
        let cursor = UpdateCursor::new(Period::new(2024, 3)?);

        let mut report = RunReport::default();
        let outcome = pipeline.publish(&[record(3, "1")], &cursor, true, &mut report)?;
        let run = PipelineRun { outcome, report };

        assert!(run.cursor_to_commit().is_none());
        match run.outcome {
            PipelineOutcome::Published(publication) => assert!(!publication.snapshot_path.exists()),
            other => panic!("unexpected outcome: {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_rows_outside_catalog_publish_nothing() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let pipeline = pipeline(&temp_dir, false);
        let cursor = UpdateCursor::new(Period::new(2024, 3)?);

        let mut other = record(4, "1");
        other.country_code = Some("CL".to_string());

        let mut report = RunReport::default();
        let outcome = pipeline.publish(&[other], &cursor, false, &mut report)?;
        assert_eq!(outcome, PipelineOutcome::NoSeries);
        assert_eq!(report.outside_catalog, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_run_without_archives_is_no_data() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let pipeline = pipeline(&temp_dir, true);
        let cursor = UpdateCursor::new(Period::new(2024, 3)?);

        let run = pipeline
            .run(
                &cursor,
                RunOptions {
                    current_year: 2024,
                    dry_run: false,
                },
                None,
            )
            .await?;

        assert_eq!(run.outcome, PipelineOutcome::NoData);
        assert!(run.cursor_to_commit().is_none());
        assert!(!temp_dir.path().join("ipvs").exists());
        assert!(!pipeline.config().consolidated_path().exists());
        Ok(())
    }
}
