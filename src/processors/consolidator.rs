use crate::archive::{ArchiveFetcher, ArchiveMemberResolver, StagingArea};
use crate::error::{ProcessingError, Result};
use crate::models::{ConsolidatedRecord, ReferenceData};
use crate::processors::report::{YearStatus, YearSummary};
use crate::processors::{CommodityFilter, CountryJoiner};
use crate::readers::BulletinReader;
use crate::utils::progress::ProgressReporter;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Consolidated rows of the whole year window, ascending by year and then
/// by source row order.
#[derive(Debug, Clone, Default)]
pub struct Consolidation {
    pub records: Vec<ConsolidatedRecord>,
    pub years: Vec<YearSummary>,
}

impl Consolidation {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

pub struct YearRangeConsolidator {
    fetcher: Arc<dyn ArchiveFetcher>,
    resolver: ArchiveMemberResolver,
    reader: BulletinReader,
    suppression_marker: char,
}

impl YearRangeConsolidator {
    pub fn new(
        fetcher: Arc<dyn ArchiveFetcher>,
        resolver: ArchiveMemberResolver,
        suppression_marker: char,
    ) -> Self {
        Self {
            fetcher,
            resolver,
            reader: BulletinReader::new(),
            suppression_marker,
        }
    }

    /// Fetch every year concurrently, then extract and normalize them in
    /// ascending order. Per-year problems are logged and skipped.
    pub async fn consolidate(
        &self,
        years: &[i32],
        reference: &ReferenceData,
        staging: &StagingArea,
        progress: Option<&ProgressReporter>,
    ) -> Result<Consolidation> {
        let mut fetched = self.fetch_all(years).await?;
        let mut consolidation = Consolidation::default();
        let latest_year = years.iter().copied().max();

        if let Some(p) = progress {
            p.set_length(years.len() as u64);
        }

        let mut ordered: Vec<i32> = years.to_vec();
        ordered.sort_unstable();
        ordered.dedup();

        for year in ordered {
            if let Some(p) = progress {
                p.set_message(&format!("Processing {}", year));
            }

            let outcome = fetched
                .remove(&year)
                .unwrap_or_else(|| Err(ProcessingError::MissingData(format!("fetch for {}", year))));
            let (records, summary) = self.process_year(year, outcome, reference, staging);

            if let YearStatus::Failed(reason) = &summary.status {
                warn!("Skipping {}: {}", year, reason);
            } else if matches!(summary.status, YearStatus::Loaded { .. })
                && !summary.contributed()
                && Some(year) != latest_year
            {
                warn!(
                    "{} had a bulletin member but produced no rows ({} read, {} rejected)",
                    year, summary.rows_read, summary.rows_rejected
                );
            }

            consolidation.records.extend(records);
            consolidation.years.push(summary);

            if let Some(p) = progress {
                p.increment(1);
            }
        }

        info!(
            "Consolidated {} rows from {} years",
            consolidation.records.len(),
            consolidation.years.iter().filter(|y| y.contributed()).count()
        );

        Ok(consolidation)
    }

    async fn fetch_all(&self, years: &[i32]) -> Result<BTreeMap<i32, Result<Option<Vec<u8>>>>> {
        let mut join_set = JoinSet::new();

        for &year in years {
            let fetcher = Arc::clone(&self.fetcher);
            join_set.spawn(async move { (year, fetcher.fetch(year).await) });
        }

        let mut fetched = BTreeMap::new();
        while let Some(result) = join_set.join_next().await {
            let (year, outcome) = result.map_err(ProcessingError::TaskJoin)?;
            fetched.insert(year, outcome);
        }

        Ok(fetched)
    }

    fn process_year(
        &self,
        year: i32,
        fetched: Result<Option<Vec<u8>>>,
        reference: &ReferenceData,
        staging: &StagingArea,
    ) -> (Vec<ConsolidatedRecord>, YearSummary) {
        let bytes = match fetched {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                info!("No archive available for {}", year);
                return (Vec::new(), YearSummary::new(year, YearStatus::NotPublished));
            }
            Err(e) => {
                let reason = format!("fetch from {} failed: {}", self.fetcher.describe(year), e);
                return (Vec::new(), YearSummary::new(year, YearStatus::Failed(reason)));
            }
        };

        let member = match self.resolver.resolve(year, &bytes, staging) {
            Ok(Some(member)) => member,
            Ok(None) => {
                info!("No bulletin member for {} in archive", year);
                return (
                    Vec::new(),
                    YearSummary::new(year, YearStatus::NoMatchingMember),
                );
            }
            Err(e) => {
                let reason = format!("unreadable archive: {}", e);
                return (Vec::new(), YearSummary::new(year, YearStatus::Failed(reason)));
            }
        };

        let table = match self.reader.read(&member.path) {
            Ok(table) => table,
            Err(e) => {
                let reason = format!("cannot parse {}: {}", member.member_name, e);
                return (Vec::new(), YearSummary::new(year, YearStatus::Failed(reason)));
            }
        };

        let mut summary = YearSummary::new(
            year,
            YearStatus::Loaded {
                member: member.member_name.clone(),
            },
        );
        summary.rows_read = table.rows_read;
        summary.rows_rejected = table.rejected;

        let filter = CommodityFilter::new(&reference.commodities, self.suppression_marker);
        let (mapped, stats) = filter.apply(table.records);
        summary.unknown_commodity = stats.unknown_commodity;
        summary.suppressed = stats.suppressed;

        let joiner = CountryJoiner::new(&reference.countries);
        let (records, unmatched) = joiner.join(mapped);
        summary.unmatched_country = unmatched;
        summary.rows_kept = records.len();

        info!(
            "{}: {} rows kept from {} ({} read)",
            year, summary.rows_kept, member.member_name, summary.rows_read
        );

        (records, summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::fetcher::tests::{local_client, spawn_archive_server, template_for};
    use crate::archive::resolver::tests::build_zip;
    use crate::archive::{HttpArchiveFetcher, StaticArchiveFetcher};
    use std::collections::HashMap;
    use crate::models::{CommodityMapping, CountryLookupTable, SeriesAllowList};
    use tempfile::TempDir;

    fn reference() -> ReferenceData {
        ReferenceData::new(
            CommodityMapping::default(),
            CountryLookupTable::from_pairs([("X", "AR"), ("203", "BR")]),
            SeriesAllowList::from_keys(["COS_AR"]),
        )
    }

    fn bulletin(rows: &[&str]) -> Vec<u8> {
        let mut text = String::from("Año;Mes;NCM;Pdes;Pnet;FOB\n");
        for row in rows {
            text.push_str(row);
            text.push('\n');
        }
        text.into_bytes()
    }

    #[tokio::test]
    async fn test_consolidates_years_in_order() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let staging = StagingArea::prepare(temp_dir.path().join("raw"))?;

        let current = bulletin(&["2024;1;1012100;X;1;1"]);
        let legacy = bulletin(&["2017;5;01012100;203;2;2", "2017;6;99999999;X;1;1"]);
        let fetcher = StaticArchiveFetcher::new()
            .with_archive(2024, build_zip(&[("exponm24.csv", current.as_slice())]))
            .with_archive(2017, build_zip(&[("expom17.csv", legacy.as_slice())]));

        let consolidator =
            YearRangeConsolidator::new(Arc::new(fetcher), ArchiveMemberResolver::default(), 's');
        let consolidation = consolidator
            .consolidate(&[2024, 2017, 2020], &reference(), &staging, None)
            .await?;

        let years: Vec<i32> = consolidation.records.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2017, 2024]);
        assert_eq!(consolidation.years.len(), 3);
        assert_eq!(consolidation.years[0].unknown_commodity, 1);
        assert_eq!(consolidation.years[1].status, YearStatus::NotPublished);
        assert_eq!(consolidation.records[1].country_code.as_deref(), Some("AR"));
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupt_archive_does_not_abort_other_years() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let staging = StagingArea::prepare(temp_dir.path().join("raw"))?;

        let current = bulletin(&["2024;2;01012100;X;3;3"]);
        let fetcher = StaticArchiveFetcher::new()
            .with_archive(2023, b"garbage".to_vec())
            .with_archive(2024, build_zip(&[("expopm24.csv", current.as_slice())]));

        let consolidator =
            YearRangeConsolidator::new(Arc::new(fetcher), ArchiveMemberResolver::default(), 's');
        let consolidation = consolidator
            .consolidate(&[2023, 2024], &reference(), &staging, None)
            .await?;

        assert_eq!(consolidation.records.len(), 1);
        assert!(matches!(consolidation.years[0].status, YearStatus::Failed(_)));
        Ok(())
    }

    #[tokio::test]
    async fn test_http_failures_are_isolated_per_year() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let staging = StagingArea::prepare(temp_dir.path().join("raw"))?;

        let rows = bulletin(&["2022;7;01012100;X;5;5"]);
        let mut routes = HashMap::new();
        routes.insert(
            "/exports_2022_M.zip".to_string(),
            (200, build_zip(&[("exponm22.csv", rows.as_slice())])),
        );
        routes.insert("/exports_2024_M.zip".to_string(), (503, Vec::new()));
        let base_url = spawn_archive_server(routes).await?;

        let fetcher = HttpArchiveFetcher::with_client(local_client()?, template_for(&base_url));
        let consolidator =
            YearRangeConsolidator::new(Arc::new(fetcher), ArchiveMemberResolver::default(), 's');
        let consolidation = consolidator
            .consolidate(&[2022, 2023, 2024], &reference(), &staging, None)
            .await?;

        assert_eq!(consolidation.records.len(), 1);
        assert_eq!(consolidation.records[0].year, 2022);
        assert_eq!(
            consolidation.years[0].status,
            YearStatus::Loaded {
                member: "exponm22.csv".to_string()
            }
        );
        assert_eq!(consolidation.years[1].status, YearStatus::NotPublished);
        assert!(matches!(consolidation.years[2].status, YearStatus::Failed(_)));
        Ok(())
    }

    #[tokio::test]
    async fn test_nothing_published_is_empty() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let staging = StagingArea::prepare(temp_dir.path().join("raw"))?;

        let consolidator = YearRangeConsolidator::new(
            Arc::new(StaticArchiveFetcher::new()),
            ArchiveMemberResolver::default(),
            's',
        );
        let consolidation = consolidator
            .consolidate(&[2023, 2024], &reference(), &staging, None)
            .await?;

        assert!(consolidation.is_empty());
        Ok(())
    }
}
