pub mod commodity_filter;
pub mod consolidator;
pub mod country_joiner;
pub mod pipeline;
pub mod report;
pub mod series_builder;
pub mod world_aggregator;

pub use commodity_filter::{CommodityFilter, FilterStats};
pub use consolidator::{Consolidation, YearRangeConsolidator};
pub use country_joiner::CountryJoiner;
pub use pipeline::{Pipeline, PipelineOutcome, PipelineRun, Publication, RunOptions};
pub use report::{RunReport, YearStatus, YearSummary};
pub use series_builder::{SeriesBuild, SeriesBuilder};
pub use world_aggregator::WorldAggregator;
