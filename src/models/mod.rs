pub mod bulletin;
pub mod consolidated;
pub mod cursor;
pub mod period;
pub mod reference;
pub mod series;

pub use bulletin::{Measure, RawBulletinRecord};
pub use consolidated::{ConsolidatedRecord, MappedRecord};
pub use cursor::UpdateCursor;
pub use period::Period;
pub use reference::{CommodityMapping, CountryLookupTable, ReferenceData, SeriesAllowList};
pub use series::{SeriesKey, SeriesPoint};
