mod columns;
mod comparison;
mod config;
mod experiment;
mod filter;
mod ids;
mod tags;

pub use self::columns::{SortSpec, TableColumn};
pub use self::comparison::ComparisonResult;
pub use self::config::{ConsoleConfig, DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE, DEFAULT_RETENTION_DAYS};
pub use self::experiment::{ExperimentRow, ExperimentTable, TextField};
pub use self::filter::FilterPredicate;
pub use self::ids::ExperimentId;
pub use self::tags::{ARCHIVE_TAG, TagList, TagParseError};
