//! Monthly wellness trends for a school: fetch per-month completion from the
//! backend, normalize it into a dense month x dimension matrix, navigate a
//! window of months, and summarize a selected month.

pub mod dashboard;
pub mod error;
pub mod export;
pub mod fetch;
pub mod matrix;
pub mod models;
pub mod month;
pub mod records;
pub mod registry;
pub mod report;
pub mod settings;
pub mod trend;
pub mod window;

pub use dashboard::{Dashboard, DisplayState, LoadRequest, LoadedWindow, TrendSnapshot};
pub use error::SourceError;
pub use fetch::{HttpWellnessSource, WellnessFetcher, WellnessSource};
pub use models::{Dimension, MonthRow, RawMonthRecord, Summary};
pub use month::MonthKey;
pub use registry::DimensionRegistry;
pub use settings::Settings;
pub use window::{Window, WindowController};
