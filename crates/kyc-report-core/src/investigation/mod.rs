pub(crate) mod fields;
pub mod progress;
pub mod raw;

pub use raw::{AssessedResult, FlatResult, InvestigationResult, RawSource, RiskCategoryRaw};
