pub mod fixtures;
pub mod records;
pub mod upstream;

pub use records::{CompanyInfo, CompanyListItem, KvkNumber};
