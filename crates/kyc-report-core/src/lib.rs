pub mod assessment;
pub mod company;
pub mod config;
pub mod error;
pub mod investigation;
pub mod report;
pub mod types;

#[cfg(feature = "http")]
pub mod client;

pub use error::KycReportError;
pub use types::*;

/// Standard result type for all KYC report operations
pub type KycReportResult<T> = Result<T, KycReportError>;
