pub mod report;
pub mod upstream;
