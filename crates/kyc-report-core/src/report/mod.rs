pub mod assembler;
pub mod conclusion;
#[cfg(feature = "document")]
pub mod document;
pub mod evidence;
pub mod introduction;

pub use assembler::{assemble_report, assemble_report_from_value, Report};
pub use conclusion::assemble_conclusion;
#[cfg(feature = "document")]
pub use document::{document_file_name, render_document, DocumentOptions};
pub use evidence::{build_evidence_locker, EvidenceGroup};
