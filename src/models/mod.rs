pub mod checklist;
pub mod document;
pub mod loaders;
pub mod report;
pub mod review;

pub use checklist::{ChecklistEntry, ChecklistStatus, Requirement};
pub use document::{Document, DocumentType};
pub use loaders::load_reference_documents;
pub use report::{Report, ReportFormat};
pub use review::{ReportSection, ReviewResult, SectionContent, SectionKind, Table};
