pub mod classifier;
pub mod report;
pub mod review_request;
pub mod submission_checker;
pub mod text_extractor;

pub use classifier::{classify, classify_document};
pub use report::{parse_review, render_report};
pub use review_request::{PromptTemplate, ReviewRequestBuilder};
pub use submission_checker::{check_submission, missing_required};
pub use text_extractor::{extract_bytes, extract_file, Extraction, ExtractionWarning};
