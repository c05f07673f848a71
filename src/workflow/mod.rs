pub mod review_ctx;
pub mod review_flow;

pub use review_ctx::RunContext;
pub use review_flow::{ReviewFlow, ReviewOutcome};
