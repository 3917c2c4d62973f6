pub mod batch;
pub mod pipeline;

pub use batch::run_batch;
pub use pipeline::{Pipeline, PipelineError, PipelineOutcome, ReportStatus, RunReport, Stage};
