//! Core types: the pipeline state, the extraction schema, stage names.

mod schema;
mod state;
mod status;

pub use schema::{json_type_name, populated_fields, CompanyInfo, ExtractedRecord};
pub use state::{PipelineState, MAX_RETRIES};
pub use status::{AuditStatus, StageName};
