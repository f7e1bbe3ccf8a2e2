//! Append-only audit trail.
//!
//! Every stage invocation produces exactly one [`AuditEvent`]. Events carry
//! truncated SHA-256 digests of the state and of the extracted record so a
//! replayed run can be compared against the recorded trail. The digests are
//! for tamper evidence only and are never used as cache or lookup keys.

mod event;
mod logger;
mod sink;

pub use event::{state_digests, AuditEvent, PipelineSummary};
pub use logger::AuditLogger;
pub use sink::{AuditSink, JsonlAuditSink, MemoryAuditSink};
