//! Audit sink trait and implementations.

use super::event::AuditEvent;
use crate::core::StageName;
use crate::errors::AuditError;
use crate::utils::{day_stamp, now_utc};
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Destination for audit events.
///
/// Appends are synchronous and must either persist the event or return an
/// error; a sink never drops an event silently.
pub trait AuditSink: Send + Sync {
    /// Appends one event.
    fn append(&self, event: &AuditEvent) -> Result<(), AuditError>;
}

/// Appends events as JSON lines to one file per UTC day.
///
/// Files are named `audit_YYYYMMDD.jsonl`. Appends from concurrent runs
/// sharing one sink are serialized so lines never interleave.
#[derive(Debug)]
pub struct JsonlAuditSink {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlAuditSink {
    /// Creates a sink writing into `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, AuditError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| AuditError::Write {
            path: dir.clone(),
            source,
        })?;
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    /// The log directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The log file for a `YYYYMMDD` day key.
    #[must_use]
    pub fn path_for_day(&self, day: &str) -> PathBuf {
        self.dir.join(format!("audit_{day}.jsonl"))
    }

    /// Reads back every event recorded for a day.
    pub fn read_day(&self, day: &str) -> Result<Vec<AuditEvent>, AuditError> {
        let path = self.path_for_day(day);
        let file = fs::File::open(&path).map_err(|source| AuditError::Write {
            path: path.clone(),
            source,
        })?;

        let mut events = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|source| AuditError::Write {
                path: path.clone(),
                source,
            })?;
            if line.trim().is_empty() {
                continue;
            }
            events.push(serde_json::from_str(&line)?);
        }
        Ok(events)
    }

    fn day_for(event: &AuditEvent) -> String {
        let at = DateTime::parse_from_rfc3339(&event.timestamp)
            .map_or_else(|_| now_utc(), |ts| ts.with_timezone(&Utc));
        day_stamp(&at)
    }
}

impl AuditSink for JsonlAuditSink {
    fn append(&self, event: &AuditEvent) -> Result<(), AuditError> {
        let mut line = event.to_json_line()?;
        line.push('\n');
        let path = self.path_for_day(&Self::day_for(event));

        let _guard = self.write_lock.lock();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| AuditError::Write {
                path: path.clone(),
                source,
            })?;
        file.write_all(line.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|source| AuditError::Write { path, source })
    }
}

/// Keeps events in memory.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    events: RwLock<Vec<AuditEvent>>,
}

impl MemoryAuditSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.read().clone()
    }

    /// Returns the number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Returns true if no events have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Returns the stage sequence in recording order.
    #[must_use]
    pub fn stages(&self) -> Vec<StageName> {
        self.events.read().iter().map(|e| e.stage).collect()
    }

    /// Returns events recorded for one stage.
    #[must_use]
    pub fn events_for(&self, stage: StageName) -> Vec<AuditEvent> {
        self.events
            .read()
            .iter()
            .filter(|e| e.stage == stage)
            .cloned()
            .collect()
    }
}

impl AuditSink for MemoryAuditSink {
    fn append(&self, event: &AuditEvent) -> Result<(), AuditError> {
        self.events.write().push(event.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AuditStatus, PipelineState};
    use chrono::TimeZone;
    use std::sync::Arc;

    fn event_at(day: u32, stage: StageName) -> AuditEvent {
        let at = Utc.with_ymd_and_hms(2026, 10, day, 12, 0, 0).unwrap();
        AuditEvent::capture(
            &at,
            None,
            stage,
            &PipelineState::new("https://example.com"),
            AuditStatus::Success,
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_jsonl_sink_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonlAuditSink::new(dir.path().join("logs")).unwrap();

        sink.append(&event_at(16, StageName::CollectEvidence)).unwrap();
        sink.append(&event_at(16, StageName::ExtractData)).unwrap();

        let events = sink.read_day("20261016").unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].stage, StageName::CollectEvidence);
        assert_eq!(events[1].stage, StageName::ExtractData);
    }

    #[test]
    fn test_jsonl_sink_partitions_by_day() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonlAuditSink::new(dir.path()).unwrap();

        sink.append(&event_at(15, StageName::CollectEvidence)).unwrap();
        sink.append(&event_at(16, StageName::CollectEvidence)).unwrap();

        assert!(sink.path_for_day("20261015").exists());
        assert!(sink.path_for_day("20261016").exists());
        assert_eq!(sink.read_day("20261015").unwrap().len(), 1);
    }

    #[test]
    fn test_jsonl_sink_concurrent_appends_stay_line_aligned() {
        let dir = tempfile::tempdir().unwrap();
        let sink = Arc::new(JsonlAuditSink::new(dir.path()).unwrap());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let sink = Arc::clone(&sink);
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        sink.append(&event_at(16, StageName::ValidateData)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(sink.read_day("20261016").unwrap().len(), 200);
    }

    #[test]
    fn test_jsonl_sink_reports_unwritable_directory() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, b"file").unwrap();

        let err = JsonlAuditSink::new(blocker.join("logs")).unwrap_err();
        assert!(matches!(err, AuditError::Write { .. }));
    }

    #[test]
    fn test_memory_sink() {
        let sink = MemoryAuditSink::new();
        assert!(sink.is_empty());

        sink.append(&event_at(16, StageName::CollectEvidence)).unwrap();
        sink.append(&event_at(16, StageName::ValidateData)).unwrap();
        sink.append(&event_at(16, StageName::ValidateData)).unwrap();

        assert_eq!(sink.len(), 3);
        assert_eq!(sink.events_for(StageName::ValidateData).len(), 2);
        assert_eq!(
            sink.stages(),
            vec![StageName::CollectEvidence, StageName::ValidateData, StageName::ValidateData]
        );
    }
}
