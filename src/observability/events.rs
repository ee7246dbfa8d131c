//! Structured playback event stream.
//!
//! Typed events emitted while a workout plays, serialized as
//! newline-delimited JSON with a monotonically increasing sequence number.

use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::workout::IntervalKind;

// ---------------------------------------------------------------------------
// Event variants
// ---------------------------------------------------------------------------

/// A discrete event emitted during playback.
///
/// Tagged with `"type"` when serialized.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A playback session was created over a flattened workout.
    SessionStarted {
        /// When the session was created.
        timestamp: DateTime<Utc>,
        /// Workout name.
        workout: String,
        /// Number of intervals.
        total_steps: usize,
        /// Sum of all interval durations.
        total_seconds: u64,
    },

    /// An interval became current while the clock was running.
    IntervalStarted {
        /// When the interval began.
        timestamp: DateTime<Utc>,
        /// 1-based step number.
        step: usize,
        /// Work or rest.
        kind: IntervalKind,
        /// Exercise the interval belongs to.
        exercise_name: String,
        /// Interval length in seconds.
        duration: u32,
    },

    /// The clock was stopped mid-sequence.
    Paused {
        /// When the pause happened.
        timestamp: DateTime<Utc>,
        /// 1-based step number.
        step: usize,
        /// Seconds left in the current interval.
        remaining: u32,
    },

    /// The clock restarted after a pause.
    Resumed {
        /// When the clock restarted.
        timestamp: DateTime<Utc>,
        /// 1-based step number.
        step: usize,
        /// Seconds left in the current interval.
        remaining: u32,
    },

    /// Playback went back to the first interval.
    Reset {
        /// When the reset happened.
        timestamp: DateTime<Utc>,
    },

    /// The last interval counted down to zero.
    Finished {
        /// When the workout completed.
        timestamp: DateTime<Utc>,
        /// Number of intervals played.
        total_steps: usize,
    },

    /// The caller left playback.
    SessionCancelled {
        /// When the session was abandoned.
        timestamp: DateTime<Utc>,
        /// 1-based step number at the time.
        step: usize,
    },
}

// ---------------------------------------------------------------------------
// Envelope (adds sequence number via serde flatten)
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct EventEnvelope {
    sequence: u64,
    #[serde(flatten)]
    event: Event,
}

// ---------------------------------------------------------------------------
// Emitter
// ---------------------------------------------------------------------------

/// Thread-safe, buffered JSONL event writer.
///
/// Serialization or I/O failures are dropped: the event stream must never
/// interrupt a workout.
pub struct EventEmitter {
    writer: Mutex<BufWriter<Box<dyn Write + Send>>>,
    sequence: AtomicU64,
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("sequence", &self.sequence.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl EventEmitter {
    /// Creates an emitter that writes to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(BufWriter::new(writer)),
            sequence: AtomicU64::new(0),
        }
    }

    /// Creates an emitter that silently discards all events.
    #[must_use]
    pub fn noop() -> Self {
        Self::new(Box::new(std::io::sink()))
    }

    /// Creates an emitter that writes to a file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be created.
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let file = std::fs::File::create(path)?;
        Ok(Self::new(Box::new(file)))
    }

    /// Emits an event as a single JSONL line.
    pub fn emit(&self, event: Event) {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        let envelope = EventEnvelope {
            sequence: seq,
            event,
        };

        if let Ok(mut w) = self.writer.lock() {
            if let Ok(line) = serde_json::to_string(&envelope) {
                let _ = writeln!(w, "{line}");
                let _ = w.flush();
            }
        }
    }

    /// Returns the number of events emitted so far.
    #[must_use]
    pub fn event_count(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::{Arc, Mutex as StdMutex};

    use super::*;

    /// In-memory writer for capturing emitter output in tests.
    #[derive(Clone, Default)]
    pub(crate) struct TestWriter(Arc<StdMutex<Vec<u8>>>);

    impl TestWriter {
        pub(crate) fn lines(&self) -> Vec<serde_json::Value> {
            let buf = self.0.lock().unwrap();
            String::from_utf8_lossy(&buf)
                .lines()
                .map(|l| serde_json::from_str(l).unwrap())
                .collect()
        }
    }

    impl Write for TestWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn fixed_time() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-01T07:30:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn interval_event_serializes_with_type_tag() {
        let event = Event::IntervalStarted {
            timestamp: fixed_time(),
            step: 3,
            kind: IntervalKind::Rest,
            exercise_name: "Burpees".to_owned(),
            duration: 10,
        };
        let parsed = serde_json::to_value(&event).unwrap();
        assert_eq!(parsed["type"], "IntervalStarted");
        assert_eq!(parsed["kind"], "rest");
        assert_eq!(parsed["exercise_name"], "Burpees");
    }

    #[test]
    fn emitter_writes_sequenced_jsonl() {
        let tw = TestWriter::default();
        let emitter = EventEmitter::new(Box::new(tw.clone()));
        emitter.emit(Event::Reset {
            timestamp: fixed_time(),
        });
        emitter.emit(Event::Finished {
            timestamp: fixed_time(),
            total_steps: 4,
        });

        assert_eq!(emitter.event_count(), 2);
        let lines = tw.lines();
        assert_eq!(lines[0]["sequence"], 0);
        assert_eq!(lines[0]["type"], "Reset");
        assert_eq!(lines[1]["sequence"], 1);
        assert_eq!(lines[1]["total_steps"], 4);
        assert!(lines[1].get("event").is_none(), "event should be flattened");
    }

    #[test]
    fn noop_emitter_still_counts() {
        let emitter = EventEmitter::noop();
        emitter.emit(Event::SessionCancelled {
            timestamp: Utc::now(),
            step: 1,
        });
        assert_eq!(emitter.event_count(), 1);
    }
}
