//! Operator log: local records of issued commands merged with lines received
//! from the machine controller.
//!
//! A single mutex guards both the sequence counter and the buffers, so the
//! sequence order is the true arrival order across the user-action context and
//! the channel delivery context.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Number of remote entries kept for display when not configured otherwise.
pub const REMOTE_LOG_CAPACITY: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogSettings {
    /// Most recent remote entries retained; local entries are never capped.
    pub remote_capacity: usize,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            remote_capacity: REMOTE_LOG_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOrigin {
    Local,
    Remote,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub text: String,
    pub origin: LogOrigin,
    pub sequence: u64,
}

#[derive(Debug, Default)]
struct LogBuffer {
    last_sequence: u64,
    local: Vec<LogEntry>,
    remote: VecDeque<LogEntry>,
}

impl LogBuffer {
    fn next_sequence(&mut self) -> u64 {
        self.last_sequence += 1;
        self.last_sequence
    }
}

#[derive(Debug, Default)]
pub struct LogAggregator {
    settings: LogSettings,
    buffer: Mutex<LogBuffer>,
}

impl LogAggregator {
    pub fn new(settings: LogSettings) -> Self {
        Self {
            settings,
            buffer: Mutex::new(LogBuffer::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LogBuffer> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records a console-generated line. Returns its sequence number.
    pub fn append_local(&self, text: impl Into<String>) -> u64 {
        let mut buffer = self.lock();
        let sequence = buffer.next_sequence();
        buffer.local.push(LogEntry {
            text: text.into(),
            origin: LogOrigin::Local,
            sequence,
        });
        sequence
    }

    /// Records a line received from the channel. Returns its sequence number.
    pub fn on_remote(&self, payload: impl Into<String>) -> u64 {
        let capacity = self.settings.remote_capacity;
        let mut buffer = self.lock();
        let sequence = buffer.next_sequence();
        if capacity == 0 {
            return sequence;
        }
        while buffer.remote.len() >= capacity {
            buffer.remote.pop_front();
        }
        buffer.remote.push_back(LogEntry {
            text: payload.into(),
            origin: LogOrigin::Remote,
            sequence,
        });
        sequence
    }

    /// All local entries plus the retained remote tail, in arrival order.
    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.snapshot_after(0)
    }

    /// Like [`snapshot`](Self::snapshot), restricted to entries newer than `sequence`.
    pub fn snapshot_after(&self, sequence: u64) -> Vec<LogEntry> {
        let buffer = self.lock();
        let local = newer_than(&buffer.local, sequence);
        let remote = newer_than_deque(&buffer.remote, sequence);
        merge_by_sequence(local, remote)
    }

    /// Highest sequence number handed out so far; 0 before the first entry.
    pub fn last_sequence(&self) -> u64 {
        self.lock().last_sequence
    }

    /// Drops local entries. Remote entries stay until evicted by the cap.
    pub fn clear(&self) {
        self.lock().local.clear();
    }

    pub fn len(&self) -> usize {
        let buffer = self.lock();
        buffer.local.len() + buffer.remote.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn newer_than(entries: &[LogEntry], sequence: u64) -> &[LogEntry] {
    let start = entries.partition_point(|entry| entry.sequence <= sequence);
    &entries[start..]
}

fn newer_than_deque(
    entries: &VecDeque<LogEntry>,
    sequence: u64,
) -> impl Iterator<Item = &LogEntry> {
    let start = entries.partition_point(|entry| entry.sequence <= sequence);
    entries.range(start..)
}

fn merge_by_sequence<'a>(
    local: &'a [LogEntry],
    remote: impl Iterator<Item = &'a LogEntry>,
) -> Vec<LogEntry> {
    let mut merged = Vec::with_capacity(local.len());
    let mut local = local.iter().peekable();
    let mut remote = remote.peekable();
    loop {
        let take_local = match (local.peek(), remote.peek()) {
            (Some(l), Some(r)) => l.sequence < r.sequence,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };
        let next = if take_local { local.next() } else { remote.next() };
        if let Some(entry) = next {
            merged.push(entry.clone());
        }
    }
    merged
}
