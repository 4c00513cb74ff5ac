//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use cloud_logging::backend::remote::{LogEntry, WriteRequest};
use cloud_logging::{Backend, Level, LoggingResult, Record, Transport, TransportError};

/// In-memory writer whose contents stay readable after it is moved into a
/// logger.
#[derive(Clone, Default)]
pub struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Mock transport recording every entry and call it receives.
#[derive(Default)]
pub struct MockTransport {
    pub entries: Mutex<Vec<LogEntry>>,
    pub calls: Mutex<Vec<&'static str>>,
    pub fail_writes: bool,
    pub fail_close: bool,
}

impl MockTransport {
    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Default::default()
        }
    }

    pub fn failing_close() -> Self {
        Self {
            fail_close: true,
            ..Default::default()
        }
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn write(&self, request: &WriteRequest) -> Result<(), TransportError> {
        self.calls.lock().unwrap().push("write");
        if self.fail_writes {
            return Err(TransportError::Other("injected write failure".into()));
        }
        self.entries.lock().unwrap().extend(request.entries.iter().cloned());
        Ok(())
    }

    async fn close(&self) -> Result<(), TransportError> {
        self.calls.lock().unwrap().push("close");
        if self.fail_close {
            return Err(TransportError::Other("injected close failure".into()));
        }
        Ok(())
    }
}

/// Backend that only counts what reaches it.
#[derive(Default)]
pub struct CountingBackend {
    pub emitted: AtomicUsize,
    pub flushed: AtomicUsize,
    pub closed: AtomicUsize,
    pub levels: Mutex<Vec<Level>>,
    pub records: Mutex<Vec<Record>>,
}

impl CountingBackend {
    pub fn emitted(&self) -> usize {
        self.emitted.load(Ordering::SeqCst)
    }

    pub fn records(&self) -> Vec<Record> {
        self.records.lock().unwrap().clone()
    }
}

impl Backend for CountingBackend {
    fn name(&self) -> &'static str {
        "counting"
    }

    fn emit(&self, record: &Record) {
        self.emitted.fetch_add(1, Ordering::SeqCst);
        self.levels.lock().unwrap().push(record.level);
        self.records.lock().unwrap().push(record.clone());
    }

    fn set_level(&self, _level: Level) {}

    fn flush(&self) -> LoggingResult<()> {
        self.flushed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn close(&self) -> LoggingResult<()> {
        self.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Backend that appends `<name>:<call>` to a journal shared with other
/// backends, so tests can assert cross-backend call order.
pub struct JournalBackend {
    name: &'static str,
    exits: bool,
    journal: Arc<Mutex<Vec<String>>>,
}

impl JournalBackend {
    pub fn new(name: &'static str, exits: bool, journal: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            name,
            exits,
            journal,
        }
    }

    fn note(&self, call: &str) {
        self.journal
            .lock()
            .unwrap()
            .push(format!("{}:{}", self.name, call));
    }
}

impl Backend for JournalBackend {
    fn name(&self) -> &'static str {
        self.name
    }

    fn emit(&self, _record: &Record) {
        self.note("emit");
    }

    fn set_level(&self, _level: Level) {}

    fn flush(&self) -> LoggingResult<()> {
        self.note("flush");
        Ok(())
    }

    fn close(&self) -> LoggingResult<()> {
        self.note("close");
        Ok(())
    }

    fn exits_on_fatal(&self) -> bool {
        self.exits
    }
}
