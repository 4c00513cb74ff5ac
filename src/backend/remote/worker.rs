//! Background submission worker.
//!
//! Runs on a dedicated thread with a current-thread runtime. Entries arrive
//! over an unbounded channel and are written in batches, either when the
//! batch is full, when the flush interval elapses, or on an explicit flush.

use std::sync::mpsc::SyncSender;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{self, MissedTickBehavior};

use crate::backend::remote::entry::{LogEntry, WriteRequest};
use crate::backend::remote::transport::{Transport, TransportError};
use crate::backend::remote::ErrorHook;
use crate::observability::metrics;

/// Result of a close: (flush error, release error).
pub(crate) type CloseOutcome = (Option<TransportError>, Option<TransportError>);

pub(crate) enum Command {
    Entry(Box<LogEntry>),
    /// Reply with the first transport error since the previous flush.
    Flush(SyncSender<Option<TransportError>>),
    /// Flush, release the transport, reply and stop.
    Close(SyncSender<CloseOutcome>),
}

pub(crate) struct Worker {
    rx: mpsc::UnboundedReceiver<Command>,
    transport: Arc<dyn Transport>,
    on_error: ErrorHook,
    batch: Vec<LogEntry>,
    batch_size: usize,
    flush_interval: Duration,
    first_error: Option<TransportError>,
}

impl Worker {
    pub(crate) fn new(
        rx: mpsc::UnboundedReceiver<Command>,
        transport: Arc<dyn Transport>,
        on_error: ErrorHook,
        batch_size: usize,
        flush_interval: Duration,
    ) -> Self {
        Self {
            rx,
            transport,
            on_error,
            batch: Vec::with_capacity(batch_size),
            batch_size: batch_size.max(1),
            flush_interval,
            first_error: None,
        }
    }

    pub(crate) async fn run(mut self) {
        tracing::debug!(
            batch_size = self.batch_size,
            flush_interval_ms = self.flush_interval.as_millis() as u64,
            "Remote logging worker started"
        );

        let mut ticker = time::interval(self.flush_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                cmd = self.rx.recv() => match cmd {
                    Some(Command::Entry(entry)) => {
                        self.batch.push(*entry);
                        if self.batch.len() >= self.batch_size {
                            self.send_batch().await;
                        }
                    }
                    Some(Command::Flush(ack)) => {
                        self.send_batch().await;
                        let _ = ack.send(self.first_error.take());
                    }
                    Some(Command::Close(ack)) => {
                        let outcome = self.shutdown().await;
                        let _ = ack.send(outcome);
                        break;
                    }
                    None => {
                        // Every sender is gone: drain what is left.
                        let (flush_err, close_err) = self.shutdown().await;
                        if let Some(e) = flush_err.or(close_err) {
                            tracing::warn!(error = %e, "Remote logging worker stopped with error");
                        }
                        break;
                    }
                },
                _ = ticker.tick() => {
                    if !self.batch.is_empty() {
                        self.send_batch().await;
                    }
                }
            }
        }

        tracing::debug!("Remote logging worker stopped");
    }

    async fn shutdown(&mut self) -> CloseOutcome {
        self.send_batch().await;
        let flush_err = self.first_error.take();
        let close_err = self.transport.close().await.err();
        (flush_err, close_err)
    }

    async fn send_batch(&mut self) {
        if self.batch.is_empty() {
            return;
        }
        let request = WriteRequest {
            entries: std::mem::take(&mut self.batch),
            partial_success: true,
        };
        let count = request.entries.len();

        match self.transport.write(&request).await {
            Ok(()) => {
                metrics::record_entries_sent(count);
            }
            Err(e) => {
                metrics::record_batch_failed(count);
                tracing::debug!(error = %e, entries = count, "Remote batch failed");
                (self.on_error)(&e);
                if self.first_error.is_none() {
                    self.first_error = Some(e);
                }
            }
        }
    }
}
