//! Metrics for the remote pipeline.
//!
//! # Metrics
//! - `cloudlog_entries_enqueued_total` (counter): entries handed to the worker
//! - `cloudlog_entries_sent_total` (counter): entries accepted by the transport
//! - `cloudlog_entries_failed_total` (counter): entries in failed batches
//! - `cloudlog_batches_failed_total` (counter): failed write requests
//! - `cloudlog_batch_size` (histogram): entries per write request

use metrics::{counter, histogram};

pub fn record_entry_enqueued() {
    counter!("cloudlog_entries_enqueued_total").increment(1);
}

pub fn record_entries_sent(count: usize) {
    counter!("cloudlog_entries_sent_total").increment(count as u64);
    histogram!("cloudlog_batch_size").record(count as f64);
}

pub fn record_batch_failed(count: usize) {
    counter!("cloudlog_batches_failed_total").increment(1);
    counter!("cloudlog_entries_failed_total").increment(count as u64);
    histogram!("cloudlog_batch_size").record(count as f64);
}
