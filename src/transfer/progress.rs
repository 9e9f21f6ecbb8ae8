//! Transfer progress logging
//!
//! Wraps an outgoing body stream, counting bytes as they are handed to the
//! connection and logging progress and completion.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use axum::body::Bytes;
use futures_util::Stream;
use log::{error, info};

use crate::utils::{format_bytes, throughput_mb_per_sec};

/// Progress is logged every 100 MB when enabled.
pub const PROGRESS_INTERVAL_BYTES: u64 = 100 * 1024 * 1024;

pub struct TransferLog<S> {
    inner: S,
    tag: &'static str,
    label: String,
    total_bytes: u64,
    sent_bytes: u64,
    last_logged: u64,
    log_progress: bool,
    started: Instant,
    finished: bool,
}

impl<S> TransferLog<S> {
    pub fn new(inner: S, tag: &'static str, label: impl Into<String>, total_bytes: u64) -> Self {
        Self {
            inner,
            tag,
            label: label.into(),
            total_bytes,
            sent_bytes: 0,
            last_logged: 0,
            log_progress: false,
            started: Instant::now(),
            finished: false,
        }
    }

    /// Enables periodic progress lines for long transfers.
    pub fn with_progress(mut self) -> Self {
        self.log_progress = true;
        self
    }

    pub fn sent_bytes(&self) -> u64 {
        self.sent_bytes
    }

    fn record(&mut self, n: usize) {
        self.sent_bytes += n as u64;

        if self.log_progress && self.sent_bytes - self.last_logged >= PROGRESS_INTERVAL_BYTES {
            let percent = if self.total_bytes == 0 {
                100
            } else {
                self.sent_bytes * 100 / self.total_bytes
            };
            info!(
                "{} Progress: {} / {} ({}%)",
                self.tag,
                format_bytes(self.sent_bytes),
                format_bytes(self.total_bytes),
                percent
            );
            self.last_logged = self.sent_bytes;
        }
    }

    fn complete(&mut self) {
        self.finished = true;
        let elapsed = self.started.elapsed();
        info!(
            "{} Completed {}: {} in {}ms ({:.2} MB/s)",
            self.tag,
            self.label,
            format_bytes(self.sent_bytes),
            elapsed.as_millis(),
            throughput_mb_per_sec(self.sent_bytes, elapsed)
        );
    }
}

impl<S> Stream for TransferLog<S>
where
    S: Stream<Item = io::Result<Bytes>> + Unpin,
{
    type Item = io::Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        match Pin::new(&mut this.inner).poll_next(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                this.record(chunk.len());
                Poll::Ready(Some(Ok(chunk)))
            }
            Poll::Ready(Some(Err(e))) => {
                error!(
                    "{} Transfer of {} failed after {}: {}",
                    this.tag,
                    this.label,
                    format_bytes(this.sent_bytes),
                    e
                );
                this.finished = true;
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                if !this.finished {
                    this.complete();
                }
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<S> Drop for TransferLog<S> {
    fn drop(&mut self) {
        if !self.finished {
            info!(
                "{} Aborted {} after {} of {}",
                self.tag,
                self.label,
                format_bytes(self.sent_bytes),
                format_bytes(self.total_bytes)
            );
        }
    }
}
