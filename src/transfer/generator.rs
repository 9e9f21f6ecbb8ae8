//! Pseudo-random payload generation
//!
//! Produces an exact number of random bytes as a stream of fixed-size chunks,
//! so memory use stays at one chunk regardless of the requested total.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::Bytes;
use futures_util::Stream;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::transfer::TRANSFER_BUFFER_SIZE;

pub struct RandomPayload {
    rng: StdRng,
    remaining: u64,
}

impl RandomPayload {
    pub fn new(total_bytes: u64) -> Self {
        Self {
            rng: StdRng::from_entropy(),
            remaining: total_bytes,
        }
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    fn next_chunk(&mut self) -> Option<Bytes> {
        if self.remaining == 0 {
            return None;
        }

        let chunk_size = self.remaining.min(TRANSFER_BUFFER_SIZE as u64) as usize;
        let mut buffer = vec![0u8; chunk_size];
        self.rng.fill_bytes(&mut buffer);
        self.remaining -= chunk_size as u64;

        Some(Bytes::from(buffer))
    }
}

impl Stream for RandomPayload {
    type Item = io::Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Poll::Ready(self.get_mut().next_chunk().map(Ok))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let chunks = self.remaining.div_ceil(TRANSFER_BUFFER_SIZE as u64) as usize;
        (chunks, Some(chunks))
    }
}
