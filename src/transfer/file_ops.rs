//! Module `file_ops`
//!
//! Moves bytes between HTTP bodies and files on disk through a fixed-size
//! buffer. Neither direction ever holds a whole file in memory.

use std::io;
use std::path::{Path, PathBuf};

use axum::body::Body;
use futures_util::TryStreamExt;
use log::{error, info, warn};
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_util::io::{ReaderStream, StreamReader};

use crate::error::TransferError;
use crate::transfer::TRANSFER_BUFFER_SIZE;

/// Removes the file at `path` on drop unless disarmed.
///
/// Covers both error returns and the future being dropped mid-transfer when
/// the client disconnects.
struct PartialFile {
    path: PathBuf,
    armed: bool,
}

impl PartialFile {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            armed: true,
        }
    }

    fn keep(mut self) {
        self.armed = false;
    }
}

impl Drop for PartialFile {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => warn!("Removed partial upload {}", self.path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => error!("Failed to remove partial upload {}: {}", self.path.display(), e),
        }
    }
}

/// Streams a request body into `target`, creating or truncating it.
///
/// Returns the number of bytes written. On failure, or if the returned future
/// is dropped before completion, the partial file is removed.
pub async fn receive_to_file(body: Body, target: &Path) -> Result<u64, TransferError> {
    info!("Starting file upload: {}", target.display());

    let mut file = match File::create(target).await {
        Ok(file) => file,
        Err(e) => {
            error!("Failed to create file {}: {}", target.display(), e);
            return Err(TransferError::OpenFailed(e));
        }
    };
    let partial = PartialFile::new(target);

    let mut reader = StreamReader::new(body.into_data_stream().map_err(io::Error::other));
    let mut buffer = vec![0u8; TRANSFER_BUFFER_SIZE];
    let mut total_bytes_received = 0u64;

    loop {
        let n = match reader.read(&mut buffer).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                warn!(
                    "Request body ended early for {} after {} bytes: {}",
                    target.display(),
                    total_bytes_received,
                    e
                );
                return Err(TransferError::ReceiveFailed(e));
            }
        };

        if let Err(e) = file.write_all(&buffer[..n]).await {
            error!("Failed to write to {}: {}", target.display(), e);
            return Err(TransferError::WriteFailed(e));
        }

        total_bytes_received += n as u64;
    }

    if let Err(e) = file.flush().await {
        error!("Failed to flush {}: {}", target.display(), e);
        return Err(TransferError::WriteFailed(e));
    }

    partial.keep();
    Ok(total_bytes_received)
}

/// Opens `path` as a stream of chunks no larger than the transfer buffer.
pub async fn open_file_stream(path: &Path) -> Result<ReaderStream<File>, TransferError> {
    let file = File::open(path).await.map_err(|e| {
        error!("Failed to open file {}: {}", path.display(), e);
        TransferError::OpenFailed(e)
    })?;

    Ok(ReaderStream::with_capacity(file, TRANSFER_BUFFER_SIZE))
}
