//! Dedicated writer thread for the Course Assembler's bulk inserts,
//! following the same batching discipline as the rest of this
//! workspace's storage layer: buffer commands, flush in one
//! transaction, either on a size threshold or a timeout.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use rusqlite::Connection;

use crate::errors::StorageError;
use crate::queries;

const CHANNEL_BOUND: usize = 1024;
const BATCH_SIZE: usize = 500;
const FLUSH_TIMEOUT: Duration = Duration::from_millis(100);

#[derive(Debug)]
pub enum BatchCommand {
    InsertTranslates(Vec<(i64, i64)>),
    InsertContains(Vec<(i64, i64)>),
    Flush,
    FlushSync(std::sync::mpsc::SyncSender<()>),
    Shutdown,
}

#[derive(Debug, Default, Clone)]
pub struct WriteStats {
    pub translates_rows: usize,
    pub contains_rows: usize,
    pub flushes: usize,
}

pub struct BatchWriter {
    tx: Sender<BatchCommand>,
    handle: Option<JoinHandle<Result<WriteStats, StorageError>>>,
}

impl BatchWriter {
    pub fn new(conn: Connection) -> Self {
        let (tx, rx) = bounded(CHANNEL_BOUND);
        let handle = thread::Builder::new()
            .name("polycloze-batch-writer".to_string())
            .spawn(move || writer_loop(conn, rx))
            .expect("failed to spawn batch writer thread");
        Self { tx, handle: Some(handle) }
    }

    pub fn send(&self, command: BatchCommand) -> Result<(), StorageError> {
        self.tx.send(command).map_err(|_| StorageError::WriterDisconnected)
    }

    pub fn flush(&self) -> Result<(), StorageError> {
        self.send(BatchCommand::Flush)
    }

    pub fn flush_sync(&self) -> Result<(), StorageError> {
        let (tx, rx) = std::sync::mpsc::sync_channel(0);
        self.send(BatchCommand::FlushSync(tx))?;
        rx.recv().map_err(|_| StorageError::WriterDisconnected)
    }

    pub fn shutdown(mut self) -> Result<WriteStats, StorageError> {
        let _ = self.tx.send(BatchCommand::Shutdown);
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| StorageError::WriterPanicked)?,
            None => Ok(WriteStats::default()),
        }
    }
}

impl Drop for BatchWriter {
    fn drop(&mut self) {
        let _ = self.tx.send(BatchCommand::Shutdown);
    }
}

fn writer_loop(conn: Connection, rx: Receiver<BatchCommand>) -> Result<WriteStats, StorageError> {
    let mut buffer = Vec::with_capacity(BATCH_SIZE);
    let mut stats = WriteStats::default();

    loop {
        match rx.recv_timeout(FLUSH_TIMEOUT) {
            Ok(BatchCommand::Shutdown) => {
                flush_buffer(&conn, &mut buffer, &mut stats)?;
                break;
            }
            Ok(BatchCommand::Flush) => flush_buffer(&conn, &mut buffer, &mut stats)?,
            Ok(BatchCommand::FlushSync(done)) => {
                flush_buffer(&conn, &mut buffer, &mut stats)?;
                let _ = done.send(());
            }
            Ok(cmd) => {
                buffer.push(cmd);
                if buffer.len() >= BATCH_SIZE {
                    flush_buffer(&conn, &mut buffer, &mut stats)?;
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                if !buffer.is_empty() {
                    flush_buffer(&conn, &mut buffer, &mut stats)?;
                }
            }
            Err(RecvTimeoutError::Disconnected) => {
                flush_buffer(&conn, &mut buffer, &mut stats)?;
                break;
            }
        }
    }

    Ok(stats)
}

fn flush_buffer(conn: &Connection, buffer: &mut Vec<BatchCommand>, stats: &mut WriteStats) -> Result<(), StorageError> {
    if buffer.is_empty() {
        return Ok(());
    }

    let tx = conn.unchecked_transaction()?;
    let mut batch_stats = WriteStats::default();

    for cmd in buffer.iter() {
        match cmd {
            BatchCommand::InsertTranslates(rows) => {
                queries::insert_translates(&tx, rows)?;
                batch_stats.translates_rows += rows.len();
            }
            BatchCommand::InsertContains(rows) => {
                queries::insert_contains(&tx, rows)?;
                batch_stats.contains_rows += rows.len();
            }
            BatchCommand::Flush | BatchCommand::FlushSync(_) | BatchCommand::Shutdown => {}
        }
    }

    tx.commit()?;

    buffer.clear();
    stats.translates_rows += batch_stats.translates_rows;
    stats.contains_rows += batch_stats.contains_rows;
    stats.flushes += 1;
    Ok(())
}
