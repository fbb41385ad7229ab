//! Regroups decoded batches into fixed-size output batches.
//!
//! Decoders hand out batches of whatever size the file stores them in (Arrow
//! IPC) or close to the requested size (Parquet). [`Rebatcher`] normalizes
//! both: every emitted batch has exactly `target` rows except the last, and
//! no more than `limit` rows are emitted in total.

use arrow::array::RecordBatch;
use arrow::compute::concat_batches;

use crate::error::Result;

/// Accumulates decoded batches and emits fixed-size ones.
#[derive(Debug)]
pub(crate) struct Rebatcher {
    target: usize,
    remaining: Option<usize>,
    pending: Vec<RecordBatch>,
    pending_rows: usize,
    output: Vec<RecordBatch>,
}

impl Rebatcher {
    /// `target` comes from `ReaderConfig::effective_batch_size`, never zero.
    /// `limit` of `None` means unbounded.
    pub(crate) fn new(target: usize, limit: Option<usize>) -> Self {
        Self {
            target,
            remaining: limit,
            pending: Vec::new(),
            pending_rows: 0,
            output: Vec::new(),
        }
    }

    /// True once `limit` rows have been accepted.
    pub(crate) fn is_full(&self) -> bool {
        self.remaining == Some(0)
    }

    /// Accept a decoded batch. Returns `true` when the limit has been reached
    /// and the caller can stop decoding.
    pub(crate) fn push(&mut self, batch: RecordBatch) -> Result<bool> {
        if self.is_full() {
            return Ok(true);
        }

        let batch = match self.remaining {
            Some(rem) if batch.num_rows() > rem => batch.slice(0, rem),
            _ => batch,
        };
        let rows = batch.num_rows();
        if let Some(rem) = self.remaining.as_mut() {
            *rem -= rows;
        }

        if rows > 0 {
            self.pending_rows += rows;
            self.pending.push(batch);
            while self.pending_rows >= self.target {
                self.emit(self.target)?;
            }
        }

        Ok(self.is_full())
    }

    /// Flush the tail and return every emitted batch in order.
    pub(crate) fn finish(mut self) -> Result<Vec<RecordBatch>> {
        if self.pending_rows > 0 {
            self.emit(self.pending_rows)?;
        }
        Ok(self.output)
    }

    /// Move the first `rows` pending rows into one output batch.
    fn emit(&mut self, rows: usize) -> Result<()> {
        let merged = if self.pending.len() == 1 {
            self.pending.remove(0)
        } else {
            let schema = self.pending[0].schema();
            let merged = concat_batches(&schema, self.pending.iter())?;
            self.pending.clear();
            merged
        };

        let total = merged.num_rows();
        self.output.push(merged.slice(0, rows));
        if total > rows {
            self.pending.push(merged.slice(rows, total - rows));
        }
        self.pending_rows = total - rows;
        Ok(())
    }
}
