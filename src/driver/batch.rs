//! Batch selection.

/// The slice of the bank to deliver in one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Batch {
    /// Cursor is at or past the end of the bank.
    Exhausted,
    /// Half-open range `start..end` into the bank.
    Range { start: usize, end: usize },
}

impl Batch {
    pub fn len(&self) -> usize {
        match self {
            Self::Exhausted => 0,
            Self::Range { start, end } => end - start,
        }
    }
}

/// Pick the next batch: `cursor..min(cursor + batch_size, bank_len)`.
pub fn select_batch(bank_len: usize, cursor: usize, batch_size: usize) -> Batch {
    if cursor >= bank_len {
        return Batch::Exhausted;
    }
    let end = cursor.saturating_add(batch_size).min(bank_len);
    Batch::Range { start: cursor, end }
}
