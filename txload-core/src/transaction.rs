//! Transaction and batch types

use std::fmt;

/// Account key within the partitioned key space, 1-based.
pub type Key = u64;

/// A single generated transaction.
///
/// The variant does not record whether it was generated on the intra- or
/// cross-shard path; locality is recomputed from key membership when needed
/// (see [`crate::stats`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transaction {
    /// Balance query on a single key
    ReadOnly { key: Key },
    /// Transfer of `amount` units from `src` to `dst` (src != dst)
    Transfer { src: Key, dst: Key, amount: u64 },
}

impl fmt::Display for Transaction {
    /// Renders the exact textual form the harness parses: `(key,)` for a
    /// read-only transaction and `(src,dst,amount)` for a transfer, with no
    /// internal whitespace.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transaction::ReadOnly { key } => write!(f, "({key},)"),
            Transaction::Transfer { src, dst, amount } => {
                write!(f, "({src},{dst},{amount})")
            }
        }
    }
}

/// Ordered sequence of transactions produced by one generation run.
///
/// Order is significant; the consuming harness replays it in sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadBatch {
    transactions: Vec<Transaction>,
}

impl WorkloadBatch {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self { transactions }
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter()
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_only_rendering() {
        let tx = Transaction::ReadOnly { key: 5 };
        assert_eq!(tx.to_string(), "(5,)");
    }

    #[test]
    fn test_transfer_rendering() {
        let tx = Transaction::Transfer { src: 10, dst: 20, amount: 2 };
        assert_eq!(tx.to_string(), "(10,20,2)");
    }
}
