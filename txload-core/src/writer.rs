//! Workload serialization in the harness's CSV schema
//!
//! The output contract: header `Set Number,Transactions,Live Nodes`; the
//! first data row carries the set number and the full node list, every
//! later row leaves those two columns blank. The transaction field is
//! whitespace-free while the node-list field keeps a space after each
//! comma; the downstream parser depends on exactly this asymmetry. Rows
//! are CRLF-terminated, matching the bytes the harness already consumes.

use std::path::Path;

use crate::error::Result;
use crate::topology::NodeList;
use crate::transaction::WorkloadBatch;

/// Write `batch` to `path` as CSV.
///
/// Fails if the destination cannot be opened for writing. No partial-write
/// recovery is attempted; atomicity of the output file is a non-goal.
pub fn write_csv<P: AsRef<Path>>(
    batch: &WorkloadBatch,
    nodes: &NodeList,
    set_number: u32,
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_path(path)?;

    writer.write_record(["Set Number", "Transactions", "Live Nodes"])?;
    for (i, tx) in batch.iter().enumerate() {
        if i == 0 {
            writer.write_record([set_number.to_string(), tx.to_string(), nodes.rendered()])?;
        } else {
            writer.write_record([String::new(), tx.to_string(), String::new()])?;
        }
    }
    writer.flush()?;

    tracing::info!("wrote {} transactions to {}", batch.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::Transaction;

    #[test]
    fn test_exact_output_bytes() {
        let batch = WorkloadBatch::new(vec![
            Transaction::ReadOnly { key: 5 },
            Transaction::Transfer { src: 10, dst: 20, amount: 2 },
        ]);
        let nodes = NodeList::build(1, 3);

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.csv");
        write_csv(&batch, &nodes, 1, &path).expect("write succeeds");

        let contents = std::fs::read_to_string(&path).expect("read back");
        assert_eq!(
            contents,
            "Set Number,Transactions,Live Nodes\r\n\
             1,\"(5,)\",\"[n1, n2, n3]\"\r\n\
             ,\"(10,20,2)\",\r\n"
        );
    }

    #[test]
    fn test_every_row_is_crlf_terminated() {
        let batch = WorkloadBatch::new(vec![
            Transaction::ReadOnly { key: 1 },
            Transaction::ReadOnly { key: 2 },
            Transaction::ReadOnly { key: 3 },
        ]);
        let nodes = NodeList::build(1, 1);

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.csv");
        write_csv(&batch, &nodes, 1, &path).expect("write succeeds");

        let contents = std::fs::read_to_string(&path).expect("read back");
        for line in contents.split_inclusive('\n') {
            assert!(line.ends_with("\r\n"), "row not CRLF-terminated: {line:?}");
        }
    }

    #[test]
    fn test_unwritable_destination_fails() {
        let batch = WorkloadBatch::new(vec![Transaction::ReadOnly { key: 1 }]);
        let nodes = NodeList::build(1, 1);
        let result = write_csv(&batch, &nodes, 1, "/nonexistent-dir/out.csv");
        assert!(result.is_err());
    }
}
