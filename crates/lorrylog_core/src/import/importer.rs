//! All-or-nothing bulk append into the repair store.

use crate::model::repair::{NewRepair, RecordId};
use crate::repo::error::RepoError;
use crate::repo::repair_repo::{RepairRepository, SqliteRepairRepository};
use log::{error, info};
use rusqlite::{Connection, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;
use uuid::Uuid;

/// Outcome of a committed import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    /// Correlates the `import_rows` log events of one run.
    pub batch_id: Uuid,
    /// Ids of the appended records, in row order.
    pub record_ids: Vec<RecordId>,
}

impl ImportReport {
    pub fn inserted(&self) -> usize {
        self.record_ids.len()
    }
}

#[derive(Debug)]
pub enum ImportError {
    /// Appending the 1-based data row `row` failed; nothing was persisted.
    Row { row: usize, source: RepoError },
    Storage(RepoError),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Row { row, source } => {
                write!(f, "import aborted at data row {row}, no rows saved: {source}")
            }
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Row { source, .. } => Some(source),
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<RepoError> for ImportError {
    fn from(value: RepoError) -> Self {
        Self::Storage(value)
    }
}

impl From<rusqlite::Error> for ImportError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Storage(value.into())
    }
}

/// Appends `rows` in order inside one immediate transaction.
///
/// # Errors
/// - `Row` when a single append fails; the transaction is rolled back.
/// - `Storage` when the transaction cannot be opened or committed.
pub fn import_rows(
    conn: &mut Connection,
    rows: &[NewRepair],
) -> Result<ImportReport, ImportError> {
    let batch_id = Uuid::new_v4();
    let started_at = Instant::now();
    info!(
        "event=import_rows module=import status=start batch_id={} row_count={}",
        batch_id,
        rows.len()
    );

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let mut record_ids = Vec::with_capacity(rows.len());
    {
        let repo = SqliteRepairRepository::try_new(&tx)?;
        for (index, row) in rows.iter().enumerate() {
            match repo.append(row) {
                Ok(record_id) => record_ids.push(record_id),
                Err(source) => {
                    error!(
                        "event=import_rows module=import status=error batch_id={} row={} error={}",
                        batch_id,
                        index + 1,
                        source
                    );
                    return Err(ImportError::Row {
                        row: index + 1,
                        source,
                    });
                }
            }
        }
    }
    tx.commit()?;

    info!(
        "event=import_rows module=import status=ok batch_id={} inserted={} duration_ms={}",
        batch_id,
        record_ids.len(),
        started_at.elapsed().as_millis()
    );
    Ok(ImportReport {
        batch_id,
        record_ids,
    })
}
