//! Multi-row INSERT batching and execution.
//!
//! One statement per entity type, one bind group per row. A batch only
//! splits when it would exceed PostgreSQL's bind parameter limit; every
//! chunk runs on the same transaction. The store renders the SQL.

use tracing::debug;

use crate::error::{Result, SeedError};
use crate::models::Insertable;
use crate::store::SeedTx;
use crate::table::Table;
use crate::value::SqlValue;

/// PostgreSQL wire protocol limit on bind parameters per statement.
pub const MAX_BIND_PARAMS: usize = 65_535;

#[derive(Debug, Clone)]
pub struct InsertBatch {
    table: Table,
    rows: Vec<Vec<SqlValue>>,
}

/// One statement's worth of rows, a contiguous run of the batch.
#[derive(Debug, Clone)]
pub struct InsertStatement<'a> {
    pub table: Table,
    pub rows: &'a [Vec<SqlValue>],
}

impl InsertStatement<'_> {
    pub fn columns(&self) -> &'static [&'static str] {
        self.table.insert_columns()
    }

    pub fn returns_ids(&self) -> bool {
        self.table.has_id()
    }
}

impl InsertBatch {
    pub fn new(table: Table) -> Self {
        Self {
            table,
            rows: Vec::new(),
        }
    }

    pub fn from_rows<R: Insertable>(rows: &[R]) -> Result<Self> {
        let mut batch = Self::new(R::TABLE);
        batch.rows.reserve(rows.len());
        for row in rows {
            batch.push_row(row.values()?)?;
        }
        Ok(batch)
    }

    pub fn push_row(&mut self, row: Vec<SqlValue>) -> Result<()> {
        let expected = self.table.insert_columns().len();
        if row.len() != expected {
            return Err(SeedError::ColumnMismatch {
                table: self.table,
                expected,
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn table(&self) -> Table {
        self.table
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows_per_statement(&self) -> usize {
        MAX_BIND_PARAMS / self.table.insert_columns().len()
    }

    /// Split the batch into statements. Empty batches yield nothing.
    pub fn statements(&self) -> Vec<InsertStatement<'_>> {
        self.rows
            .chunks(self.rows_per_statement())
            .map(|rows| InsertStatement {
                table: self.table,
                rows,
            })
            .collect()
    }
}

/// Insert generated rows and return their ids in submission order.
///
/// Tables without a surrogate id return an empty list. Nothing is sent for
/// an empty slice.
pub async fn insert_rows<R: Insertable>(tx: &mut dyn SeedTx, rows: &[R]) -> Result<Vec<i64>> {
    let batch = InsertBatch::from_rows(rows)?;
    if batch.is_empty() {
        return Ok(Vec::new());
    }

    let mut ids = Vec::with_capacity(if batch.table().has_id() { batch.len() } else { 0 });
    for statement in batch.statements() {
        debug!(
            table = %statement.table,
            rows = statement.rows.len(),
            "executing batch insert"
        );
        let returned = tx.insert(&statement).await?;
        ids.extend(returned);
    }

    if batch.table().has_id() && ids.len() != batch.len() {
        return Err(SeedError::ReturnedIdMismatch {
            table: batch.table(),
            expected: batch.len(),
            returned: ids.len(),
        });
    }
    Ok(ids)
}
