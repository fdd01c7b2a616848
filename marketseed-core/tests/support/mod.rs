//! In-memory `SeedStore` with transactional staging, for pipeline tests.
#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use marketseed_core::models::{ProjectRef, ProjectStatus};
use marketseed_core::{
    IdSet, InsertStatement, Maintenance, OrphanCheck, Result, SeedError, SeedStore, SeedTx,
    SqlValue, Table,
};

type Rows = BTreeMap<Table, Vec<(i64, Vec<SqlValue>)>>;

#[derive(Default)]
struct State {
    committed: Rows,
    next_id: i64,
    commits: usize,
    rollbacks: usize,
    statements: usize,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    /// Fail any INSERT carrying at least this many rows.
    fail_at_rows: Option<usize>,
    /// Return one id fewer than rows inserted into this table, per statement.
    short_ids: Option<Table>,
    /// Silently drop this many of a table's pending rows at commit.
    lose_on_commit: Option<(Table, usize)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_at_rows(rows: usize) -> Self {
        Self {
            fail_at_rows: Some(rows),
            ..Self::default()
        }
    }

    pub fn short_ids_for(table: Table) -> Self {
        Self {
            short_ids: Some(table),
            ..Self::default()
        }
    }

    pub fn losing_on_commit(table: Table, rows: usize) -> Self {
        Self {
            lose_on_commit: Some((table, rows)),
            ..Self::default()
        }
    }

    pub fn committed(&self, table: Table) -> Vec<(i64, Vec<SqlValue>)> {
        let state = self.state.lock().unwrap();
        state.committed.get(&table).cloned().unwrap_or_default()
    }

    pub fn rows(&self, table: Table) -> usize {
        let state = self.state.lock().unwrap();
        state.committed.get(&table).map_or(0, Vec::len)
    }

    pub fn total_rows(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.committed.values().map(Vec::len).sum()
    }

    pub fn commits(&self) -> usize {
        self.state.lock().unwrap().commits
    }

    pub fn rollbacks(&self) -> usize {
        self.state.lock().unwrap().rollbacks
    }

    pub fn statements(&self) -> usize {
        self.state.lock().unwrap().statements
    }

    /// Inject a committed row directly, bypassing a stage.
    pub fn plant(&self, table: Table, values: Vec<SqlValue>) -> i64 {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = state.next_id;
        state.committed.entry(table).or_default().push((id, values));
        id
    }

    fn column_value<'r>(table: Table, row: &'r [SqlValue], column: &str) -> &'r SqlValue {
        let index = table
            .insert_columns()
            .iter()
            .position(|c| *c == column)
            .unwrap_or_else(|| panic!("{table} has no column {column}"));
        &row[index]
    }
}

fn text<'a>(value: &'a SqlValue) -> &'a str {
    match value {
        SqlValue::Text(text) => text,
        other => panic!("expected text, got {other:?}"),
    }
}

fn key(value: &SqlValue) -> Option<i64> {
    match value {
        SqlValue::BigInt(id) => Some(*id),
        SqlValue::OptBigInt(id) => *id,
        SqlValue::Int(id) => Some(i64::from(*id)),
        other => panic!("expected a key, got {other:?}"),
    }
}

pub struct MemoryTx<'a> {
    store: &'a MemoryStore,
    pending: Rows,
    truncate: bool,
}

impl MemoryTx<'_> {
    /// Committed rows plus this transaction's own writes.
    fn visible(&self, table: Table) -> Vec<(i64, Vec<SqlValue>)> {
        let state = self.store.state.lock().unwrap();
        let mut rows = state.committed.get(&table).cloned().unwrap_or_default();
        rows.extend(self.pending.get(&table).cloned().unwrap_or_default());
        rows
    }

    fn ids_where(&self, table: Table, keep: impl Fn(&[SqlValue]) -> bool) -> Vec<i64> {
        self.visible(table)
            .into_iter()
            .filter(|(_, row)| keep(row))
            .map(|(id, _)| id)
            .collect()
    }
}

#[async_trait]
impl SeedTx for MemoryTx<'_> {
    async fn fetch_ids(&mut self, set: IdSet) -> Result<Vec<i64>> {
        let col = MemoryStore::column_value;
        let ids = match set {
            IdSet::Categories => self.ids_where(Table::Categories, |_| true),
            IdSet::Skills => self.ids_where(Table::Skills, |_| true),
            IdSet::ActiveUsers => self.ids_where(Table::Users, |row| {
                text(col(Table::Users, row, "status")) == "active"
            }),
            IdSet::ActiveClients => self.ids_where(Table::Users, |row| {
                text(col(Table::Users, row, "status")) == "active"
                    && text(col(Table::Users, row, "role")) == "client"
            }),
            IdSet::ActiveFreelancers => self.ids_where(Table::Users, |row| {
                text(col(Table::Users, row, "status")) == "active"
                    && text(col(Table::Users, row, "role")) == "freelancer"
            }),
            IdSet::OpenJobs => self.ids_where(Table::Jobs, |row| {
                text(col(Table::Jobs, row, "status")) == "open"
            }),
        };
        Ok(ids)
    }

    async fn fetch_projects(&mut self, completed_only: bool) -> Result<Vec<ProjectRef>> {
        let col = MemoryStore::column_value;
        let projects = self
            .visible(Table::Projects)
            .into_iter()
            .map(|(id, row)| {
                let status = ProjectStatus::parse(text(col(Table::Projects, &row, "status")))
                    .expect("valid project status");
                let agreed_amount = match col(Table::Projects, &row, "agreed_amount") {
                    SqlValue::Numeric(amount) => *amount,
                    other => panic!("expected numeric, got {other:?}"),
                };
                let start_date = match col(Table::Projects, &row, "start_date") {
                    SqlValue::Date(date) => *date,
                    other => panic!("expected date, got {other:?}"),
                };
                ProjectRef {
                    id,
                    client_id: key(col(Table::Projects, &row, "client_id")).unwrap(),
                    freelancer_id: key(col(Table::Projects, &row, "freelancer_id")).unwrap(),
                    agreed_amount,
                    status,
                    start_date,
                }
            })
            .filter(|p| !completed_only || p.status == ProjectStatus::Completed)
            .collect();
        Ok(projects)
    }

    async fn insert(&mut self, statement: &InsertStatement<'_>) -> Result<Vec<i64>> {
        let mut state = self.store.state.lock().unwrap();
        state.statements += 1;
        if let Some(limit) = self.store.fail_at_rows {
            if statement.rows.len() >= limit {
                return Err(SeedError::database(
                    format!("inserting into {}", statement.table),
                    std::io::Error::new(std::io::ErrorKind::Other, "constraint violation"),
                ));
            }
        }

        let mut ids = Vec::new();
        for row in statement.rows {
            state.next_id += 1;
            let id = state.next_id;
            self.pending
                .entry(statement.table)
                .or_default()
                .push((id, row.clone()));
            if statement.returns_ids() {
                ids.push(id);
            }
        }
        if self.store.short_ids == Some(statement.table) {
            ids.pop();
        }
        Ok(ids)
    }

    async fn execute(&mut self, statement: Maintenance) -> Result<u64> {
        if statement == Maintenance::Truncate {
            self.truncate = true;
            self.pending.clear();
        }
        Ok(0)
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let MemoryTx {
            store,
            mut pending,
            truncate,
        } = *self;
        if let Some((table, lost)) = store.lose_on_commit {
            if let Some(rows) = pending.get_mut(&table) {
                rows.truncate(rows.len().saturating_sub(lost));
            }
        }
        let mut state = store.state.lock().unwrap();
        state.commits += 1;
        if truncate {
            state.committed.clear();
        }
        for (table, rows) in pending {
            state.committed.entry(table).or_default().extend(rows);
        }
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.store.state.lock().unwrap().rollbacks += 1;
        Ok(())
    }
}

#[async_trait]
impl SeedStore for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn SeedTx + '_>> {
        Ok(Box::new(MemoryTx {
            store: self,
            pending: Rows::new(),
            truncate: false,
        }))
    }

    async fn count_rows(&self, table: Table) -> Result<i64> {
        Ok(self.rows(table) as i64)
    }

    async fn count_orphans(&self, check: &OrphanCheck) -> Result<i64> {
        let state = self.state.lock().unwrap();
        let parents: HashSet<i64> = state
            .committed
            .get(&check.parent)
            .map(|rows| rows.iter().map(|(id, _)| *id).collect())
            .unwrap_or_default();
        let orphans = state
            .committed
            .get(&check.child)
            .map(|rows| {
                rows.iter()
                    .filter_map(|(_, row)| key(MemoryStore::column_value(check.child, row, check.column)))
                    .filter(|id| !parents.contains(id))
                    .count()
            })
            .unwrap_or(0);
        Ok(orphans as i64)
    }
}
