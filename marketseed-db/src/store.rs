//! sqlx implementation of [`SeedStore`] and [`SeedTx`].

use async_trait::async_trait;
use marketseed_core::models::{ProjectRef, ProjectStatus};
use marketseed_core::{
    IdSet, InsertStatement, Maintenance, OrphanCheck, Result, SeedError, SeedStore, SeedTx,
    SqlValue, Table,
};
use sqlx::postgres::PgRow;
use sqlx::query_builder::Separated;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder, Row, Transaction};
use tracing::{debug, warn};

const PROJECTS_SQL: &str = r#"
    SELECT id::int8 AS id,
           client_id::int8 AS client_id,
           freelancer_id::int8 AS freelancer_id,
           agreed_amount::float8 AS agreed_amount,
           status::text AS status,
           start_date::date AS start_date
    FROM projects
"#;

fn projects_sql(completed_only: bool) -> String {
    if completed_only {
        format!("{PROJECTS_SQL} WHERE status = 'completed' ORDER BY id")
    } else {
        format!("{PROJECTS_SQL} ORDER BY id")
    }
}

fn push_value<'args>(
    row: &mut Separated<'_, 'args, Postgres, &'static str>,
    value: &'args SqlValue,
) {
    match value {
        SqlValue::Bool(v) => row.push_bind(*v),
        SqlValue::Int(v) => row.push_bind(*v),
        SqlValue::BigInt(v) => row.push_bind(*v),
        SqlValue::OptBigInt(v) => row.push_bind(*v),
        SqlValue::Numeric(v) => row.push_bind(*v),
        SqlValue::Text(v) => row.push_bind(v.as_str()),
        SqlValue::OptText(v) => row.push_bind(v.as_deref()),
        SqlValue::Timestamp(v) => row.push_bind(*v),
        SqlValue::Date(v) => row.push_bind(*v),
        SqlValue::OptDate(v) => row.push_bind(*v),
        SqlValue::Json(v) => row.push_bind(Json(v)),
    };
}

/// `INSERT INTO t (cols) VALUES ($1, ..), (..)` with one bind group per row.
fn insert_builder<'args>(statement: &InsertStatement<'args>) -> QueryBuilder<'args, Postgres> {
    let mut builder = QueryBuilder::new(format!(
        "INSERT INTO {} ({}) ",
        statement.table,
        statement.columns().join(", ")
    ));
    builder.push_values(statement.rows, |mut row, values| {
        for value in values {
            push_value(&mut row, value);
        }
    });
    if statement.returns_ids() {
        builder.push(" RETURNING id::int8 AS id");
    }
    builder
}

fn project_from_row(row: &PgRow) -> std::result::Result<Option<ProjectRef>, sqlx::Error> {
    let id: i64 = row.try_get("id")?;
    let status: String = row.try_get("status")?;
    let Some(status) = ProjectStatus::parse(&status) else {
        warn!(project_id = id, status = %status, "ignoring project with unknown status");
        return Ok(None);
    };
    Ok(Some(ProjectRef {
        id,
        client_id: row.try_get("client_id")?,
        freelancer_id: row.try_get("freelancer_id")?,
        agreed_amount: row.try_get("agreed_amount")?,
        status,
        start_date: row.try_get("start_date")?,
    }))
}

/// Pool-backed store. Cloning the pool is cheap; the store borrows nothing.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// One stage's transaction. Dropped without commit, sqlx rolls it back.
pub struct PgTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl SeedTx for PgTx {
    async fn fetch_ids(&mut self, set: IdSet) -> Result<Vec<i64>> {
        let ids: Vec<i64> = sqlx::query_scalar(set.sql())
            .fetch_all(&mut *self.tx)
            .await
            .map_err(|e| SeedError::database(format!("loading {}", set.describe()), e))?;
        debug!(set = set.describe(), count = ids.len(), "loaded parent ids");
        Ok(ids)
    }

    async fn fetch_projects(&mut self, completed_only: bool) -> Result<Vec<ProjectRef>> {
        let sql = projects_sql(completed_only);
        let rows = sqlx::query(&sql)
            .fetch_all(&mut *self.tx)
            .await
            .map_err(|e| SeedError::database("loading projects", e))?;

        let mut projects = Vec::with_capacity(rows.len());
        for row in &rows {
            let project =
                project_from_row(row).map_err(|e| SeedError::database("decoding project", e))?;
            projects.extend(project);
        }
        Ok(projects)
    }

    async fn insert(&mut self, statement: &InsertStatement<'_>) -> Result<Vec<i64>> {
        let context = || format!("inserting into {}", statement.table);

        let mut builder = insert_builder(statement);
        let query = builder.build();

        if !statement.returns_ids() {
            query
                .execute(&mut *self.tx)
                .await
                .map_err(|e| SeedError::database(context(), e))?;
            return Ok(Vec::new());
        }

        let rows = query
            .fetch_all(&mut *self.tx)
            .await
            .map_err(|e| SeedError::database(context(), e))?;
        rows.iter()
            .map(|row| row.try_get::<i64, _>("id"))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| SeedError::database(context(), e))
    }

    async fn execute(&mut self, statement: Maintenance) -> Result<u64> {
        let result = sqlx::query(statement.sql())
            .execute(&mut *self.tx)
            .await
            .map_err(|e| SeedError::database(format!("running {statement:?}"), e))?;
        Ok(result.rows_affected())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let PgTx { tx } = *self;
        tx.commit()
            .await
            .map_err(|e| SeedError::database("committing stage", e))
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        let PgTx { tx } = *self;
        tx.rollback()
            .await
            .map_err(|e| SeedError::database("rolling back stage", e))
    }
}

#[async_trait]
impl SeedStore for PgStore {
    async fn begin(&self) -> Result<Box<dyn SeedTx + '_>> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| SeedError::database("starting transaction", e))?;
        Ok(Box::new(PgTx { tx }))
    }

    async fn count_rows(&self, table: Table) -> Result<i64> {
        let sql = format!("SELECT COUNT(*)::int8 FROM {table}");
        sqlx::query_scalar(&sql)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| SeedError::database(format!("counting {table}"), e))
    }

    async fn count_orphans(&self, check: &OrphanCheck) -> Result<i64> {
        sqlx::query_scalar(&check.sql())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| SeedError::database(format!("checking {check}"), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marketseed_core::generators::reference;
    use marketseed_core::models::JobSkill;
    use marketseed_core::{insert_rows, DbConfig, InsertBatch, PoolConfig};

    #[test]
    fn completed_filter_applies_before_ordering() {
        let sql = projects_sql(true);
        let filter = sql.find("WHERE status = 'completed'").unwrap();
        let order = sql.find("ORDER BY id").unwrap();
        assert!(filter < order);
        assert!(!projects_sql(false).contains("WHERE"));
    }

    #[test]
    fn insert_sql_has_one_bind_group_per_row() {
        let rows = vec![
            JobSkill {
                job_id: 1,
                skill_id: 2,
            },
            JobSkill {
                job_id: 1,
                skill_id: 3,
            },
        ];
        let batch = InsertBatch::from_rows(&rows).unwrap();
        let statements = batch.statements();

        assert_eq!(
            insert_builder(&statements[0]).sql(),
            "INSERT INTO job_skills (job_id, skill_id) VALUES ($1, $2), ($3, $4)"
        );
    }

    #[test]
    fn id_tables_return_ids() {
        let categories = reference::categories();
        let batch = InsertBatch::from_rows(&categories[..1]).unwrap();
        let statements = batch.statements();

        assert_eq!(
            insert_builder(&statements[0]).sql(),
            "INSERT INTO categories (name, slug, description) VALUES ($1, $2, $3) \
             RETURNING id::int8 AS id"
        );
    }

    // Run with: DATABASE_URL=postgres://... cargo test -p marketseed-db -- --ignored
    // The marketplace schema must already exist; every test rolls back.

    async fn store() -> PgStore {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::create_pool(&DbConfig::new(url, &PoolConfig::default()))
            .await
            .expect("pool creation failed");
        PgStore::new(pool)
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn inserted_ids_are_visible_inside_the_transaction() {
        let store = store().await;
        let before = store.count_rows(Table::Categories).await.unwrap();

        let mut tx = store.begin().await.unwrap();
        let categories = reference::categories();
        let ids = insert_rows(&mut *tx, &categories).await.unwrap();
        assert_eq!(ids.len(), categories.len());

        let visible = tx.fetch_ids(IdSet::Categories).await.unwrap();
        assert!(ids.iter().all(|id| visible.contains(id)));

        let skills = reference::skills(&ids);
        let skill_ids = insert_rows(&mut *tx, &skills).await.unwrap();
        assert_eq!(skill_ids.len(), skills.len());
        tx.rollback().await.unwrap();

        assert_eq!(store.count_rows(Table::Categories).await.unwrap(), before);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn failed_insert_leaves_nothing_behind() {
        let store = store().await;
        let before = store.count_rows(Table::JobSkills).await.unwrap();

        let mut tx = store.begin().await.unwrap();
        // no job or skill has id -1, so the foreign key rejects the batch
        let rows = vec![JobSkill {
            job_id: -1,
            skill_id: -1,
        }];
        assert!(insert_rows(&mut *tx, &rows).await.is_err());
        tx.rollback().await.unwrap();

        assert_eq!(store.count_rows(Table::JobSkills).await.unwrap(), before);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn orphan_checks_run_against_schema() {
        let store = store().await;
        let report = marketseed_core::verify_all(&store).await.unwrap();
        assert_eq!(report.counts.len(), Table::ALL.len());
    }
}
