//! Batch inserts that span more than one statement.

mod support;

use marketseed_core::models::NewSkill;
use marketseed_core::{insert_rows, SeedError, SeedStore, SqlValue, Table, MAX_BIND_PARAMS};
use support::MemoryStore;

/// Enough two-column rows to need a second statement.
fn skills_past_bind_limit() -> Vec<NewSkill> {
    (0..MAX_BIND_PARAMS / 2 + 10)
        .map(|i| NewSkill {
            name: format!("Skill {i}"),
            category_id: 1,
        })
        .collect()
}

#[tokio::test]
async fn chunked_insert_returns_ids_in_submission_order() {
    let store = MemoryStore::new();
    let rows = skills_past_bind_limit();

    let mut tx = store.begin().await.unwrap();
    let ids = insert_rows(&mut *tx, &rows).await.unwrap();
    tx.commit().await.unwrap();

    assert_eq!(store.statements(), 2);
    assert_eq!(ids.len(), rows.len());

    let landed = store.committed(Table::Skills);
    let landed_ids: Vec<i64> = landed.iter().map(|(id, _)| *id).collect();
    assert_eq!(landed_ids, ids);
    for index in [0, MAX_BIND_PARAMS / 2 - 1, MAX_BIND_PARAMS / 2, rows.len() - 1] {
        assert_eq!(landed[index].1[0], SqlValue::from(format!("Skill {index}")));
    }
}

#[tokio::test]
async fn short_id_list_across_chunks_is_an_error() {
    let store = MemoryStore::short_ids_for(Table::Skills);
    let rows = skills_past_bind_limit();

    let mut tx = store.begin().await.unwrap();
    let err = insert_rows(&mut *tx, &rows).await.unwrap_err();
    tx.rollback().await.unwrap();

    match err {
        SeedError::ReturnedIdMismatch {
            table,
            expected,
            returned,
        } => {
            assert_eq!(table, Table::Skills);
            assert_eq!(expected, rows.len());
            assert_eq!(returned, rows.len() - 2);
        }
        other => panic!("expected an id mismatch, got {other}"),
    }
    assert_eq!(store.total_rows(), 0);
}
