//! A competing write held open in its own transaction.
//!
//! The statement runs but does not commit, so its row stays locked. An action
//! started afterwards reads the last committed row, then blocks on the lock
//! in its conditional UPDATE. `commit_when_blocked` waits until that happens
//! and commits; Postgres then re-checks the blocked UPDATE's WHERE clause
//! against the committed row.

use std::time::Duration;

use anyhow::{bail, ensure, Result};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

pub struct HeldWrite {
    tx: Transaction<'static, Postgres>,
    xid: String,
}

impl HeldWrite {
    /// Run `sql` with `$1 = id` without committing. The statement must touch
    /// exactly one row.
    pub async fn start(pool: &PgPool, sql: &str, id: Uuid) -> Result<Self> {
        let mut tx = pool.begin().await?;
        let affected = sqlx::query(sql).bind(id).execute(&mut *tx).await?.rows_affected();
        ensure!(affected == 1, "held write touched {} rows", affected);

        let xid: String = sqlx::query_scalar("SELECT txid_current()::text")
            .fetch_one(&mut *tx)
            .await?;
        Ok(Self { tx, xid })
    }

    /// Commit once another session is waiting on this transaction's lock.
    pub async fn commit_when_blocked(self, pool: &PgPool) -> Result<()> {
        for _ in 0..500 {
            let waiting: i64 = sqlx::query_scalar(
                r#"
                SELECT COUNT(*) FROM pg_locks
                WHERE locktype = 'transactionid'
                  AND transactionid::text = $1
                  AND NOT granted
                "#,
            )
            .bind(&self.xid)
            .fetch_one(pool)
            .await?;

            if waiting > 0 {
                self.tx.commit().await?;
                return Ok(());
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        bail!("no writer blocked on transaction {}", self.xid)
    }
}
