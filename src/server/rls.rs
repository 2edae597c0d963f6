//! Row-level-security context for the request's database work.
//!
//! Each authenticated API request gets its own transaction with the subject
//! identifier bound transaction-locally (`set_config(..., true)`, i.e. SET
//! LOCAL semantics). Pool connections are shared across requests, so a
//! session-level SET would leak the identity to whichever request borrows
//! the connection next; the transaction scope is the isolation boundary.

use std::sync::Arc;

use sqlx::{PgPool, Postgres, Transaction};
use tokio::sync::Mutex;

/// The Postgres setting read by row-level-security policies.
pub const RLS_SUBJECT_VAR: &str = "app.current_subject";

/// A per-request database scope with the caller's subject bound for RLS.
///
/// Cloned into request extensions; handlers lock the transaction to run
/// queries, and the bridge commits it once the response is built.
#[derive(Clone)]
pub struct RequestScope {
    subject: String,
    tx: Arc<Mutex<Option<Transaction<'static, Postgres>>>>,
}

impl RequestScope {
    /// Begin a transaction on `pool` and bind `subject` to the RLS variable
    /// within it.
    pub async fn open(pool: &PgPool, subject: &str) -> sqlx::Result<Self> {
        let mut tx = pool.begin().await?;
        sqlx::query("SELECT set_config($1, $2, true)")
            .bind(RLS_SUBJECT_VAR)
            .bind(subject)
            .execute(&mut *tx)
            .await?;
        Ok(Self {
            subject: subject.to_string(),
            tx: Arc::new(Mutex::new(Some(tx))),
        })
    }

    /// Scope without a live transaction, for exercising the handler-facing
    /// surface where no database is available.
    #[cfg(test)]
    pub(crate) fn detached(subject: &str) -> Self {
        Self {
            subject: subject.to_string(),
            tx: Arc::new(Mutex::new(None)),
        }
    }

    /// The subject bound to this scope.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Lock the scope's transaction for query execution. The guard holds
    /// `None` once the scope has been committed.
    pub async fn transaction(
        &self,
    ) -> tokio::sync::OwnedMutexGuard<Option<Transaction<'static, Postgres>>> {
        Arc::clone(&self.tx).lock_owned().await
    }

    /// Commit the request's work. Idempotent: committing twice (or after the
    /// transaction was taken elsewhere) is a no-op.
    pub async fn commit(&self) -> sqlx::Result<()> {
        let tx = self.tx.lock().await.take();
        match tx {
            Some(tx) => tx.commit().await,
            None => Ok(()),
        }
    }
}
