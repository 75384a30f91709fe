//! Tenant-scoped transactions.
//!
//! Every write runs inside a transaction that sets `app.current_tenant_id`
//! with `SET LOCAL`, so the row-level security policies of the initial
//! migration only expose the tenant's own rows to non-owner roles.
//!
//! ```ignore
//! use budgetops_db::tenant::TenantTransaction;
//!
//! let txn = TenantTransaction::begin(&db, tenant_id).await?;
//! let lines = budget_lines::Entity::find().all(txn.connection()).await?;
//! txn.commit().await?;
//! ```

use sea_orm::{
    ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbBackend, DbErr, Statement,
    TransactionTrait,
};

use budgetops_shared::types::TenantId;

/// A transaction carrying the tenant context.
pub struct TenantTransaction {
    txn: DatabaseTransaction,
}

impl TenantTransaction {
    /// Begins a transaction and sets the tenant context for its duration.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started or the context
    /// cannot be set.
    pub async fn begin(db: &DatabaseConnection, tenant_id: TenantId) -> Result<Self, DbErr> {
        let txn = db.begin().await?;
        txn.execute_unprepared(&context_sql(tenant_id)).await?;
        Ok(Self { txn })
    }

    /// The underlying transaction.
    #[must_use]
    pub fn connection(&self) -> &DatabaseTransaction {
        &self.txn
    }

    /// Serializes writers on the same `(tenant, scope, key)` until commit.
    ///
    /// Used where no row exists yet to lock, such as creating a fiscal year.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock statement fails.
    pub async fn advisory_lock(
        &self,
        tenant_id: TenantId,
        scope: &str,
        key: i64,
    ) -> Result<(), DbErr> {
        self.txn
            .execute(Statement::from_sql_and_values(
                DbBackend::Postgres,
                "SELECT pg_advisory_xact_lock(hashtext($1), $2::int)",
                [format!("{tenant_id}:{scope}").into(), key.into()],
            ))
            .await?;
        Ok(())
    }

    /// Commits the transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails.
    pub async fn commit(self) -> Result<(), DbErr> {
        self.txn.commit().await
    }

    /// Rolls back the transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the rollback fails.
    pub async fn rollback(self) -> Result<(), DbErr> {
        self.txn.rollback().await
    }
}

fn context_sql(tenant_id: TenantId) -> String {
    format!("SET LOCAL app.current_tenant_id = '{tenant_id}'")
}
