use std::future::Future;
use std::pin::Pin;

use crate::init::init_backend;
use crate::{GenealogyBackend, GenealogyError, GenealogyTransaction, QueryResult, Value};

pub type EngineTransactionFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, GenealogyError>> + 'a>>;

pub struct BootArgs {
    pub backend: Box<dyn GenealogyBackend + Send + Sync>,
}

impl BootArgs {
    pub fn new(backend: Box<dyn GenealogyBackend + Send + Sync>) -> Self {
        Self { backend }
    }
}

pub struct Engine {
    backend: Box<dyn GenealogyBackend + Send + Sync>,
}

pub fn boot(args: BootArgs) -> Engine {
    Engine {
        backend: args.backend,
    }
}

impl Engine {
    pub async fn init(&self) -> Result<(), GenealogyError> {
        init_backend(self.backend.as_ref()).await
    }

    pub async fn execute(&self, sql: &str, params: &[Value]) -> Result<QueryResult, GenealogyError> {
        self.backend.execute(sql, params).await
    }

    async fn begin_transaction(&self) -> Result<EngineTransaction<'_>, GenealogyError> {
        let transaction = self.backend.begin_transaction().await?;
        Ok(EngineTransaction {
            transaction: Some(transaction),
        })
    }

    pub async fn transaction<T, F>(&self, f: F) -> Result<T, GenealogyError>
    where
        F: for<'tx> FnOnce(&'tx mut EngineTransaction<'_>) -> EngineTransactionFuture<'tx, T>,
    {
        let mut transaction = self.begin_transaction().await?;
        match f(&mut transaction).await {
            Ok(value) => {
                transaction.commit().await?;
                Ok(value)
            }
            Err(error) => {
                let _ = transaction.rollback().await;
                Err(error)
            }
        }
    }
}

#[must_use = "EngineTransaction must be committed or rolled back"]
pub struct EngineTransaction<'a> {
    transaction: Option<Box<dyn GenealogyTransaction + 'a>>,
}

impl EngineTransaction<'_> {
    pub async fn execute(
        &mut self,
        sql: &str,
        params: &[Value],
    ) -> Result<QueryResult, GenealogyError> {
        let transaction = self
            .transaction
            .as_mut()
            .ok_or_else(|| GenealogyError::backend("transaction is no longer active"))?;
        transaction.execute(sql, params).await
    }

    pub async fn commit(mut self) -> Result<(), GenealogyError> {
        let transaction = self
            .transaction
            .take()
            .ok_or_else(|| GenealogyError::backend("transaction is no longer active"))?;
        transaction.commit().await
    }

    pub async fn rollback(mut self) -> Result<(), GenealogyError> {
        let transaction = self
            .transaction
            .take()
            .ok_or_else(|| GenealogyError::backend("transaction is no longer active"))?;
        transaction.rollback().await
    }
}

impl Drop for EngineTransaction<'_> {
    fn drop(&mut self) {
        if self.transaction.is_some() && !std::thread::panicking() {
            panic!("EngineTransaction dropped without commit() or rollback()");
        }
    }
}
