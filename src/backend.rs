use async_trait::async_trait;

use crate::{GenealogyError, QueryResult, Value};

#[async_trait(?Send)]
pub trait GenealogyBackend: Send + Sync {
    async fn execute(&self, sql: &str, params: &[Value]) -> Result<QueryResult, GenealogyError>;

    async fn begin_transaction(
        &self,
    ) -> Result<Box<dyn GenealogyTransaction + '_>, GenealogyError>;
}

#[async_trait(?Send)]
pub trait GenealogyTransaction {
    async fn execute(&mut self, sql: &str, params: &[Value])
        -> Result<QueryResult, GenealogyError>;

    async fn commit(self: Box<Self>) -> Result<(), GenealogyError>;

    async fn rollback(self: Box<Self>) -> Result<(), GenealogyError>;
}
