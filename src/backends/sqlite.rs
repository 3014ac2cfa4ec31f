use async_trait::async_trait;
use rusqlite::{params_from_iter, Connection, Row};
use std::sync::{Mutex, MutexGuard};

use crate::{
    errors::duplicate_link_constraint_error, GenealogyBackend, GenealogyError, GenealogyTransaction,
    QueryResult, Value,
};

pub struct SqliteBackend {
    conn: Mutex<Connection>,
}

impl SqliteBackend {
    pub fn in_memory() -> Result<Self, GenealogyError> {
        let conn = Connection::open_in_memory().map_err(|err| GenealogyError::backend(err.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open(path: &str) -> Result<Self, GenealogyError> {
        let conn = Connection::open(path).map_err(|err| GenealogyError::backend(err.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, GenealogyError> {
        self.conn
            .lock()
            .map_err(|_| GenealogyError::backend("sqlite mutex poisoned"))
    }
}

#[async_trait(?Send)]
impl GenealogyBackend for SqliteBackend {
    async fn execute(&self, sql: &str, params: &[Value]) -> Result<QueryResult, GenealogyError> {
        let conn = self.lock()?;
        run_statement(&conn, sql, params)
    }

    async fn begin_transaction(
        &self,
    ) -> Result<Box<dyn GenealogyTransaction + '_>, GenealogyError> {
        let conn = self.lock()?;
        conn.execute_batch("BEGIN IMMEDIATE")
            .map_err(map_sqlite_error)?;
        Ok(Box::new(SqliteTransaction {
            conn,
            settled: false,
        }))
    }
}

struct SqliteTransaction<'a> {
    conn: MutexGuard<'a, Connection>,
    settled: bool,
}

#[async_trait(?Send)]
impl GenealogyTransaction for SqliteTransaction<'_> {
    async fn execute(
        &mut self,
        sql: &str,
        params: &[Value],
    ) -> Result<QueryResult, GenealogyError> {
        run_statement(&self.conn, sql, params)
    }

    async fn commit(mut self: Box<Self>) -> Result<(), GenealogyError> {
        self.conn.execute_batch("COMMIT").map_err(map_sqlite_error)?;
        self.settled = true;
        Ok(())
    }

    async fn rollback(mut self: Box<Self>) -> Result<(), GenealogyError> {
        self.conn
            .execute_batch("ROLLBACK")
            .map_err(map_sqlite_error)?;
        self.settled = true;
        Ok(())
    }
}

impl Drop for SqliteTransaction<'_> {
    fn drop(&mut self) {
        if !self.settled {
            let _ = self.conn.execute_batch("ROLLBACK");
        }
    }
}

fn run_statement(
    conn: &Connection,
    sql: &str,
    params: &[Value],
) -> Result<QueryResult, GenealogyError> {
    if params.is_empty() && sql.contains(';') {
        conn.execute_batch(sql).map_err(map_sqlite_error)?;
        return Ok(QueryResult {
            rows: Vec::new(),
            columns: Vec::new(),
        });
    }

    let mut stmt = conn.prepare(sql).map_err(map_sqlite_error)?;
    let columns = stmt
        .column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect::<Vec<_>>();
    let bound_params = params.iter().cloned().map(to_sql_value);
    let mut rows = stmt
        .query(params_from_iter(bound_params))
        .map_err(map_sqlite_error)?;
    let mut result_rows = Vec::new();
    while let Some(row) = rows.next().map_err(map_sqlite_error)? {
        result_rows.push(map_row(row)?);
    }
    Ok(QueryResult {
        rows: result_rows,
        columns,
    })
}

// The only unique index besides the primary key is the active-edge index, so a
// unique violation on genealogy_link is by definition a duplicate link.
fn map_sqlite_error(err: rusqlite::Error) -> GenealogyError {
    let message = err.to_string();
    if err.sqlite_error_code() == Some(rusqlite::ErrorCode::ConstraintViolation)
        && message.contains("genealogy_link.parent_lp_id")
    {
        return duplicate_link_constraint_error();
    }
    GenealogyError::backend(message)
}

fn map_row(row: &Row<'_>) -> Result<Vec<Value>, GenealogyError> {
    let mut values = Vec::new();
    for idx in 0..row.as_ref().column_count() {
        let value = row
            .get_ref(idx)
            .map_err(|err| GenealogyError::backend(err.to_string()))?;
        values.push(match value {
            rusqlite::types::ValueRef::Null => Value::Null,
            rusqlite::types::ValueRef::Integer(value) => Value::Integer(value),
            rusqlite::types::ValueRef::Real(value) => Value::Real(value),
            rusqlite::types::ValueRef::Text(value) => {
                Value::Text(String::from_utf8_lossy(value).to_string())
            }
            rusqlite::types::ValueRef::Blob(value) => Value::Blob(value.to_vec()),
        });
    }
    Ok(values)
}

fn to_sql_value(value: Value) -> rusqlite::types::Value {
    match value {
        Value::Null => rusqlite::types::Value::Null,
        Value::Integer(value) => rusqlite::types::Value::Integer(value),
        Value::Real(value) => rusqlite::types::Value::Real(value),
        Value::Text(value) => rusqlite::types::Value::Text(value),
        Value::Blob(value) => rusqlite::types::Value::Blob(value),
    }
}
