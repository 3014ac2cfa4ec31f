use crate::GenealogyBackend;
use crate::GenealogyError;

// The active-edge index is a partial unique index so duplicate prevention is
// enforced by storage, not only by the validator's read-then-check fast path.
// Reversed rows fall out of the index, which is what allows a corrected edge
// to be re-created.
const INIT_STATEMENTS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS genealogy_link (\
     id TEXT PRIMARY KEY,\
     org_id TEXT NOT NULL,\
     parent_lp_id TEXT NOT NULL,\
     child_lp_id TEXT NOT NULL,\
     operation_type TEXT NOT NULL,\
     quantity REAL NOT NULL CHECK (quantity > 0),\
     operation_date TEXT NOT NULL,\
     wo_id TEXT,\
     operation_id TEXT,\
     is_reversed INTEGER NOT NULL DEFAULT 0,\
     reversed_at TEXT,\
     reversed_by TEXT,\
     created_at TEXT NOT NULL,\
     created_by TEXT NOT NULL,\
     CHECK (parent_lp_id <> child_lp_id)\
     )",
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_genealogy_link_active_edge \
     ON genealogy_link (parent_lp_id, child_lp_id, operation_type) \
     WHERE is_reversed = 0",
    "CREATE INDEX IF NOT EXISTS idx_genealogy_link_parent \
     ON genealogy_link (org_id, parent_lp_id)",
    "CREATE INDEX IF NOT EXISTS idx_genealogy_link_child \
     ON genealogy_link (org_id, child_lp_id)",
    "CREATE INDEX IF NOT EXISTS idx_genealogy_link_wo \
     ON genealogy_link (org_id, wo_id)",
];

pub async fn init_backend(backend: &dyn GenealogyBackend) -> Result<(), GenealogyError> {
    for statement in INIT_STATEMENTS {
        backend.execute(statement, &[]).await?;
    }
    Ok(())
}
