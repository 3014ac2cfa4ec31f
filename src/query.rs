use crate::link::{integer_at, OperationType};
use crate::{Engine, GenealogyError, Value};

/// Existence check for a non-reversed link, usable as an idempotency probe
/// before re-attempting a write.
pub async fn has_genealogy_link(
    engine: &Engine,
    org_id: &str,
    parent_lp_id: &str,
    child_lp_id: &str,
    operation_type: OperationType,
) -> Result<bool, GenealogyError> {
    let result = engine
        .execute(
            "SELECT id FROM genealogy_link \
             WHERE org_id = ? AND parent_lp_id = ? AND child_lp_id = ? \
               AND operation_type = ? AND is_reversed = 0 \
             LIMIT 1",
            &[
                Value::Text(org_id.to_string()),
                Value::Text(parent_lp_id.to_string()),
                Value::Text(child_lp_id.to_string()),
                Value::Text(operation_type.as_str().to_string()),
            ],
        )
        .await?;
    Ok(!result.rows.is_empty())
}

/// Total number of links touching an LP in either direction, reversed rows
/// included, for dashboard summaries.
pub async fn get_genealogy_count(
    engine: &Engine,
    org_id: &str,
    lp_id: &str,
) -> Result<u64, GenealogyError> {
    let result = engine
        .execute(
            "SELECT COUNT(*) FROM genealogy_link \
             WHERE org_id = ? AND (parent_lp_id = ? OR child_lp_id = ?)",
            &[
                Value::Text(org_id.to_string()),
                Value::Text(lp_id.to_string()),
                Value::Text(lp_id.to_string()),
            ],
        )
        .await?;
    let row = result
        .rows
        .first()
        .ok_or_else(|| GenealogyError::backend("count query returned no rows"))?;
    let count = integer_at(row, 0, "genealogy link count")?;
    Ok(count as u64)
}
