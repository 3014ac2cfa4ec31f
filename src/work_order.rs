use crate::link::{link_from_row, GenealogyLink, OperationType, LINK_COLUMNS};
use crate::{Engine, GenealogyError, Value};

/// All non-reversed links of one production run, grouped by operation type.
/// Split and merge links never carry a work order, so only consume and output
/// buckets exist by construction.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WorkOrderGenealogy {
    pub wo_id: String,
    pub consume: Vec<GenealogyLink>,
    pub output: Vec<GenealogyLink>,
}

pub async fn get_genealogy_by_wo(
    engine: &Engine,
    org_id: &str,
    wo_id: &str,
) -> Result<WorkOrderGenealogy, GenealogyError> {
    let sql = format!(
        "SELECT {LINK_COLUMNS} FROM genealogy_link \
         WHERE org_id = ? AND wo_id = ? AND is_reversed = 0 \
         ORDER BY created_at, id"
    );
    let result = engine
        .execute(
            &sql,
            &[
                Value::Text(org_id.to_string()),
                Value::Text(wo_id.to_string()),
            ],
        )
        .await?;

    let mut genealogy = WorkOrderGenealogy {
        wo_id: wo_id.to_string(),
        consume: Vec::new(),
        output: Vec::new(),
    };
    for row in &result.rows {
        let link = link_from_row(row)?;
        match link.operation_type {
            OperationType::Consume => genealogy.consume.push(link),
            OperationType::Output => genealogy.output.push(link),
            OperationType::Split | OperationType::Merge => {}
        }
    }
    Ok(genealogy)
}
