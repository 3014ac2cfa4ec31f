use crate::errors::{empty_input_set_error, output_lp_not_found_error, parent_lp_not_found_error};
use crate::link::{insert_link_tx, new_link_id, now_rfc3339, GenealogyLink, OperationType};
use crate::stores::{LicensePlateStore, WorkOrderStore};
use crate::validate::{
    ensure_not_duplicate, ensure_not_self, ensure_positive_quantity, ensure_same_org,
    ensure_work_order, resolve_lp_or,
};
use crate::{Engine, GenealogyError};

/// "These N consumed units produced this one output unit." One link per
/// consumed LP, all pointing at the output LP, written as one batch.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LinkOutputInput {
    pub org_id: String,
    pub consumed_lp_ids: Vec<String>,
    pub output_lp_id: String,
    pub wo_id: String,
    pub created_by: String,
}

pub async fn link_output(
    engine: &Engine,
    lp_store: &dyn LicensePlateStore,
    wo_store: &dyn WorkOrderStore,
    input: LinkOutputInput,
) -> Result<Vec<GenealogyLink>, GenealogyError> {
    if input.consumed_lp_ids.is_empty() {
        return Err(empty_input_set_error("link_output"));
    }
    let output = resolve_lp_or(lp_store, &input.output_lp_id, output_lp_not_found_error).await?;
    ensure_work_order(wo_store, &input.wo_id).await?;

    let created_at = now_rfc3339();
    let mut links = Vec::with_capacity(input.consumed_lp_ids.len());
    for consumed_lp_id in &input.consumed_lp_ids {
        let consumed = resolve_lp_or(lp_store, consumed_lp_id, parent_lp_not_found_error).await?;
        ensure_not_self(consumed_lp_id, &input.output_lp_id)?;
        ensure_same_org(&input.org_id, &consumed, &output)?;
        ensure_positive_quantity(consumed.quantity)?;
        ensure_not_duplicate(
            engine,
            &input.org_id,
            consumed_lp_id,
            &input.output_lp_id,
            OperationType::Output,
        )
        .await?;

        links.push(GenealogyLink {
            id: new_link_id(),
            org_id: input.org_id.clone(),
            parent_lp_id: consumed_lp_id.clone(),
            child_lp_id: input.output_lp_id.clone(),
            operation_type: OperationType::Output,
            quantity: consumed.quantity,
            operation_date: created_at.clone(),
            wo_id: Some(input.wo_id.clone()),
            operation_id: None,
            is_reversed: false,
            reversed_at: None,
            reversed_by: None,
            created_at: created_at.clone(),
            created_by: input.created_by.clone(),
        });
    }

    // All rows land in one transaction so a partial fan-in is never visible.
    let links = engine
        .transaction(|tx| {
            Box::pin(async move {
                for link in &links {
                    insert_link_tx(tx, link).await?;
                }
                Ok(links)
            })
        })
        .await?;
    Ok(links)
}
