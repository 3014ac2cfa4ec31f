use crate::errors::{child_lp_not_found_error, parent_lp_not_found_error};
use crate::link::{insert_link, new_link_id, now_rfc3339, GenealogyLink, OperationType};
use crate::stores::{LicensePlateStore, WorkOrderStore};
use crate::validate::{
    ensure_not_duplicate, ensure_not_self, ensure_positive_quantity, ensure_same_org,
    ensure_work_order, resolve_lp_or,
};
use crate::{Engine, GenealogyError};

/// "This parent unit was consumed to make/advance this child unit."
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LinkConsumptionInput {
    pub org_id: String,
    pub parent_lp_id: String,
    pub child_lp_id: String,
    pub wo_id: String,
    pub quantity: f64,
    pub operation_id: Option<String>,
    pub operation_date: Option<String>,
    pub created_by: String,
}

pub async fn link_consumption(
    engine: &Engine,
    lp_store: &dyn LicensePlateStore,
    wo_store: &dyn WorkOrderStore,
    input: LinkConsumptionInput,
) -> Result<GenealogyLink, GenealogyError> {
    let parent = resolve_lp_or(lp_store, &input.parent_lp_id, parent_lp_not_found_error).await?;
    ensure_not_self(&input.parent_lp_id, &input.child_lp_id)?;
    let child = resolve_lp_or(lp_store, &input.child_lp_id, child_lp_not_found_error).await?;
    ensure_same_org(&input.org_id, &parent, &child)?;
    ensure_positive_quantity(input.quantity)?;
    ensure_work_order(wo_store, &input.wo_id).await?;
    ensure_not_duplicate(
        engine,
        &input.org_id,
        &input.parent_lp_id,
        &input.child_lp_id,
        OperationType::Consume,
    )
    .await?;

    let created_at = now_rfc3339();
    let link = GenealogyLink {
        id: new_link_id(),
        org_id: input.org_id,
        parent_lp_id: input.parent_lp_id,
        child_lp_id: input.child_lp_id,
        operation_type: OperationType::Consume,
        quantity: input.quantity,
        operation_date: input.operation_date.unwrap_or_else(|| created_at.clone()),
        wo_id: Some(input.wo_id),
        operation_id: input.operation_id,
        is_reversed: false,
        reversed_at: None,
        reversed_by: None,
        created_at,
        created_by: input.created_by,
    };
    insert_link(engine, &link).await?;
    Ok(link)
}
