use crate::errors::{child_lp_not_found_error, source_lp_not_found_error};
use crate::link::{insert_link, new_link_id, now_rfc3339, GenealogyLink, OperationType};
use crate::stores::LicensePlateStore;
use crate::validate::{
    ensure_not_duplicate, ensure_not_self, ensure_positive_quantity, ensure_same_org,
    resolve_lp_or,
};
use crate::{Engine, GenealogyError};

/// Splits are warehouse operations, not production events, so the link never
/// carries a work order.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LinkSplitInput {
    pub org_id: String,
    pub source_lp_id: String,
    pub new_lp_id: String,
    pub quantity: f64,
    pub created_by: String,
}

pub async fn link_split(
    engine: &Engine,
    lp_store: &dyn LicensePlateStore,
    input: LinkSplitInput,
) -> Result<GenealogyLink, GenealogyError> {
    ensure_not_self(&input.source_lp_id, &input.new_lp_id)?;
    ensure_positive_quantity(input.quantity)?;
    let source = resolve_lp_or(lp_store, &input.source_lp_id, source_lp_not_found_error).await?;
    let new_lp = resolve_lp_or(lp_store, &input.new_lp_id, child_lp_not_found_error).await?;
    ensure_same_org(&input.org_id, &source, &new_lp)?;
    ensure_not_duplicate(
        engine,
        &input.org_id,
        &input.source_lp_id,
        &input.new_lp_id,
        OperationType::Split,
    )
    .await?;

    let created_at = now_rfc3339();
    let link = GenealogyLink {
        id: new_link_id(),
        org_id: input.org_id,
        parent_lp_id: input.source_lp_id,
        child_lp_id: input.new_lp_id,
        operation_type: OperationType::Split,
        quantity: input.quantity,
        operation_date: created_at.clone(),
        wo_id: None,
        operation_id: None,
        is_reversed: false,
        reversed_at: None,
        reversed_by: None,
        created_at,
        created_by: input.created_by,
    };
    insert_link(engine, &link).await?;
    Ok(link)
}
