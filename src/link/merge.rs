use crate::errors::{
    empty_input_set_error, source_lp_not_found_error, target_in_sources_error,
    target_lp_not_found_error,
};
use crate::link::{insert_link_tx, new_link_id, now_rfc3339, GenealogyLink, OperationType};
use crate::stores::LicensePlateStore;
use crate::validate::{
    ensure_not_duplicate, ensure_positive_quantity, ensure_same_org, resolve_lp_or,
};
use crate::{Engine, GenealogyError};

/// One link per source LP, each pointing at the target. The quantity on each
/// link is the source LP's on-hand quantity at merge time.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LinkMergeInput {
    pub org_id: String,
    pub source_lp_ids: Vec<String>,
    pub target_lp_id: String,
    pub created_by: String,
}

pub async fn link_merge(
    engine: &Engine,
    lp_store: &dyn LicensePlateStore,
    input: LinkMergeInput,
) -> Result<Vec<GenealogyLink>, GenealogyError> {
    if input.source_lp_ids.is_empty() {
        return Err(empty_input_set_error("link_merge"));
    }
    if input
        .source_lp_ids
        .iter()
        .any(|source| source == &input.target_lp_id)
    {
        return Err(target_in_sources_error(&input.target_lp_id));
    }
    let target = resolve_lp_or(lp_store, &input.target_lp_id, target_lp_not_found_error).await?;

    let created_at = now_rfc3339();
    let mut links = Vec::with_capacity(input.source_lp_ids.len());
    for source_lp_id in &input.source_lp_ids {
        let source = resolve_lp_or(lp_store, source_lp_id, source_lp_not_found_error).await?;
        ensure_same_org(&input.org_id, &source, &target)?;
        ensure_positive_quantity(source.quantity)?;
        ensure_not_duplicate(
            engine,
            &input.org_id,
            source_lp_id,
            &input.target_lp_id,
            OperationType::Merge,
        )
        .await?;

        links.push(GenealogyLink {
            id: new_link_id(),
            org_id: input.org_id.clone(),
            parent_lp_id: source_lp_id.clone(),
            child_lp_id: input.target_lp_id.clone(),
            operation_type: OperationType::Merge,
            quantity: source.quantity,
            operation_date: created_at.clone(),
            wo_id: None,
            operation_id: None,
            is_reversed: false,
            reversed_at: None,
            reversed_by: None,
            created_at: created_at.clone(),
            created_by: input.created_by.clone(),
        });
    }

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
