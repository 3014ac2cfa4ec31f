use crate::errors::{already_reversed_error, link_not_found_error};
use crate::link::{link_from_row, now_rfc3339, GenealogyLink, LINK_COLUMNS};
use crate::{Engine, GenealogyError, Value};

/// Marks a link as reversed without deleting it. One-way: reversing an
/// already-reversed link is rejected; callers that need the edge back create
/// a fresh link.
pub async fn reverse_link(
    engine: &Engine,
    org_id: &str,
    link_id: &str,
    reversed_by: &str,
) -> Result<GenealogyLink, GenealogyError> {
    let org_id = org_id.to_string();
    let link_id = link_id.to_string();
    let reversed_by = reversed_by.to_string();
    engine
        .transaction(|tx| {
            Box::pin(async move {
                let select_sql =
                    format!("SELECT {LINK_COLUMNS} FROM genealogy_link WHERE id = ? AND org_id = ?");
                let existing = tx
                    .execute(
                        &select_sql,
                        &[Value::Text(link_id.clone()), Value::Text(org_id.clone())],
                    )
                    .await?;
                // An id owned by another org reads as not-found so tenants
                // cannot probe for foreign link ids.
                let row = existing
                    .rows
                    .first()
                    .ok_or_else(|| link_not_found_error(&link_id))?;
                let mut link = link_from_row(row)?;
                if link.is_reversed {
                    return Err(already_reversed_error(&link_id));
                }

                let reversed_at = now_rfc3339();
                tx.execute(
                    "UPDATE genealogy_link \
                     SET is_reversed = 1, reversed_at = ?, reversed_by = ? \
                     WHERE id = ? AND is_reversed = 0",
                    &[
                        Value::Text(reversed_at.clone()),
                        Value::Text(reversed_by.clone()),
                        Value::Text(link_id.clone()),
                    ],
                )
                .await?;

                link.is_reversed = true;
                link.reversed_at = Some(reversed_at);
                link.reversed_by = Some(reversed_by);
                Ok(link)
            })
        })
        .await
}
