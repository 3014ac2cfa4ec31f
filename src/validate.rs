//! Referential and business checks that gate every link write. Each check is
//! a distinct failure mode; the write operations compose them in a fixed
//! order so callers see stable error codes.

use crate::errors::{
    cross_org_violation_error, duplicate_link_error, invalid_quantity_error, self_reference_error,
    work_order_not_found_error,
};
use crate::link::OperationType;
use crate::stores::{LicensePlateRef, LicensePlateStore, WorkOrderStore};
use crate::{Engine, GenealogyError, Value};

pub(crate) async fn resolve_lp_or(
    store: &dyn LicensePlateStore,
    lp_id: &str,
    missing: fn(&str) -> GenealogyError,
) -> Result<LicensePlateRef, GenealogyError> {
    store.resolve_lp(lp_id).await?.ok_or_else(|| missing(lp_id))
}

pub(crate) async fn ensure_work_order(
    store: &dyn WorkOrderStore,
    wo_id: &str,
) -> Result<(), GenealogyError> {
    store
        .resolve_work_order(wo_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| work_order_not_found_error(wo_id))
}

pub(crate) fn ensure_not_self(parent_lp_id: &str, child_lp_id: &str) -> Result<(), GenealogyError> {
    if parent_lp_id == child_lp_id {
        return Err(self_reference_error(parent_lp_id));
    }
    Ok(())
}

pub(crate) fn ensure_same_org(
    org_id: &str,
    parent: &LicensePlateRef,
    child: &LicensePlateRef,
) -> Result<(), GenealogyError> {
    if parent.org_id != org_id || child.org_id != org_id {
        return Err(cross_org_violation_error(&parent.id, &child.id));
    }
    Ok(())
}

pub(crate) fn ensure_positive_quantity(quantity: f64) -> Result<(), GenealogyError> {
    if !(quantity > 0.0) {
        return Err(invalid_quantity_error(quantity));
    }
    Ok(())
}

/// Fast path for the friendlier error message. The partial unique index on
/// `(parent_lp_id, child_lp_id, operation_type) WHERE is_reversed = 0` is the
/// authoritative guard against a racing insert.
pub(crate) async fn ensure_not_duplicate(
    engine: &Engine,
    org_id: &str,
    parent_lp_id: &str,
    child_lp_id: &str,
    operation_type: OperationType,
) -> Result<(), GenealogyError> {
    let existing = engine
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
    if !existing.rows.is_empty() {
        return Err(duplicate_link_error(
            parent_lp_id,
            child_lp_id,
            operation_type.as_str(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{ensure_not_self, ensure_positive_quantity, ensure_same_org};
    use crate::errors::ErrorCode;
    use crate::stores::LicensePlateRef;

    fn plate(id: &str, org_id: &str) -> LicensePlateRef {
        LicensePlateRef {
            id: id.to_string(),
            org_id: org_id.to_string(),
            quantity: 100.0,
        }
    }

    #[test]
    fn self_reference_is_rejected() {
        let error = ensure_not_self("lp-1", "lp-1").unwrap_err();
        assert_eq!(error.code, ErrorCode::SelfReference);
        assert!(ensure_not_self("lp-1", "lp-2").is_ok());
    }

    #[test]
    fn cross_org_is_rejected_for_either_side() {
        let error = ensure_same_org("org-a", &plate("lp-1", "org-a"), &plate("lp-2", "org-b"))
            .unwrap_err();
        assert_eq!(error.code, ErrorCode::CrossOrgViolation);

        let error = ensure_same_org("org-a", &plate("lp-1", "org-b"), &plate("lp-2", "org-a"))
            .unwrap_err();
        assert_eq!(error.code, ErrorCode::CrossOrgViolation);

        assert!(ensure_same_org("org-a", &plate("lp-1", "org-a"), &plate("lp-2", "org-a")).is_ok());
    }

    #[test]
    fn zero_and_negative_quantities_are_rejected() {
        assert_eq!(
            ensure_positive_quantity(0.0).unwrap_err().code,
            ErrorCode::InvalidQuantity
        );
        assert_eq!(
            ensure_positive_quantity(-10.0).unwrap_err().code,
            ErrorCode::InvalidQuantity
        );
        assert_eq!(
            ensure_positive_quantity(f64::NAN).unwrap_err().code,
            ErrorCode::InvalidQuantity
        );
        assert!(ensure_positive_quantity(0.5).is_ok());
    }
}
