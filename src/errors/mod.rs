use crate::GenealogyError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ParentLpNotFound,
    ChildLpNotFound,
    OutputLpNotFound,
    SourceLpNotFound,
    TargetLpNotFound,
    WorkOrderNotFound,
    CrossOrgViolation,
    SelfReference,
    InvalidQuantity,
    DuplicateLink,
    EmptyInputSet,
    TargetInSources,
    LinkNotFound,
    AlreadyReversed,
    Backend,
}

impl ErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ParentLpNotFound => "GENEALOGY_ERROR_PARENT_LP_NOT_FOUND",
            Self::ChildLpNotFound => "GENEALOGY_ERROR_CHILD_LP_NOT_FOUND",
            Self::OutputLpNotFound => "GENEALOGY_ERROR_OUTPUT_LP_NOT_FOUND",
            Self::SourceLpNotFound => "GENEALOGY_ERROR_SOURCE_LP_NOT_FOUND",
            Self::TargetLpNotFound => "GENEALOGY_ERROR_TARGET_LP_NOT_FOUND",
            Self::WorkOrderNotFound => "GENEALOGY_ERROR_WORK_ORDER_NOT_FOUND",
            Self::CrossOrgViolation => "GENEALOGY_ERROR_CROSS_ORG_VIOLATION",
            Self::SelfReference => "GENEALOGY_ERROR_SELF_REFERENCE",
            Self::InvalidQuantity => "GENEALOGY_ERROR_INVALID_QUANTITY",
            Self::DuplicateLink => "GENEALOGY_ERROR_DUPLICATE_LINK",
            Self::EmptyInputSet => "GENEALOGY_ERROR_EMPTY_INPUT_SET",
            Self::TargetInSources => "GENEALOGY_ERROR_TARGET_IN_SOURCES",
            Self::LinkNotFound => "GENEALOGY_ERROR_LINK_NOT_FOUND",
            Self::AlreadyReversed => "GENEALOGY_ERROR_ALREADY_REVERSED",
            Self::Backend => "GENEALOGY_ERROR_BACKEND",
        }
    }

    pub const fn all() -> &'static [Self] {
        &[
            Self::ParentLpNotFound,
            Self::ChildLpNotFound,
            Self::OutputLpNotFound,
            Self::SourceLpNotFound,
            Self::TargetLpNotFound,
            Self::WorkOrderNotFound,
            Self::CrossOrgViolation,
            Self::SelfReference,
            Self::InvalidQuantity,
            Self::DuplicateLink,
            Self::EmptyInputSet,
            Self::TargetInSources,
            Self::LinkNotFound,
            Self::AlreadyReversed,
            Self::Backend,
        ]
    }
}

fn build_error(code: ErrorCode, message: String) -> GenealogyError {
    GenealogyError::new(code, message)
}

pub(crate) fn parent_lp_not_found_error(lp_id: &str) -> GenealogyError {
    build_error(
        ErrorCode::ParentLpNotFound,
        format!("parent LP not found: {lp_id}"),
    )
}

pub(crate) fn child_lp_not_found_error(lp_id: &str) -> GenealogyError {
    build_error(
        ErrorCode::ChildLpNotFound,
        format!("child LP not found: {lp_id}"),
    )
}

pub(crate) fn output_lp_not_found_error(lp_id: &str) -> GenealogyError {
    build_error(
        ErrorCode::OutputLpNotFound,
        format!("output LP not found: {lp_id}"),
    )
}

pub(crate) fn source_lp_not_found_error(lp_id: &str) -> GenealogyError {
    build_error(
        ErrorCode::SourceLpNotFound,
        format!("source LP not found: {lp_id}"),
    )
}

pub(crate) fn target_lp_not_found_error(lp_id: &str) -> GenealogyError {
    build_error(
        ErrorCode::TargetLpNotFound,
        format!("target LP not found: {lp_id}"),
    )
}

pub(crate) fn work_order_not_found_error(wo_id: &str) -> GenealogyError {
    build_error(
        ErrorCode::WorkOrderNotFound,
        format!("work order not found: {wo_id}"),
    )
}

pub(crate) fn cross_org_violation_error(parent_lp_id: &str, child_lp_id: &str) -> GenealogyError {
    build_error(
        ErrorCode::CrossOrgViolation,
        format!("LPs belong to different organizations: {parent_lp_id}, {child_lp_id}"),
    )
}

pub(crate) fn self_reference_error(lp_id: &str) -> GenealogyError {
    build_error(
        ErrorCode::SelfReference,
        format!("self-referencing link not allowed: {lp_id}"),
    )
}

pub(crate) fn invalid_quantity_error(quantity: f64) -> GenealogyError {
    build_error(
        ErrorCode::InvalidQuantity,
        format!("quantity must be positive, got {quantity}"),
    )
}

pub(crate) fn duplicate_link_error(
    parent_lp_id: &str,
    child_lp_id: &str,
    operation_type: &str,
) -> GenealogyError {
    build_error(
        ErrorCode::DuplicateLink,
        format!(
            "genealogy link already exists: {parent_lp_id} -> {child_lp_id} ({operation_type})"
        ),
    )
}

// Raised when the storage-level unique index rejects a racing insert that the
// application-level fast path did not see.
pub(crate) fn duplicate_link_constraint_error() -> GenealogyError {
    build_error(
        ErrorCode::DuplicateLink,
        "genealogy link already exists".to_string(),
    )
}

pub(crate) fn empty_input_set_error(operation: &str) -> GenealogyError {
    build_error(
        ErrorCode::EmptyInputSet,
        format!("at least one LP is required for {operation}"),
    )
}

pub(crate) fn target_in_sources_error(target_lp_id: &str) -> GenealogyError {
    build_error(
        ErrorCode::TargetInSources,
        format!("target LP cannot be one of the source LPs: {target_lp_id}"),
    )
}

pub(crate) fn link_not_found_error(link_id: &str) -> GenealogyError {
    build_error(
        ErrorCode::LinkNotFound,
        format!("genealogy link not found: {link_id}"),
    )
}

pub(crate) fn already_reversed_error(link_id: &str) -> GenealogyError {
    build_error(
        ErrorCode::AlreadyReversed,
        format!("genealogy link is already reversed: {link_id}"),
    )
}

#[cfg(test)]
mod tests {
    use super::{duplicate_link_error, parent_lp_not_found_error, self_reference_error, ErrorCode};
    use std::collections::HashSet;

    #[test]
    fn error_code_strings_are_unique() {
        let mut seen = HashSet::new();
        for code in ErrorCode::all() {
            let inserted = seen.insert(code.as_str());
            assert!(inserted, "duplicate error code string: {}", code.as_str());
        }
    }

    #[test]
    fn constructors_include_code_and_offending_ids() {
        let not_found = parent_lp_not_found_error("lp-404");
        assert_eq!(not_found.code, ErrorCode::ParentLpNotFound);
        assert!(not_found.message.contains("lp-404"));

        let self_reference = self_reference_error("lp-1");
        assert_eq!(self_reference.code, ErrorCode::SelfReference);

        let duplicate = duplicate_link_error("lp-1", "lp-2", "consume");
        assert_eq!(duplicate.code, ErrorCode::DuplicateLink);
        assert!(duplicate.message.contains("consume"));
    }

    #[test]
    fn display_includes_stable_code() {
        let error = parent_lp_not_found_error("lp-404");
        let rendered = error.to_string();
        assert!(rendered.starts_with("GENEALOGY_ERROR_PARENT_LP_NOT_FOUND"));
    }
}
