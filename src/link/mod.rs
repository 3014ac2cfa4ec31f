mod consumption;
mod merge;
mod output;
mod reverse;
mod split;

pub use consumption::{link_consumption, LinkConsumptionInput};
pub use merge::{link_merge, LinkMergeInput};
pub use output::{link_output, LinkOutputInput};
pub use reverse::reverse_link;
pub use split::{link_split, LinkSplitInput};

use chrono::{SecondsFormat, Utc};
use uuid::Uuid;

use crate::engine::EngineTransaction;
use crate::{Engine, GenealogyError, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    Consume,
    Output,
    Split,
    Merge,
}

impl OperationType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Consume => "consume",
            Self::Output => "output",
            Self::Split => "split",
            Self::Merge => "merge",
        }
    }

    pub fn parse(value: &str) -> Result<Self, GenealogyError> {
        match value {
            "consume" => Ok(Self::Consume),
            "output" => Ok(Self::Output),
            "split" => Ok(Self::Split),
            "merge" => Ok(Self::Merge),
            other => Err(GenealogyError::backend(format!(
                "unknown operation type in genealogy_link row: {other}"
            ))),
        }
    }

    pub const fn all() -> &'static [Self] {
        &[Self::Consume, Self::Output, Self::Split, Self::Merge]
    }
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One directed edge in the lineage graph. Append-only: the only mutation
/// after creation is the one-way reversal flip.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GenealogyLink {
    pub id: String,
    pub org_id: String,
    pub parent_lp_id: String,
    pub child_lp_id: String,
    pub operation_type: OperationType,
    pub quantity: f64,
    pub operation_date: String,
    pub wo_id: Option<String>,
    pub operation_id: Option<String>,
    pub is_reversed: bool,
    pub reversed_at: Option<String>,
    pub reversed_by: Option<String>,
    pub created_at: String,
    pub created_by: String,
}

pub(crate) const LINK_COLUMNS: &str = "id, org_id, parent_lp_id, child_lp_id, operation_type, \
     quantity, operation_date, wo_id, operation_id, is_reversed, reversed_at, reversed_by, \
     created_at, created_by";

const INSERT_LINK_SQL: &str = "INSERT INTO genealogy_link (\
     id, org_id, parent_lp_id, child_lp_id, operation_type, quantity, operation_date, \
     wo_id, operation_id, is_reversed, reversed_at, reversed_by, created_at, created_by\
     ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 0, NULL, NULL, ?, ?)";

pub(crate) fn new_link_id() -> String {
    Uuid::now_v7().to_string()
}

pub(crate) fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn insert_params(link: &GenealogyLink) -> Vec<Value> {
    vec![
        Value::Text(link.id.clone()),
        Value::Text(link.org_id.clone()),
        Value::Text(link.parent_lp_id.clone()),
        Value::Text(link.child_lp_id.clone()),
        Value::Text(link.operation_type.as_str().to_string()),
        Value::Real(link.quantity),
        Value::Text(link.operation_date.clone()),
        optional_text(link.wo_id.as_deref()),
        optional_text(link.operation_id.as_deref()),
        Value::Text(link.created_at.clone()),
        Value::Text(link.created_by.clone()),
    ]
}

fn optional_text(value: Option<&str>) -> Value {
    match value {
        Some(value) => Value::Text(value.to_string()),
        None => Value::Null,
    }
}

pub(crate) async fn insert_link(engine: &Engine, link: &GenealogyLink) -> Result<(), GenealogyError> {
    engine.execute(INSERT_LINK_SQL, &insert_params(link)).await?;
    Ok(())
}

pub(crate) async fn insert_link_tx(
    tx: &mut EngineTransaction<'_>,
    link: &GenealogyLink,
) -> Result<(), GenealogyError> {
    tx.execute(INSERT_LINK_SQL, &insert_params(link)).await?;
    Ok(())
}

pub(crate) fn link_from_row(row: &[Value]) -> Result<GenealogyLink, GenealogyError> {
    Ok(GenealogyLink {
        id: text_at(row, 0, "genealogy_link.id")?,
        org_id: text_at(row, 1, "genealogy_link.org_id")?,
        parent_lp_id: text_at(row, 2, "genealogy_link.parent_lp_id")?,
        child_lp_id: text_at(row, 3, "genealogy_link.child_lp_id")?,
        operation_type: OperationType::parse(&text_at(row, 4, "genealogy_link.operation_type")?)?,
        quantity: real_at(row, 5, "genealogy_link.quantity")?,
        operation_date: text_at(row, 6, "genealogy_link.operation_date")?,
        wo_id: optional_text_at(row, 7, "genealogy_link.wo_id")?,
        operation_id: optional_text_at(row, 8, "genealogy_link.operation_id")?,
        is_reversed: integer_at(row, 9, "genealogy_link.is_reversed")? != 0,
        reversed_at: optional_text_at(row, 10, "genealogy_link.reversed_at")?,
        reversed_by: optional_text_at(row, 11, "genealogy_link.reversed_by")?,
        created_at: text_at(row, 12, "genealogy_link.created_at")?,
        created_by: text_at(row, 13, "genealogy_link.created_by")?,
    })
}

pub(crate) fn text_at(row: &[Value], index: usize, field: &str) -> Result<String, GenealogyError> {
    match row.get(index) {
        Some(Value::Text(value)) => Ok(value.clone()),
        Some(other) => Err(GenealogyError::backend(format!(
            "expected text value for {field}, got {other:?}"
        ))),
        None => Err(GenealogyError::backend(format!("missing {field}"))),
    }
}

pub(crate) fn optional_text_at(
    row: &[Value],
    index: usize,
    field: &str,
) -> Result<Option<String>, GenealogyError> {
    match row.get(index) {
        Some(Value::Null) => Ok(None),
        Some(Value::Text(value)) => Ok(Some(value.clone())),
        Some(other) => Err(GenealogyError::backend(format!(
            "expected text or null for {field}, got {other:?}"
        ))),
        None => Err(GenealogyError::backend(format!("missing {field}"))),
    }
}

pub(crate) fn real_at(row: &[Value], index: usize, field: &str) -> Result<f64, GenealogyError> {
    match row.get(index) {
        Some(Value::Real(value)) => Ok(*value),
        Some(Value::Integer(value)) => Ok(*value as f64),
        Some(other) => Err(GenealogyError::backend(format!(
            "expected numeric value for {field}, got {other:?}"
        ))),
        None => Err(GenealogyError::backend(format!("missing {field}"))),
    }
}

pub(crate) fn integer_at(row: &[Value], index: usize, field: &str) -> Result<i64, GenealogyError> {
    match row.get(index) {
        Some(Value::Integer(value)) => Ok(*value),
        Some(other) => Err(GenealogyError::backend(format!(
            "expected integer value for {field}, got {other:?}"
        ))),
        None => Err(GenealogyError::backend(format!("missing {field}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::{link_from_row, GenealogyLink, OperationType, Value};

    #[test]
    fn operation_type_round_trips_through_as_str() {
        for op in OperationType::all() {
            assert_eq!(OperationType::parse(op.as_str()).unwrap(), *op);
        }
    }

    #[test]
    fn operation_type_rejects_unknown_values() {
        let error = OperationType::parse("invalid_operation").unwrap_err();
        assert!(error.message.contains("invalid_operation"));
    }

    #[test]
    fn link_from_row_maps_all_columns() {
        let row = vec![
            Value::Text("gen-001".to_string()),
            Value::Text("org-123".to_string()),
            Value::Text("lp-001".to_string()),
            Value::Text("lp-002".to_string()),
            Value::Text("consume".to_string()),
            Value::Real(50.0),
            Value::Text("2025-12-20T10:00:00Z".to_string()),
            Value::Text("wo-001".to_string()),
            Value::Null,
            Value::Integer(0),
            Value::Null,
            Value::Null,
            Value::Text("2025-12-20T10:00:00Z".to_string()),
            Value::Text("user-001".to_string()),
        ];

        let link: GenealogyLink = link_from_row(&row).unwrap();
        assert_eq!(link.id, "gen-001");
        assert_eq!(link.operation_type, OperationType::Consume);
        assert_eq!(link.quantity, 50.0);
        assert_eq!(link.wo_id.as_deref(), Some("wo-001"));
        assert_eq!(link.operation_id, None);
        assert!(!link.is_reversed);
    }

    #[test]
    fn link_from_row_rejects_truncated_rows() {
        let row = vec![Value::Text("gen-001".to_string())];
        let error = link_from_row(&row).unwrap_err();
        assert!(error.message.contains("org_id"));
    }

    #[test]
    fn operation_type_serializes_as_the_stored_string() {
        let json = serde_json::to_value(OperationType::Consume).unwrap();
        assert_eq!(json, serde_json::json!("consume"));
        let parsed: OperationType = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, OperationType::Consume);
    }
}
