//! Depth-bounded traversal of the lineage graph. The graph is logically a
//! DAG but corrections can re-introduce apparent cycles, so traversal keeps a
//! visited set per call and never assumes acyclicity.

use std::collections::BTreeSet;

use crate::link::{integer_at, real_at, text_at, OperationType};
use crate::{Engine, GenealogyError, Value};

pub const DEFAULT_TRACE_DEPTH: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceDirection {
    Forward,
    Backward,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TraceOptions {
    pub max_depth: u32,
    pub include_reversed: bool,
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_TRACE_DEPTH,
            include_reversed: false,
        }
    }
}

/// One reached LP, annotated with the edge that reached it and the level it
/// was first seen at (1 = directly adjacent to the root).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TraceNode {
    pub lp_id: String,
    pub link_id: String,
    pub operation_type: OperationType,
    pub quantity: f64,
    pub operation_date: String,
    pub is_reversed: bool,
    pub depth: u32,
}

/// `has_more_levels` is approximate: it reports that some node landed exactly
/// at the depth cap, which means the tree *may* be truncated, not that
/// further levels are known to exist.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TraceResult {
    pub lp_id: String,
    pub nodes: Vec<TraceNode>,
    pub total_count: usize,
    pub has_more_levels: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TreeLevelFlags {
    pub ancestors: bool,
    pub descendants: bool,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GenealogyTree {
    pub lp_id: String,
    pub ancestors: Vec<TraceNode>,
    pub descendants: Vec<TraceNode>,
    pub has_more_levels: TreeLevelFlags,
}

/// Descendants of the given LP: "what did this unit become."
pub async fn get_forward_trace(
    engine: &Engine,
    org_id: &str,
    lp_id: &str,
    options: TraceOptions,
) -> Result<TraceResult, GenealogyError> {
    trace(engine, org_id, lp_id, true, options).await
}

/// Ancestors of the given LP: "what went into this unit."
pub async fn get_backward_trace(
    engine: &Engine,
    org_id: &str,
    lp_id: &str,
    options: TraceOptions,
) -> Result<TraceResult, GenealogyError> {
    trace(engine, org_id, lp_id, false, options).await
}

pub async fn get_full_tree(
    engine: &Engine,
    org_id: &str,
    lp_id: &str,
    direction: TraceDirection,
    options: TraceOptions,
) -> Result<GenealogyTree, GenealogyError> {
    let mut tree = GenealogyTree {
        lp_id: lp_id.to_string(),
        ancestors: Vec::new(),
        descendants: Vec::new(),
        has_more_levels: TreeLevelFlags {
            ancestors: false,
            descendants: false,
        },
    };
    if matches!(direction, TraceDirection::Forward | TraceDirection::Both) {
        let forward = get_forward_trace(engine, org_id, lp_id, options).await?;
        tree.descendants = forward.nodes;
        tree.has_more_levels.descendants = forward.has_more_levels;
    }
    if matches!(direction, TraceDirection::Backward | TraceDirection::Both) {
        let backward = get_backward_trace(engine, org_id, lp_id, options).await?;
        tree.ancestors = backward.nodes;
        tree.has_more_levels.ancestors = backward.has_more_levels;
    }
    Ok(tree)
}

// Breadth-first, one bounded query per level rather than per node. A node
// already visited at an equal-or-lower depth is not re-expanded, which bounds
// the work to the visited nodes and edges even when a correction produced a
// cycle.
async fn trace(
    engine: &Engine,
    org_id: &str,
    lp_id: &str,
    forward: bool,
    options: TraceOptions,
) -> Result<TraceResult, GenealogyError> {
    let mut visited: BTreeSet<String> = BTreeSet::new();
    visited.insert(lp_id.to_string());
    let mut frontier = vec![lp_id.to_string()];
    let mut nodes: Vec<TraceNode> = Vec::new();
    let mut has_more_levels = false;

    let mut depth = 0;
    while !frontier.is_empty() && depth < options.max_depth {
        depth += 1;
        let edges = fetch_level(engine, org_id, &frontier, forward, options.include_reversed)
            .await?;
        let mut next_frontier = Vec::new();
        for edge in edges {
            if !visited.insert(edge.node_lp_id.clone()) {
                continue;
            }
            next_frontier.push(edge.node_lp_id.clone());
            nodes.push(TraceNode {
                lp_id: edge.node_lp_id,
                link_id: edge.link_id,
                operation_type: edge.operation_type,
                quantity: edge.quantity,
                operation_date: edge.operation_date,
                is_reversed: edge.is_reversed,
                depth,
            });
        }
        if depth == options.max_depth && !next_frontier.is_empty() {
            has_more_levels = true;
        }
        frontier = next_frontier;
    }

    Ok(TraceResult {
        lp_id: lp_id.to_string(),
        total_count: nodes.len(),
        nodes,
        has_more_levels,
    })
}

struct LevelEdge {
    node_lp_id: String,
    link_id: String,
    operation_type: OperationType,
    quantity: f64,
    operation_date: String,
    is_reversed: bool,
}

async fn fetch_level(
    engine: &Engine,
    org_id: &str,
    frontier: &[String],
    forward: bool,
    include_reversed: bool,
) -> Result<Vec<LevelEdge>, GenealogyError> {
    let (key_column, node_column) = if forward {
        ("parent_lp_id", "child_lp_id")
    } else {
        ("child_lp_id", "parent_lp_id")
    };
    let placeholders = vec!["?"; frontier.len()].join(", ");
    let mut sql = format!(
        "SELECT {node_column}, id, operation_type, quantity, operation_date, is_reversed \
         FROM genealogy_link \
         WHERE org_id = ? AND {key_column} IN ({placeholders})"
    );
    if !include_reversed {
        sql.push_str(" AND is_reversed = 0");
    }
    sql.push_str(" ORDER BY operation_date, id");

    let mut params = Vec::with_capacity(frontier.len() + 1);
    params.push(Value::Text(org_id.to_string()));
    params.extend(frontier.iter().map(|lp_id| Value::Text(lp_id.clone())));

    let result = engine.execute(&sql, &params).await?;
    let mut edges = Vec::with_capacity(result.rows.len());
    for row in &result.rows {
        edges.push(LevelEdge {
            node_lp_id: text_at(row, 0, "genealogy_link node lp")?,
            link_id: text_at(row, 1, "genealogy_link.id")?,
            operation_type: OperationType::parse(&text_at(
                row,
                2,
                "genealogy_link.operation_type",
            )?)?,
            quantity: real_at(row, 3, "genealogy_link.quantity")?,
            operation_date: text_at(row, 4, "genealogy_link.operation_date")?,
            is_reversed: integer_at(row, 5, "genealogy_link.is_reversed")? != 0,
        });
    }
    Ok(edges)
}

#[cfg(test)]
mod tests {
    use super::{TraceOptions, DEFAULT_TRACE_DEPTH};

    #[test]
    fn default_options_match_the_operational_view() {
        let options = TraceOptions::default();
        assert_eq!(options.max_depth, DEFAULT_TRACE_DEPTH);
        assert!(!options.include_reversed);
    }
}
