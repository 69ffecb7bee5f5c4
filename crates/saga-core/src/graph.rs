//! Codebase map model: modules as nodes, dependencies as edges.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Kind assigned to a node when the wire row omits one.
pub const DEFAULT_NODE_KIND: &str = "module";

/// Visual size assigned to a node when the wire format omits one.
pub const DEFAULT_NODE_SIZE: f64 = 6.0;

/// Reason attached to every decoded edge.
pub const DEPENDENCY_REASON: &str = "Dependency";

/// Repo name used when a document never declares one.
pub const UNKNOWN_REPO: &str = "Unknown Repo";

/// A decoded codebase map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub meta: GraphMeta,
    /// Nodes in the order they appeared in the source document.
    pub nodes: Vec<GraphNode>,
    /// Edges in the order they appeared in the source document.
    pub edges: Vec<GraphEdge>,
    #[serde(default)]
    pub highlights: Highlights,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphMeta {
    pub repo: String,
    pub generated_at: DateTime<Utc>,
}

/// A module or zone on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    /// Free-form category ("module", "wall", "bank", ...).
    #[serde(rename = "type")]
    pub kind: String,
    pub files: Vec<String>,
    /// Horizontal position, intended range [0, 100].
    pub x: f64,
    /// Vertical position, intended range [0, 100].
    pub y: f64,
    pub size: f64,
    #[serde(default)]
    pub tooltip: String,
}

/// A dependency between two nodes.
///
/// Endpoints are not checked against the node list; see [`Graph::dangling_edges`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub weight: f64,
    pub reason: String,
}

impl GraphEdge {
    /// An edge as produced by the wire decoder: weight 1, reason "Dependency".
    pub fn dependency(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            weight: 1.0,
            reason: DEPENDENCY_REASON.to_string(),
        }
    }
}

/// Optional callouts on the map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Highlights {
    /// The single most complex node, when the generator identified one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complex_dragon: Option<ComplexDragon>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexDragon {
    pub node_id: String,
    pub file: String,
    pub complexity_score: f64,
}

impl Graph {
    /// Create an empty graph for `repo`, stamped with the current time.
    pub fn new(repo: impl Into<String>) -> Self {
        Self::with_timestamp(repo, Utc::now())
    }

    pub fn with_timestamp(repo: impl Into<String>, generated_at: DateTime<Utc>) -> Self {
        Self {
            meta: GraphMeta {
                repo: repo.into(),
                generated_at,
            },
            nodes: Vec::new(),
            edges: Vec::new(),
            highlights: Highlights::default(),
        }
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// Edges with at least one endpoint missing from the node list.
    pub fn dangling_edges(&self) -> Vec<&GraphEdge> {
        let ids: HashSet<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
        self.edges
            .iter()
            .filter(|e| !ids.contains(e.from.as_str()) || !ids.contains(e.to.as_str()))
            .collect()
    }

    /// The node named by `highlights.complex_dragon`, if it exists in this graph.
    pub fn dragon_node(&self) -> Option<&GraphNode> {
        self.highlights
            .complex_dragon
            .as_ref()
            .and_then(|d| self.node(&d.node_id))
    }

    /// One line per node: `label (files): tooltip`.
    ///
    /// Used as the persona context for narrative generation.
    pub fn module_summary(&self) -> String {
        self.nodes
            .iter()
            .map(|n| {
                let mut line = n.label.clone();
                if !n.files.is_empty() {
                    line.push_str(&format!(" ({})", n.files.join(", ")));
                }
                if !n.tooltip.is_empty() {
                    line.push_str(&format!(": {}", n.tooltip));
                }
                line
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, label: &str) -> GraphNode {
        GraphNode {
            id: id.to_string(),
            label: label.to_string(),
            kind: DEFAULT_NODE_KIND.to_string(),
            files: vec![format!("src/{}", id)],
            x: 50.0,
            y: 50.0,
            size: DEFAULT_NODE_SIZE,
            tooltip: String::new(),
        }
    }

    #[test]
    fn test_dependency_edge_defaults() {
        let edge = GraphEdge::dependency("a", "b");
        assert_eq!(edge.weight, 1.0);
        assert_eq!(edge.reason, "Dependency");
    }

    #[test]
    fn test_dangling_edges_reported_not_removed() {
        let mut graph = Graph::new("demo");
        graph.nodes.push(node("a", "Alpha"));
        graph.edges.push(GraphEdge::dependency("a", "a"));
        graph.edges.push(GraphEdge::dependency("a", "ghost"));

        let dangling = graph.dangling_edges();
        assert_eq!(dangling.len(), 1);
        assert_eq!(dangling[0].to, "ghost");
        assert_eq!(graph.edges.len(), 2);
    }

    #[test]
    fn test_module_summary_skips_empty_parts() {
        let mut graph = Graph::new("demo");
        let mut a = node("a", "The Wall");
        a.tooltip = "Guards the realm".to_string();
        let mut b = node("b", "The Citadel");
        b.files.clear();
        graph.nodes.push(a);
        graph.nodes.push(b);

        assert_eq!(
            graph.module_summary(),
            "The Wall (src/a): Guards the realm\nThe Citadel"
        );
    }

    #[test]
    fn test_kind_serializes_as_type() {
        let json = serde_json::to_value(node("a", "Alpha")).unwrap();
        assert_eq!(json["type"], "module");
        assert!(json.get("kind").is_none());
    }
}
