//! Map document decoding.
//!
//! ```text
//! repoName: <string>
//! mapData:
//! nodes[<count>]{<ignored>}:
//! <id>,<file-label>,<fantasy-label>,"<tooltip, commas allowed>",<kind>
//! edges[<count>]{<ignored>}:
//! <from>,<to>
//! ```
//!
//! Header counts and column names are ignored; rows are mapped positionally.
//! Node rows need at least 3 fields and edge rows at least 2; shorter rows are
//! dropped. Edge endpoints are not checked against the node list.

use crate::classify::{Action, DecodeState, classify};
use crate::layout::{Layout, Placement};
use crate::split::split_fields;
use saga_core::graph::{DEFAULT_NODE_KIND, Graph, GraphEdge, GraphNode, UNKNOWN_REPO};

const MIN_NODE_FIELDS: usize = 3;
const MIN_EDGE_FIELDS: usize = 2;

/// Row accounting for one decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeReport {
    pub node_rows: usize,
    pub edge_rows: usize,
    /// Rows outside a section or below the section's minimum field count.
    pub dropped_rows: usize,
    pub repo_declared: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecodedGraph {
    pub graph: Graph,
    pub report: DecodeReport,
}

/// Decodes map documents, placing nodes with `L`.
pub struct GraphDecoder<L> {
    layout: L,
}

impl<L: Layout> GraphDecoder<L> {
    pub fn new(layout: L) -> Self {
        Self { layout }
    }

    /// Decode a whole document. Never fails; unusable rows are dropped.
    pub fn decode(&mut self, text: &str) -> DecodedGraph {
        let mut state = DecodeState::Seeking;
        let mut repo: Option<String> = None;
        let mut nodes = Vec::new();
        let mut edges = Vec::new();
        let mut report = DecodeReport::default();

        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let (next, action) = state.next(classify(line));
            state = next;

            match action {
                Action::SetRepoName(name) => repo = Some(name.to_string()),
                Action::Skip => {}
                Action::NodeRow(row) => match self.node_from_row(row, nodes.len()) {
                    Some(node) => {
                        nodes.push(node);
                        report.node_rows += 1;
                    }
                    None => drop_row(&mut report, "node", row),
                },
                Action::EdgeRow(row) => match edge_from_row(row) {
                    Some(edge) => {
                        edges.push(edge);
                        report.edge_rows += 1;
                    }
                    None => drop_row(&mut report, "edge", row),
                },
                Action::Drop(row) => drop_row(&mut report, "unsectioned", row),
            }
        }

        report.repo_declared = repo.is_some();
        let mut graph = Graph::new(repo.unwrap_or_else(|| UNKNOWN_REPO.to_string()));
        graph.nodes = nodes;
        graph.edges = edges;

        tracing::debug!(
            repo = %graph.meta.repo,
            nodes = report.node_rows,
            edges = report.edge_rows,
            dropped = report.dropped_rows,
            "decoded map document"
        );

        DecodedGraph { graph, report }
    }

    fn node_from_row(&mut self, row: &str, index: usize) -> Option<GraphNode> {
        let mut fields = split_fields(row).into_iter();
        if fields.len() < MIN_NODE_FIELDS {
            return None;
        }

        let id = fields.next()?;
        let file = fields.next()?;
        let label = fields.next()?;
        let tooltip = fields.next().unwrap_or_default();
        let kind = fields
            .next()
            .filter(|k| !k.is_empty())
            .unwrap_or_else(|| DEFAULT_NODE_KIND.to_string());

        let Placement { x, y, size } = self.layout.place(index, &id);

        Some(GraphNode {
            id,
            label,
            kind,
            files: vec![file],
            x,
            y,
            size,
            tooltip,
        })
    }
}

fn edge_from_row(row: &str) -> Option<GraphEdge> {
    let fields = split_fields(row);
    if fields.len() < MIN_EDGE_FIELDS {
        return None;
    }
    Some(GraphEdge::dependency(&fields[0], &fields[1]))
}

fn drop_row(report: &mut DecodeReport, section: &str, row: &str) {
    report.dropped_rows += 1;
    tracing::debug!(section, row, "dropped map row");
}

/// Decode `text` with a one-off decoder.
pub fn decode_graph(text: &str, layout: impl Layout) -> DecodedGraph {
    GraphDecoder::new(layout).decode(text)
}
