//! Line classification and the section state machine for map documents.
//!
//! A map document has no formal grammar; sections are recognised by line
//! prefixes. Each trimmed, non-empty line is classified into a [`LineKind`],
//! and [`DecodeState::next`] maps every `(state, kind)` pair to the next state
//! and the [`Action`] the decoder should take.

const REPO_NAME_PREFIX: &str = "repoName:";
const MAP_DATA_PREFIX: &str = "mapData:";
const NODES_PREFIX: &str = "nodes[";
const EDGES_PREFIX: &str = "edges[";

/// Classification of a single trimmed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// `repoName: <name>`, carrying the trimmed remainder.
    RepoName(&'a str),
    /// `mapData:` wrapper line.
    MapData,
    /// `nodes[<count>]{..}:` section header.
    NodesHeader,
    /// `edges[<count>]{..}:` section header.
    EdgesHeader,
    /// Anything else: a data row for whichever section is open.
    Row(&'a str),
}

/// Classify a trimmed, non-empty line. Prefixes are checked in priority order.
pub fn classify(line: &str) -> LineKind<'_> {
    if let Some(rest) = line.strip_prefix(REPO_NAME_PREFIX) {
        LineKind::RepoName(rest.trim())
    } else if line.starts_with(MAP_DATA_PREFIX) {
        LineKind::MapData
    } else if line.starts_with(NODES_PREFIX) {
        LineKind::NodesHeader
    } else if line.starts_with(EDGES_PREFIX) {
        LineKind::EdgesHeader
    } else {
        LineKind::Row(line)
    }
}

/// Which section of the document the decoder is in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DecodeState {
    /// Before any section header.
    #[default]
    Seeking,
    InNodes,
    InEdges,
}

/// What the decoder does with a classified line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action<'a> {
    /// Overwrite the repo name.
    SetRepoName(&'a str),
    /// Header or wrapper line; nothing to record.
    Skip,
    /// Decode as a node row.
    NodeRow(&'a str),
    /// Decode as an edge row.
    EdgeRow(&'a str),
    /// A row outside any section.
    Drop(&'a str),
}

impl DecodeState {
    /// Total transition function over all states and line kinds.
    pub fn next(self, kind: LineKind<'_>) -> (DecodeState, Action<'_>) {
        match (self, kind) {
            (state, LineKind::RepoName(name)) => (state, Action::SetRepoName(name)),
            (state, LineKind::MapData) => (state, Action::Skip),
            (_, LineKind::NodesHeader) => (DecodeState::InNodes, Action::Skip),
            (_, LineKind::EdgesHeader) => (DecodeState::InEdges, Action::Skip),
            (DecodeState::InNodes, LineKind::Row(row)) => {
                (DecodeState::InNodes, Action::NodeRow(row))
            }
            (DecodeState::InEdges, LineKind::Row(row)) => {
                (DecodeState::InEdges, Action::EdgeRow(row))
            }
            (DecodeState::Seeking, LineKind::Row(row)) => {
                (DecodeState::Seeking, Action::Drop(row))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_prefixes() {
        assert_eq!(
            classify("repoName:  octo/widgets "),
            LineKind::RepoName("octo/widgets")
        );
        assert_eq!(classify("mapData:"), LineKind::MapData);
        assert_eq!(classify("nodes[4]{id,label}:"), LineKind::NodesHeader);
        assert_eq!(classify("edges[2]{source,target}:"), LineKind::EdgesHeader);
        assert_eq!(
            classify("1,src/auth,The Wall"),
            LineKind::Row("1,src/auth,The Wall")
        );
    }

    #[test]
    fn test_classify_is_prefix_only() {
        assert_eq!(classify("x,nodes[1]"), LineKind::Row("x,nodes[1]"));
        assert_eq!(classify("nodes"), LineKind::Row("nodes"));
    }

    #[test]
    fn test_repo_name_keeps_state() {
        for state in [DecodeState::Seeking, DecodeState::InNodes, DecodeState::InEdges] {
            let (next, action) = state.next(LineKind::RepoName("demo"));
            assert_eq!(next, state);
            assert_eq!(action, Action::SetRepoName("demo"));
        }
    }

    #[test]
    fn test_map_data_is_skipped_in_every_state() {
        for state in [DecodeState::Seeking, DecodeState::InNodes, DecodeState::InEdges] {
            assert_eq!(state.next(LineKind::MapData), (state, Action::Skip));
        }
    }

    #[test]
    fn test_headers_switch_sections_from_anywhere() {
        for state in [DecodeState::Seeking, DecodeState::InNodes, DecodeState::InEdges] {
            assert_eq!(
                state.next(LineKind::NodesHeader),
                (DecodeState::InNodes, Action::Skip)
            );
            assert_eq!(
                state.next(LineKind::EdgesHeader),
                (DecodeState::InEdges, Action::Skip)
            );
        }
    }

    #[test]
    fn test_rows_follow_current_section() {
        assert_eq!(
            DecodeState::Seeking.next(LineKind::Row("a,b")),
            (DecodeState::Seeking, Action::Drop("a,b"))
        );
        assert_eq!(
            DecodeState::InNodes.next(LineKind::Row("a,b")),
            (DecodeState::InNodes, Action::NodeRow("a,b"))
        );
        assert_eq!(
            DecodeState::InEdges.next(LineKind::Row("a,b")),
            (DecodeState::InEdges, Action::EdgeRow("a,b"))
        );
    }
}
