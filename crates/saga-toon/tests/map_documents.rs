//! End-to-end decoding of map documents as the generation service emits them.

use saga_toon::{Placement, Scatter, decode_graph};

const SERVICE_OUTPUT: &str = r#"repoName: octo/widgets
mapData:
  nodes[4]{id,label,fantasyName,description,type}:
    1,src/auth,The Wall,"The Night's Watch guards the routes, day and night.",wall
    2,src/db,The Iron Bank,Stores every coin.,bank
    3,src/server,King's Landing,"Requests are judged here"
    4,docs
  edges[3]{source,target}:
    1,3
    3,2
    3,9
"#;

fn pinned(i: usize, _: &str) -> Placement {
    Placement {
        x: 10.0 + i as f64,
        y: 90.0 - i as f64,
        size: 6.0,
    }
}

#[test]
fn test_minimal_document() {
    let text = "repoName: Demo\nmapData:\nnodes[1]{id,label}:\nn1,Core\nedges[1]{a,b}:\nn1,n1";
    let decoded = decode_graph(text, pinned);
    let graph = &decoded.graph;

    assert_eq!(graph.meta.repo, "Demo");
    // "n1,Core" has only two fields, so it is below the node minimum.
    assert!(graph.nodes.is_empty());
    assert_eq!(graph.edges.len(), 1);
    assert_eq!(graph.edges[0].from, "n1");
    assert_eq!(graph.edges[0].to, "n1");
}

#[test]
fn test_minimal_document_with_three_field_node() {
    let text =
        "repoName: Demo\nmapData:\nnodes[1]{id,label}:\nn1,src/core,Core\nedges[1]{a,b}:\nn1,n1";
    let graph = decode_graph(text, pinned).graph;

    assert_eq!(graph.meta.repo, "Demo");
    assert_eq!(graph.nodes.len(), 1);
    assert_eq!(graph.nodes[0].id, "n1");
    assert_eq!(graph.nodes[0].label, "Core");
    assert_eq!(graph.edges.len(), 1);
    assert_eq!((graph.edges[0].from.as_str(), graph.edges[0].to.as_str()), ("n1", "n1"));
}

#[test]
fn test_indented_service_output() {
    let decoded = decode_graph(SERVICE_OUTPUT, pinned);
    let graph = &decoded.graph;

    assert_eq!(graph.meta.repo, "octo/widgets");
    assert_eq!(graph.nodes.len(), 3);
    assert_eq!(decoded.report.dropped_rows, 1);
    assert_eq!(graph.nodes[0].label, "The Wall");
    assert_eq!(
        graph.nodes[0].tooltip,
        "The Night's Watch guards the routes, day and night."
    );
    assert_eq!(graph.nodes[2].kind, "module");
    assert_eq!(graph.nodes[2].tooltip, "Requests are judged here");
}

#[test]
fn test_dangling_edge_is_kept() {
    let graph = decode_graph(SERVICE_OUTPUT, pinned).graph;
    assert_eq!(graph.edges.len(), 3);
    let dangling = graph.dangling_edges();
    assert_eq!(dangling.len(), 1);
    assert_eq!(dangling[0].to, "9");
}

#[test]
fn test_pinned_layout_positions_are_exact() {
    let graph = decode_graph(SERVICE_OUTPUT, pinned).graph;
    let positions: Vec<(f64, f64)> = graph.nodes.iter().map(|n| (n.x, n.y)).collect();
    assert_eq!(positions, vec![(10.0, 90.0), (11.0, 89.0), (12.0, 88.0)]);
}

#[test]
fn test_decoding_is_deterministic_apart_from_timestamp() {
    let a = decode_graph(SERVICE_OUTPUT, Scatter::seeded(11)).graph;
    let b = decode_graph(SERVICE_OUTPUT, Scatter::seeded(11)).graph;
    assert_eq!(a.nodes, b.nodes);
    assert_eq!(a.edges, b.edges);

    let c = decode_graph(SERVICE_OUTPUT, Scatter::from_entropy()).graph;
    let strip = |g: &saga_core::graph::Graph| {
        g.nodes
            .iter()
            .map(|n| (n.id.clone(), n.label.clone(), n.tooltip.clone(), n.kind.clone()))
            .collect::<Vec<_>>()
    };
    assert_eq!(strip(&a), strip(&c));
    assert_eq!(a.edges, c.edges);
}

#[test]
fn test_garbage_never_panics() {
    let inputs = [
        "",
        "\n\n\n",
        "nodes[",
        "edges[\n,\n,,\n\"",
        "repoName:",
        "<html><body>502 Bad Gateway</body></html>",
        "nodes[1]{}:\n\"\"\"\n,,,,,,,,",
    ];
    for input in inputs {
        let decoded = decode_graph(input, Scatter::seeded(0));
        assert!(decoded.graph.nodes.len() <= input.lines().count());
    }
}

#[test]
fn test_html_error_page_yields_no_nodes() {
    let decoded = decode_graph("<html>\n<h1>502 Bad Gateway</h1>\n</html>", pinned);
    assert!(decoded.graph.nodes.is_empty());
    assert_eq!(decoded.report.dropped_rows, 3);
}
