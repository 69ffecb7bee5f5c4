//! Static demo bundle substituted whenever live generation fails.
//!
//! The readme of every fallback bundle contains [`DEMO_MARKER`]; the
//! presentation layer keys its degraded-mode indicator on that string, so it
//! must survive any rewording of the surrounding text.

use crate::bundle::SagaBundle;
use crate::graph::{
    ComplexDragon, DEFAULT_NODE_SIZE, Graph, GraphEdge, GraphMeta, GraphNode, Highlights,
};
use crate::script::{DEFAULT_PANEL_GOAL, Panel, Script};
use crate::tasks::{StarterTask, TaskList};
use chrono::{DateTime, Utc};
use std::sync::LazyLock;

/// Marker the presentation layer looks for to show "Demo Mode".
pub const DEMO_MARKER: &str = "Demo Mode Active";

/// Repo name carried by the unsubstituted demo bundle.
pub const DEMO_REPO: &str = "demo/realm";

/// 2025-01-01T00:00:00Z, so the demo bundle compares equal across calls.
const DEMO_GENERATED_AT: i64 = 1_735_689_600;

static DEMO_BUNDLE: LazyLock<SagaBundle> = LazyLock::new(build_demo_bundle);

/// The demo bundle, as authored.
pub fn bundle() -> &'static SagaBundle {
    &DEMO_BUNDLE
}

/// The demo bundle with `repo` substituted into the map meta and the readme.
pub fn bundle_for(repo: &str) -> SagaBundle {
    let mut bundle = DEMO_BUNDLE.clone();
    bundle.map.meta.repo = repo.to_string();
    bundle.readme = demo_readme(repo);
    bundle
}

/// Whether `bundle` carries the demo marker.
pub fn is_demo(bundle: &SagaBundle) -> bool {
    bundle.readme.contains(DEMO_MARKER)
}

fn demo_readme(repo: &str) -> String {
    format!(
        "# {}\n\n> {}: the Archives could not be reached, so this is a demo realm \
         standing in for the real map. Retry once the generation service is back.",
        repo, DEMO_MARKER
    )
}

fn node(
    id: &str,
    label: &str,
    kind: &str,
    files: &[&str],
    at: (f64, f64),
    tooltip: &str,
) -> GraphNode {
    GraphNode {
        id: id.to_string(),
        label: label.to_string(),
        kind: kind.to_string(),
        files: files.iter().map(|f| (*f).to_string()).collect(),
        x: at.0,
        y: at.1,
        size: DEFAULT_NODE_SIZE,
        tooltip: tooltip.to_string(),
    }
}

fn edge(from: &str, to: &str, weight: f64, reason: &str) -> GraphEdge {
    GraphEdge {
        from: from.to_string(),
        to: to.to_string(),
        weight,
        reason: reason.to_string(),
    }
}

fn panel(
    id: u32,
    title: &str,
    narration: &str,
    dialog: &[&str],
    file: &str,
    snippet: &str,
) -> Panel {
    Panel {
        id,
        title: title.to_string(),
        narration: narration.to_string(),
        dialog: dialog.iter().map(|d| (*d).to_string()).collect(),
        file: file.to_string(),
        snippet: snippet.to_string(),
        goal: DEFAULT_PANEL_GOAL.to_string(),
    }
}

fn build_demo_bundle() -> SagaBundle {
    let generated_at = DateTime::<Utc>::from_timestamp(DEMO_GENERATED_AT, 0).unwrap_or_default();

    let map = Graph {
        meta: GraphMeta {
            repo: DEMO_REPO.to_string(),
            generated_at,
        },
        nodes: vec![
            node(
                "1",
                "Winterfell",
                "frontend",
                &["src/app/page.tsx", "src/components/header.tsx"],
                (20.0, 15.0),
                "The northern keep where every visitor first arrives.",
            ),
            node(
                "2",
                "The Wall",
                "wall",
                &["src/auth/session.ts"],
                (50.0, 10.0),
                "The Night's Watch guards the routes here.",
            ),
            node(
                "3",
                "King's Landing",
                "capital",
                &["src/server/routes.ts", "src/server/handlers.ts"],
                (50.0, 55.0),
                "The capital, where requests are judged and dispatched.",
            ),
            node(
                "4",
                "The Iron Bank",
                "bank",
                &["src/db/models.ts"],
                (80.0, 70.0),
                "Stores every coin the realm has ever minted.",
            ),
            node(
                "5",
                "The Citadel",
                "citadel",
                &["src/utils/format.ts", "docs/guide.md"],
                (20.0, 80.0),
                "Maesters keep the helpers and the written lore.",
            ),
        ],
        edges: vec![
            edge("1", "2", 1.0, "Pages pass through the gate"),
            edge("2", "3", 1.0, "Authenticated requests reach the capital"),
            edge("3", "4", 2.0, "Handlers read and write records"),
            edge("3", "5", 1.0, "Handlers lean on shared helpers"),
            edge("1", "5", 1.0, "Components format their output"),
        ],
        highlights: Highlights {
            complex_dragon: Some(ComplexDragon {
                node_id: "3".to_string(),
                file: "src/server/handlers.ts".to_string(),
                complexity_score: 8.5,
            }),
        },
    };

    let comic = Script {
        panels: vec![
            panel(
                1,
                "The Awakening",
                "You step into the repository.",
                &["System: Welcome, traveller.", "You: Let's see the code."],
                "README.md",
                "git clone ...",
            ),
            panel(
                2,
                "The Gatekeeper",
                "A guard stands watch over every route.",
                &["Halt!", "Who goes there?"],
                "src/auth/session.ts",
                "if (!user) return;",
            ),
            panel(
                3,
                "The Dragon's Lair",
                "Deep in the capital, the handlers coil around every request.",
                &["Maester: Tread carefully here.", "You: I will read it twice."],
                "src/server/handlers.ts",
                "export async function handle(req) {",
            ),
        ],
    };

    let tasks = TaskList {
        tasks: vec![StarterTask {
            title: "Explore the map".to_string(),
            description: "Open each zone of the demo realm and read its tooltip.".to_string(),
            difficulty: 1,
            files_to_edit: Vec::new(),
            tests_to_run: None,
            expected_outcome: "You know which zone owns which files.".to_string(),
            learning_goals: Some("Get oriented before the real map arrives.".to_string()),
        }],
    };

    SagaBundle {
        map,
        comic,
        tasks,
        readme: demo_readme(DEMO_REPO),
    }
}
