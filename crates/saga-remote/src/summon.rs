//! Summoning a saga: fetch, decode, judge, and fall back.
//!
//! The map and the task list are fetched in parallel. The panel script needs
//! the decoded map (its module summary goes into the request), so it follows.
//! Any error value along the way swaps the whole result for the demo bundle.

use crate::aux::AuxReply;
use crate::service::{GenerationService, ScriptRequest, ServiceError};
use saga_core::bundle::{RepoId, SagaBundle};
use saga_core::config::{LayoutConfig, SagaConfig};
use saga_core::fallback;
use saga_core::graph::Graph;
use saga_core::script::Script;
use saga_core::tasks::TaskList;
use saga_toon::{GraphDecoder, Scatter, decode_panels};
use serde_json::json;

pub const DEFAULT_NUM_PANELS: u32 = 5;

#[derive(Debug, Clone)]
pub struct SummonOptions {
    pub layout: LayoutConfig,
    pub num_panels: u32,
}

impl Default for SummonOptions {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            num_panels: DEFAULT_NUM_PANELS,
        }
    }
}

impl SummonOptions {
    pub fn from_config(config: &SagaConfig) -> Self {
        Self {
            layout: config.layout.clone(),
            num_panels: config.script.num_panels,
        }
    }
}

/// Why a live result could not be assembled.
#[derive(Debug, thiserror::Error)]
pub enum SummonError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("unusable {what}: {detail}")]
    Unusable { what: &'static str, detail: String },
    #[error("task suggestions unavailable: {0}")]
    Tasks(String),
}

/// Exactly one of these comes back from [`summon`].
#[derive(Debug, Clone, PartialEq)]
pub enum Saga {
    Live(SagaBundle),
    Fallback { bundle: SagaBundle, reason: String },
}

impl Saga {
    pub fn bundle(&self) -> &SagaBundle {
        match self {
            Self::Live(bundle) | Self::Fallback { bundle, .. } => bundle,
        }
    }

    pub fn into_bundle(self) -> SagaBundle {
        match self {
            Self::Live(bundle) | Self::Fallback { bundle, .. } => bundle,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// Build the saga for `repo_url`, substituting the demo bundle on any failure.
///
/// Panics raised by `service` propagate; every error value is absorbed.
pub fn summon<S>(service: &S, repo_url: &str, options: &SummonOptions) -> Saga
where
    S: GenerationService + ?Sized,
{
    let repo = RepoId::from_url(repo_url);
    tracing::info!(repo = %repo, service = service.name(), "summoning saga");

    match try_summon(service, repo_url, &repo, options) {
        Ok(bundle) => {
            tracing::info!(
                repo = %repo,
                nodes = bundle.map.nodes.len(),
                edges = bundle.map.edges.len(),
                panels = bundle.comic.len(),
                "saga summoned"
            );
            Saga::Live(bundle)
        }
        Err(e) => {
            tracing::warn!(repo = %repo, error = %e, "falling back to demo saga");
            Saga::Fallback {
                bundle: fallback::bundle_for(repo.as_str()),
                reason: e.to_string(),
            }
        }
    }
}

fn try_summon<S>(
    service: &S,
    repo_url: &str,
    repo: &RepoId,
    options: &SummonOptions,
) -> Result<SagaBundle, SummonError>
where
    S: GenerationService + ?Sized,
{
    let (map_text, tasks) = rayon::join(
        || service.generate_map(repo_url),
        || fetch_tasks(service, repo_url),
    );

    let map = decode_map(&map_text?, repo, &options.layout)?;
    let tasks = tasks?;

    let request = ScriptRequest {
        repo_url: repo_url.to_string(),
        module_personas: map.module_summary(),
        num_panels: options.num_panels,
    };
    let comic = decode_script(&service.generate_script(&request)?)?;

    Ok(SagaBundle {
        readme: SagaBundle::live_readme(&map.meta.repo),
        map,
        comic,
        tasks,
    })
}

fn decode_map(text: &str, repo: &RepoId, layout: &LayoutConfig) -> Result<Graph, SummonError> {
    let decoded = GraphDecoder::new(Scatter::from_config(layout)).decode(text);
    if decoded.graph.nodes.is_empty() {
        return Err(SummonError::Unusable {
            what: "map",
            detail: format!(
                "no nodes decoded ({} rows dropped)",
                decoded.report.dropped_rows
            ),
        });
    }

    let mut graph = decoded.graph;
    if !decoded.report.repo_declared {
        graph.meta.repo = repo.to_string();
    }
    Ok(graph)
}

fn decode_script(text: &str) -> Result<Script, SummonError> {
    let script = decode_panels(text);
    if script.is_empty() {
        return Err(SummonError::Unusable {
            what: "script",
            detail: "no panel lines".to_string(),
        });
    }
    Ok(script)
}

fn fetch_tasks<S>(service: &S, repo_url: &str) -> Result<TaskList, SummonError>
where
    S: GenerationService + ?Sized,
{
    let value = service.call_json("suggest_tasks", &json!({ "repoUrl": repo_url }))?;
    match AuxReply::from_value(value) {
        AuxReply::Tasks(list) => Ok(list),
        AuxReply::ServiceError(error) => Err(SummonError::Tasks(error)),
        other => Err(SummonError::Tasks(format!(
            "unexpected {} reply",
            other.kind()
        ))),
    }
}
