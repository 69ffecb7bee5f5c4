//! CLI binary for repo-saga: summon, decode, and explore repository sagas.

mod progress;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use saga_core::config::SagaConfig;
use saga_core::fallback;
use saga_remote::aux::{chat_with_tyrion, consult_master, scout_quests};
use saga_remote::{ChatTurn, HttpService, Saga, SummonOptions, summon};
use saga_toon::{GraphDecoder, Scatter, decode_panels};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "repo-saga", about = "Turn a repository into a map and a saga")]
struct Cli {
    /// Project root directory holding .saga/config.toml (defaults to current directory)
    #[arg(short, long, global = true)]
    project: Option<PathBuf>,

    /// Pin the node layout seed
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summon the full saga for a repository, falling back to the demo realm
    Summon {
        /// Repository URL, e.g. https://github.com/owner/name
        repo_url: String,
    },

    /// Decode a map document (reads stdin when no file is given)
    DecodeMap { file: Option<PathBuf> },

    /// Decode a panel script (reads stdin when no file is given)
    DecodeScript { file: Option<PathBuf> },

    /// Print the demo saga
    Demo {
        /// Repository identifier to stamp on the demo
        #[arg(long)]
        repo: Option<String>,
    },

    /// Ask the master for the lore of one module
    Consult {
        repo_url: String,
        /// Module folder, e.g. src/auth
        node_path: String,
    },

    /// Send one message to the code reviewer
    Chat {
        repo_url: String,
        message: String,

        /// File the message is about
        #[arg(long)]
        file: Option<String>,

        /// JSON file with earlier turns: [{"user": .., "ai": ..}]
        #[arg(long)]
        history: Option<PathBuf>,
    },

    /// Scout one module for improvement quests
    Scout {
        repo_url: String,
        /// Module folder, e.g. src/auth
        node_path: String,
    },
}

fn get_project_root(cli: &Cli) -> Result<PathBuf> {
    match &cli.project {
        Some(p) => Ok(p.clone()),
        None => std::env::current_dir().context("failed to get current directory"),
    }
}

fn load_config(cli: &Cli) -> Result<SagaConfig> {
    let project_root = get_project_root(cli)?;
    let mut config = SagaConfig::load(&project_root)?;
    if let Some(seed) = cli.seed {
        config.layout.seed = Some(seed);
    }
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Summon { repo_url } => cmd_summon(&config, &repo_url),
        Commands::DecodeMap { file } => cmd_decode_map(&config, file.as_deref()),
        Commands::DecodeScript { file } => cmd_decode_script(file.as_deref()),
        Commands::Demo { repo } => cmd_demo(repo.as_deref()),
        Commands::Consult {
            repo_url,
            node_path,
        } => cmd_consult(&config, &repo_url, &node_path),
        Commands::Chat {
            repo_url,
            message,
            file,
            history,
        } => cmd_chat(
            &config,
            &repo_url,
            &message,
            file.as_deref(),
            history.as_deref(),
        ),
        Commands::Scout {
            repo_url,
            node_path,
        } => cmd_scout(&config, &repo_url, &node_path),
    }
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => std::io::read_to_string(std::io::stdin()).context("failed to read stdin"),
    }
}

fn cmd_summon(config: &SagaConfig, repo_url: &str) -> Result<()> {
    let service = HttpService::from_config(&config.service);
    let options = SummonOptions::from_config(config);

    let spinner = progress::Spinner::start(&format!("Summoning the saga of {}...", repo_url));
    let saga = summon(&service, repo_url, &options);

    match &saga {
        Saga::Live(bundle) => spinner.finish(&format!(
            "Saga summoned: {} nodes, {} edges, {} panels, {} tasks",
            bundle.map.nodes.len(),
            bundle.map.edges.len(),
            bundle.comic.len(),
            bundle.tasks.tasks.len()
        )),
        Saga::Fallback { reason, .. } => spinner.finish(&format!(
            "The archives are sealed ({}). Showing the demo realm.",
            reason
        )),
    }

    println!("{}", saga.bundle().to_json_pretty()?);
    Ok(())
}

fn cmd_decode_map(config: &SagaConfig, file: Option<&Path>) -> Result<()> {
    let text = read_input(file)?;
    let decoded = GraphDecoder::new(Scatter::from_config(&config.layout)).decode(&text);
    let report = decoded.report;

    tracing::info!(
        repo = %decoded.graph.meta.repo,
        nodes = report.node_rows,
        edges = report.edge_rows,
        dropped = report.dropped_rows,
        repo_declared = report.repo_declared,
        "decoded map document"
    );
    let dangling = decoded.graph.dangling_edges().len();
    if dangling > 0 {
        tracing::warn!(dangling, "edges reference unknown nodes");
    }

    print_json(&decoded.graph)
}

fn cmd_decode_script(file: Option<&Path>) -> Result<()> {
    let text = read_input(file)?;
    let script = decode_panels(&text);
    tracing::info!(panels = script.len(), "decoded panel script");
    print_json(&script)
}

fn cmd_demo(repo: Option<&str>) -> Result<()> {
    let json = match repo {
        Some(repo) => fallback::bundle_for(repo).to_json_pretty()?,
        None => fallback::bundle().to_json_pretty()?,
    };
    println!("{}", json);
    Ok(())
}

fn cmd_consult(config: &SagaConfig, repo_url: &str, node_path: &str) -> Result<()> {
    let service = HttpService::from_config(&config.service);
    print_json(&consult_master(&service, repo_url, node_path))
}

fn cmd_chat(
    config: &SagaConfig,
    repo_url: &str,
    message: &str,
    file: Option<&str>,
    history: Option<&Path>,
) -> Result<()> {
    let turns: Vec<ChatTurn> = match history {
        Some(path) => {
            let text = read_input(Some(path))?;
            serde_json::from_str(&text)
                .with_context(|| format!("invalid chat history in {}", path.display()))?
        }
        None => Vec::new(),
    };

    let service = HttpService::from_config(&config.service);
    let reply = chat_with_tyrion(
        &service,
        repo_url,
        message,
        &turns,
        file,
        config.chat.history_turns,
    );
    print_json(&reply)
}

fn cmd_scout(config: &SagaConfig, repo_url: &str, node_path: &str) -> Result<()> {
    let service = HttpService::from_config(&config.service);
    print_json(&scout_quests(&service, repo_url, node_path))
}
