//! The result bundle handed to the presentation layer.

use crate::graph::Graph;
use crate::script::Script;
use crate::tasks::TaskList;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Map, narrative script, starter tasks and readme text for one repository.
///
/// The three collections are sourced independently; nothing ties a panel or
/// task back to a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SagaBundle {
    pub map: Graph,
    pub comic: Script,
    pub tasks: TaskList,
    pub readme: String,
}

impl SagaBundle {
    /// Readme text for a bundle decoded from live service output.
    pub fn live_readme(repo: &str) -> String {
        format!("# {}\n\nMap successfully decoded from the Archives.", repo)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize saga bundle to JSON")
    }
}

/// Short `owner/name` identifier for a repository URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoId(String);

impl RepoId {
    const HOST_PREFIXES: [&str; 4] = [
        "https://github.com/",
        "http://github.com/",
        "www.github.com/",
        "github.com/",
    ];

    /// Strip the GitHub host prefix, a trailing `.git` and trailing slashes.
    ///
    /// Input that reduces to nothing is kept verbatim (trimmed).
    pub fn from_url(url: &str) -> Self {
        let trimmed = url.trim();
        let mut rest = trimmed;
        for prefix in Self::HOST_PREFIXES {
            if let Some(stripped) = rest.strip_prefix(prefix) {
                rest = stripped;
                break;
            }
        }
        let rest = rest.trim_end_matches('/');
        let rest = rest.strip_suffix(".git").unwrap_or(rest);
        if rest.is_empty() {
            Self(trimmed.to_string())
        } else {
            Self(rest.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_id_strips_host_and_suffix() {
        assert_eq!(
            RepoId::from_url("https://github.com/octo/widgets.git").as_str(),
            "octo/widgets"
        );
        assert_eq!(
            RepoId::from_url("github.com/octo/widgets/").as_str(),
            "octo/widgets"
        );
    }

    #[test]
    fn test_repo_id_keeps_unrecognized_input() {
        assert_eq!(RepoId::from_url("octo/widgets").as_str(), "octo/widgets");
        assert_eq!(
            RepoId::from_url("https://github.com/").as_str(),
            "https://github.com/"
        );
    }

    #[test]
    fn test_live_readme_names_repo() {
        let readme = SagaBundle::live_readme("octo/widgets");
        assert!(readme.starts_with("# octo/widgets\n"));
        assert!(readme.contains("decoded from the Archives"));
    }
}
