use crate::config::Config;
use crate::error::{AnalyzerError, Result, Service};
use crate::selector::{select_important_files, MAX_IMPORTANT_FILES};
use crate::util::truncate_chars;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::warn;

/// Per-file character cap applied before the snapshot is assembled
pub const FILE_CONTENT_CHAR_CAP: usize = 5000;

/// Files above this size are skipped rather than fetched
const MAX_FILE_BYTES: u64 = 1_000_000;

const API_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = concat!("repoprep/", env!("CARGO_PKG_VERSION"));

static GITHUB_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"github\.com/([^/]+)/([^/]+)").unwrap());

/// Extracts the owner/repo pair from a GitHub repository URL
///
/// A trailing `.git` on the repository name is stripped.
pub fn parse_github_url(repo_url: &str) -> Result<(String, String)> {
    let caps = GITHUB_URL_RE
        .captures(repo_url)
        .ok_or_else(|| AnalyzerError::InvalidUrl(repo_url.to_string()))?;
    let owner = caps[1].to_string();
    let repo = caps[2].trim_end_matches(".git").to_string();
    Ok((owner, repo))
}

/// Raw item from the GitHub recursive tree API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEntry {
    /// Path relative to the repository root
    pub path: String,
    /// `blob` for files, `tree` for directories
    #[serde(rename = "type")]
    pub kind: String,
    /// Size in bytes; absent for directories
    #[serde(default)]
    pub size: Option<u64>,
}

/// Bounded, point-in-time sample of a repository gathered for analysis
///
/// Built once per request and immutable after construction.
#[derive(Debug, Clone, Serialize)]
pub struct RepositorySnapshot {
    pub owner: String,
    pub repo_name: String,
    /// README text, or the `"No README found"` sentinel
    pub readme: String,
    /// Sorted top-level folder names derived from the tree
    pub folder_structure: Vec<String>,
    /// Selected file paths with their content, in selection order,
    /// each capped at [`FILE_CONTENT_CHAR_CAP`] characters
    pub important_files: Vec<(String, String)>,
    /// Count of blob-type entries in the tree
    pub total_files: usize,
}

#[derive(Debug, Deserialize)]
struct TreeResponse {
    #[serde(default)]
    tree: Vec<TreeEntry>,
}

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    size: Option<u64>,
}

/// Client for the GitHub REST API
///
/// Constructed per request from the shared config. GitHub calls are never
/// retried; they fail fast or degrade to empty/absent results.
pub struct GitHubClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(API_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            base_url: config.github_api_base.trim_end_matches('/').to_string(),
            token: config.github_token.clone(),
        })
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        let mut request = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .header(header::ACCEPT, "application/vnd.github.v3+json")
            .header(header::USER_AGENT, USER_AGENT);
        if let Some(token) = &self.token {
            request = request.header(header::AUTHORIZATION, format!("token {token}"));
        }
        request
    }

    /// Fetches the repository README
    ///
    /// Returns the `"No README found"` sentinel on 404 so a missing README
    /// degrades the analysis instead of aborting it.
    pub async fn fetch_readme(&self, owner: &str, repo: &str) -> Result<String> {
        let response = self.get(&format!("/repos/{owner}/{repo}/readme")).send().await?;
        let status = response.status();
        match status {
            StatusCode::NOT_FOUND => Ok("No README found".to_string()),
            StatusCode::FORBIDDEN => Err(AnalyzerError::RateLimited {
                service: Service::GitHub,
                message: "rate limit exceeded or repository is private".into(),
            }),
            _ if !status.is_success() => Err(AnalyzerError::Upstream {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            }),
            _ => {
                let data: ContentsResponse = response.json().await?;
                decode_content(data.content.as_deref().unwrap_or_default())
            }
        }
    }

    /// Fetches the recursive file tree, trying `main` then `master`
    ///
    /// Any failure other than a GitHub rate limit degrades to an empty tree:
    /// partial, README-only analysis is more useful than total failure.
    pub async fn fetch_repo_tree(&self, owner: &str, repo: &str) -> Result<Vec<TreeEntry>> {
        for (attempt, branch) in ["main", "master"].iter().enumerate() {
            let response = match self
                .get(&format!("/repos/{owner}/{repo}/git/trees/{branch}?recursive=1"))
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    warn!("tree fetch failed for {owner}/{repo}: {e}");
                    return Ok(Vec::new());
                }
            };

            let status = response.status();
            if status == StatusCode::NOT_FOUND && attempt == 0 {
                continue;
            }
            if status == StatusCode::FORBIDDEN {
                return Err(AnalyzerError::RateLimited {
                    service: Service::GitHub,
                    message: "rate limit exceeded".into(),
                });
            }
            if !status.is_success() {
                warn!("tree fetch for {owner}/{repo} returned {status}, proceeding without tree");
                return Ok(Vec::new());
            }

            match response.json::<TreeResponse>().await {
                Ok(data) => return Ok(data.tree),
                Err(e) => {
                    warn!("tree response for {owner}/{repo} unparseable: {e}");
                    return Ok(Vec::new());
                }
            }
        }
        // 404 on both branches
        Ok(Vec::new())
    }

    /// Fetches one file's content; best-effort, never fatal
    ///
    /// Returns `None` for files over 1 MB and on any fetch/decode failure.
    pub async fn fetch_file_content(&self, owner: &str, repo: &str, path: &str) -> Option<String> {
        let response = self
            .get(&format!("/repos/{owner}/{repo}/contents/{path}"))
            .send()
            .await
            .ok()?;
        if !response.status().is_success() {
            return None;
        }
        let data: ContentsResponse = response.json().await.ok()?;
        if data.size.unwrap_or(0) > MAX_FILE_BYTES {
            return None;
        }
        decode_content(data.content.as_deref()?).ok()
    }

    /// Runs the full fetch pipeline and assembles the snapshot
    pub async fn analyze_repository(&self, repo_url: &str) -> Result<RepositorySnapshot> {
        let (owner, repo_name) = parse_github_url(repo_url)?;

        let readme = self.fetch_readme(&owner, &repo_name).await?;
        let tree = self.fetch_repo_tree(&owner, &repo_name).await?;

        let folders: BTreeSet<String> = tree
            .iter()
            .filter_map(|entry| entry.path.split_once('/'))
            .map(|(top, _)| top.to_string())
            .collect();

        let mut important_files = Vec::new();
        for path in select_important_files(&tree, MAX_IMPORTANT_FILES) {
            if let Some(content) = self.fetch_file_content(&owner, &repo_name, &path).await {
                let capped = truncate_chars(&content, FILE_CONTENT_CHAR_CAP).to_string();
                important_files.push((path, capped));
            }
        }

        let total_files = tree.iter().filter(|entry| entry.kind == "blob").count();

        Ok(RepositorySnapshot {
            owner,
            repo_name,
            readme,
            folder_structure: folders.into_iter().collect(),
            important_files,
            total_files,
        })
    }
}

/// Decodes the base64 payload GitHub embeds newlines into
fn decode_content(encoded: &str) -> Result<String> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = BASE64.decode(compact.as_bytes()).map_err(|e| AnalyzerError::Upstream {
        status: 500,
        body: format!("failed to decode content payload: {e}"),
    })?;
    String::from_utf8(bytes).map_err(|e| AnalyzerError::Upstream {
        status: 500,
        body: format!("content payload is not valid UTF-8: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_plain_repository_url() {
        let (owner, repo) = parse_github_url("https://github.com/openai/whisper").unwrap();
        assert_eq!(owner, "openai");
        assert_eq!(repo, "whisper");
    }

    #[test]
    fn strips_dot_git_suffix() {
        let (_, repo) = parse_github_url("https://github.com/rust-lang/rust.git").unwrap();
        assert_eq!(repo, "rust");
    }

    #[test]
    fn rejects_non_github_urls() {
        assert!(matches!(
            parse_github_url("https://gitlab.com/owner/repo"),
            Err(AnalyzerError::InvalidUrl(_))
        ));
        assert!(matches!(
            parse_github_url("https://github.com/owner-only"),
            Err(AnalyzerError::InvalidUrl(_))
        ));
    }

    #[test]
    fn decodes_github_style_wrapped_base64() {
        // GitHub wraps base64 content at 60 columns
        let encoded = "SGVsbG8s\nIHdvcmxk\nIQ==\n";
        assert_eq!(decode_content(encoded).unwrap(), "Hello, world!");
    }

    #[test]
    fn decode_failure_is_an_upstream_error() {
        assert!(matches!(
            decode_content("!!not-base64!!"),
            Err(AnalyzerError::Upstream { .. })
        ));
    }
}
