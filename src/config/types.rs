use crate::ConfigError;
use serde::Deserialize;
use url::Url;

/// Main configuration structure for repo-chronicle
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub repository: RepositoryConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub auth: AuthConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Builds the URL of the first page of pull requests
    ///
    /// This is the only URL the crawler derives itself; every later page URL
    /// comes from the server's continuation cursor.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use repo_chronicle::config::load_config;
    /// use std::path::Path;
    ///
    /// let config = load_config(Path::new("chronicle.toml")).unwrap();
    /// // https://api.github.com/repos/owner/name/pulls?state=all&per_page=100
    /// println!("{}", config.start_url().unwrap());
    /// ```
    pub fn start_url(&self) -> Result<Url, ConfigError> {
        let mut url = Url::parse(&self.api.base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                ConfigError::InvalidUrl(format!(
                    "base-url '{}' cannot carry a path",
                    self.api.base_url
                ))
            })?;
            segments.pop_if_empty().extend([
                "repos",
                self.repository.owner.as_str(),
                self.repository.name.as_str(),
                "pulls",
            ]);
        }

        url.query_pairs_mut()
            .append_pair("state", self.api.state.as_str())
            .append_pair("per_page", &self.api.per_page.to_string());

        Ok(url)
    }

    /// Returns `owner/name` for log and header lines
    pub fn repository_slug(&self) -> String {
        format!("{}/{}", self.repository.owner, self.repository.name)
    }
}

/// The repository whose history is collected
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryConfig {
    /// Owner (user or organization) on the remote service
    pub owner: String,

    /// Repository name on the remote service
    pub name: String,

    /// Path to a local clone, used for the commit log
    #[serde(rename = "local-path", default = "default_local_path")]
    pub local_path: String,
}

/// Remote API settings
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Root of the REST API
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Which pull requests to list
    #[serde(default)]
    pub state: PullState,

    /// Page size requested from the server
    #[serde(rename = "per-page", default = "default_per_page")]
    pub per_page: u32,

    /// Minimum time between the start of two requests (milliseconds)
    #[serde(rename = "request-delay-ms", default)]
    pub request_delay_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            state: PullState::default(),
            per_page: default_per_page(),
            request_delay_ms: 0,
        }
    }
}

/// Pull request state filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PullState {
    Open,
    Closed,
    #[default]
    All,
}

impl PullState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PullState::Open => "open",
            PullState::Closed => "closed",
            PullState::All => "all",
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the tool
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the tool
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the operator
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

/// Where the credential comes from
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Account name sent with the token
    pub username: String,

    /// Environment variable holding the token
    #[serde(rename = "token-env", default = "default_token_env")]
    pub token_env: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the history text file
    pub path: String,

    /// Whether to dump the local commit log ahead of the pull requests
    #[serde(rename = "include-commits", default = "default_include_commits")]
    pub include_commits: bool,
}

fn default_local_path() -> String {
    ".".to_string()
}

fn default_base_url() -> String {
    "https://api.github.com".to_string()
}

fn default_per_page() -> u32 {
    100
}

fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}

fn default_include_commits() -> bool {
    true
}
