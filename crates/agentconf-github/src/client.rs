//! Repository client over the GitHub API and local git
//!
//! Everything here is plumbing: list repositories in the organization, check
//! a branch exists, fetch or write a single file at a ref, clone a working
//! tree. No decision logic.

use std::path::Path;

use http::StatusCode;
use octocrab::params::repos::Reference;
use octocrab::{Octocrab, OctocrabBuilder};
use tracing::{debug, info};

use crate::error::GitHubError;
use crate::Result;

/// GitHub access configuration
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    /// API token
    pub token: String,
    /// Organization whose repositories are processed
    pub org: String,
    /// Branch the manifests are read from and written to
    pub branch: String,
}

impl GitHubConfig {
    /// Create a new configuration targeting the `main` branch
    pub fn new(token: impl Into<String>, org: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            org: org.into(),
            branch: "main".to_string(),
        }
    }

    /// Override the target branch
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.token.is_empty() {
            return Err(GitHubError::ConfigError("GitHub token is required".to_string()));
        }
        if self.org.is_empty() {
            return Err(GitHubError::ConfigError("Organization is required".to_string()));
        }
        if self.branch.is_empty() {
            return Err(GitHubError::ConfigError("Branch is required".to_string()));
        }
        Ok(())
    }
}

/// Client for repository enumeration, file access, and cloning
pub struct RepoClient {
    config: GitHubConfig,
    client: Octocrab,
}

impl RepoClient {
    /// Create a client; fails on invalid configuration or a bad token format
    pub fn new(config: GitHubConfig) -> Result<Self> {
        config.validate()?;
        let client = OctocrabBuilder::new()
            .personal_token(config.token.clone())
            .build()?;
        Ok(Self { config, client })
    }

    /// The configured target branch
    pub fn branch(&self) -> &str {
        &self.config.branch
    }

    /// Names of all repositories in the organization, across all pages
    pub async fn list_repositories(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut page = self
            .client
            .orgs(&self.config.org)
            .list_repos()
            .per_page(100)
            .send()
            .await?;

        loop {
            names.extend(page.items.iter().map(|repo| repo.name.clone()));
            match self.client.get_page(&page.next).await? {
                Some(next) => page = next,
                None => break,
            }
        }

        info!(org = %self.config.org, count = names.len(), "Enumerated repositories");
        Ok(names)
    }

    /// Whether `branch` exists in `repo`
    pub async fn branch_exists(&self, repo: &str, branch: &str) -> Result<bool> {
        let result = self
            .client
            .repos(&self.config.org, repo)
            .get_ref(&Reference::Branch(branch.to_string()))
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(octocrab::Error::GitHub { source, .. })
                if source.status_code == StatusCode::NOT_FOUND =>
            {
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Fetch one file's content and blob SHA at the configured branch
    ///
    /// `Ok(None)` means the file does not exist at that ref.
    pub async fn get_file(&self, repo: &str, path: &str) -> Result<Option<(String, String)>> {
        let result = self
            .client
            .repos(&self.config.org, repo)
            .get_content()
            .path(path)
            .r#ref(&self.config.branch)
            .send()
            .await;

        match result {
            Ok(contents) => {
                let Some(file) = contents.items.into_iter().next() else {
                    return Ok(None);
                };
                let sha = file.sha.clone();
                let content = file.decoded_content().unwrap_or_default();
                Ok(Some((content, sha)))
            }
            Err(octocrab::Error::GitHub { source, .. })
                if source.status_code == StatusCode::NOT_FOUND =>
            {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Create or update one file at the configured branch
    ///
    /// `sha` is the prior blob SHA for updates; GitHub rejects the write if
    /// the file changed underneath us, which is exactly what we want.
    pub async fn put_file(
        &self,
        repo: &str,
        path: &str,
        content: &str,
        message: &str,
        sha: Option<&str>,
    ) -> Result<()> {
        let repos = self.client.repos(&self.config.org, repo);
        match sha {
            Some(sha) => {
                repos
                    .update_file(path, message, content, sha)
                    .branch(&self.config.branch)
                    .send()
                    .await?;
            }
            None => {
                repos
                    .create_file(path, message, content)
                    .branch(&self.config.branch)
                    .send()
                    .await?;
            }
        }
        debug!(repo, path, "Wrote file");
        Ok(())
    }

    /// Clone `repo` at the configured branch into `target`
    pub fn clone_repository(&self, repo: &str, target: &Path) -> Result<()> {
        let url = format!("https://github.com/{}/{}.git", self.config.org, repo);
        let token = self.config.token.clone();

        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(move |_url, _username, _allowed| {
            git2::Cred::userpass_plaintext("x-access-token", &token)
        });
        let mut fetch_options = git2::FetchOptions::new();
        fetch_options.remote_callbacks(callbacks);

        git2::build::RepoBuilder::new()
            .branch(&self.config.branch)
            .fetch_options(fetch_options)
            .clone(&url, target)?;

        debug!(repo, target = %target.display(), "Cloned repository");
        Ok(())
    }
}
