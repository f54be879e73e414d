//! Run wiring for both modes
//!
//! Credentials are process-wide preconditions: a missing token aborts before
//! any package is touched. Per-package failures are the driver's concern and
//! never end the run.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use tracing::{info, warn};

use agentconf_engine::{
    LocalManifestStore, PackageJob, PackageOutcome, PackageReport, RunConfig, RunSummary,
    SynthesisDriver, VersionStrategy,
};
use agentconf_github::{GitHubConfig, GitHubManifestStore, RepoClient};
use agentconf_providers::OpenAiAnalyzer;

use crate::cli::{LocalArgs, OrgArgs, RunArgs};

fn run_config(args: &RunArgs) -> RunConfig {
    RunConfig {
        batch_size: args.batch_size,
        batch_delay: Duration::from_millis(args.batch_delay_ms),
        limit: args.limit,
        version_strategy: if args.beta {
            VersionStrategy::Beta
        } else {
            VersionStrategy::Patch
        },
        ..RunConfig::default()
    }
}

fn analyzer() -> anyhow::Result<Arc<OpenAiAnalyzer>> {
    let api_key = std::env::var("OPENAI_API_KEY")
        .context("OPENAI_API_KEY is required")?;
    Ok(Arc::new(OpenAiAnalyzer::new(api_key)?))
}

/// Process every repository in the organization
pub async fn run_org(args: OrgArgs) -> anyhow::Result<RunSummary> {
    let token = std::env::var("GITHUB_TOKEN").context("GITHUB_TOKEN is required")?;
    let analyzer = analyzer()?;

    let config = GitHubConfig::new(token, &args.org).with_branch(&args.branch);
    let client = Arc::new(RepoClient::new(config)?);

    let repos = client.list_repositories().await?;
    if repos.is_empty() {
        bail!("No repositories found in organization {}", args.org);
    }

    // Working trees live for the whole run; one scratch dir per repository
    let scratch = tempfile::tempdir().context("Failed to create scratch directory")?;
    let mut jobs = Vec::new();
    let mut pre_reports = Vec::new();

    for repo in repos {
        match gate_repository(client.branch_exists(&repo, &args.branch).await) {
            RepoGate::Ready => {}
            RepoGate::Skip => {
                info!(repo, branch = %args.branch, "Branch missing, skipping repository");
                pre_reports.push(PackageReport {
                    package: repo,
                    outcome: PackageOutcome::Skipped,
                });
                continue;
            }
            RepoGate::Fail(error) => {
                warn!(repo, "Branch check failed, continuing with next repository: {}", error);
                pre_reports.push(PackageReport {
                    package: repo,
                    outcome: PackageOutcome::Failed { error },
                });
                continue;
            }
        }

        let target = scratch.path().join(&repo);
        let clone_client = client.clone();
        let clone_repo = repo.clone();
        let clone_target = target.clone();
        let cloned = tokio::task::spawn_blocking(move || {
            clone_client.clone_repository(&clone_repo, &clone_target)
        })
        .await;

        match clone_outcome(cloned) {
            None => jobs.push(PackageJob {
                name: repo,
                root: target,
            }),
            Some(error) => {
                warn!(repo, "Clone failed, continuing with next repository: {}", error);
                pre_reports.push(PackageReport {
                    package: repo,
                    outcome: PackageOutcome::Failed { error },
                });
            }
        }
    }

    let store = Arc::new(GitHubManifestStore::new(client));
    let driver = SynthesisDriver::new(analyzer, store, run_config(&args.run));
    let mut summary = driver.run(&jobs).await;

    summary.reports.extend(pre_reports);
    Ok(summary)
}

/// How a repository enters the run after the branch-existence check
///
/// Per-repository failures stay per-repository: a transient API error while
/// checking one branch must not end the run for everything behind it.
enum RepoGate {
    /// Branch present; clone and process
    Ready,
    /// Branch missing at the target ref; nothing to analyze
    Skip,
    /// Check failed; report the repository as failed and move on
    Fail(String),
}

fn gate_repository(branch_check: agentconf_github::Result<bool>) -> RepoGate {
    match branch_check {
        Ok(true) => RepoGate::Ready,
        Ok(false) => RepoGate::Skip,
        Err(e) => RepoGate::Fail(e.to_string()),
    }
}

/// `None` when the clone landed; otherwise the error to report
fn clone_outcome(
    join: Result<agentconf_github::Result<()>, tokio::task::JoinError>,
) -> Option<String> {
    match join {
        Ok(Ok(())) => None,
        Ok(Err(e)) => Some(e.to_string()),
        Err(e) => Some(format!("clone task failed: {}", e)),
    }
}

/// Process local package directories
pub async fn run_local(args: LocalArgs) -> anyhow::Result<RunSummary> {
    let analyzer = analyzer()?;

    let store = Arc::new(LocalManifestStore::new());
    let mut jobs = Vec::new();
    for path in &args.paths {
        let name = package_name(path)?;
        store.register(name.clone(), path.clone());
        jobs.push(PackageJob {
            name,
            root: path.clone(),
        });
    }

    let driver = SynthesisDriver::new(analyzer, store, run_config(&args.run));
    Ok(driver.run(&jobs).await)
}

fn package_name(path: &Path) -> anyhow::Result<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .with_context(|| format!("Cannot derive a package name from {}", path.display()))
}

/// Print one line per package plus aggregate counts
pub fn print_summary(summary: &RunSummary) {
    for report in &summary.reports {
        println!("{}: {}", report.package, describe(&report.outcome));
    }
    println!(
        "updated: {}, unchanged: {}, skipped: {}, failed: {}",
        summary.updated(),
        summary.unchanged(),
        summary.skipped(),
        summary.failed()
    );
}

fn describe(outcome: &PackageOutcome) -> String {
    match outcome {
        PackageOutcome::Updated { version, added } => {
            format!("updated to {} ({} new variables)", version, added)
        }
        PackageOutcome::Unchanged => "unchanged".to_string(),
        PackageOutcome::Skipped => "skipped".to_string(),
        PackageOutcome::Failed { error } => format!("failed: {}", error),
    }
}
