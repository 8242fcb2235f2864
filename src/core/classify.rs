//! Turns per-environment merge sets into one status record per branch.
//!
//! Merge sets come straight from git (`--merged` / `--no-merged`); this module
//! only does set membership. The git queries are independent and read-only,
//! so they run on a bounded pool of blocking tasks. Nothing here mutates the
//! repository.

use crate::config::EmptyTargets;
use crate::core::git::{BranchQueries, CommitInfo};
use crate::utils::error::{MergeWatchError, Result};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BranchStatus {
    /// One of the branches passed with `--branches`.
    Environment,
    /// Merged into every environment branch.
    FullyMerged,
    /// Merged into some environment branches, still pending for the others.
    Mergeable,
    /// Merged into none of the environment branches.
    NeverMerged,
    /// Local branch without a counterpart on the remote.
    LocalOrphan,
}

impl BranchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BranchStatus::Environment => "environment",
            BranchStatus::FullyMerged => "fully merged",
            BranchStatus::Mergeable => "pending",
            BranchStatus::NeverMerged => "never merged",
            BranchStatus::LocalOrphan => "local only",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvironmentBranchData {
    pub merged: BTreeSet<String>,
    pub unmerged: BTreeSet<String>,
}

impl EnvironmentBranchData {
    pub fn is_merged(&self, branch: &str) -> bool {
        if self.merged.contains(branch) {
            return true;
        }
        if !self.unmerged.contains(branch) {
            tracing::debug!(branch, "branch missing from both merge sets");
        }
        false
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureBranchSummary {
    pub name: String,
    pub last_commit: Option<CommitInfo>,
    /// Environment ref → merged, in the order the environments were given.
    pub merged_into: Vec<(String, bool)>,
    pub files_touched: Vec<String>,
    pub status: BranchStatus,
    pub is_current: bool,
}

impl FeatureBranchSummary {
    pub fn is_fully_merged(&self) -> bool {
        self.status == BranchStatus::FullyMerged
    }

    pub fn is_never_merged(&self) -> bool {
        self.status == BranchStatus::NeverMerged
    }

    pub fn is_environment_branch(&self) -> bool {
        self.status == BranchStatus::Environment
    }

    pub fn is_local_only(&self) -> bool {
        self.status == BranchStatus::LocalOrphan
    }

    pub fn is_merged_into(&self, environment: &str) -> bool {
        self.merged_into
            .iter()
            .any(|(name, merged)| name == environment && *merged)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ClassifyOptions {
    pub max_concurrency: usize,
    pub empty_targets: EmptyTargets,
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        Self {
            max_concurrency: 8,
            empty_targets: EmptyTargets::default(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum ListingQuery {
    Remote,
    Local,
    Current,
}

#[derive(Debug, Clone, Copy)]
enum MergeQuery {
    Merged,
    Unmerged,
}

pub struct BranchClassifier {
    queries: Arc<dyn BranchQueries>,
    options: ClassifyOptions,
}

impl BranchClassifier {
    pub fn new(queries: Arc<dyn BranchQueries>, options: ClassifyOptions) -> Self {
        Self { queries, options }
    }

    /// `environment_branches` must already be resolved to remote refs
    /// (`origin/DEV`). Query failures are logged and treated as empty results.
    pub async fn classify(
        &self,
        environment_branches: &[String],
    ) -> Result<Vec<FeatureBranchSummary>> {
        let listings = self
            .fan_out(
                vec![ListingQuery::Remote, ListingQuery::Local, ListingQuery::Current],
                |query, queries| match query {
                    ListingQuery::Remote => Listing::Remote(queries.list_remote_branches()),
                    ListingQuery::Local => Listing::Local(queries.list_local_branches()),
                    ListingQuery::Current => Listing::Current(queries.current_branch()),
                },
            )
            .await?;

        let mut remote_branches = Vec::new();
        let mut local_branches = Vec::new();
        let mut current = None;
        for listing in listings {
            match listing {
                Listing::Remote(result) => remote_branches = or_warn(result, "list remote branches"),
                Listing::Local(result) => local_branches = or_warn(result, "list local branches"),
                Listing::Current(result) => current = or_warn(result, "read the current branch"),
            }
        }

        let environment_data = self.collect_environment_data(environment_branches).await?;

        let mut summaries = classify_branches(
            self.queries.remote(),
            &remote_branches,
            &local_branches,
            current.as_deref(),
            environment_branches,
            &environment_data,
            self.options.empty_targets,
        );

        self.attach_metadata(&mut summaries, environment_branches.first().cloned())
            .await?;

        Ok(summaries)
    }

    async fn collect_environment_data(
        &self,
        environment_branches: &[String],
    ) -> Result<BTreeMap<String, EnvironmentBranchData>> {
        let jobs: Vec<(String, MergeQuery)> = environment_branches
            .iter()
            .flat_map(|env| {
                [
                    (env.clone(), MergeQuery::Merged),
                    (env.clone(), MergeQuery::Unmerged),
                ]
            })
            .collect();

        let results = self
            .fan_out(jobs, |(env, query), queries| {
                let result = match query {
                    MergeQuery::Merged => queries.merged_into(&env),
                    MergeQuery::Unmerged => queries.unmerged_into(&env),
                };
                (env, query, result)
            })
            .await?;

        let mut data: BTreeMap<String, EnvironmentBranchData> = BTreeMap::new();
        for (env, query, result) in results {
            let entry = data.entry(env.clone()).or_default();
            match query {
                MergeQuery::Merged => {
                    entry.merged = or_warn(result, &format!("list branches merged into {}", env))
                }
                MergeQuery::Unmerged => {
                    entry.unmerged =
                        or_warn(result, &format!("list branches not merged into {}", env))
                }
            }
        }

        Ok(data)
    }

    async fn attach_metadata(
        &self,
        summaries: &mut [FeatureBranchSummary],
        base: Option<String>,
    ) -> Result<()> {
        let jobs: Vec<(usize, String)> = summaries
            .iter()
            .enumerate()
            .filter(|(_, summary)| !summary.is_local_only())
            .map(|(index, summary)| (index, summary.name.clone()))
            .collect();

        let results = self
            .fan_out(jobs, move |(index, name), queries| {
                let commit = queries.last_commit_info(&name);
                let files = base
                    .as_deref()
                    .filter(|base| *base != name)
                    .map(|base| queries.files_touched(&name, base));
                (index, name, commit, files)
            })
            .await?;

        for (index, name, commit, files) in results {
            let summary = &mut summaries[index];
            summary.last_commit = match commit {
                Ok(info) => Some(info),
                Err(e) => {
                    tracing::warn!("Could not read last commit of {}: {}", name, e);
                    None
                }
            };
            if let Some(files) = files {
                summary.files_touched =
                    or_warn(files, &format!("list files touched by {}", name));
            }
        }

        Ok(())
    }

    /// Runs `job` once per input on the blocking pool, at most
    /// `max_concurrency` at a time. Results keep the input order.
    async fn fan_out<I, T, F>(&self, inputs: Vec<I>, job: F) -> Result<Vec<T>>
    where
        I: Send + 'static,
        T: Send + 'static,
        F: Fn(I, &dyn BranchQueries) -> T + Send + Sync + 'static,
    {
        let semaphore = Arc::new(Semaphore::new(self.options.max_concurrency.max(1)));
        let job = Arc::new(job);
        let mut tasks = JoinSet::new();
        let mut slots: Vec<Option<T>> = Vec::with_capacity(inputs.len());

        for (index, input) in inputs.into_iter().enumerate() {
            slots.push(None);
            let permit = Arc::clone(&semaphore)
                .acquire_owned()
                .await
                .map_err(|e| MergeWatchError::git_operation(format!("Query pool closed: {}", e)))?;
            let queries = Arc::clone(&self.queries);
            let job = Arc::clone(&job);

            tasks.spawn_blocking(move || {
                let _permit = permit;
                (index, job(input, queries.as_ref()))
            });
        }

        while let Some(joined) = tasks.join_next().await {
            let (index, value) = joined?;
            slots[index] = Some(value);
        }

        Ok(slots.into_iter().flatten().collect())
    }
}

enum Listing {
    Remote(Result<Vec<String>>),
    Local(Result<Vec<String>>),
    Current(Result<Option<String>>),
}

fn or_warn<T: Default>(result: Result<T>, what: &str) -> T {
    result.unwrap_or_else(|e| {
        tracing::warn!("Could not {}: {}", what, e);
        T::default()
    })
}

/// Pure classification step, without commit metadata.
///
/// Remote branches come first in their listed order, followed by local
/// branches that have no remote branch of the same name.
pub fn classify_branches(
    remote: &str,
    remote_branches: &[String],
    local_branches: &[String],
    current_branch: Option<&str>,
    environment_branches: &[String],
    environment_data: &BTreeMap<String, EnvironmentBranchData>,
    empty_targets: EmptyTargets,
) -> Vec<FeatureBranchSummary> {
    let prefix = format!("{}/", remote);
    let strip = |name: &str| -> String { name.strip_prefix(&prefix).unwrap_or(name).to_string() };

    let mut seen = HashSet::new();
    let mut summaries = Vec::new();

    for branch in remote_branches {
        if !seen.insert(branch.as_str()) {
            continue;
        }

        let merged_into: Vec<(String, bool)> = environment_branches
            .iter()
            .map(|env| {
                let merged = environment_data
                    .get(env)
                    .map(|data| data.is_merged(branch))
                    .unwrap_or(false);
                (env.clone(), merged)
            })
            .collect();

        let is_environment = environment_branches.iter().any(|env| env == branch);
        let status = derive_status(&merged_into, is_environment, empty_targets);

        summaries.push(FeatureBranchSummary {
            name: branch.clone(),
            last_commit: None,
            is_current: current_branch == Some(strip(branch.as_str()).as_str()),
            merged_into,
            files_touched: Vec::new(),
            status,
        });
    }

    let remote_names: HashSet<String> = remote_branches.iter().map(|b| strip(b.as_str())).collect();

    for local in local_branches {
        if remote_names.contains(local) {
            continue;
        }

        summaries.push(FeatureBranchSummary {
            name: local.clone(),
            last_commit: None,
            merged_into: environment_branches
                .iter()
                .map(|env| (env.clone(), false))
                .collect(),
            files_touched: Vec::new(),
            status: BranchStatus::LocalOrphan,
            is_current: current_branch == Some(local.as_str()),
        });
    }

    summaries
}

pub fn derive_status(
    merged_into: &[(String, bool)],
    is_environment: bool,
    empty_targets: EmptyTargets,
) -> BranchStatus {
    if is_environment {
        return BranchStatus::Environment;
    }

    if merged_into.is_empty() {
        return match empty_targets {
            EmptyTargets::FullyMerged => BranchStatus::FullyMerged,
            EmptyTargets::NeverMerged => BranchStatus::NeverMerged,
        };
    }

    let merged_count = merged_into.iter().filter(|(_, merged)| *merged).count();
    if merged_count == merged_into.len() {
        BranchStatus::FullyMerged
    } else if merged_count == 0 {
        BranchStatus::NeverMerged
    } else {
        BranchStatus::Mergeable
    }
}
