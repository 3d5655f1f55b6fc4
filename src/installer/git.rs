//! Version-control operations used to fetch and refresh module sources.

use git2::build::CheckoutBuilder;
use git2::Repository;
use std::path::Path;
use tracing::debug;

use crate::error::ToolFailure;

/// Clone and pull, reporting failures as captured data.
pub trait Vcs {
    /// Clone `url` into `target`, which must not exist yet
    fn clone_repo(&self, url: &str, target: &Path) -> Result<(), ToolFailure>;

    /// Bring the checked-out branch of `repo_dir` up to date with its remote
    fn pull(&self, repo_dir: &Path) -> Result<(), ToolFailure>;
}

/// Git backend built on libgit2
#[derive(Debug, Clone, Copy, Default)]
pub struct Git2Vcs;

const REMOTE: &str = "origin";

fn git_failure(err: git2::Error) -> ToolFailure {
    ToolFailure::new(Some(err.raw_code()), err.message())
}

impl Vcs for Git2Vcs {
    fn clone_repo(&self, url: &str, target: &Path) -> Result<(), ToolFailure> {
        debug!("Cloning {} into {:?}", url, target);
        Repository::clone(url, target)
            .map(|_| ())
            .map_err(git_failure)
    }

    /// Fetch the current branch from `origin` and fast-forward to it.
    ///
    /// Up to date counts as success. A diverged branch, a detached HEAD and
    /// uncommitted edits that the update would overwrite are failures;
    /// other uncommitted edits are kept.
    fn pull(&self, repo_dir: &Path) -> Result<(), ToolFailure> {
        let repo = Repository::open(repo_dir).map_err(git_failure)?;

        let head = repo.head().map_err(git_failure)?;
        if !head.is_branch() {
            return Err(ToolFailure::new(None, "HEAD is detached; not updating"));
        }
        let refname = head
            .name()
            .ok_or_else(|| ToolFailure::new(None, "HEAD reference name is not valid UTF-8"))?
            .to_string();
        let branch = head
            .shorthand()
            .ok_or_else(|| ToolFailure::new(None, "branch name is not valid UTF-8"))?
            .to_string();
        drop(head);

        let mut remote = repo.find_remote(REMOTE).map_err(git_failure)?;
        remote
            .fetch(&[branch.as_str()], None, None)
            .map_err(git_failure)?;

        let fetch_head = repo.find_reference("FETCH_HEAD").map_err(git_failure)?;
        let fetch_commit = repo
            .reference_to_annotated_commit(&fetch_head)
            .map_err(git_failure)?;
        let (analysis, _) = repo
            .merge_analysis(&[&fetch_commit])
            .map_err(git_failure)?;

        if analysis.is_up_to_date() {
            debug!("{:?} is up to date", repo_dir);
            return Ok(());
        }

        if !analysis.is_fast_forward() {
            return Err(ToolFailure::new(
                None,
                format!("branch '{branch}' has diverged from {REMOTE}/{branch}; merge manually"),
            ));
        }

        // Update the working tree before moving the branch so a conflict with
        // local edits leaves both untouched.
        let target = repo.find_object(fetch_commit.id(), None).map_err(git_failure)?;
        repo.checkout_tree(&target, Some(CheckoutBuilder::new().safe()))
            .map_err(|err| {
                ToolFailure::new(
                    Some(err.raw_code()),
                    format!(
                        "local changes would be overwritten by {REMOTE}/{branch}; \
                         commit or stash them first ({})",
                        err.message()
                    ),
                )
            })?;

        let mut reference = repo.find_reference(&refname).map_err(git_failure)?;
        reference
            .set_target(fetch_commit.id(), "zel: fast-forward")
            .map_err(git_failure)?;
        repo.set_head(&refname).map_err(git_failure)?;

        debug!("Fast-forwarded {:?} to {}", repo_dir, fetch_commit.id());
        Ok(())
    }
}
