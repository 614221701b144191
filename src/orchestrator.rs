use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use chrono::DateTime;
use chrono_tz::Tz;
use tokio::fs;
use tracing::info;

use crate::actions::ActionExecutor;
use crate::config::RunConfig;
use crate::error::Result;
use crate::github_searcher::GitHubSearcher;
use crate::model::AcceptedSet;
use crate::prompt::{ask_yes_no, Prompter};
use crate::records::RecordFile;
use crate::triage::TriageSession;

/// What a finished session produced.
#[derive(Debug)]
pub struct SessionReport {
    pub accepted: AcceptedSet,
    pub record_path: PathBuf,
    pub extra_directories: Vec<PathBuf>,
}

/// Top-level query / triage / continue loop for one run.
pub struct QueryOrchestrator<'a> {
    config: &'a RunConfig,
    searcher: &'a GitHubSearcher,
    started: DateTime<Tz>,
    scratch_dir: PathBuf,
}

impl<'a> QueryOrchestrator<'a> {
    pub fn new(config: &'a RunConfig, searcher: &'a GitHubSearcher, started: DateTime<Tz>) -> Self {
        QueryOrchestrator {
            config,
            searcher,
            started,
            scratch_dir: env::temp_dir(),
        }
    }

    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = dir.into();
        self
    }

    /// Prompt for queries until the operator stops, triaging each one.
    pub async fn run<P: Prompter + ?Sized>(&self, prompter: &mut P) -> Result<SessionReport> {
        // Output root and record file exist before the first query
        fs::create_dir_all(&self.config.output_root).await?;
        let records = RecordFile::create(&self.config.output_root, &self.started).await?;
        let record_path = records.path().to_path_buf();

        let executor = ActionExecutor::new(self.searcher, self.config, records, &self.started)
            .with_scratch_dir(self.scratch_dir.clone());

        let mut accepted = AcceptedSet::new();

        loop {
            let query = prompter.read_line("Query? ")?;
            let query = query.trim();

            if query.is_empty() {
                prompter.show("Empty query ignored");
            } else {
                let results = self.searcher.collect(query, &self.config.language).await?;
                prompter.show(&format!("Query '{}' returned {} results", query, results.len()));

                let newly = TriageSession::new(
                    self.searcher,
                    &executor,
                    &mut *prompter,
                    self.config.scroll_preview,
                )
                .run(query, &results, &accepted)
                .await?;

                info!("Accepted {} new repositories for '{}'", newly.len(), query);
                accepted.merge(newly);
            }

            if !ask_yes_no(&mut *prompter, "Continue querying? (y/n) ")? {
                break;
            }
        }

        let extra_directories = match &self.config.extra_directory {
            Some(root) => make_extra_directories(root, &accepted).await?,
            None => Vec::new(),
        };

        info!(
            "Session finished: {} repositories accepted, records in {}",
            accepted.len(),
            record_path.display()
        );

        Ok(SessionReport {
            accepted,
            record_path,
            extra_directories,
        })
    }
}

/// Create one empty directory per accepted repository under `root`, named
/// by owner. Further repositories of the same owner get `_2`, `_3`, ...
pub async fn make_extra_directories(
    root: &Path,
    accepted: &AcceptedSet,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(root).await?;

    let mut per_owner: HashMap<&str, usize> = HashMap::new();
    let mut created = Vec::with_capacity(accepted.len());

    for key in accepted.iter() {
        let count = per_owner.entry(key.owner.as_str()).or_insert(0);
        *count += 1;

        let name = if *count == 1 {
            key.owner.clone()
        } else {
            format!("{}_{}", key.owner, count)
        };
        let dir = root.join(name);
        fs::create_dir_all(&dir).await?;
        created.push(dir);
    }

    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RepoKey;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn numbers_repeat_owners() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("extra");
        let accepted: AcceptedSet = [
            RepoKey::new("alice", "one"),
            RepoKey::new("bob", "x"),
            RepoKey::new("alice", "two"),
            RepoKey::new("alice", "three"),
        ]
        .into_iter()
        .collect();

        let created = make_extra_directories(&root, &accepted).await.unwrap();

        let names: Vec<_> = created
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["alice", "bob", "alice_2", "alice_3"]);
        assert!(created.iter().all(|p| p.is_dir()));
        assert_eq!(fs::read_dir(&created[0]).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn empty_set_only_creates_root() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("extra");

        let created = make_extra_directories(&root, &AcceptedSet::new()).await.unwrap();

        assert!(created.is_empty());
        assert!(root.is_dir());
    }
}
