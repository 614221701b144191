use std::io;

use tracing::{debug, info, warn};

use crate::actions::ActionExecutor;
use crate::error::Result;
use crate::github_searcher::GitHubSearcher;
use crate::model::{AcceptedSet, SearchResult};
use crate::preview::{self, emphasize, LineVerdict, PreviewStep, INITIAL_PREVIEW_LINES};
use crate::prompt::{ask_yes_no, Prompter};

/// Result counts at or above this need an explicit go-ahead before previewing.
pub const CONFIRM_PREVIEW_THRESHOLD: usize = 100;

/// Walks one query's results with the operator, one accept/reject decision
/// per repository.
pub struct TriageSession<'a, P: ?Sized> {
    searcher: &'a GitHubSearcher,
    executor: &'a ActionExecutor<'a>,
    prompter: &'a mut P,
    scroll_preview: bool,
}

impl<'a, P: Prompter + ?Sized> TriageSession<'a, P> {
    pub fn new(
        searcher: &'a GitHubSearcher,
        executor: &'a ActionExecutor<'a>,
        prompter: &'a mut P,
        scroll_preview: bool,
    ) -> Self {
        TriageSession {
            searcher,
            executor,
            prompter,
            scroll_preview,
        }
    }

    /// Triage `results` and return the repositories accepted during this
    /// query. Repositories in `already_accepted`, or accepted earlier in
    /// this same list, are skipped without any request or prompt.
    pub async fn run(
        &mut self,
        query: &str,
        results: &[SearchResult],
        already_accepted: &AcceptedSet,
    ) -> Result<AcceptedSet> {
        let mut accepted = AcceptedSet::new();

        // Broad queries need a go-ahead before anything is fetched
        if results.len() >= CONFIRM_PREVIEW_THRESHOLD {
            let prompt = format!(
                "Query {} returned {} results, are you sure you want to preview them?\n\
                 You may want to make a more specific query.\n(y/n) ",
                query,
                results.len()
            );
            if !ask_yes_no(&mut *self.prompter, &prompt)? {
                info!("Skipped previewing {} results for '{}'", results.len(), query);
                return Ok(accepted);
            }
        }

        for (idx, result) in results.iter().enumerate() {
            let key = result.key();
            if already_accepted.contains(&key) || accepted.contains(&key) {
                debug!("Skipping {}/{}: already accepted", key.owner, key.repo);
                continue;
            }

            if !self.decide(query, idx, results.len(), result).await? {
                continue;
            }

            // Accepted, even if the download fails below
            let outcome = self.executor.act(result).await?;
            if let Some(message) = &outcome.failure_message {
                warn!("{}/{} accepted but not downloaded: {}", key.owner, key.repo, message);
            }
            accepted.insert(key);
        }

        Ok(accepted)
    }

    /// Show the matched file and get an accept/reject answer.
    async fn decide(
        &mut self,
        query: &str,
        idx: usize,
        total: usize,
        result: &SearchResult,
    ) -> Result<bool> {
        // Fetch and show the matched file
        let content = self.searcher.fetch_file_content(result).await?;
        self.prompter.show(&format!("--- {} ---", result.search_url));

        if self.scroll_preview {
            let prompter = &mut *self.prompter;
            let early = preview::scroll(content.lines(), INITIAL_PREVIEW_LINES, |step| {
                match step {
                    PreviewStep::Show(line) => {
                        prompter.show(&emphasize(line, query));
                        Ok::<_, io::Error>(LineVerdict::Continue)
                    }
                    PreviewStep::Ask(line) => {
                        let key = prompter.read_key(&format!("{} ", emphasize(line, query)))?;
                        Ok(LineVerdict::from_key(key))
                    }
                }
            })?;
            if let Some(accepted) = early {
                return Ok(accepted);
            }
        } else {
            for line in content.lines() {
                self.prompter.show(&emphasize(line, query));
            }
        }

        // No early verdict, ask explicitly
        let prompt = format!("({}/{}) Is match? (y/n) ", idx + 1, total);
        Ok(ask_yes_no(&mut *self.prompter, &prompt)?)
    }
}
