use std::env;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::DateTime;
use chrono_tz::Tz;
use tracing::{debug, info, warn};
use zip::ZipArchive;

use crate::config::{IssueTemplate, RunConfig};
use crate::error::{Result, TriageError};
use crate::github_searcher::GitHubSearcher;
use crate::model::SearchResult;
use crate::records::RecordFile;
use crate::timestamp::record_stamp;

/// What happened to an accepted result's archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub downloaded: bool,
    pub failure_message: Option<String>,
}

/// Side effects run when the operator accepts a result: file an issue,
/// download and extract the repository, and log the decision.
pub struct ActionExecutor<'a> {
    searcher: &'a GitHubSearcher,
    issue: Option<IssueTemplate>,
    output_root: PathBuf,
    scratch_dir: PathBuf,
    records: RecordFile,
    stamp: String,
}

impl<'a> ActionExecutor<'a> {
    pub fn new(
        searcher: &'a GitHubSearcher,
        config: &RunConfig,
        records: RecordFile,
        started: &DateTime<Tz>,
    ) -> Self {
        ActionExecutor {
            searcher,
            issue: config.issue.clone(),
            output_root: config.output_root.clone(),
            scratch_dir: env::temp_dir(),
            records,
            stamp: record_stamp(started),
        }
    }

    /// Directory that holds the downloaded archive while it is extracted.
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = dir.into();
        self
    }

    /// Run every accept-time action for `result`.
    ///
    /// Issue failures are logged and ignored. Download and extraction
    /// failures are written to the record file and returned in the outcome.
    /// Anything else (network failures, record file I/O) is an error.
    pub async fn act(&self, result: &SearchResult) -> Result<ActionOutcome> {
        // Issue filing is best effort
        if let Some(issue) = &self.issue {
            if let Err(e) = self.searcher.raise_issue(result, issue).await {
                warn!(
                    "Could not file issue on {}/{}: {}",
                    result.owner, result.repo, e
                );
            }
        }

        let outcome = match self.download_and_extract(result).await {
            Ok(dest) => {
                info!("Extracted {} into {}", result.repo_url, dest.display());
                ActionOutcome {
                    downloaded: true,
                    failure_message: None,
                }
            }
            Err(e @ (TriageError::Download(_) | TriageError::Extract(_))) => {
                warn!("Download of {} failed: {}", result.repo_url, e);
                ActionOutcome {
                    downloaded: false,
                    failure_message: Some(e.to_string()),
                }
            }
            Err(e) => return Err(e),
        };

        let entry = match &outcome.failure_message {
            None => Ok(self.stamp.as_str()),
            Some(message) => Err(message.as_str()),
        };
        self.records.append(result, entry).await?;

        Ok(outcome)
    }

    async fn download_and_extract(&self, result: &SearchResult) -> Result<PathBuf> {
        let mut response = self.searcher.download_archive(result).await?;
        let dest = self
            .output_root
            .join(format!("{}_{}", result.owner, result.repo));

        // removed on drop if anything below bails out early
        let mut archive = tempfile::Builder::new()
            .prefix("github-triage-")
            .suffix(".zip")
            .tempfile_in(&self.scratch_dir)?;

        // Stream the body to disk chunk by chunk
        let mut written = 0usize;
        while let Some(chunk) = response.chunk().await? {
            archive.write_all(&chunk)?;
            written += chunk.len();
        }
        archive.flush()?;
        debug!(
            "Wrote {} bytes of {} to {}",
            written,
            result.repo_url,
            archive.path().display()
        );

        // Unpack, then drop the archive whatever the outcome
        let extracted = extract_zip(archive.path(), &dest);

        if let Err(e) = archive.close() {
            warn!("Could not remove temporary archive: {}", e);
        }

        extracted.map(|_| dest)
    }
}

fn extract_zip(archive: &Path, dest: &Path) -> Result<()> {
    let file = File::open(archive)?;
    let mut zip = ZipArchive::new(file).map_err(|e| TriageError::Extract(e.to_string()))?;
    zip.extract(dest)
        .map_err(|e| TriageError::Extract(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;
    use zip::write::FileOptions;
    use zip::ZipWriter;

    #[test]
    fn extracts_valid_archive() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("a.zip");

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("a-b-123/README.md", FileOptions::default())
            .unwrap();
        writer.write_all(b"hello").unwrap();
        std::fs::write(&archive, writer.finish().unwrap().into_inner()).unwrap();

        let dest = dir.path().join("a_b");
        extract_zip(&archive, &dest).unwrap();

        assert_eq!(
            std::fs::read_to_string(dest.join("a-b-123/README.md")).unwrap(),
            "hello"
        );
    }

    #[test]
    fn truncated_archive_is_an_extract_error() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("broken.zip");
        std::fs::write(&archive, b"PK\x03\x04 not really a zip").unwrap();

        let err = extract_zip(&archive, &dir.path().join("out")).unwrap_err();
        assert!(matches!(err, TriageError::Extract(_)));
    }
}
