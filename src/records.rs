use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::DateTime;
use chrono_tz::Tz;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::error::Result;
use crate::model::SearchResult;
use crate::timestamp::file_stamp;

pub const SEPARATOR_WIDTH: usize = 50;

/// Append-only audit log of accept decisions for one run.
#[derive(Debug, Clone)]
pub struct RecordFile {
    path: PathBuf,
}

impl RecordFile {
    /// Create a fresh, empty `records_<stamp>.txt` inside `dir`.
    ///
    /// An existing file is never reopened: if another run already owns the
    /// name, `records_<stamp>_2.txt`, `_3` and so on are tried instead.
    pub async fn create(dir: &Path, started: &DateTime<Tz>) -> Result<Self> {
        let stamp = file_stamp(started);
        let mut attempt = 1u32;

        loop {
            let name = if attempt == 1 {
                format!("records_{stamp}.txt")
            } else {
                format!("records_{stamp}_{attempt}.txt")
            };
            let path = dir.join(name);

            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(_) => {
                    debug!("Created record file {}", path.display());
                    return Ok(RecordFile { path });
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    warn!("{} already exists, trying another name", path.display());
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry block. `outcome` is `Ok(stamp)` for a completed
    /// download or `Err(message)` for a failed one.
    pub async fn append(
        &self,
        result: &SearchResult,
        outcome: std::result::Result<&str, &str>,
    ) -> Result<()> {
        let block = format_entry(result, outcome);

        // Reopen in append mode for every entry
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(block.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

fn format_entry(result: &SearchResult, outcome: std::result::Result<&str, &str>) -> String {
    let status = match outcome {
        Ok(stamp) => format!("Downloaded: {stamp} US EST"),
        Err(message) => format!("Download failed! Message: {message}"),
    };
    format!(
        "Owner: {}\nRepository: {}\nSearch Result: {}\n{}\n{}\n\n",
        result.owner,
        result.repo_url,
        result.search_url,
        status,
        "=".repeat(SEPARATOR_WIDTH)
    )
}
