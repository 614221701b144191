//! # GitHub Triage
//!
//! Interactive keyword search over GitHub code. Every matching file is shown
//! to the operator, who accepts or rejects it; accepted repositories are
//! downloaded (and optionally receive an issue) and every decision is logged
//! to an append-only records file.
//!
//! ## Main Components
//!
//! - [`GitHubSearcher`]: paged code search plus the contents, issues and
//!   zipball endpoints
//! - [`TriageSession`]: preview and accept/reject loop for one query
//! - [`ActionExecutor`]: issue filing, archive download/extraction, records
//! - [`QueryOrchestrator`]: the query / triage / continue loop of a run
//! - [`Args`] and [`RunConfig`]: command line and config file settings
//!
//! ## Example
//!
//! ```no_run
//! use github_triage::{
//!     timestamp, ConfigFile, GitHubSearcher, QueryOrchestrator, RunConfig, TerminalPrompter,
//! };
//! use std::path::Path;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let file = ConfigFile::load(Path::new("triage.conf"))?;
//!     let config = RunConfig::from_file(&file, None, None)?;
//!     let searcher = GitHubSearcher::from_config(&config)?;
//!
//!     let report = QueryOrchestrator::new(&config, &searcher, timestamp::now_eastern())
//!         .run(&mut TerminalPrompter::new())
//!         .await?;
//!
//!     println!("accepted {} repositories", report.accepted.len());
//!     Ok(())
//! }
//! ```

mod actions;
mod args;
mod config;
mod error;
mod github_searcher;
mod model;
mod orchestrator;
mod preview;
mod prompt;
mod records;
pub mod timestamp;
mod triage;

pub use crate::actions::{ActionExecutor, ActionOutcome};
pub use crate::args::Args;
pub use crate::config::{ConfigFile, IssueTemplate, RunConfig, ALLOWED_KEYS, DEFAULT_API_BASE};
pub use crate::error::{Result, TriageError};
pub use crate::github_searcher::{GitHubSearcher, PageResult, PAGE_SIZE};
pub use crate::model::{AcceptedSet, RepoKey, SearchResult};
pub use crate::orchestrator::{make_extra_directories, QueryOrchestrator, SessionReport};
pub use crate::preview::{emphasize, scroll, LineVerdict, PreviewStep, INITIAL_PREVIEW_LINES};
pub use crate::prompt::{ask_yes_no, Prompter, TerminalPrompter};
pub use crate::records::{RecordFile, SEPARATOR_WIDTH};
pub use crate::triage::{TriageSession, CONFIRM_PREVIEW_THRESHOLD};
