use std::path::PathBuf;

use clap::Parser;

/// Interactive GitHub code search triage: search for a keyword, preview every
/// matching file, and download (and optionally open an issue on) the
/// repositories you accept.
#[derive(Parser)]
#[clap(
    author,
    version,
    about,
    long_about = "Search GitHub code for a keyword, triage every matching file by hand, and download the repositories you accept. Every decision is logged to a records file in the output root."
)]
pub struct Args {
    /// Path to the key=value configuration file.
    #[clap(value_name = "CONFIG")]
    pub config: PathBuf,

    /// GitHub API token. Overrides the `token` config key and GITHUB_TOKEN.
    #[clap(short, long)]
    pub token: Option<String>,

    /// Base URL of the GitHub REST API.
    #[clap(long, value_name = "URL")]
    pub api_base: Option<String>,
}
