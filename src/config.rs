use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::Level;

use crate::error::{Result, TriageError};

/// Keys a config file may contain. Anything else is rejected.
pub const ALLOWED_KEYS: &[&str] = &[
    "token",
    "issue_title",
    "issue_body",
    "language",
    "output_root",
    "extra_directory",
    "raise_issue",
    "scroll_preview",
    "log_level",
];

pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Raw `key=value` pairs read from a config file, before validation.
#[derive(Debug, Default)]
pub struct ConfigFile {
    entries: Vec<(String, String)>,
    duplicates: Vec<String>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            TriageError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::parse(&text)
    }

    /// Parse config text. Blank lines and `#` comments are skipped; a value
    /// runs from the first `=` to the end of the line. For repeated keys the
    /// first value wins and the key is remembered in [`Self::duplicates`].
    pub fn parse(text: &str) -> Result<Self> {
        let mut config = ConfigFile::default();

        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (key, value) = line.split_once('=').ok_or_else(|| {
                TriageError::Config(format!(
                    "line {}: expected key=value, got <{}>",
                    idx + 1,
                    raw
                ))
            })?;
            let key = key.trim();

            if config.get(key).is_some() {
                config.duplicates.push(key.to_string());
                continue;
            }
            if !ALLOWED_KEYS.contains(&key) {
                return Err(TriageError::Config(format!(
                    "config key {key} is not a known configuration setting"
                )));
            }
            config.entries.push((key.to_string(), value.trim().to_string()));
        }

        Ok(config)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Keys that appeared more than once and were ignored after the first.
    pub fn duplicates(&self) -> &[String] {
        &self.duplicates
    }

    /// Verbosity for the tracing subscriber; `warn` when unset.
    pub fn log_level(&self) -> Result<Level> {
        match self.get("log_level") {
            None | Some("") => Ok(Level::WARN),
            Some(value) => value
                .parse()
                .map_err(|_| TriageError::Config(format!("invalid log_level '{value}'"))),
        }
    }

    fn require(&self, key: &str) -> Result<String> {
        match self.get(key) {
            Some(v) if !v.is_empty() => Ok(v.to_string()),
            _ => Err(TriageError::Config(format!("missing required setting '{key}'"))),
        }
    }

    fn flag(&self, key: &str) -> Result<bool> {
        match self.get(key) {
            None | Some("") => Ok(false),
            Some(v) if v.eq_ignore_ascii_case("true") => Ok(true),
            Some(v) if v.eq_ignore_ascii_case("false") => Ok(false),
            Some(v) => Err(TriageError::Config(format!(
                "'{key}' must be true or false, got '{v}'"
            ))),
        }
    }
}

/// Title and body of the issue filed on accepted repositories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueTemplate {
    pub title: String,
    pub body: String,
}

/// Validated settings for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub token: String,
    pub language: String,
    pub output_root: PathBuf,
    pub extra_directory: Option<PathBuf>,
    /// `Some` when issues should be filed on accept.
    pub issue: Option<IssueTemplate>,
    pub scroll_preview: bool,
    pub api_base: String,
}

impl RunConfig {
    /// Validate a parsed config file.
    ///
    /// The token is taken from `token_override` first, then the `token` key,
    /// then the `GITHUB_TOKEN` environment variable.
    pub fn from_file(
        file: &ConfigFile,
        token_override: Option<String>,
        api_base: Option<String>,
    ) -> Result<Self> {
        let token = match token_override {
            Some(t) if !t.trim().is_empty() => t,
            _ => match file.get("token") {
                Some(t) if !t.is_empty() => t.to_string(),
                _ => match env::var("GITHUB_TOKEN") {
                    Ok(t) if !t.trim().is_empty() => t,
                    _ => {
                        return Err(TriageError::Config(
                            "GitHub token not provided in config, --token or GITHUB_TOKEN".into(),
                        ))
                    }
                },
            },
        };

        let issue = if file.flag("raise_issue")? {
            Some(IssueTemplate {
                title: file.require("issue_title")?,
                body: file.require("issue_body")?,
            })
        } else {
            None
        };

        Ok(RunConfig {
            token,
            language: file.require("language")?.to_lowercase(),
            output_root: PathBuf::from(file.require("output_root")?),
            extra_directory: file
                .get("extra_directory")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            issue,
            scroll_preview: file.flag("scroll_preview")?,
            api_base: api_base
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
                .trim_end_matches('/')
                .to_string(),
        })
    }
}

impl fmt::Display for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.token.chars().count();
        let masked = if count > 4 {
            let tail: String = self.token.chars().skip(count - 4).collect();
            format!("****{tail}")
        } else {
            "****".to_string()
        };
        writeln!(f, "token={masked}")?;
        writeln!(f, "language={}", self.language)?;
        writeln!(f, "output_root={}", self.output_root.display())?;
        if let Some(extra) = &self.extra_directory {
            writeln!(f, "extra_directory={}", extra.display())?;
        }
        writeln!(f, "raise_issue={}", self.issue.is_some())?;
        if let Some(issue) = &self.issue {
            writeln!(f, "issue_title={}", issue.title)?;
            writeln!(f, "issue_body={}", issue.body)?;
        }
        write!(f, "scroll_preview={}", self.scroll_preview)
    }
}
