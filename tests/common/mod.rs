#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::{self, Cursor, Write};
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, TimeZone};
use chrono_tz::Tz;
use chrono_tz::US::Eastern;
use github_triage::{Prompter, RunConfig};
use serde_json::{json, Value};
use zip::write::FileOptions;
use zip::ZipWriter;

/// Prompter that answers from a fixed script and records everything.
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    pub prompts: Vec<String>,
    pub shown: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedPrompter {
            answers: answers.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
            shown: Vec::new(),
        }
    }

    pub fn prompts_containing(&self, needle: &str) -> usize {
        self.prompts.iter().filter(|p| p.contains(needle)).count()
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next_answer(&mut self) -> io::Result<String> {
        self.answers
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
    }
}

impl Prompter for ScriptedPrompter {
    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        self.prompts.push(prompt.to_string());
        self.next_answer()
    }

    fn read_key(&mut self, prompt: &str) -> io::Result<char> {
        self.prompts.push(prompt.to_string());
        Ok(self.next_answer()?.chars().next().unwrap_or('\n'))
    }

    fn show(&mut self, line: &str) {
        self.shown.push(line.to_string());
    }
}

pub fn started() -> DateTime<Tz> {
    Eastern.with_ymd_and_hms(2024, 1, 15, 12, 4, 5).unwrap()
}

pub fn config(api_base: &str, output_root: &Path) -> RunConfig {
    RunConfig {
        token: "test-token".into(),
        language: "python".into(),
        output_root: output_root.to_path_buf(),
        extra_directory: None,
        issue: None,
        scroll_preview: false,
        api_base: api_base.into(),
    }
}

pub fn item(owner: &str, repo: &str, path: &str) -> Value {
    json!({
        "name": path.rsplit('/').next().unwrap_or(path),
        "path": path,
        "sha": "0123456789abcdef",
        "html_url": format!("https://github.com/{owner}/{repo}/blob/main/{path}"),
        "repository": {
            "name": repo,
            "full_name": format!("{owner}/{repo}"),
            "html_url": format!("https://github.com/{owner}/{repo}"),
            "owner": { "login": owner }
        }
    })
}

/// `count` items from distinct repositories `<prefix>{n}/repo{n}`.
pub fn distinct_items(prefix: &str, count: usize) -> Vec<Value> {
    (0..count)
        .map(|n| item(&format!("{prefix}{n}"), &format!("repo{n}"), "main.py"))
        .collect()
}

pub fn page(items: Vec<Value>) -> Value {
    json!({
        "total_count": items.len(),
        "incomplete_results": false,
        "items": items
    })
}

pub fn contents(text: &str) -> Value {
    // GitHub wraps base64 content at 60 columns
    let encoded = STANDARD.encode(text);
    let wrapped: Vec<String> = encoded
        .as_bytes()
        .chunks(60)
        .map(|c| String::from_utf8_lossy(c).into_owned())
        .collect();
    json!({
        "type": "file",
        "encoding": "base64",
        "content": wrapped.join("\n")
    })
}

pub fn zip_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, body) in entries {
        writer.start_file(*name, FileOptions::default()).unwrap();
        writer.write_all(body.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

pub fn separator_count(text: &str) -> usize {
    text.lines().filter(|l| *l == "=".repeat(50)).count()
}
