#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use serde_json::{json, Value};
use synthesia_cli::{AppConfig, Client, ClientBuilder, Prompter};
use wiremock::MockServer;

pub const API_KEY: &str = "test-key";

/// Answers confirmations from a fixed script and records every question.
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<bool>>,
    questions: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new(answers: &[bool]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().copied().collect()),
            questions: Mutex::new(Vec::new()),
        }
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().unwrap().clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, question: &str, _default: bool) -> synthesia_cli::Result<bool> {
        self.questions.lock().unwrap().push(question.to_string());
        Ok(self
            .answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected prompt: {question}")))
    }
}

pub fn base_url(server: &MockServer) -> String {
    format!("{}/v2", server.uri())
}

pub fn client(server: &MockServer) -> Client {
    ClientBuilder::new()
        .api_key(API_KEY)
        .base_url(base_url(server))
        .build()
        .unwrap()
}

/// Config rooted in `dir`, pointed at the mock server, with fast polling.
pub fn config(server: &MockServer, dir: &Path) -> AppConfig {
    let mut config = AppConfig::with_dirs(dir, dir);
    config.base_url = base_url(server);
    config.api_key = Some(API_KEY.to_string());
    config.batch_poll_interval = Duration::from_millis(10);
    config.quick_poll_interval = Duration::from_millis(10);
    config
}

pub fn video(id: &str, title: &str, status: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "status": status,
        "visibility": "private",
        "createdAt": 1722000327,
        "lastUpdatedAt": 1722000333
    })
}

pub fn completed_video(id: &str, title: &str, download: &str) -> Value {
    let mut v = video(id, title, "complete");
    v["download"] = json!(download);
    v["duration"] = json!("0:00:06.605");
    v
}

/// A `GET /videos` body with `n` entries, ids `id-1..=id-n`.
pub fn video_list(n: usize) -> Value {
    let videos: Vec<Value> = (1..=n)
        .map(|i| video(&format!("id-{i}"), &format!("Video {i}"), "complete"))
        .collect();
    json!({ "videos": videos })
}
