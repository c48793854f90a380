#![allow(dead_code)]

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use repoprep::Config;
use serde_json::{json, Value};

/// Config pointed at mock servers instead of the real APIs
pub fn test_config(github_base: &str, completion_url: &str) -> Config {
    let mut config = Config::with_api_key("gsk_test_key");
    config.github_api_base = github_base.to_string();
    config.completion_url = completion_url.to_string();
    config
}

pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}

/// GitHub contents-API body with base64-encoded text
pub fn github_content_body(text: &str) -> String {
    json!({
        "name": "file",
        "size": text.len(),
        "encoding": "base64",
        "content": BASE64.encode(text.as_bytes()),
    })
    .to_string()
}

/// GitHub tree-API body from (path, type) pairs
pub fn github_tree_body(entries: &[(&str, &str)]) -> String {
    let tree: Vec<Value> = entries
        .iter()
        .map(|(path, kind)| json!({"path": path, "type": kind, "size": 120}))
        .collect();
    json!({"sha": "abc123", "truncated": false, "tree": tree}).to_string()
}

/// Chat-completion body whose message content is the given text
pub fn completion_body(content: &str) -> String {
    json!({
        "id": "chatcmpl-test",
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": content}}
        ]
    })
    .to_string()
}

/// A schema-complete analysis object with five items per list
pub fn full_analysis_value() -> Value {
    let bullets: Vec<Value> = (1..=5)
        .map(|i| json!({"point": format!("Delivered improvement {i} measured end to end")}))
        .collect();
    let viva: Vec<Value> = (1..=5)
        .map(|i| {
            json!({
                "question": format!("Viva question {i}?"),
                "answer": format!("Viva answer {i}."),
                "difficulty": (["easy", "medium", "hard"][i % 3])
            })
        })
        .collect();
    let qa: Vec<Value> = (1..=5)
        .map(|i| {
            json!({
                "question": format!("Interview question {i}?"),
                "answer": format!("Interview answer {i}."),
                "category": (["technical", "behavioral", "project-specific"][i % 3])
            })
        })
        .collect();

    json!({
        "explanation": {
            "overview": "General-purpose speech recognition system.",
            "key_features": ["Multilingual transcription", "Translation"],
            "tech_stack": ["Python", "PyTorch"],
            "architecture": "Encoder-decoder transformer over log-mel spectrograms.",
            "challenges_solved": ["Robustness to accents and background noise"],
            "impact": "Brings accurate speech recognition to a broad audience."
        },
        "resume_bullets": bullets,
        "viva_questions": viva,
        "interview_qa": qa
    })
}
