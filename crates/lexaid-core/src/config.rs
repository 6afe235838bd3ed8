use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Result;

use crate::types::DEFAULT_MODEL;

pub const DEFAULT_UPSTREAM_BASE: &str = "https://api.siliconflow.cn/v1";
pub const API_KEY_VAR: &str = "SILICONFLOW_API_KEY";

/// Full application configuration.
/// The upstream credential comes from env/.env only and is never logged.
#[derive(Debug, Clone)]
pub struct Config {
    /// Upstream bearer credential. `None` when unset or blank.
    pub api_key: Option<String>,
    /// Base URL of the upstream chat-completions API (no trailing `/chat/completions`).
    pub upstream_base: String,

    // Gateway
    pub web_bind: String,
    pub web_port: u16,
    pub body_limit_bytes: usize,

    // Client
    pub gateway_url: String,
    pub model: String,

    /// Directory for the persisted conversation and the last drafted document.
    pub data_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            upstream_base: DEFAULT_UPSTREAM_BASE.into(),
            web_bind: "127.0.0.1".into(),
            web_port: 8787,
            body_limit_bytes: 2 * 1024 * 1024,
            gateway_url: "http://127.0.0.1:8787".into(),
            model: DEFAULT_MODEL.into(),
            data_dir: "store".into(),
        }
    }
}

fn parse_dotenv() -> HashMap<String, String> {
    let Ok(contents) = std::fs::read_to_string(".env") else {
        return HashMap::new();
    };
    parse_dotenv_str(&contents)
}

fn parse_dotenv_str(contents: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((k, v)) = line.split_once('=') {
            let v = v.trim().trim_matches('"');
            map.insert(k.trim().to_string(), v.to_string());
        }
    }
    map
}

fn get(key: &str, dotenv: &HashMap<String, String>) -> Option<String> {
    std::env::var(key).ok().or_else(|| dotenv.get(key).cloned())
}

fn get_str(key: &str, dotenv: &HashMap<String, String>, default: &str) -> String {
    get(key, dotenv).unwrap_or_else(|| default.to_string())
}

fn get_u16(key: &str, dotenv: &HashMap<String, String>, default: u16) -> u16 {
    get(key, dotenv)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn get_usize(key: &str, dotenv: &HashMap<String, String>, default: usize) -> usize {
    get(key, dotenv)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Placeholder values shipped in `.env.example` do not count as a credential.
fn usable_key(raw: Option<String>) -> Option<String> {
    raw.map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty() && k != "your_api_key_here")
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let dotenv = parse_dotenv();
        Ok(Self::from_sources(&dotenv))
    }

    fn from_sources(dotenv: &HashMap<String, String>) -> Self {
        let defaults = Config::default();
        Config {
            api_key: usable_key(get(API_KEY_VAR, dotenv)),
            upstream_base: get_str("UPSTREAM_BASE", dotenv, &defaults.upstream_base)
                .trim_end_matches('/')
                .to_string(),
            web_bind: get_str("WEB_BIND", dotenv, &defaults.web_bind),
            web_port: get_u16("PORT", dotenv, defaults.web_port),
            body_limit_bytes: get_usize("BODY_LIMIT_BYTES", dotenv, defaults.body_limit_bytes),
            gateway_url: get_str("LEXAID_GATEWAY", dotenv, &defaults.gateway_url)
                .trim_end_matches('/')
                .to_string(),
            model: get_str("LEXAID_MODEL", dotenv, &defaults.model),
            data_dir: get_str("DATA_DIR", dotenv, &defaults.data_dir),
        }
    }

    /// Full upstream endpoint the gateway forwards to.
    pub fn upstream_url(&self) -> String {
        format!("{}/chat/completions", self.upstream_base)
    }

    pub fn conversation_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("consult_messages_v1.json")
    }

    pub fn last_document_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("last_document.json")
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotenv_parsing_skips_comments_and_quotes() {
        let map = parse_dotenv_str("# comment\n\nPORT=9000\nLEXAID_MODEL=\"m\"\n");
        assert_eq!(map.get("PORT").map(String::as_str), Some("9000"));
        assert_eq!(map.get("LEXAID_MODEL").map(String::as_str), Some("m"));
        assert!(!map.contains_key("# comment"));
    }

    #[test]
    fn placeholder_key_is_not_a_credential() {
        assert_eq!(usable_key(Some("your_api_key_here".into())), None);
        assert_eq!(usable_key(Some("  ".into())), None);
        assert_eq!(usable_key(Some(" sk-1 ".into())).as_deref(), Some("sk-1"));
    }

    #[test]
    fn upstream_url_strips_trailing_slash() {
        let mut map = HashMap::new();
        map.insert("UPSTREAM_BASE".to_string(), "http://localhost:9/v1/".to_string());
        let cfg = Config::from_sources(&map);
        // Process env wins over the map, so only assert when the var is unset.
        if std::env::var("UPSTREAM_BASE").is_err() {
            assert_eq!(cfg.upstream_url(), "http://localhost:9/v1/chat/completions");
        }
    }
}
