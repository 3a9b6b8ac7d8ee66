use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root directory of the knowledge-base documents
    pub docs_dir: PathBuf,
    /// Retrieval limits and switches
    pub search: SearchConfig,
    /// LLM used as the re-ranking oracle
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Number of results returned by the plain lexical path.
    pub plain_limit: usize,
    /// Lexical candidates handed to the re-ranker.
    pub max_candidates: usize,
    /// Results returned by the enhanced path.
    pub max_results: usize,
    /// When false, the enhanced path never consults the LLM.
    pub rerank_enabled: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            plain_limit: 3,
            max_candidates: 10,
            max_results: 3,
            rerank_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "ollama" or "openai"
    pub provider: String,
    /// Base URL for the LLM API
    pub base_url: String,
    /// Model name used for re-ranking
    pub chat_model: String,
    /// API key (only needed for cloud providers)
    pub api_key: Option<String>,
    /// Request timeout in seconds (capped at 60).
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            base_url: "http://localhost:11434".to_string(),
            chat_model: "llama3.2".to_string(),
            api_key: None,
            timeout_secs: 20,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            docs_dir: PathBuf::from("./knowledge"),
            search: SearchConfig::default(),
            llm: LlmConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var("KB_DOCS_DIR") {
            config.docs_dir = PathBuf::from(dir);
        }
        if let Ok(val) = std::env::var("KB_PLAIN_LIMIT") {
            if let Ok(v) = val.parse() {
                config.search.plain_limit = v;
            }
        }
        if let Ok(val) = std::env::var("KB_MAX_CANDIDATES") {
            if let Ok(v) = val.parse() {
                config.search.max_candidates = v;
            }
        }
        if let Ok(val) = std::env::var("KB_MAX_RESULTS") {
            if let Ok(v) = val.parse() {
                config.search.max_results = v;
            }
        }
        if let Ok(val) = std::env::var("KB_RERANK_ENABLED") {
            if let Ok(v) = val.parse() {
                config.search.rerank_enabled = v;
            }
        }

        // LLM config
        if let Ok(provider) = std::env::var("LLM_PROVIDER") {
            config.llm.provider = provider;
        }
        if let Ok(url) = std::env::var("LLM_BASE_URL") {
            config.llm.base_url = url;
        }
        if let Ok(model) = std::env::var("LLM_CHAT_MODEL") {
            config.llm.chat_model = model;
        }
        if let Ok(key) = std::env::var("LLM_API_KEY") {
            config.llm.api_key = Some(key);
        }
        if let Ok(val) = std::env::var("LLM_TIMEOUT_SECS") {
            if let Ok(v) = val.parse::<u64>() {
                config.llm.timeout_secs = v.min(60); // Cap at 60s
            }
        }

        config
    }
}
