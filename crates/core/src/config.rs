use std::env;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

/// Key/value source the config is read from. `std::env` in production.
type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Profiled reader: tries `{PROFILE}_{KEY}` first, falls back to `{KEY}`.
struct Profiled<'a> {
    profile: &'a str,
    lookup: Lookup<'a>,
}

impl Profiled<'_> {
    fn opt(&self, key: &str) -> Option<String> {
        if !self.profile.is_empty() {
            let prefixed = format!("{}_{}", self.profile, key);
            if let Some(v) = (self.lookup)(&prefixed).filter(|s| !s.is_empty()) {
                return Some(v);
            }
        }
        (self.lookup)(key).filter(|s| !s.is_empty())
    }

    fn or(&self, key: &str, default: &str) -> String {
        self.opt(key).unwrap_or_else(|| default.to_string())
    }

    fn parsed<T: FromStr>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        match self.opt(key) {
            None => Ok(None),
            Some(raw) => raw
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| ConfigError::Invalid {
                    key: key.to_string(),
                    value: raw,
                }),
        }
    }

    fn parsed_or<T: FromStr>(&self, key: &str, default: T) -> Result<T, ConfigError> {
        Ok(self.parsed(key)?.unwrap_or(default))
    }
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub chunking: ChunkingConfig,
    pub embedding: EmbeddingConfig,
    pub ollama: OllamaConfig,
    pub openai: OpenAiConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `SEMCHUNK_PROFILE`. When set (e.g. `PROD`), every
    /// key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let profile = env_opt("SEMCHUNK_PROFILE").unwrap_or_default();
        Self::from_lookup(&profile, &env_opt)
    }

    /// Build config for a named profile from an arbitrary key/value source.
    pub fn from_lookup(
        profile: &str,
        lookup: &dyn Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let p = profile.to_uppercase();
        let src = Profiled {
            profile: &p,
            lookup,
        };
        Ok(Self {
            profile: p.clone(),
            chunking: ChunkingConfig::from_source(&src)?,
            embedding: EmbeddingConfig::from_source(&src)?,
            ollama: OllamaConfig::from_source(&src),
            openai: OpenAiConfig::from_source(&src),
        })
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() {
            "default"
        } else {
            &self.profile
        }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  chunking:   buffer_size={}, threshold={}, word_limit={}, anchor_stride={}, coverage={}",
            self.chunking
                .buffer_size
                .map(|b| b.to_string())
                .unwrap_or_else(|| "(unset)".to_string()),
            self.chunking.threshold,
            self.chunking.word_limit,
            self.chunking.anchor_stride,
            self.chunking.anchor_coverage,
        );
        tracing::info!(
            "  embedding:  provider={}, dims={}, batch={}, concurrency={}, cache={}",
            self.embedding.provider,
            self.embedding.dimensions,
            self.embedding.batch_size,
            self.embedding.concurrency,
            self.embedding.cache_capacity,
        );
        tracing::info!(
            "  ollama:     url={}, model={}",
            self.ollama.url,
            self.ollama.embedding_model
        );
        tracing::info!(
            "  openai:     base_url={}, model={}, key={}",
            self.openai.base_url,
            self.openai.embedding_model,
            if self.openai.api_key.is_some() { "set" } else { "(none)" },
        );
        if self.embedding.provider == "openai" && !self.openai.is_configured() {
            tracing::warn!("EMBEDDING_PROVIDER=openai but OPENAI_API_KEY is not set");
        }
    }
}

// ── Chunking ──────────────────────────────────────────────────

/// How the anchor chunker treats windows that no strided anchor reached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnchorCoverage {
    /// Unreached windows are left out of every chunk.
    #[default]
    BestEffort,
    /// Unreached windows seed extra anchors until every window is chunked.
    Full,
}

impl FromStr for AnchorCoverage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "best-effort" | "best_effort" | "besteffort" => Ok(Self::BestEffort),
            "full" | "strict" => Ok(Self::Full),
            other => Err(format!("unknown anchor coverage '{other}'")),
        }
    }
}

impl fmt::Display for AnchorCoverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BestEffort => f.write_str("best-effort"),
            Self::Full => f.write_str("full"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Window combiner buffer. No default: callers must supply one.
    pub buffer_size: Option<usize>,
    pub threshold: f32,
    pub word_limit: usize,
    pub anchor_stride: usize,
    pub anchor_coverage: AnchorCoverage,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            buffer_size: None,
            threshold: 0.75,
            word_limit: 512,
            anchor_stride: 5,
            anchor_coverage: AnchorCoverage::BestEffort,
        }
    }
}

impl ChunkingConfig {
    fn from_source(src: &Profiled<'_>) -> Result<Self, ConfigError> {
        let d = Self::default();
        Ok(Self {
            buffer_size: src.parsed("CHUNK_BUFFER_SIZE")?,
            threshold: src.parsed_or("CHUNK_THRESHOLD", d.threshold)?,
            word_limit: src.parsed_or("CHUNK_WORD_LIMIT", d.word_limit)?,
            anchor_stride: src.parsed_or("CHUNK_ANCHOR_STRIDE", d.anchor_stride)?,
            anchor_coverage: src.parsed_or("CHUNK_ANCHOR_COVERAGE", d.anchor_coverage)?,
        })
    }
}

// ── Embedding ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// "ollama", "openai"
    pub provider: String,
    pub dimensions: usize,
    pub batch_size: usize,
    /// Maximum provider requests in flight at once.
    pub concurrency: usize,
    /// LRU entries; 0 disables the cache.
    pub cache_capacity: usize,
}

impl EmbeddingConfig {
    fn from_source(src: &Profiled<'_>) -> Result<Self, ConfigError> {
        Ok(Self {
            provider: src.or("EMBEDDING_PROVIDER", "ollama"),
            dimensions: src.parsed_or("EMBEDDING_DIMENSIONS", 768)?,
            batch_size: src.parsed_or("EMBEDDING_BATCH_SIZE", 64)?,
            concurrency: src.parsed_or("EMBEDDING_CONCURRENCY", 4)?,
            cache_capacity: src.parsed_or("EMBEDDING_CACHE_CAPACITY", 4096)?,
        })
    }
}

// ── Ollama (local models) ─────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    pub url: String,
    pub embedding_model: String,
}

impl OllamaConfig {
    fn from_source(src: &Profiled<'_>) -> Self {
        Self {
            url: src.or("OLLAMA_URL", "http://localhost:11434"),
            embedding_model: src.or("OLLAMA_EMBEDDING_MODEL", "nomic-embed-text"),
        }
    }
}

// ── OpenAI-compatible ─────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub embedding_model: String,
}

impl OpenAiConfig {
    fn from_source(src: &Profiled<'_>) -> Self {
        Self {
            api_key: src.opt("OPENAI_API_KEY"),
            base_url: src.or("OPENAI_BASE_URL", "https://api.openai.com"),
            embedding_model: src.or("OPENAI_EMBEDDING_MODEL", "text-embedding-3-small"),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}
