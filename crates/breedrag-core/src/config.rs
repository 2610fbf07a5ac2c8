//! Configuration loader and path helpers.
//!
//! Uses Figment to merge built-in defaults + `config.toml` + `config.<env>.toml`
//! + `APP_*` env vars (nested keys separated by `__`, e.g. `APP_LLM__BASE_URL`).
//! Provides helpers to expand `~` and `${VAR}` and to resolve relative paths
//! against a known base directory.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Terms the default embedder counts. Order fixes the vector layout.
pub const DEFAULT_VOCABULARY: &[&str] = &[
    "dog", "breed", "sub", "variety", "type", "has", "is", "are",
    "terrier", "hound", "shepherd", "retriever", "bulldog", "spaniel",
    "poodle", "beagle", "collie", "husky", "corgi", "dalmatian",
    "mastiff", "pointer", "setter", "schnauzer", "sheepdog", "mountain",
    "australian", "german", "english", "french", "american", "scottish",
    "small", "large", "medium", "coat", "fur", "hair", "size",
    "follow", "following", "this", "that", "these", "those", "no", "yes",
];

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant that answers questions about dogs based on the provided context. Only use information from the context to answer questions. If the context does not contain relevant information, say so.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorpusKind {
    BreedCatalog,
    Directory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusConfig {
    pub source: CorpusKind,
    pub catalog_url: String,
    pub directory: Option<String>,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self { source: CorpusKind::BreedCatalog, catalog_url: "https://dog.ceo".to_string(), directory: None }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    pub vocabulary: Vec<String>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self { vocabulary: DEFAULT_VOCABULARY.iter().map(|t| (*t).to_string()).collect() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_ms: u64,
    pub health_timeout_ms: u64,
    pub system_prompt: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            model: "local-model".to_string(),
            temperature: 0.7,
            max_tokens: 500,
            timeout_ms: 30_000,
            health_timeout_ms: 5_000,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

/// Retrieval depth and the presentation lengths used when shaping output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RagConfig {
    pub top_k: usize,
    pub fallback_excerpt_chars: usize,
    pub context_preview_chars: usize,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self { top_k: 5, fallback_excerpt_chars: 300, context_preview_chars: 500 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub rag: RagConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        if self.embedding.vocabulary.is_empty() {
            return Err(Error::InvalidConfig("embedding.vocabulary must not be empty".to_string()));
        }
        if self.rag.top_k == 0 {
            return Err(Error::InvalidConfig("rag.top_k must be at least 1".to_string()));
        }
        if self.llm.timeout_ms == 0 || self.llm.health_timeout_ms == 0 {
            return Err(Error::InvalidConfig("llm timeouts must be non-zero".to_string()));
        }
        if self.corpus.source == CorpusKind::Directory && self.corpus.directory.is_none() {
            return Err(Error::InvalidConfig("corpus.directory is required for the directory source".to_string()));
        }
        Ok(())
    }
}

pub struct Config {
    figment: Figment,
    base_dir: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_from(Path::new("."), &env_name)
    }

    /// Loads `config.toml` and the env overlay from `dir`. Missing files are skipped.
    pub fn load_from(dir: &Path, env_name: &str) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(dir.join("config.toml")));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file(dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(dir.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment, base_dir: dir.to_path_buf() };
        config.app()?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| Error::InvalidConfig(format!("Failed to get '{key}': {e}")))
    }

    /// The typed, validated view of the merged configuration.
    pub fn app(&self) -> Result<AppConfig> {
        let app: AppConfig = self
            .figment
            .extract()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        app.validate()?;
        Ok(app)
    }

    /// Resolves a configured path against the directory the config was loaded from.
    pub fn resolve_path<S: AsRef<str>>(&self, p: S) -> PathBuf {
        resolve_with_base(&self.base_dir, p)
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
