//! Configuration loader and path helpers.
//!
//! Uses Figment to merge compiled defaults, `docqa.toml`,
//! `docqa.<env>.toml`, `DOCQA_*` env vars and the bare legacy keys
//! (`CHUNK_SIZE`, `TOP_K`, `OPENAI_API_KEY`, ...). The resulting [`Config`]
//! is passed explicitly to constructors; the core never reads the process
//! environment on its own.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::data_processor::ChunkingConfig;
use crate::error::{Error, Result};

pub const DEFAULT_EMBED_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";
pub const DEFAULT_REMOTE_MODEL: &str = "gpt-4o-mini";
pub const HASH_EMBED_MODEL: &str = "hash";

const LEGACY_KEYS: &[&str] = &[
    "CHUNK_SIZE",
    "CHUNK_OVERLAP",
    "EMBED_MODEL",
    "TOP_K",
    "OPENAI_API_KEY",
    "OPENAI_MODEL",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_dir: String,
    pub index_dir: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub embed_model: String,
    pub model_dir: Option<String>,
    pub embed_batch_size: usize,
    pub hash_dimension: usize,
    pub top_k: usize,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub request_timeout_secs: u64,
    pub temperature: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            index_dir: "index".to_string(),
            chunk_size: 900,
            chunk_overlap: 150,
            embed_model: DEFAULT_EMBED_MODEL.to_string(),
            model_dir: None,
            embed_batch_size: 64,
            hash_dimension: 384,
            top_k: 5,
            openai_api_key: None,
            openai_model: DEFAULT_REMOTE_MODEL.to_string(),
            openai_base_url: "https://api.openai.com/v1".to_string(),
            request_timeout_secs: 60,
            temperature: 0.2,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config: Config = Self::figment()
            .extract()
            .map_err(|e| Error::InvalidConfiguration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn figment() -> Figment {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::from(Serialized::defaults(Config::default())).merge(Toml::file("docqa.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("docqa.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("docqa.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("docqa.test.toml")),
            _ => {}
        }
        figment
            .merge(Env::prefixed("DOCQA_"))
            .merge(Env::raw().only(LEGACY_KEYS))
    }

    pub fn validate(&self) -> Result<()> {
        self.chunking().validate()?;
        if self.top_k == 0 {
            return Err(Error::InvalidConfiguration("top_k must be greater than 0".to_string()));
        }
        if self.embed_batch_size == 0 {
            return Err(Error::InvalidConfiguration("embed_batch_size must be greater than 0".to_string()));
        }
        if self.hash_dimension == 0 {
            return Err(Error::InvalidConfiguration("hash_dimension must be greater than 0".to_string()));
        }
        Ok(())
    }

    pub fn chunking(&self) -> ChunkingConfig {
        ChunkingConfig { chunk_size: self.chunk_size, overlap: self.chunk_overlap }
    }

    pub fn data_dir(&self) -> PathBuf {
        expand_path(&self.data_dir)
    }

    pub fn index_dir(&self) -> PathBuf {
        expand_path(&self.index_dir)
    }

    /// Local model directory: `model_dir` when set, otherwise
    /// `models/<last segment of embed_model>`.
    pub fn model_dir(&self) -> PathBuf {
        match &self.model_dir {
            Some(dir) => expand_path(dir),
            None => {
                let name = self.embed_model.rsplit('/').next().unwrap_or(&self.embed_model);
                Path::new("models").join(name)
            }
        }
    }

    pub fn uses_hash_embedder(&self) -> bool {
        self.embed_model.trim().eq_ignore_ascii_case(HASH_EMBED_MODEL)
    }

    /// The remote credential, if one is configured. Blank values count as absent.
    pub fn api_key(&self) -> Option<&str> {
        self.openai_api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    pub fn remote_model(&self) -> &str {
        let model = self.openai_model.trim();
        if model.is_empty() { DEFAULT_REMOTE_MODEL } else { model }
    }
}

/// `~` and `$VAR`/`${VAR}` expansion for configured paths. Relative results
/// stay relative to the working directory; unknown variables are left as is.
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let raw = input.as_ref();
    let with_vars = shellexpand::env(raw).unwrap_or(std::borrow::Cow::Borrowed(raw));
    PathBuf::from(shellexpand::tilde(&with_vars).as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.chunk_size, 900);
        assert_eq!(config.chunk_overlap, 150);
        assert_eq!(config.top_k, 5);
        assert_eq!(config.embed_model, DEFAULT_EMBED_MODEL);
        assert_eq!(config.remote_model(), "gpt-4o-mini");
        assert!(config.api_key().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn legacy_env_keys_override_defaults() {
        Jail::expect_with(|jail| {
            jail.set_env("CHUNK_SIZE", "500");
            jail.set_env("CHUNK_OVERLAP", "50");
            jail.set_env("TOP_K", "3");
            jail.set_env("OPENAI_MODEL", "gpt-4o");
            let config = Config::load().map_err(|e| e.to_string())?;
            assert_eq!(config.chunk_size, 500);
            assert_eq!(config.chunk_overlap, 50);
            assert_eq!(config.top_k, 3);
            assert_eq!(config.remote_model(), "gpt-4o");
            Ok(())
        });
    }

    #[test]
    fn toml_file_then_prefixed_env() {
        Jail::expect_with(|jail| {
            jail.create_file("docqa.toml", "data_dir = \"corpus\"\nembed_model = \"hash\"\ntop_k = 7\n")?;
            jail.set_env("DOCQA_TOP_K", "2");
            let config = Config::load().map_err(|e| e.to_string())?;
            assert_eq!(config.data_dir, "corpus");
            assert!(config.uses_hash_embedder());
            assert_eq!(config.top_k, 2);
            Ok(())
        });
    }

    #[test]
    fn overlap_not_below_chunk_size_is_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("CHUNK_SIZE", "100");
            jail.set_env("CHUNK_OVERLAP", "100");
            let err = Config::load().expect_err("overlap == chunk_size");
            assert!(matches!(err, Error::InvalidConfiguration(_)));
            Ok(())
        });
    }

    #[test]
    fn blank_credentials_count_as_absent() {
        let mut config = Config::default();
        config.openai_api_key = Some("   ".to_string());
        assert!(config.api_key().is_none());
        config.openai_api_key = Some(" sk-test ".to_string());
        assert_eq!(config.api_key(), Some("sk-test"));
        config.openai_model = "  ".to_string();
        assert_eq!(config.remote_model(), DEFAULT_REMOTE_MODEL);
    }

    #[test]
    fn model_dir_defaults_to_last_segment() {
        let config = Config::default();
        assert_eq!(config.model_dir(), Path::new("models").join("all-MiniLM-L6-v2"));
    }

    #[test]
    fn configured_paths_expand_variables() {
        Jail::expect_with(|jail| {
            jail.set_env("DOCQA_TEST_ROOT", "/srv/docqa");
            let config = Config { index_dir: "${DOCQA_TEST_ROOT}/index".to_string(), ..Config::default() };
            assert_eq!(config.index_dir(), PathBuf::from("/srv/docqa/index"));
            assert_eq!(config.data_dir(), PathBuf::from("data"));
            Ok(())
        });
    }
}
