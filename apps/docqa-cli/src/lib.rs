//! Shared pieces of the docqa binaries: logging setup, config overrides from
//! the command line, and the interactive question loop.

pub mod repl;

use clap::Args;
use tracing_subscriber::EnvFilter;

use docqa_core::{Config, Result};

/// Log to stderr so answers on stdout stay clean. `RUST_LOG` overrides the
/// default `info` level.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

/// Command-line overrides, applied on top of the loaded configuration.
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigOverrides {
    /// Directory holding the .txt/.md source documents
    #[arg(long)]
    pub data_dir: Option<String>,

    /// Directory for chunks, vectors, metadata and the index
    #[arg(long)]
    pub index_dir: Option<String>,

    /// Embedding model id, or "hash" for the model-free embedder
    #[arg(long)]
    pub embed_model: Option<String>,

    /// Number of chunks to retrieve per question
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,
}

impl ConfigOverrides {
    pub fn apply(&self, mut config: Config) -> Result<Config> {
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(dir) = &self.index_dir {
            config.index_dir = dir.clone();
        }
        if let Some(model) = &self.embed_model {
            config.embed_model = model.clone();
        }
        if let Some(k) = self.top_k {
            config.top_k = k;
        }
        config.validate()?;
        Ok(config)
    }

    /// `.env`, then layered config, then these overrides.
    pub fn load(&self) -> Result<Config> {
        dotenvy::dotenv().ok();
        self.apply(Config::load()?)
    }
}
