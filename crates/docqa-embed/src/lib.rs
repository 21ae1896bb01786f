//! docqa-embed
//!
//! Embedder adapters behind [`docqa_core::Embedder`]:
//! - [`BertEmbedder`]: sentence-transformers BERT models (e.g.
//!   all-MiniLM-L6-v2) loaded from a local directory with candle, mean-pooled
//!   and L2-normalized.
//! - [`HashEmbedder`]: deterministic token hashing, no model files needed.
//!   Selected with `embed_model = "hash"`; used by the test suites.

use anyhow::{anyhow, Context, Result};
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::time::Instant;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use tokenizers::Tokenizer;
use tracing::{debug, info};
use twox_hash::XxHash64;

use docqa_core::{Config, Embedder, Error};

mod device;
mod pool;
mod tokenize;

pub use device::select_device;
pub use pool::masked_mean_l2;
pub use tokenize::{load_tokenizer, tokenize_batch};

const MAX_TOKENS: usize = 256;

pub struct BertEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    dim: usize,
    batch_size: usize,
}

impl BertEmbedder {
    /// Load `config.json`, `tokenizer.json` and `model.safetensors` (or
    /// `pytorch_model.bin`) from `model_dir`.
    pub fn from_dir(model_dir: &Path, batch_size: usize) -> Result<Self> {
        let device = select_device();
        info!(model_dir = %model_dir.display(), "loading embedding model");

        let tokenizer = load_tokenizer(&model_dir.join("tokenizer.json"), MAX_TOKENS)?;

        let config_path = model_dir.join("config.json");
        let raw_config = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let config: BertConfig = serde_json::from_str(&raw_config)?;
        let dim = serde_json::from_str::<serde_json::Value>(&raw_config)?
            .get("hidden_size")
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| anyhow!("{} has no hidden_size", config_path.display()))? as usize;

        let vb = load_weights(model_dir, &device)?;
        let model = BertModel::load(vb, &config)?;
        info!(dim, "embedding model loaded");

        Ok(Self { model, tokenizer, device, dim, batch_size: batch_size.max(1) })
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let start = Instant::now();
        let (input_ids, attention_mask) = tokenize_batch(&self.tokenizer, texts, &self.device)?;
        let token_type_ids = input_ids.zeros_like()?;
        let hidden = self.model.forward(&input_ids, &token_type_ids, Some(&attention_mask))?;
        let pooled = masked_mean_l2(&hidden, &attention_mask)?;
        let vectors: Vec<Vec<f32>> = pooled.to_device(&Device::Cpu)?.to_vec2()?;
        debug!(batch = texts.len(), elapsed_ms = start.elapsed().as_millis() as u64, "embedded batch");
        Ok(vectors)
    }
}

fn load_weights(model_dir: &Path, device: &Device) -> Result<VarBuilder<'static>> {
    let safetensors = model_dir.join("model.safetensors");
    if safetensors.exists() {
        let bytes = std::fs::read(&safetensors)
            .with_context(|| format!("Failed to read weights from {}", safetensors.display()))?;
        return Ok(VarBuilder::from_buffered_safetensors(bytes, DType::F32, device)?);
    }
    let weights_path = model_dir.join("pytorch_model.bin");
    let weights = candle_core::pickle::read_all(&weights_path)
        .with_context(|| format!("Failed to read weights from {}", weights_path.display()))?;
    let weights_map: HashMap<String, Tensor> = weights.into_iter().collect();
    Ok(VarBuilder::from_tensors(weights_map, DType::F32, device))
}

impl Embedder for BertEmbedder {
    fn embed(&self, texts: &[String]) -> docqa_core::Result<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.batch_size) {
            let vectors = self.embed_batch(batch).map_err(|e| Error::EmbeddingBackend(format!("{e:#}")))?;
            out.extend(vectors);
        }
        check_dimensions(&out, texts.len(), self.dim)?;
        Ok(out)
    }

    fn dimension(&self) -> usize {
        self.dim
    }
}

/// Token-hashing embedder: each lowercased alphanumeric token lands in a
/// bucket chosen by its xxHash, the vector is then L2-normalized.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(1) }
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dim];
        let tokens = text.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty());
        for (i, token) in tokens.enumerate() {
            let h = hash_token(&token.to_lowercase());
            let idx = (h % self.dim as u64) as usize;
            let val = (((h >> 32) as u32) as f32) / (u32::MAX as f32);
            v[idx] += val + (i % 3) as f32 * 0.01;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm < 1e-6 {
            // no tokens: a fixed unit vector keeps the output normalized
            v[(hash_token("") % self.dim as u64) as usize] = 1.0;
            return v;
        }
        for x in &mut v {
            *x /= norm;
        }
        v
    }
}

fn hash_token(token: &str) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    token.hash(&mut hasher);
    hasher.finish()
}

impl Embedder for HashEmbedder {
    fn embed(&self, texts: &[String]) -> docqa_core::Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }

    fn dimension(&self) -> usize {
        self.dim
    }
}

fn check_dimensions(vectors: &[Vec<f32>], expected_count: usize, dim: usize) -> docqa_core::Result<()> {
    if vectors.len() != expected_count {
        return Err(Error::EmbeddingBackend(format!(
            "model returned {} vectors for {} inputs",
            vectors.len(),
            expected_count
        )));
    }
    if let Some((i, v)) = vectors.iter().enumerate().find(|(_, v)| v.len() != dim) {
        return Err(Error::EmbeddingBackend(format!("vector {i} has {} dimensions, expected {dim}", v.len())));
    }
    Ok(())
}

/// Build the embedder named by `config.embed_model`.
pub fn get_default_embedder(config: &Config) -> docqa_core::Result<Box<dyn Embedder>> {
    if config.uses_hash_embedder() {
        info!(dim = config.hash_dimension, "using HashEmbedder");
        return Ok(Box::new(HashEmbedder::new(config.hash_dimension)));
    }
    let model_dir = config.model_dir();
    let embedder = BertEmbedder::from_dir(&model_dir, config.embed_batch_size).map_err(|e| {
        Error::EmbeddingBackend(format!("cannot load {} from {}: {e:#}", config.embed_model, model_dir.display()))
    })?;
    Ok(Box::new(embedder))
}
