use docqa_core::{Config, Embedder};
use docqa_embed::get_default_embedder;

fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    let embedder = get_default_embedder(&config)?;
    let texts = vec!["hello world".to_string(), "rust embeddings".to_string()];
    let embs = embedder.embed(&texts)?;
    println!("B={} dim={}", embs.len(), embedder.dimension());
    Ok(())
}
